//! Avatar spawn positions.
//!
//! The authority spawns at the (0,0) corner, everyone else at the opposite
//! corner. Both corners are always carved, and the result depends only on
//! the grid dimensions, never on the seed.

use bevy::prelude::*;

use crate::config::GenerationConfig;
use crate::constants::SPAWN_HEIGHT;

pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, place_new_avatars);
    }
}

/// A participant's avatar. Movement is owned elsewhere.
#[derive(Component, Debug, Clone, Copy)]
pub struct Avatar {
    pub ordinal: u64,
}

pub fn spawn_position(ordinal: u64, config: &GenerationConfig) -> Vec3 {
    if ordinal == 0 {
        return Vec3::new(0.0, SPAWN_HEIGHT, 0.0);
    }
    let cs = config.cell_size;
    Vec3::new(
        config.width.saturating_sub(1) as f32 * cs,
        SPAWN_HEIGHT,
        config.height.saturating_sub(1) as f32 * cs,
    )
}

fn place_new_avatars(
    config: Res<GenerationConfig>,
    mut avatars: Query<(&Avatar, &mut Transform), Added<Avatar>>,
) {
    for (avatar, mut transform) in avatars.iter_mut() {
        transform.translation = spawn_position(avatar.ordinal, &config);
        debug!(ordinal = avatar.ordinal, position = ?transform.translation, "Avatar placed");
    }
}
