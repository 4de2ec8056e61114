//! Red/blue dimensions.
//!
//! Every participant belongs to one dimension by ordinal parity. WallKindA
//! renders only in red, WallKindB only in blue; floor and borders are
//! shared. A camera sees the shared layer and its own dimension.

use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use serde::{Deserialize, Serialize};

use crate::constants::{BLUE_LAYER, RED_LAYER, SHARED_LAYER};
use crate::generation::grid::CellState;
use crate::session::LocalParticipant;

pub struct DimensionPlugin;

impl Plugin for DimensionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_dimension_culling);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Red,
    Blue,
}

impl Dimension {
    pub fn for_ordinal(ordinal: u64) -> Self {
        if ordinal % 2 == 0 {
            Self::Red
        } else {
            Self::Blue
        }
    }

    /// Which dimension a wall cell belongs to; Empty cells have none
    pub fn of_wall(cell: CellState) -> Option<Self> {
        match cell {
            CellState::WallKindA => Some(Self::Red),
            CellState::WallKindB => Some(Self::Blue),
            CellState::Empty => None,
        }
    }

    pub fn layer(&self) -> usize {
        match self {
            Self::Red => RED_LAYER,
            Self::Blue => BLUE_LAYER,
        }
    }

    pub fn render_layers(&self) -> RenderLayers {
        RenderLayers::layer(self.layer())
    }

    /// Layers a camera in this dimension renders
    pub fn visible_layers(&self) -> RenderLayers {
        RenderLayers::layer(SHARED_LAYER).with(self.layer())
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

/// The camera owned by the local participant
#[derive(Component, Debug, Default)]
pub struct LocalCamera;

/// Restrict newly added local cameras to the local participant's dimension
pub fn apply_dimension_culling(
    mut commands: Commands,
    local: Option<Res<LocalParticipant>>,
    cameras: Query<Entity, Added<LocalCamera>>,
) {
    let Some(local) = local else {
        return;
    };
    let dimension = Dimension::for_ordinal(local.0.ordinal());
    for camera in cameras.iter() {
        commands.entity(camera).insert(dimension.visible_layers());
        debug!(?dimension, ordinal = local.0.ordinal(), "Camera culling applied");
    }
}
