//! Arena visualization.
//!
//! Turns a generated grid into session-local 3D geometry: one scaled cube
//! per wall cell, a floor slab and four border walls. Placement math is pure
//! (`plan_arena_geometry`); the Bevy system only instantiates templates.
//! Nothing spawned here is networked.

use bevy::prelude::*;
use bevy::render::view::RenderLayers;

use crate::config::GenerationConfig;
use crate::constants::{
    BORDER_HEIGHT, FLOOR_THICKNESS, SHARED_LAYER, WALL_CENTER_Y, WALL_HEIGHT,
};
use crate::dimension::Dimension;
use crate::generation::grid::{CellState, Grid};
use crate::generation::ArenaGenerated;

pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaTemplates>()
            .add_systems(Startup, setup_arena_templates)
            .add_systems(Update, spawn_arena_geometry);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Left,
    Right,
    Bottom,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    Wall(CellState),
    Floor,
    Border(BorderSide),
}

impl PlacementKind {
    pub fn render_layers(&self) -> RenderLayers {
        match self {
            Self::Wall(cell) => Dimension::of_wall(*cell)
                .map(|d| d.render_layers())
                .unwrap_or_else(|| RenderLayers::layer(SHARED_LAYER)),
            Self::Floor | Self::Border(_) => RenderLayers::layer(SHARED_LAYER),
        }
    }
}

/// One unit cube, translated and scaled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: PlacementKind,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl Placement {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation).with_scale(self.scale)
    }
}

/// Every block the arena needs, walls first in row-major order
pub fn plan_arena_geometry(grid: &Grid, config: &GenerationConfig) -> Vec<Placement> {
    let cs = config.cell_size;
    let w = grid.width() as f32;
    let h = grid.height() as f32;

    let mut placements: Vec<Placement> = grid
        .iter()
        .filter(|(_, _, cell)| cell.is_wall())
        .map(|(x, y, cell)| Placement {
            kind: PlacementKind::Wall(cell),
            translation: Vec3::new(x as f32 * cs, WALL_CENTER_Y, y as f32 * cs),
            scale: Vec3::new(cs, WALL_HEIGHT, cs),
        })
        .collect();

    let cx = w * cs / 2.0 - cs / 2.0;
    let cz = h * cs / 2.0 - cs / 2.0;

    placements.push(Placement {
        kind: PlacementKind::Floor,
        translation: Vec3::new(cx, 0.0, cz),
        scale: Vec3::new((w + 2.0) * cs, FLOOR_THICKNESS, (h + 2.0) * cs),
    });

    let side_scale = Vec3::new(cs, BORDER_HEIGHT, h * cs + 2.0 * cs);
    let end_scale = Vec3::new(w * cs, BORDER_HEIGHT, cs);
    let border_y = BORDER_HEIGHT / 2.0;
    placements.extend([
        Placement {
            kind: PlacementKind::Border(BorderSide::Left),
            translation: Vec3::new(-cs, border_y, cz),
            scale: side_scale,
        },
        Placement {
            kind: PlacementKind::Border(BorderSide::Right),
            translation: Vec3::new(w * cs, border_y, cz),
            scale: side_scale,
        },
        Placement {
            kind: PlacementKind::Border(BorderSide::Bottom),
            translation: Vec3::new(cx, border_y, -cs),
            scale: end_scale,
        },
        Placement {
            kind: PlacementKind::Border(BorderSide::Top),
            translation: Vec3::new(cx, border_y, h * cs),
            scale: end_scale,
        },
    ]);

    placements
}

#[derive(Debug, Clone)]
pub struct Template {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Mesh/material per placement kind. Missing entries are skipped at spawn.
#[derive(Resource, Debug, Clone, Default)]
pub struct ArenaTemplates {
    pub wall_a: Option<Template>,
    pub wall_b: Option<Template>,
    pub floor: Option<Template>,
    pub border: Option<Template>,
}

impl ArenaTemplates {
    pub fn for_kind(&self, kind: PlacementKind) -> Option<&Template> {
        match kind {
            PlacementKind::Wall(CellState::WallKindA) => self.wall_a.as_ref(),
            PlacementKind::Wall(CellState::WallKindB) => self.wall_b.as_ref(),
            PlacementKind::Wall(CellState::Empty) => None,
            PlacementKind::Floor => self.floor.as_ref(),
            PlacementKind::Border(_) => self.border.as_ref(),
        }
    }
}

/// Marker for spawned arena geometry
#[derive(Component, Debug)]
pub struct ArenaDecoration {
    pub kind: PlacementKind,
}

fn template_color(kind: PlacementKind) -> Color {
    match kind {
        PlacementKind::Wall(CellState::WallKindA) => Color::srgb(0.8, 0.15, 0.15),
        PlacementKind::Wall(_) => Color::srgb(0.15, 0.25, 0.85),
        PlacementKind::Floor => Color::srgb(0.6, 0.6, 0.6),
        PlacementKind::Border(_) => Color::srgb(0.3, 0.3, 0.35),
    }
}

fn setup_arena_templates(
    mut templates: ResMut<ArenaTemplates>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        warn!("No asset storage for arena templates, geometry will not render");
        return;
    };

    let cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let mut make = |kind: PlacementKind| {
        Some(Template {
            mesh: cube.clone(),
            material: materials.add(StandardMaterial {
                base_color: template_color(kind),
                perceptual_roughness: 0.8,
                ..default()
            }),
        })
    };

    templates.wall_a = make(PlacementKind::Wall(CellState::WallKindA));
    templates.wall_b = make(PlacementKind::Wall(CellState::WallKindB));
    templates.floor = make(PlacementKind::Floor);
    templates.border = make(PlacementKind::Border(BorderSide::Left));
}

pub fn spawn_arena_geometry(
    mut commands: Commands,
    templates: Res<ArenaTemplates>,
    config: Res<GenerationConfig>,
    mut events: EventReader<ArenaGenerated>,
) {
    for event in events.read() {
        let placements = plan_arena_geometry(&event.grid, &config);
        let mut spawned = 0usize;
        let mut skipped = 0usize;

        for placement in &placements {
            let Some(template) = templates.for_kind(placement.kind) else {
                skipped += 1;
                continue;
            };
            commands.spawn((
                Mesh3d(template.mesh.clone()),
                MeshMaterial3d(template.material.clone()),
                placement.transform(),
                ArenaDecoration {
                    kind: placement.kind,
                },
                placement.kind.render_layers(),
            ));
            spawned += 1;
        }

        if skipped > 0 {
            warn!(seed = event.seed.value(), skipped, "Missing arena templates, some geometry skipped");
        }
        info!(
            seed = event.seed.value(),
            spawned,
            "Rendered arena: {}x{}",
            event.grid.width(),
            event.grid.height()
        );
    }
}
