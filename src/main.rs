use anyhow::Context;
use bevy::prelude::*;

use arena_core::config::ArenaConfig;
use arena_core::dimension::{DimensionPlugin, LocalCamera};
use arena_core::generation::GenerationPlugin;
use arena_core::logging::{init_tracing, LoggingPlugin};
use arena_core::session::{LocalParticipant, SeedLink, SessionPlugin};
use arena_core::spawn::{Avatar, SpawnPlugin};
use arena_core::visualization::VisualizationPlugin;

const CONFIG_PATH: &str = "config/arena.ron";

fn main() -> anyhow::Result<()> {
    let loaded = ArenaConfig::try_load(CONFIG_PATH)
        .with_context(|| format!("loading {CONFIG_PATH}"))?;
    let fell_back = loaded.is_none();
    let config = loaded.unwrap_or_default();

    // Subscriber first so the fallback warning below is visible
    init_tracing(&config.tracing);
    if fell_back {
        warn!("Config file not found: {}, using defaults", CONFIG_PATH);
    }
    info!(
        role = ?config.session.role,
        ordinal = config.session.ordinal,
        fingerprint = %format!("{:016x}", config.generation.fingerprint()),
        "Arena config loaded"
    );

    let exit = App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Rift Arena".into(),
                        resolution: (1280., 720.).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::log::LogPlugin>(),
        )
        // Logging
        .add_plugins(LoggingPlugin {
            config: config.tracing.clone(),
        })
        // Generation & session
        .add_plugins(GenerationPlugin {
            config: config.generation.clone(),
        })
        .add_plugins(SessionPlugin::new(
            SeedLink::from_session(&config.session),
            config.generation.clone(),
        ))
        // Presentation
        .add_plugins(VisualizationPlugin)
        .add_plugins(SpawnPlugin)
        .add_plugins(DimensionPlugin)
        // Startup
        .add_systems(Startup, setup)
        .run();

    if exit.is_error() {
        anyhow::bail!("arena session exited with {:?}", exit);
    }
    Ok(())
}

fn setup(
    mut commands: Commands,
    local: Res<LocalParticipant>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = local.0.config();
    let extent = config.width.max(config.height) as f32 * config.cell_size;
    let center = Vec3::new(
        config.width as f32 * config.cell_size / 2.0,
        0.0,
        config.height as f32 * config.cell_size / 2.0,
    );

    // Camera
    commands.spawn((
        Camera3d::default(),
        LocalCamera,
        Transform::from_translation(center + Vec3::new(0.0, extent, extent * 0.6))
            .looking_at(center, Vec3::Y),
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.8, 0.5, 0.0)),
    ));

    // Local avatar, placed by the spawn system
    commands.spawn((
        Avatar {
            ordinal: local.0.ordinal(),
        },
        Mesh3d(meshes.add(Capsule3d::new(0.4, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.9, 0.2),
            ..default()
        })),
        Transform::default(),
    ));

    info!(
        ordinal = local.0.ordinal(),
        authority = local.0.is_authority(),
        "Rift Arena initialized"
    );
}
