//! Spin a cube with mouse or one-finger drag, scale it with pinch or the wheel.
//!
//! Space toggles gestures, `+` / `-` nudge the scale. Point `GRABSPIN_CONFIG` at a
//! JSON file to override the gesture settings, e.g.
//! `{ "rotation_coordinate": "world", "rotation_speed": 0.8 }`.

use anyhow::Context;
use bevy::prelude::*;
use grabspin::{GestureConfig, GestureController, GrabSpinPlugin, NudgeDirection, ScaleNudge};

#[derive(Resource)]
struct ViewerConfig(GestureConfig);

fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    match App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(GrabSpinPlugin)
        .insert_resource(ViewerConfig(config))
        .add_systems(Startup, setup)
        .add_systems(Update, keyboard_controls)
        .run()
    {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("viewer exited with code {code}"),
    }
}

fn load_config() -> anyhow::Result<GestureConfig> {
    let Ok(path) = std::env::var("GRABSPIN_CONFIG") else {
        return Ok(GestureConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading gesture config {path}"))?;
    GestureConfig::from_json(&text).with_context(|| format!("invalid gesture config {path}"))
}

fn setup(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Cube"),
        Mesh3d(meshes.add(Cuboid::default())),
        MeshMaterial3d(materials.add(Color::srgb(0.4, 0.6, 0.9))),
        Transform::from_xyz(0.0, 0.5, 0.0),
        GestureController::new(config.0.clone()),
    ));

    commands.spawn((
        Name::new("Light"),
        PointLight::default(),
        Transform::from_xyz(3.0, 5.0, 3.0),
    ));

    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.5, 4.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
    ));
}

fn keyboard_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut controllers: Query<(Entity, &mut GestureController)>,
    mut nudges: MessageWriter<ScaleNudge>,
) {
    for (entity, mut controller) in &mut controllers {
        if keyboard.just_pressed(KeyCode::Space) {
            let enabled = !controller.enabled();
            controller.set_enabled(enabled);
            if enabled {
                info!("Gestures ON");
            } else {
                info!("Gestures OFF");
            }
        }

        let direction = if keyboard.just_pressed(KeyCode::Equal) {
            Some(NudgeDirection::Up)
        } else if keyboard.just_pressed(KeyCode::Minus) {
            Some(NudgeDirection::Down)
        } else {
            None
        };
        if let Some(direction) = direction {
            nudges.write(ScaleNudge {
                target: entity,
                direction,
            });
        }
    }
}
