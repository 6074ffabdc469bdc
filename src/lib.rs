pub mod gestures;
pub mod input;

use bevy::{prelude::*, window::WindowEvent};

pub use gestures::{InputCapture, NudgeDirection, ScaleNudge};
pub use grabspin_gesture;
pub use grabspin_gesture::{
    GestureConfig, GestureController, HostInput, PointerButton, RotationFrame,
};
pub use input::PointerInput;

/// Drag-to-rotate, pinch/wheel-to-scale for every entity carrying a
/// [`GestureController`].
pub struct GrabSpinPlugin;

/// Systems that turn window input into transform changes.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GestureSystems;

impl Plugin for GrabSpinPlugin {
    fn build(&self, app: &mut App) {
        // Registered here too so the plugin also runs headless, without WindowPlugin.
        app.add_message::<WindowEvent>()
            .add_message::<PointerInput>()
            .add_message::<ScaleNudge>()
            .init_resource::<InputCapture>()
            .register_type::<GestureConfig>()
            .register_type::<RotationFrame>()
            .add_systems(
                Update,
                (
                    input::collect_host_input,
                    gestures::interpret_gestures,
                    gestures::apply_scale_nudges,
                    gestures::expire_stale_gestures,
                )
                    .chain()
                    .in_set(GestureSystems),
            )
            .add_observer(gestures::on_controller_attached)
            .add_observer(gestures::on_controller_detached);
    }
}
