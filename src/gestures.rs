use bevy::prelude::*;
use grabspin_gesture::{GestureController, HostInput};

use crate::input::PointerInput;

// ---------------------------------------------------------------------------
// Resources & messages
// ---------------------------------------------------------------------------

/// Set when a controller consumed input the host would otherwise scroll with.
/// Cleared at the start of every gesture pass.
#[derive(Resource, Default, Debug)]
pub struct InputCapture {
    pub scroll_captured: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NudgeDirection {
    Up,
    Down,
}

/// Fixed-factor scale step for a controlled entity (scale buttons, hotkeys).
#[derive(Message, Clone, Copy, Debug)]
pub struct ScaleNudge {
    pub target: Entity,
    pub direction: NudgeDirection,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Feeds every pending input to every attached controller, in arrival order.
pub fn interpret_gestures(
    mut pointer_input: MessageReader<PointerInput>,
    time: Res<Time>,
    mut capture: ResMut<InputCapture>,
    mut controllers: Query<(&mut GestureController, Option<&mut Transform>)>,
) {
    capture.scroll_captured = false;

    let inputs: Vec<HostInput> = pointer_input.read().map(|input| input.0).collect();
    if inputs.is_empty() {
        return;
    }

    let now = time.elapsed();
    for (mut controller, mut transform) in &mut controllers {
        for input in &inputs {
            let response = controller.process(input, now, transform.as_deref_mut());
            capture.scroll_captured |= response.suppress_default;
        }
    }
}

pub fn apply_scale_nudges(
    mut nudges: MessageReader<ScaleNudge>,
    mut targets: Query<(&GestureController, Option<&mut Transform>)>,
) {
    for nudge in nudges.read() {
        let Ok((controller, mut transform)) = targets.get_mut(nudge.target) else {
            debug!("Scale nudge for {} ignored: no gesture controller", nudge.target);
            continue;
        };
        controller.nudge_scale(nudge.direction == NudgeDirection::Up, transform.as_deref_mut());
    }
}

/// Returns gestures that never saw their end notification to idle.
pub fn expire_stale_gestures(time: Res<Time>, mut controllers: Query<&mut GestureController>) {
    let now = time.elapsed();
    for mut controller in &mut controllers {
        if controller.config().stale_after().is_some() {
            controller.expire_if_stale(now);
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// A controller starts tracking from scratch on whichever entity it lands on.
pub fn on_controller_attached(
    add: On<Add, GestureController>,
    mut targets: Query<(&mut GestureController, Has<Transform>)>,
) {
    let Ok((mut controller, has_transform)) = targets.get_mut(add.entity) else {
        return;
    };
    controller.reset();
    if !has_transform {
        warn!(
            "Gesture controller attached to {} which has no Transform; \
             gestures are ignored until one is added",
            add.entity
        );
    }
    info!("Gesture controller attached to {}", add.entity);
}

pub fn on_controller_detached(remove: On<Remove, GestureController>) {
    info!("Gesture controller detached from {}", remove.entity);
}
