use bevy::{
    input::{
        ButtonState,
        mouse::{MouseButtonInput, MouseWheel},
        touch::{TouchInput, TouchPhase},
    },
    prelude::*,
    window::{WindowEvent, WindowFocused},
};
use grabspin_gesture::{HostInput, PointerButton};

/// One host input notification, in the order the window delivered it.
///
/// Written by [`collect_host_input`]; other hosts (tests, remote input) can
/// write it directly.
#[derive(Message, Clone, Copy, Debug)]
pub struct PointerInput(pub HostInput);

/// Maps window events to [`HostInput`]. Button presses carry no position, so the
/// last cursor position is remembered.
#[derive(Default, Debug)]
pub struct HostInputTranslator {
    cursor: Vec2,
}

impl HostInputTranslator {
    pub fn translate(&mut self, event: &WindowEvent) -> Option<HostInput> {
        match event {
            WindowEvent::MouseButtonInput(MouseButtonInput { button, state, .. }) => {
                let button = pointer_button(*button);
                Some(match state {
                    ButtonState::Pressed => HostInput::PointerDown {
                        button,
                        position: self.cursor,
                    },
                    ButtonState::Released => HostInput::PointerUp { button },
                })
            }
            WindowEvent::CursorMoved(moved) => {
                self.cursor = moved.position;
                Some(HostInput::PointerMove {
                    position: moved.position,
                })
            }
            WindowEvent::CursorLeft(_) => Some(HostInput::PointerLost),
            WindowEvent::WindowFocused(WindowFocused { focused: false, .. }) => {
                Some(HostInput::PointerLost)
            }
            WindowEvent::TouchInput(touch) => Some(touch_input(touch)),
            WindowEvent::MouseWheel(MouseWheel { y, .. }) => Some(HostInput::Wheel { delta_y: *y }),
            _ => None,
        }
    }
}

/// Republishes the gesture-relevant part of the window event stream.
///
/// `WindowEvent` keeps mouse, touch and wheel in arrival order, which the
/// separate per-type readers do not.
pub fn collect_host_input(
    mut window_events: MessageReader<WindowEvent>,
    mut pointer_input: MessageWriter<PointerInput>,
    mut translator: Local<HostInputTranslator>,
) {
    for event in window_events.read() {
        if let Some(input) = translator.translate(event) {
            pointer_input.write(PointerInput(input));
        }
    }
}

fn touch_input(touch: &TouchInput) -> HostInput {
    let TouchInput { id, position, .. } = *touch;
    match touch.phase {
        TouchPhase::Started => HostInput::TouchStart { id, position },
        TouchPhase::Moved => HostInput::TouchMove { id, position },
        TouchPhase::Ended => HostInput::TouchEnd { id },
        TouchPhase::Canceled => HostInput::TouchCancel { id },
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        _ => PointerButton::Other,
    }
}
