//! Normalizes mouse, touch and wheel input into gesture primitives.

use bevy::{log::debug, math::Vec2};

/// Raw input delivered by the host, one notification at a time.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum HostInput {
    PointerDown { button: PointerButton, position: Vec2 },
    PointerUp { button: PointerButton },
    PointerMove { position: Vec2 },
    /// The host lost track of the mouse (left the window, focus lost).
    PointerLost,
    TouchStart { id: u64, position: Vec2 },
    TouchMove { id: u64, position: Vec2 },
    TouchEnd { id: u64 },
    TouchCancel { id: u64 },
    /// Vertical scroll amount; positive scrolls up (zoom in).
    Wheel { delta_y: f32 },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

/// Last known position of one contact. `id` is `None` for the mouse.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PointerSample {
    pub id: Option<u64>,
    pub position: Vec2,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GesturePrimitive {
    DragStart(Vec2),
    DragMove(Vec2),
    DragEnd,
    PinchStart(f32),
    PinchMove(f32),
    PinchEnd,
    /// `+1` zooms in, `-1` zooms out.
    WheelStep(f32),
}

/// What the unifier made of one host notification.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Unified {
    pub primitive: Option<GesturePrimitive>,
    /// The host should not run its default handling (page scroll) for this input.
    pub suppress_default: bool,
}

impl Unified {
    fn emit(primitive: GesturePrimitive) -> Self {
        Self {
            primitive: Some(primitive),
            suppress_default: false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum TouchGesture {
    Drag,
    Pinch,
}

/// Tracks raw pointer state so that mouse and touch streams never drive
/// more than one gesture at a time.
#[derive(Clone, Debug, Default)]
pub struct InputUnifier {
    primary_held: bool,
    touches: Vec<PointerSample>,
    touch_gesture: Option<TouchGesture>,
}

impl InputUnifier {
    /// Observes `input` and returns the primitive it maps to.
    ///
    /// When `enabled` is false the pointer bookkeeping still advances but nothing
    /// is emitted.
    pub fn unify(&mut self, input: &HostInput, enabled: bool) -> Unified {
        let unified = self.observe(input);
        if enabled { unified } else { Unified::default() }
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn observe(&mut self, input: &HostInput) -> Unified {
        match *input {
            HostInput::PointerDown {
                button: PointerButton::Primary,
                position,
            } => {
                // Mice synthesized from touches arrive while contacts are down.
                if !self.touches.is_empty() {
                    return Unified::default();
                }
                self.primary_held = true;
                Unified::emit(GesturePrimitive::DragStart(position))
            }
            HostInput::PointerUp {
                button: PointerButton::Primary,
            }
            | HostInput::PointerLost => {
                if !std::mem::take(&mut self.primary_held) {
                    return Unified::default();
                }
                Unified::emit(GesturePrimitive::DragEnd)
            }
            HostInput::PointerDown { .. } | HostInput::PointerUp { .. } => Unified::default(),
            HostInput::PointerMove { position } => {
                if self.primary_held {
                    Unified::emit(GesturePrimitive::DragMove(position))
                } else {
                    Unified::default()
                }
            }
            HostInput::TouchStart { id, position } => self.touch_start(id, position),
            HostInput::TouchMove { id, position } => self.touch_move(id, position),
            HostInput::TouchEnd { id } | HostInput::TouchCancel { id } => self.touch_end(id),
            HostInput::Wheel { delta_y } => {
                if delta_y == 0.0 {
                    return Unified::default();
                }
                let direction = if delta_y > 0.0 { 1.0 } else { -1.0 };
                Unified {
                    primitive: Some(GesturePrimitive::WheelStep(direction)),
                    suppress_default: true,
                }
            }
        }
    }

    fn touch_start(&mut self, id: u64, position: Vec2) -> Unified {
        // A finger landing mid mouse-drag takes the drag over; the mouse stops
        // driving it until the next press.
        if std::mem::take(&mut self.primary_held) {
            debug!("Touch {id} took over the mouse drag");
        }

        match self.touches.iter_mut().find(|t| t.id == Some(id)) {
            Some(sample) => sample.position = position,
            None => self.touches.push(PointerSample {
                id: Some(id),
                position,
            }),
        }

        match self.touches.as_slice() {
            [only] => {
                self.touch_gesture = Some(TouchGesture::Drag);
                Unified::emit(GesturePrimitive::DragStart(only.position))
            }
            [a, b] => {
                self.touch_gesture = Some(TouchGesture::Pinch);
                Unified::emit(GesturePrimitive::PinchStart(a.position.distance(b.position)))
            }
            _ => {
                debug!("Ignoring touch start with {} contacts", self.touches.len());
                Unified::default()
            }
        }
    }

    fn touch_move(&mut self, id: u64, position: Vec2) -> Unified {
        let Some(sample) = self.touches.iter_mut().find(|t| t.id == Some(id)) else {
            return Unified::default();
        };
        sample.position = position;

        match (self.touch_gesture, self.touches.as_slice()) {
            (Some(TouchGesture::Drag), [only]) => {
                Unified::emit(GesturePrimitive::DragMove(only.position))
            }
            (Some(TouchGesture::Pinch), [a, b]) => {
                Unified::emit(GesturePrimitive::PinchMove(a.position.distance(b.position)))
            }
            _ => Unified::default(),
        }
    }

    fn touch_end(&mut self, id: u64) -> Unified {
        let before = self.touches.len();
        self.touches.retain(|t| t.id != Some(id));
        if self.touches.len() == before {
            return Unified::default();
        }

        // No resuming a drag from the finger left behind.
        match self.touch_gesture.take() {
            Some(TouchGesture::Drag) => Unified::emit(GesturePrimitive::DragEnd),
            Some(TouchGesture::Pinch) => Unified::emit(GesturePrimitive::PinchEnd),
            None => Unified::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f32, y: f32) -> HostInput {
        HostInput::PointerDown {
            button: PointerButton::Primary,
            position: Vec2::new(x, y),
        }
    }

    fn moved(x: f32, y: f32) -> HostInput {
        HostInput::PointerMove {
            position: Vec2::new(x, y),
        }
    }

    fn touch(id: u64, x: f32, y: f32) -> HostInput {
        HostInput::TouchStart {
            id,
            position: Vec2::new(x, y),
        }
    }

    fn touch_moved(id: u64, x: f32, y: f32) -> HostInput {
        HostInput::TouchMove {
            id,
            position: Vec2::new(x, y),
        }
    }

    fn primitives(unifier: &mut InputUnifier, inputs: &[HostInput]) -> Vec<GesturePrimitive> {
        inputs
            .iter()
            .filter_map(|input| unifier.unify(input, true).primitive)
            .collect()
    }

    #[test]
    fn mouse_drag_sequence() {
        let mut unifier = InputUnifier::default();
        let out = primitives(
            &mut unifier,
            &[
                moved(1.0, 1.0),
                press(100.0, 100.0),
                moved(110.0, 108.0),
                HostInput::PointerUp {
                    button: PointerButton::Primary,
                },
                moved(120.0, 120.0),
            ],
        );
        assert_eq!(
            out,
            vec![
                GesturePrimitive::DragStart(Vec2::new(100.0, 100.0)),
                GesturePrimitive::DragMove(Vec2::new(110.0, 108.0)),
                GesturePrimitive::DragEnd,
            ]
        );
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut unifier = InputUnifier::default();
        let out = primitives(
            &mut unifier,
            &[
                HostInput::PointerDown {
                    button: PointerButton::Secondary,
                    position: Vec2::ZERO,
                },
                moved(1.0, 1.0),
                HostInput::PointerUp {
                    button: PointerButton::Secondary,
                },
            ],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn lost_pointer_ends_drag() {
        let mut unifier = InputUnifier::default();
        let out = primitives(
            &mut unifier,
            &[
                press(0.0, 0.0),
                HostInput::PointerLost,
                HostInput::PointerLost,
            ],
        );
        assert_eq!(
            out,
            vec![
                GesturePrimitive::DragStart(Vec2::ZERO),
                GesturePrimitive::DragEnd,
            ]
        );
    }

    #[test]
    fn second_finger_starts_pinch() {
        let mut unifier = InputUnifier::default();
        let out = primitives(
            &mut unifier,
            &[
                touch(1, 0.0, 0.0),
                touch(2, 100.0, 0.0),
                touch_moved(2, 120.0, 0.0),
                HostInput::TouchEnd { id: 2 },
                touch_moved(1, 5.0, 5.0),
            ],
        );
        assert_eq!(
            out,
            vec![
                GesturePrimitive::DragStart(Vec2::ZERO),
                GesturePrimitive::PinchStart(100.0),
                GesturePrimitive::PinchMove(120.0),
                GesturePrimitive::PinchEnd,
            ]
        );
        assert_eq!(unifier.active_touches(), 1);
    }

    #[test]
    fn third_contact_is_ignored() {
        let mut unifier = InputUnifier::default();
        unifier.unify(&touch(1, 0.0, 0.0), true);
        unifier.unify(&touch(2, 1.0, 0.0), true);
        let third = unifier.unify(&touch(3, 0.0, 1.0), true);
        assert_eq!(third.primitive, None);
        let after = unifier.unify(&touch_moved(1, 1.0, 1.0), true);
        assert_eq!(after.primitive, None);
    }

    #[test]
    fn synthesized_mouse_during_touch_is_dropped() {
        let mut unifier = InputUnifier::default();
        unifier.unify(&touch(7, 0.0, 0.0), true);
        let down = unifier.unify(&press(0.0, 0.0), true);
        assert_eq!(down.primitive, None);
        let after = unifier.unify(&moved(1.0, 1.0), true);
        assert_eq!(after.primitive, None);
    }

    #[test]
    fn touch_during_mouse_drag_takes_over() {
        let mut unifier = InputUnifier::default();
        let out = primitives(
            &mut unifier,
            &[
                press(0.0, 0.0),
                touch(1, 500.0, 0.0),
                moved(40.0, 0.0),
                touch_moved(1, 501.0, 0.0),
                HostInput::PointerUp {
                    button: PointerButton::Primary,
                },
                HostInput::TouchEnd { id: 1 },
            ],
        );
        assert_eq!(
            out,
            vec![
                GesturePrimitive::DragStart(Vec2::ZERO),
                GesturePrimitive::DragStart(Vec2::new(500.0, 0.0)),
                GesturePrimitive::DragMove(Vec2::new(501.0, 0.0)),
                GesturePrimitive::DragEnd,
            ]
        );
    }

    #[test]
    fn wheel_direction_and_default_suppression() {
        let mut unifier = InputUnifier::default();
        let up = unifier.unify(&HostInput::Wheel { delta_y: 3.0 }, true);
        assert_eq!(up.primitive, Some(GesturePrimitive::WheelStep(1.0)));
        assert!(up.suppress_default);

        let down = unifier.unify(&HostInput::Wheel { delta_y: -0.2 }, true);
        assert_eq!(down.primitive, Some(GesturePrimitive::WheelStep(-1.0)));

        let sideways = unifier.unify(&HostInput::Wheel { delta_y: 0.0 }, true);
        assert_eq!(sideways, Unified::default());
    }

    #[test]
    fn disabled_observes_without_emitting() {
        let mut unifier = InputUnifier::default();
        let started = unifier.unify(&touch(1, 0.0, 0.0), false);
        assert_eq!(started, Unified::default());
        assert_eq!(unifier.active_touches(), 1);

        let wheel = unifier.unify(&HostInput::Wheel { delta_y: 1.0 }, false);
        assert!(!wheel.suppress_default);

        // The contact recorded while disabled still counts towards a pinch.
        let second = unifier.unify(&touch(2, 0.0, 50.0), true);
        assert_eq!(second.primitive, Some(GesturePrimitive::PinchStart(50.0)));
    }
}
