//! Gesture state machine: arbitrates drag vs. pinch and turns primitives into
//! transform requests.

use std::time::Duration;

use bevy::{log::debug, math::Vec2};

use crate::unifier::GesturePrimitive;

/// Pixel-distance change to scale amount for pinches.
pub const PINCH_DAMPING: f32 = 0.1;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum GestureMode {
    #[default]
    Idle,
    Dragging { last_position: Vec2 },
    Pinching { last_distance: f32 },
}

/// A transform change the applier should perform.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TransformRequest {
    /// Screen-space drag delta in pixels.
    Rotate { delta: Vec2 },
    /// Signed scale amount, fed to `1 + amount * scale_speed`.
    Scale { amount: f32 },
}

/// Receives gesture primitives one at a time.
pub trait GestureSink {
    fn on_event(&mut self, primitive: GesturePrimitive) -> Option<TransformRequest>;
}

#[derive(Clone, Debug, Default)]
pub struct GestureStateMachine {
    mode: GestureMode,
    last_activity: Duration,
}

impl GestureStateMachine {
    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn reset(&mut self) {
        self.mode = GestureMode::Idle;
    }

    /// Records host time of the latest primitive, used for stale-gesture expiry.
    pub fn touch(&mut self, now: Duration) {
        self.last_activity = now;
    }

    /// Drops an unfinished gesture that has seen no input for `timeout`.
    /// Returns true if the machine was reset.
    pub fn expire_if_stale(&mut self, now: Duration, timeout: Duration) -> bool {
        if self.mode == GestureMode::Idle || now.saturating_sub(self.last_activity) < timeout {
            return false;
        }
        debug!("Dropping stale gesture {:?}", self.mode);
        self.reset();
        true
    }
}

impl GestureSink for GestureStateMachine {
    fn on_event(&mut self, primitive: GesturePrimitive) -> Option<TransformRequest> {
        use GestureMode::*;
        use GesturePrimitive::*;

        match (self.mode, primitive) {
            (_, WheelStep(direction)) => Some(TransformRequest::Scale { amount: direction }),
            // A new single-contact start re-anchors an ongoing drag, e.g. a finger
            // taking over from the mouse.
            (Idle | Dragging { .. }, DragStart(position)) => {
                self.mode = Dragging {
                    last_position: position,
                };
                None
            }
            // A second contact always wins over an in-progress drag.
            (Idle | Dragging { .. }, PinchStart(distance)) => {
                self.mode = Pinching {
                    last_distance: distance,
                };
                None
            }
            (Dragging { last_position }, DragMove(position)) => {
                self.mode = Dragging {
                    last_position: position,
                };
                Some(TransformRequest::Rotate {
                    delta: position - last_position,
                })
            }
            (Pinching { last_distance }, PinchMove(distance)) => {
                self.mode = Pinching {
                    last_distance: distance,
                };
                Some(TransformRequest::Scale {
                    amount: (distance - last_distance) * PINCH_DAMPING,
                })
            }
            (Dragging { .. }, DragEnd) | (Pinching { .. }, PinchEnd | DragEnd) => {
                self.mode = Idle;
                None
            }
            (mode, primitive) => {
                debug!("Ignoring {primitive:?} while {mode:?}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        machine: &mut GestureStateMachine,
        primitives: &[GesturePrimitive],
    ) -> Vec<TransformRequest> {
        primitives
            .iter()
            .filter_map(|p| machine.on_event(*p))
            .collect()
    }

    #[test]
    fn drag_produces_deltas_against_last_position() {
        let mut machine = GestureStateMachine::default();
        let requests = run(
            &mut machine,
            &[
                GesturePrimitive::DragStart(Vec2::new(100.0, 100.0)),
                GesturePrimitive::DragMove(Vec2::new(110.0, 108.0)),
                GesturePrimitive::DragMove(Vec2::new(105.0, 108.0)),
                GesturePrimitive::DragEnd,
            ],
        );
        assert_eq!(
            requests,
            vec![
                TransformRequest::Rotate {
                    delta: Vec2::new(10.0, 8.0)
                },
                TransformRequest::Rotate {
                    delta: Vec2::new(-5.0, 0.0)
                },
            ]
        );
        assert_eq!(machine.mode(), GestureMode::Idle);
    }

    #[test]
    fn pinch_amount_is_damped_distance_change() {
        let mut machine = GestureStateMachine::default();
        let requests = run(
            &mut machine,
            &[
                GesturePrimitive::PinchStart(100.0),
                GesturePrimitive::PinchMove(120.0),
            ],
        );
        assert_eq!(requests.len(), 1);
        let TransformRequest::Scale { amount } = requests[0] else {
            panic!("expected a scale request, got {:?}", requests[0]);
        };
        assert!((amount - 2.0).abs() < 1e-6);
        assert_eq!(
            machine.mode(),
            GestureMode::Pinching {
                last_distance: 120.0
            }
        );
    }

    #[test]
    fn pinch_start_abandons_drag_without_rotation() {
        let mut machine = GestureStateMachine::default();
        let requests = run(
            &mut machine,
            &[
                GesturePrimitive::DragStart(Vec2::ZERO),
                GesturePrimitive::PinchStart(80.0),
                GesturePrimitive::DragMove(Vec2::new(50.0, 50.0)),
            ],
        );
        assert!(requests.is_empty());
        assert_eq!(
            machine.mode(),
            GestureMode::Pinching {
                last_distance: 80.0
            }
        );
    }

    #[test]
    fn either_end_leaves_pinch() {
        for end in [GesturePrimitive::PinchEnd, GesturePrimitive::DragEnd] {
            let mut machine = GestureStateMachine::default();
            run(&mut machine, &[GesturePrimitive::PinchStart(10.0), end]);
            assert_eq!(machine.mode(), GestureMode::Idle);
        }
    }

    #[test]
    fn wheel_is_orthogonal_to_mode() {
        let mut machine = GestureStateMachine::default();
        machine.on_event(GesturePrimitive::DragStart(Vec2::ONE));
        let request = machine.on_event(GesturePrimitive::WheelStep(-1.0));
        assert_eq!(request, Some(TransformRequest::Scale { amount: -1.0 }));
        assert_eq!(
            machine.mode(),
            GestureMode::Dragging {
                last_position: Vec2::ONE
            }
        );
    }

    #[test]
    fn moves_without_start_are_ignored() {
        let mut machine = GestureStateMachine::default();
        let requests = run(
            &mut machine,
            &[
                GesturePrimitive::DragMove(Vec2::ONE),
                GesturePrimitive::PinchMove(40.0),
                GesturePrimitive::PinchEnd,
            ],
        );
        assert!(requests.is_empty());
        assert_eq!(machine.mode(), GestureMode::Idle);
    }

    #[test]
    fn drag_start_while_dragging_reanchors() {
        let mut machine = GestureStateMachine::default();
        let requests = run(
            &mut machine,
            &[
                GesturePrimitive::DragStart(Vec2::ZERO),
                GesturePrimitive::DragStart(Vec2::new(500.0, 0.0)),
                GesturePrimitive::DragMove(Vec2::new(501.0, 0.0)),
            ],
        );
        assert_eq!(
            requests,
            vec![TransformRequest::Rotate {
                delta: Vec2::new(1.0, 0.0)
            }]
        );
    }

    #[test]
    fn stale_gesture_expires() {
        let mut machine = GestureStateMachine::default();
        machine.touch(Duration::from_secs(1));
        machine.on_event(GesturePrimitive::DragStart(Vec2::ZERO));

        let timeout = Duration::from_secs(2);
        assert!(!machine.expire_if_stale(Duration::from_secs(2), timeout));
        assert!(machine.expire_if_stale(Duration::from_secs(3), timeout));
        assert_eq!(machine.mode(), GestureMode::Idle);
        assert!(!machine.expire_if_stale(Duration::from_secs(10), timeout));
    }
}
