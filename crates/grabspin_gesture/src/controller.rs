use std::time::Duration;

use bevy::prelude::*;

use crate::{
    applier::TransformApplier,
    config::GestureConfig,
    state::{GestureMode, GestureSink, GestureStateMachine},
    unifier::{HostInput, InputUnifier},
};

/// Drag-to-rotate / pinch-to-scale controller. Insert it on an entity to
/// attach gestures to that entity's `Transform`; remove it to detach.
#[derive(Component, Clone, Debug, Default)]
pub struct GestureController {
    config: GestureConfig,
    unifier: InputUnifier,
    machine: GestureStateMachine,
}

/// Outcome of processing one host notification.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InputResponse {
    /// The host should skip its default handling (scrolling) for this input.
    pub suppress_default: bool,
    /// The target transform was changed.
    pub applied: bool,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn mode(&self) -> GestureMode {
        self.machine.mode()
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled()
    }

    /// Turning the controller off drops any gesture in progress; a new start is
    /// needed once it is back on.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled() && !enabled {
            self.machine.reset();
        }
        self.config.set_enabled(enabled);
    }

    /// Clears all gesture and pointer tracking.
    pub fn reset(&mut self) {
        self.unifier.reset();
        self.machine.reset();
    }

    pub fn process(
        &mut self,
        input: &HostInput,
        now: Duration,
        target: Option<&mut Transform>,
    ) -> InputResponse {
        let unified = self.unifier.unify(input, self.config.enabled());
        let Some(primitive) = unified.primitive else {
            return InputResponse {
                suppress_default: unified.suppress_default,
                applied: false,
            };
        };

        self.machine.touch(now);
        let applied = match self.machine.on_event(primitive) {
            Some(request) => TransformApplier::new(&self.config).apply(request, target),
            None => false,
        };

        InputResponse {
            suppress_default: unified.suppress_default,
            applied,
        }
    }

    /// Multiplies the target's scale by the nudge factor (`up`) or its inverse.
    pub fn nudge_scale(&self, up: bool, target: Option<&mut Transform>) -> bool {
        if !self.config.enabled() {
            return false;
        }
        let factor = self.config.nudge_factor();
        let factor = if up { factor } else { factor.recip() };
        TransformApplier::new(&self.config).scale_by_factor(factor, target)
    }

    /// Resets a gesture that has been silent for longer than the configured
    /// timeout. Does nothing when no timeout is configured.
    pub fn expire_if_stale(&mut self, now: Duration) -> bool {
        let Some(timeout) = self.config.stale_after() else {
            return false;
        };
        let expired = self.machine.expire_if_stale(now, timeout);
        if expired {
            debug!("Gesture expired after {timeout:?} of inactivity");
        }
        expired
    }
}
