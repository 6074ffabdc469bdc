//! Rotation and scale math applied to the target `Transform`.

use bevy::{
    log::debug,
    math::{Quat, Vec2, Vec3},
    transform::components::Transform,
};

use crate::{
    config::{GestureConfig, RotationFrame, ScaleLimits},
    state::TransformRequest,
};

/// Turns transform requests into rotation and scale changes on a target.
///
/// A missing target turns every operation into a no-op.
pub struct TransformApplier<'a> {
    config: &'a GestureConfig,
}

impl<'a> TransformApplier<'a> {
    pub fn new(config: &'a GestureConfig) -> Self {
        Self { config }
    }

    /// Returns true if the target was mutated.
    pub fn apply(&self, request: TransformRequest, target: Option<&mut Transform>) -> bool {
        match request {
            TransformRequest::Rotate { delta } => self.rotate(delta, target),
            TransformRequest::Scale { amount } => self.scale(amount, target),
        }
    }

    pub fn rotate(&self, delta: Vec2, target: Option<&mut Transform>) -> bool {
        let Some(transform) = target else {
            debug!("Rotate skipped: target has no transform");
            return false;
        };

        let degrees_per_pixel = self.config.rotation_speed();
        let pitch = (delta.y * degrees_per_pixel).to_radians();
        let yaw = (delta.x * degrees_per_pixel).to_radians();

        match self.config.rotation_frame() {
            RotationFrame::Local => {
                transform.rotate_local_x(pitch);
                transform.rotate_local_y(yaw);
            }
            RotationFrame::World => {
                transform.rotate(Quat::from_axis_angle(Vec3::Y, yaw));
                transform.rotate(Quat::from_axis_angle(Vec3::X, pitch));
            }
        }
        transform.rotation = transform.rotation.normalize();
        true
    }

    pub fn scale(&self, amount: f32, target: Option<&mut Transform>) -> bool {
        self.scale_by_factor(1.0 + amount * self.config.scale_speed(), target)
    }

    /// Multiplies every scale component by `factor`, clamped so no component
    /// leaves the configured limits.
    pub fn scale_by_factor(&self, factor: f32, target: Option<&mut Transform>) -> bool {
        let Some(transform) = target else {
            debug!("Scale skipped: target has no transform");
            return false;
        };

        let factor = clamp_factor(factor, transform.scale, self.config.scale_limits());
        transform.scale *= factor;
        true
    }
}

fn clamp_factor(factor: f32, scale: Vec3, limits: ScaleLimits) -> f32 {
    let smallest = scale.abs().min_element();
    let largest = scale.abs().max_element();
    if smallest <= 0.0 || !factor.is_finite() {
        return 1.0;
    }

    let lower = (limits.min / smallest).min(1.0);
    let upper = (limits.max / largest).max(1.0);
    factor.clamp(lower, upper)
}
