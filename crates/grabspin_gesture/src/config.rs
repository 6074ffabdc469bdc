use std::{str::FromStr, time::Duration};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Which axes a drag rotates around.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationFrame {
    /// The object's own current axes (pitch then yaw, each after the previous one).
    #[default]
    Local,
    /// The scene's fixed axes, composed as axis-angle rotations.
    World,
}

impl FromStr for RotationFrame {
    type Err = GestureConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "world" => Ok(Self::World),
            other => Err(GestureConfigError::UnknownRotationFrame(other.to_string())),
        }
    }
}

/// Bounds on every component of the target's scale.
#[derive(Clone, Copy, PartialEq, Debug, Reflect, Serialize, Deserialize)]
pub struct ScaleLimits {
    pub min: f32,
    pub max: f32,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min: 0.001,
            max: 1000.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GestureConfigError {
    #[error("unknown rotation coordinate '{0}', expected 'local' or 'world'")]
    UnknownRotationFrame(String),
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositiveSpeed { name: &'static str, value: f32 },
    #[error("scale limits must satisfy 0 < min <= max, got min={min} max={max}")]
    InvalidScaleLimits { min: f32, max: f32 },
    #[error("nudge factor must be greater than 1, got {0}")]
    InvalidNudgeFactor(f32),
    #[error("stale gesture timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f32),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw configuration as written by a user, before validation.
///
/// Field names follow the attribute names of the gesture component:
/// `rotation_speed`, `scale_speed`, `rotation_coordinate`, `enabled`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Degrees of rotation per pixel of drag.
    pub rotation_speed: f32,
    /// Scale change per unit of scale amount.
    pub scale_speed: f32,
    /// `"local"` or `"world"`.
    pub rotation_coordinate: String,
    pub enabled: bool,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Seconds without input after which an unfinished gesture is dropped.
    pub stale_after_secs: Option<f32>,
    /// Multiplier used by scale up/down nudges.
    pub nudge_factor: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        let limits = ScaleLimits::default();
        Self {
            rotation_speed: 0.5,
            scale_speed: 0.05,
            rotation_coordinate: "local".to_string(),
            enabled: true,
            min_scale: limits.min,
            max_scale: limits.max,
            stale_after_secs: None,
            nudge_factor: 1.2,
        }
    }
}

/// Validated gesture configuration.
///
/// Everything but `enabled` is fixed once constructed.
#[derive(Clone, PartialEq, Debug, Reflect)]
pub struct GestureConfig {
    rotation_speed: f32,
    scale_speed: f32,
    rotation_frame: RotationFrame,
    enabled: bool,
    scale_limits: ScaleLimits,
    stale_after: Option<Duration>,
    nudge_factor: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.5,
            scale_speed: 0.05,
            rotation_frame: RotationFrame::Local,
            enabled: true,
            scale_limits: ScaleLimits::default(),
            stale_after: None,
            nudge_factor: 1.2,
        }
    }
}

impl GestureConfig {
    pub fn new(
        rotation_speed: f32,
        scale_speed: f32,
        rotation_frame: RotationFrame,
    ) -> Result<Self, GestureConfigError> {
        check_speed("rotation_speed", rotation_speed)?;
        check_speed("scale_speed", scale_speed)?;
        Ok(Self {
            rotation_speed,
            scale_speed,
            rotation_frame,
            ..Default::default()
        })
    }

    pub fn from_json(text: &str) -> Result<Self, GestureConfigError> {
        let settings: GestureSettings = serde_json::from_str(text)?;
        Self::try_from(settings)
    }

    pub fn with_scale_limits(mut self, min: f32, max: f32) -> Result<Self, GestureConfigError> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(GestureConfigError::InvalidScaleLimits { min, max });
        }
        self.scale_limits = ScaleLimits { min, max };
        Ok(self)
    }

    pub fn with_stale_after(mut self, timeout: Duration) -> Result<Self, GestureConfigError> {
        if timeout.is_zero() {
            return Err(GestureConfigError::InvalidTimeout(0.0));
        }
        self.stale_after = Some(timeout);
        Ok(self)
    }

    pub fn with_nudge_factor(mut self, factor: f32) -> Result<Self, GestureConfigError> {
        if !(factor.is_finite() && factor > 1.0) {
            return Err(GestureConfigError::InvalidNudgeFactor(factor));
        }
        self.nudge_factor = factor;
        Ok(self)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn scale_speed(&self) -> f32 {
        self.scale_speed
    }

    pub fn rotation_frame(&self) -> RotationFrame {
        self.rotation_frame
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn scale_limits(&self) -> ScaleLimits {
        self.scale_limits
    }

    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after
    }

    pub fn nudge_factor(&self) -> f32 {
        self.nudge_factor
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl TryFrom<GestureSettings> for GestureConfig {
    type Error = GestureConfigError;

    fn try_from(settings: GestureSettings) -> Result<Self, Self::Error> {
        let frame = settings.rotation_coordinate.parse()?;
        let mut config = GestureConfig::new(settings.rotation_speed, settings.scale_speed, frame)?
            .with_scale_limits(settings.min_scale, settings.max_scale)?
            .with_nudge_factor(settings.nudge_factor)?
            .with_enabled(settings.enabled);

        if let Some(secs) = settings.stale_after_secs {
            // Rejects negative, NaN and values too large for a `Duration`.
            let timeout = Duration::try_from_secs_f32(secs)
                .map_err(|_| GestureConfigError::InvalidTimeout(secs))?;
            config = config.with_stale_after(timeout)?;
        }

        Ok(config)
    }
}

fn check_speed(name: &'static str, value: f32) -> Result<(), GestureConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GestureConfigError::NonPositiveSpeed { name, value })
    }
}
