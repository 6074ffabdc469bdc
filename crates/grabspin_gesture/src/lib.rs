//! Host-agnostic drag-to-rotate and pinch-to-scale gesture interpretation.
//!
//! Raw pointer, touch and wheel input flows one way:
//! [`InputUnifier`] → [`GestureStateMachine`] → [`TransformApplier`] → `Transform`.
//! [`GestureController`] bundles the three for one target.

pub mod applier;
pub mod config;
pub mod controller;
pub mod state;
pub mod unifier;

pub use applier::TransformApplier;
pub use config::{GestureConfig, GestureConfigError, GestureSettings, RotationFrame, ScaleLimits};
pub use controller::{GestureController, InputResponse};
pub use state::{GestureMode, GestureSink, GestureStateMachine, PINCH_DAMPING, TransformRequest};
pub use unifier::{GesturePrimitive, HostInput, InputUnifier, PointerButton, PointerSample, Unified};
