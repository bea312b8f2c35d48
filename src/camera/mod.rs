//! Camera model and orbit integration.
//!
//! Provides a perspective / orthographic camera, spherical coordinates in the
//! camera's up-space, and the per-frame orbit state that turns accumulated
//! rotation, pan and dolly input into a camera pose.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Orbit state machine: deltas, damping, limits, save/restore.
pub mod orbit;
/// Spherical coordinate helper.
pub mod spherical;

pub use self::core::{Camera, CameraUniform, Projection, UnsupportedCamera};
pub use orbit::{DollyDirection, OrbitState, SavedState, Viewport};
pub use spherical::Spherical;
