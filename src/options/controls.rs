use std::f32::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::bindings::{KeyBindings, MouseBindings, TouchBindings};

/// Distance, zoom and angle bounds for the orbit.
///
/// Infinite bounds serialize to TOML as `inf` / `-inf`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Limits", inline)]
#[serde(default)]
pub struct OrbitLimits {
    /// Closest a perspective camera may dolly to the target.
    pub min_distance: f32,
    /// Farthest a perspective camera may dolly from the target.
    pub max_distance: f32,
    /// Smallest orthographic zoom.
    pub min_zoom: f32,
    /// Largest orthographic zoom.
    pub max_zoom: f32,
    /// Lower polar bound in radians (0 looks straight down the up axis).
    pub min_polar_angle: f32,
    /// Upper polar bound in radians (at most π).
    pub max_polar_angle: f32,
    /// Lower azimuth bound in radians. Only applied when both azimuth bounds
    /// are finite.
    pub min_azimuth_angle: f32,
    /// Upper azimuth bound in radians.
    pub max_azimuth_angle: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_zoom: 0.0,
            max_zoom: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_azimuth_angle: f32::NEG_INFINITY,
            max_azimuth_angle: f32::INFINITY,
        }
    }
}

/// Orbit controller behavior: capabilities, speeds, damping, bindings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
pub struct ControlOptions {
    /// Master switch. Disabled controls ignore new input but still finish
    /// releasing active contacts.
    pub enabled: bool,
    /// Allow orbiting.
    pub enable_rotate: bool,
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 5.0))]
    pub rotate_speed: f32,
    /// Allow dolly / zoom.
    pub enable_zoom: bool,
    /// Dolly sensitivity; each wheel step scales by `0.95^zoom_speed`.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 5.0))]
    pub zoom_speed: f32,
    /// Allow panning.
    pub enable_pan: bool,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 5.0))]
    pub pan_speed: f32,
    /// Pan in the screen plane. When false, vertical pans move along the
    /// ground plane orthogonal to the camera up vector.
    pub screen_space_panning: bool,
    /// Pixels panned per arrow key press.
    #[schemars(title = "Key Pan Speed", range(min = 1.0, max = 50.0))]
    pub key_pan_speed: f32,
    /// Keep applying a decaying share of each input on later frames.
    /// Requires the host to call `update` every frame.
    pub enable_damping: bool,
    /// Share of the pending motion applied per frame when damping.
    #[schemars(title = "Damping Factor", range(min = 0.01, max = 1.0))]
    pub damping_factor: f32,
    /// Spin around the target while idle. Requires per-frame `update`.
    pub auto_rotate: bool,
    /// Auto-rotate speed; 2.0 is one revolution per 30 s at 60 fps.
    #[schemars(title = "Auto-Rotate Speed", range(min = -10.0, max = 10.0))]
    pub auto_rotate_speed: f32,
    /// Remaining-distance fraction kept by double-click zoom-to-point.
    #[schemars(title = "Zoom To Point", range(min = 0.01, max = 1.0))]
    pub zoom_to_point_scale: f32,
    /// Distance, zoom and angle bounds.
    pub limits: OrbitLimits,
    /// Mouse button bindings.
    pub mouse_buttons: MouseBindings,
    /// Touch gesture bindings.
    pub touches: TouchBindings,
    /// Arrow key bindings.
    #[schemars(skip)]
    pub keys: KeyBindings,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            enable_rotate: true,
            rotate_speed: 1.0,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_pan: true,
            pan_speed: 1.0,
            screen_space_panning: true,
            key_pan_speed: 7.0,
            enable_damping: false,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            zoom_to_point_scale: 0.1,
            limits: OrbitLimits::default(),
            mouse_buttons: MouseBindings::default(),
            touches: TouchBindings::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl ControlOptions {
    /// Multiplier applied per dolly step.
    #[must_use]
    pub fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Azimuth step applied per idle frame while auto-rotating.
    #[must_use]
    pub fn auto_rotation_angle(&self) -> f32 {
        2.0 * PI / 60.0 / 60.0 * self.auto_rotate_speed
    }
}
