//! Viewer and controller options with TOML preset support.
//!
//! Camera placement, orbit controller behavior and display colors are
//! consolidated here. Options serialize to/from TOML so a viewer setup can be
//! stored as a preset file and partially overridden.

mod bindings;
mod camera;
mod controls;
mod display;

use std::path::Path;

pub use bindings::{
    KeyBindings, MouseAction, MouseBindings, PanKey, TouchAction,
    TouchBindings,
};
pub use camera::CameraOptions;
pub use controls::{ControlOptions, OrbitLimits};
pub use display::DisplayOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OrbitError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[controls]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and initial placement.
    pub camera: CameraOptions,
    /// Orbit controller behavior.
    pub controls: ControlOptions,
    /// Colors and shading.
    pub display: DisplayOptions,
}

impl Options {
    /// Preset used by the bundled model viewer: Z-up scene, left button pans,
    /// right button orbits, dolly bounded to a few thousand units.
    #[must_use]
    pub fn model_viewer() -> Self {
        let mut opts = Self::default();
        opts.camera = CameraOptions {
            fovy: 60.0,
            znear: 1.0,
            zfar: 2000.0,
            position: [0.0, 0.0, 100.0],
            target: [0.0; 3],
            up: [0.0, 0.0, 1.0],
        };
        opts.controls.mouse_buttons = MouseBindings {
            left: MouseAction::Pan,
            middle: MouseAction::Dolly,
            right: MouseAction::Rotate,
        };
        opts.controls.limits.min_distance = 0.0;
        opts.controls.limits.max_distance = 3840.0;
        // #141414
        let grey = 20.0 / 255.0;
        opts.display.background_color = [grey, grey, grey];
        opts
    }

    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, OrbitError> {
        let content = std::fs::read_to_string(path).map_err(OrbitError::Io)?;
        toml::from_str(&content)
            .map_err(|e| OrbitError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), OrbitError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| OrbitError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(OrbitError::Io)?;
        }
        std::fs::write(path, content).map_err(OrbitError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
        assert!(parsed.controls.limits.max_distance.is_infinite());
        assert!(parsed.controls.limits.min_azimuth_angle.is_infinite());
    }

    #[test]
    fn model_viewer_round_trips_through_toml() {
        let opts = Options::model_viewer();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[controls]
enable_damping = true
damping_factor = 0.1

[controls.mouse_buttons]
left = "pan"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert!(opts.controls.enable_damping);
        assert_eq!(opts.controls.damping_factor, 0.1);
        assert_eq!(opts.controls.mouse_buttons.left, MouseAction::Pan);
        // Everything else should be default
        assert_eq!(opts.controls.mouse_buttons.right, MouseAction::Pan);
        assert_eq!(opts.controls.mouse_buttons.middle, MouseAction::Dolly);
        assert_eq!(opts.controls.touches.two, TouchAction::DollyPan);
        assert_eq!(opts.controls.key_pan_speed, 7.0);
        assert_eq!(opts.camera, CameraOptions::default());
    }

    #[test]
    fn key_lookup() {
        let keys = KeyBindings::default();
        assert_eq!(keys.lookup("ArrowUp"), Some(PanKey::Up));
        assert_eq!(keys.lookup("ArrowDown"), Some(PanKey::Bottom));
        assert_eq!(keys.lookup("ArrowLeft"), Some(PanKey::Left));
        assert_eq!(keys.lookup("ArrowRight"), Some(PanKey::Right));
        assert_eq!(keys.lookup("KeyW"), None);
    }

    #[test]
    fn zoom_scale_follows_speed() {
        let mut controls = ControlOptions::default();
        assert!((controls.zoom_scale() - 0.95).abs() < 1e-6);
        controls.zoom_speed = 2.0;
        assert!((controls.zoom_scale() - 0.9025).abs() < 1e-6);
    }

    #[test]
    fn json_schema_has_expected_structure() {
        let schema = Options::json_schema();
        let json = serde_json::to_value(&schema).unwrap();
        let props = json["properties"].as_object().unwrap();
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("controls"));
        assert!(props.contains_key("display"));

        let controls = props["controls"]["properties"].as_object().unwrap();
        assert!(controls.contains_key("rotate_speed"));
        assert!(controls.contains_key("limits"));
        // Skipped fields should not appear
        assert!(!controls.contains_key("keys"));
    }

    #[test]
    fn load_and_save_preset_file() {
        let dir = std::env::temp_dir().join(format!(
            "orbit-view-options-{}",
            std::process::id()
        ));
        let path = dir.join("preset.toml");
        let opts = Options::model_viewer();
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(opts, loaded);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = Path::new("/nonexistent/orbit-view/preset.toml");
        assert!(matches!(Options::load(path), Err(OrbitError::Io(_))));
    }
}
