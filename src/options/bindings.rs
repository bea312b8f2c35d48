use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What dragging with a mouse button does.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MouseAction {
    /// Orbit around the target.
    Rotate,
    /// Move towards or away from the target.
    Dolly,
    /// Translate the target in the view plane.
    Pan,
    /// Button is not bound.
    None,
}

/// What a touch gesture does.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TouchAction {
    /// One finger orbits.
    Rotate,
    /// One finger pans.
    Pan,
    /// Two fingers pinch to dolly and drag to pan.
    DollyPan,
    /// Two fingers pinch to dolly and drag to orbit.
    DollyRotate,
    /// Gesture is not bound.
    None,
}

/// Mouse button to action table.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema,
)]
#[schemars(title = "Mouse Buttons", inline)]
#[serde(default)]
pub struct MouseBindings {
    /// Primary button.
    pub left: MouseAction,
    /// Wheel button.
    pub middle: MouseAction,
    /// Secondary button.
    pub right: MouseAction,
}

impl Default for MouseBindings {
    fn default() -> Self {
        Self {
            left: MouseAction::Rotate,
            middle: MouseAction::Dolly,
            right: MouseAction::Pan,
        }
    }
}

/// Finger count to action table.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema,
)]
#[schemars(title = "Touch Gestures", inline)]
#[serde(default)]
pub struct TouchBindings {
    /// Single contact.
    pub one: TouchAction,
    /// Two contacts.
    pub two: TouchAction,
}

impl Default for TouchBindings {
    fn default() -> Self {
        Self {
            one: TouchAction::Rotate,
            two: TouchAction::DollyPan,
        }
    }
}

/// Key codes that pan the view, in `KeyboardEvent.code` / winit `KeyCode`
/// debug format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Pan Keys", inline)]
#[serde(default)]
pub struct KeyBindings {
    /// Pans the view so the scene moves right.
    pub left: String,
    /// Pans the view so the scene moves down.
    pub up: String,
    /// Pans the view so the scene moves left.
    pub right: String,
    /// Pans the view so the scene moves up.
    pub bottom: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: "ArrowLeft".into(),
            up: "ArrowUp".into(),
            right: "ArrowRight".into(),
            bottom: "ArrowDown".into(),
        }
    }
}

/// Direction bound to a pan key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanKey {
    /// `left` binding.
    Left,
    /// `up` binding.
    Up,
    /// `right` binding.
    Right,
    /// `bottom` binding.
    Bottom,
}

impl KeyBindings {
    /// Look up the pan direction bound to a key code.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<PanKey> {
        if code == self.up {
            Some(PanKey::Up)
        } else if code == self.bottom {
            Some(PanKey::Bottom)
        } else if code == self.left {
            Some(PanKey::Left)
        } else if code == self.right {
            Some(PanKey::Right)
        } else {
            None
        }
    }
}
