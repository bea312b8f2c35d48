//! Maps a new contact configuration to an interaction mode.

use glam::Vec2;

use super::event::{Modifiers, MouseButton};
use super::pointer::PointerTracker;
use crate::options::{
    ControlOptions, MouseAction, MouseBindings, TouchAction, TouchBindings,
};

/// The gesture currently driving the camera. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionMode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Mouse drag orbiting the target.
    Rotate,
    /// Mouse drag moving towards / away from the target.
    Dolly,
    /// Mouse drag translating the target.
    Pan,
    /// One finger orbiting.
    TouchRotate,
    /// One finger panning.
    TouchPan,
    /// Two-finger pinch plus drag to pan.
    TouchDollyPan,
    /// Two-finger pinch plus drag to orbit.
    TouchDollyRotate,
}

impl InteractionMode {
    /// True for [`InteractionMode::Idle`].
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    /// True for the two-finger modes.
    #[must_use]
    pub fn is_two_finger(self) -> bool {
        matches!(self, Self::TouchDollyPan | Self::TouchDollyRotate)
    }
}

/// Which camera motions are currently allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Orbiting allowed.
    pub rotate: bool,
    /// Dolly / zoom allowed.
    pub zoom: bool,
    /// Panning allowed.
    pub pan: bool,
}

impl Capabilities {
    /// Every motion allowed.
    pub const ALL: Self = Self {
        rotate: true,
        zoom: true,
        pan: true,
    };
}

impl From<&ControlOptions> for Capabilities {
    fn from(options: &ControlOptions) -> Self {
        Self {
            rotate: options.enable_rotate,
            zoom: options.enable_zoom,
            pan: options.enable_pan,
        }
    }
}

/// Mode for a mouse or pen press. Ctrl, Meta or Shift swap rotate and pan.
#[must_use]
pub fn classify_mouse(
    button: MouseButton,
    modifiers: Modifiers,
    bindings: &MouseBindings,
    caps: Capabilities,
) -> InteractionMode {
    let action = match button {
        MouseButton::Left => bindings.left,
        MouseButton::Middle => bindings.middle,
        MouseButton::Right => bindings.right,
        MouseButton::Other => MouseAction::None,
    };
    let swap = modifiers.swaps_rotate_pan();
    match (action, swap) {
        (MouseAction::Dolly, _) if caps.zoom => InteractionMode::Dolly,
        (MouseAction::Rotate, false) | (MouseAction::Pan, true)
            if caps.rotate =>
        {
            InteractionMode::Rotate
        }
        (MouseAction::Rotate, true) | (MouseAction::Pan, false) if caps.pan => {
            InteractionMode::Pan
        }
        _ => InteractionMode::Idle,
    }
}

/// Mode for `count` simultaneous touch contacts.
#[must_use]
pub fn classify_touch(
    count: usize,
    bindings: &TouchBindings,
    caps: Capabilities,
) -> InteractionMode {
    let action = match count {
        1 => bindings.one,
        2 => bindings.two,
        _ => return InteractionMode::Idle,
    };
    match (count, action) {
        (1, TouchAction::Rotate) if caps.rotate => InteractionMode::TouchRotate,
        (1, TouchAction::Pan) if caps.pan => InteractionMode::TouchPan,
        (2, TouchAction::DollyPan) if caps.zoom || caps.pan => {
            InteractionMode::TouchDollyPan
        }
        (2, TouchAction::DollyRotate) if caps.zoom || caps.rotate => {
            InteractionMode::TouchDollyRotate
        }
        _ => InteractionMode::Idle,
    }
}

/// Reference point(s) captured when a gesture starts or changes contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureStart {
    /// Resolved mode.
    pub mode: InteractionMode,
    /// Single contact position, or the midpoint of two contacts.
    pub anchor: Vec2,
    /// Distance between two contacts; zero for single-contact gestures.
    pub spread: f32,
}

impl GestureStart {
    /// Capture the reference points for `mode` from the tracked contacts,
    /// falling back to `position` when the tracker has no usable centroid.
    #[must_use]
    pub fn capture(
        mode: InteractionMode,
        tracker: &PointerTracker,
        position: Vec2,
    ) -> Self {
        let anchor = match mode {
            InteractionMode::Rotate
            | InteractionMode::Dolly
            | InteractionMode::Pan => position,
            _ => tracker.centroid().unwrap_or(position),
        };
        let spread = if mode.is_two_finger() {
            tracker.spread().unwrap_or(0.0)
        } else {
            0.0
        };
        Self {
            mode,
            anchor,
            spread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerId;

    #[test]
    fn default_mouse_bindings() {
        let b = MouseBindings::default();
        let none = Modifiers::default();
        let caps = Capabilities::ALL;
        assert_eq!(
            classify_mouse(MouseButton::Left, none, &b, caps),
            InteractionMode::Rotate
        );
        assert_eq!(
            classify_mouse(MouseButton::Middle, none, &b, caps),
            InteractionMode::Dolly
        );
        assert_eq!(
            classify_mouse(MouseButton::Right, none, &b, caps),
            InteractionMode::Pan
        );
        assert_eq!(
            classify_mouse(MouseButton::Other, none, &b, caps),
            InteractionMode::Idle
        );
    }

    #[test]
    fn modifiers_swap_rotate_and_pan() {
        let b = MouseBindings::default();
        let caps = Capabilities::ALL;
        for modifiers in [
            Modifiers { ctrl: true, ..Default::default() },
            Modifiers { meta: true, ..Default::default() },
            Modifiers { shift: true, ..Default::default() },
        ] {
            assert_eq!(
                classify_mouse(MouseButton::Left, modifiers, &b, caps),
                InteractionMode::Pan
            );
            assert_eq!(
                classify_mouse(MouseButton::Right, modifiers, &b, caps),
                InteractionMode::Rotate
            );
            assert_eq!(
                classify_mouse(MouseButton::Middle, modifiers, &b, caps),
                InteractionMode::Dolly
            );
        }
    }

    #[test]
    fn disabled_capability_resolves_to_idle() {
        let b = MouseBindings::default();
        let caps = Capabilities {
            rotate: false,
            zoom: false,
            pan: true,
        };
        let none = Modifiers::default();
        assert_eq!(
            classify_mouse(MouseButton::Left, none, &b, caps),
            InteractionMode::Idle
        );
        assert_eq!(
            classify_mouse(MouseButton::Middle, none, &b, caps),
            InteractionMode::Idle
        );
        // swapped to pan, which is still allowed
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(
            classify_mouse(MouseButton::Left, shift, &b, caps),
            InteractionMode::Pan
        );
    }

    #[test]
    fn touch_counts() {
        let b = TouchBindings::default();
        let caps = Capabilities::ALL;
        assert_eq!(classify_touch(0, &b, caps), InteractionMode::Idle);
        assert_eq!(classify_touch(1, &b, caps), InteractionMode::TouchRotate);
        assert_eq!(classify_touch(2, &b, caps), InteractionMode::TouchDollyPan);
        assert_eq!(classify_touch(3, &b, caps), InteractionMode::Idle);

        let b = TouchBindings {
            one: TouchAction::Pan,
            two: TouchAction::DollyRotate,
        };
        assert_eq!(classify_touch(1, &b, caps), InteractionMode::TouchPan);
        assert_eq!(
            classify_touch(2, &b, caps),
            InteractionMode::TouchDollyRotate
        );
    }

    #[test]
    fn two_finger_modes_need_only_one_half() {
        let b = TouchBindings::default();
        let pan_only = Capabilities {
            rotate: false,
            zoom: false,
            pan: true,
        };
        assert_eq!(
            classify_touch(2, &b, pan_only),
            InteractionMode::TouchDollyPan
        );
        let nothing = Capabilities {
            rotate: true,
            zoom: false,
            pan: false,
        };
        assert_eq!(classify_touch(2, &b, nothing), InteractionMode::Idle);
    }

    #[test]
    fn capture_uses_midpoint_for_two_fingers() {
        let mut tracker = PointerTracker::new();
        tracker.add_contact(PointerId(1), Vec2::new(0.0, 0.0));
        tracker.add_contact(PointerId(2), Vec2::new(6.0, 8.0));
        let start = GestureStart::capture(
            InteractionMode::TouchDollyPan,
            &tracker,
            Vec2::new(6.0, 8.0),
        );
        assert_eq!(start.anchor, Vec2::new(3.0, 4.0));
        assert_eq!(start.spread, 10.0);

        let start = GestureStart::capture(
            InteractionMode::Rotate,
            &tracker,
            Vec2::new(6.0, 8.0),
        );
        assert_eq!(start.anchor, Vec2::new(6.0, 8.0));
        assert_eq!(start.spread, 0.0);
    }
}
