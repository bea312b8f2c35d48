//! Input handling: event types, contact tracking, gesture classification
//! and double-click detection.

/// Double-click detection from press / release pairs.
pub mod click;
/// Platform-agnostic input events.
pub mod event;
/// Mode resolution for new contacts.
pub mod gesture;
/// Active contact registry.
pub mod pointer;

pub use click::ClickTracker;
pub use event::{
    InputEvent, Modifiers, MouseButton, PointerEvent, PointerId, PointerKind,
};
pub use gesture::{
    classify_mouse, classify_touch, Capabilities, GestureStart,
    InteractionMode,
};
pub use pointer::PointerTracker;
