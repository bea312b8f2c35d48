use glam::Vec2;

/// Identifier of a pointer contact (mouse, pen or finger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

impl PointerId {
    /// Id used for the native mouse cursor, which has no platform id.
    pub const MOUSE: Self = Self(u64::MAX);
}

/// Device class of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse cursor.
    Mouse,
    /// Stylus; handled like a mouse.
    Pen,
    /// Finger on a touch surface.
    Touch,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Middle mouse button (wheel click).
    Middle,
    /// Secondary (right) mouse button.
    Right,
    /// Any other button (back, forward, ...). Never starts a gesture.
    Other,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Left,
            1 => Self::Middle,
            2 => Self::Right,
            _ => Self::Other,
        }
    }
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

/// Modifier keys held during a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Meta / command / super key.
    pub meta: bool,
    /// Shift key.
    pub shift: bool,
}

impl Modifiers {
    /// True when any key that swaps rotate and pan is held.
    #[must_use]
    pub fn swaps_rotate_pan(self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Contact identifier.
    pub id: PointerId,
    /// Device class.
    pub kind: PointerKind,
    /// Button that changed (presses) or the primary button (moves).
    pub button: MouseButton,
    /// Position in client pixels from the top-left corner.
    pub position: Vec2,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Mouse sample at `position`.
    #[must_use]
    pub fn mouse(button: MouseButton, position: Vec2) -> Self {
        Self {
            id: PointerId::MOUSE,
            kind: PointerKind::Mouse,
            button,
            position,
            modifiers: Modifiers::default(),
        }
    }

    /// Touch sample for finger `id` at `position`.
    #[must_use]
    pub fn touch(id: u64, position: Vec2) -> Self {
        Self {
            id: PointerId(id),
            kind: PointerKind::Touch,
            button: MouseButton::Left,
            position,
            modifiers: Modifiers::default(),
        }
    }

    /// Same sample with the given modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Platform-agnostic input events consumed by
/// [`OrbitControls`](crate::controls::OrbitControls).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A contact started (button press or finger down).
    PointerDown(PointerEvent),
    /// A contact moved.
    PointerMove(PointerEvent),
    /// A contact ended.
    PointerUp(PointerEvent),
    /// The platform aborted a contact without a release.
    PointerCancel(PointerEvent),
    /// Scroll wheel.
    Wheel {
        /// Vertical scroll amount; negative scrolls up (zooms in).
        delta_y: f32,
    },
    /// Key pressed, identified by its physical code (e.g. `"ArrowUp"`).
    KeyDown {
        /// Physical key code.
        code: String,
    },
    /// Context menu requested (usually right click).
    ContextMenu,
    /// Double click / double tap at a client position.
    DoubleClick {
        /// Horizontal position in client pixels.
        x: f32,
        /// Vertical position in client pixels.
        y: f32,
    },
    /// The render surface changed size.
    Resize {
        /// New width in client pixels.
        width: f32,
        /// New height in client pixels.
        height: f32,
    },
}
