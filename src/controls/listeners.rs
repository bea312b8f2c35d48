//! Device listener bookkeeping.
//!
//! The controller decides which listeners should be live; an [`EventTarget`]
//! mirrors those decisions onto a real event source (a DOM element, or
//! nothing for native windows that deliver every event anyway).

use crate::input::PointerId;

/// Kinds of device listener the controller registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Context menu suppression.
    ContextMenu,
    /// Contact start.
    PointerDown,
    /// Contact abort.
    PointerCancel,
    /// Scroll wheel.
    Wheel,
    /// Contact movement; live only while contacts are active.
    PointerMove,
    /// Contact end; live only while contacts are active.
    PointerUp,
    /// Keyboard panning; registered on the keyboard target.
    KeyDown,
}

impl ListenerKind {
    /// Listeners registered for the controller's whole lifetime.
    pub const PERSISTENT: [Self; 4] = [
        Self::ContextMenu,
        Self::PointerDown,
        Self::PointerCancel,
        Self::Wheel,
    ];

    /// DOM event type name.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::ContextMenu => "contextmenu",
            Self::PointerDown => "pointerdown",
            Self::PointerCancel => "pointercancel",
            Self::Wheel => "wheel",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::KeyDown => "keydown",
        }
    }
}

/// Event source the controller registers listeners on.
pub trait EventTarget {
    /// Start delivering events of `kind`.
    fn add_listener(&mut self, kind: ListenerKind);

    /// Stop delivering events of `kind`.
    fn remove_listener(&mut self, kind: ListenerKind);

    /// Route all events of a pointer to this target until released.
    fn set_pointer_capture(&mut self, _id: PointerId) {}

    /// Undo [`EventTarget::set_pointer_capture`].
    fn release_pointer_capture(&mut self, _id: PointerId) {}
}

/// Target for hosts that feed every event to the controller directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTarget;

impl EventTarget for NullTarget {
    fn add_listener(&mut self, _kind: ListenerKind) {}

    fn remove_listener(&mut self, _kind: ListenerKind) {}
}

/// Live listener set plus the targets it is mirrored to.
pub(crate) struct Listeners {
    element: Box<dyn EventTarget>,
    keyboard: Option<Box<dyn EventTarget>>,
    active: Vec<ListenerKind>,
    disposed: bool,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("active", &self.active)
            .field("keyboard", &self.keyboard.is_some())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl Listeners {
    pub(crate) fn new(element: Box<dyn EventTarget>) -> Self {
        let mut listeners = Self {
            element,
            keyboard: None,
            active: Vec::new(),
            disposed: false,
        };
        for kind in ListenerKind::PERSISTENT {
            listeners.add(kind);
        }
        listeners
    }

    pub(crate) fn is_active(&self, kind: ListenerKind) -> bool {
        if self.disposed {
            return false;
        }
        match kind {
            ListenerKind::KeyDown => self.keyboard.is_some(),
            _ => self.active.contains(&kind),
        }
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(crate) fn add(&mut self, kind: ListenerKind) {
        if self.disposed || self.active.contains(&kind) {
            return;
        }
        self.active.push(kind);
        self.element.add_listener(kind);
    }

    pub(crate) fn remove(&mut self, kind: ListenerKind) {
        let before = self.active.len();
        self.active.retain(|&k| k != kind);
        if self.active.len() != before {
            self.element.remove_listener(kind);
        }
    }

    /// First contact arrived: capture it and follow its movement.
    pub(crate) fn begin_contacts(&mut self, id: PointerId) {
        if self.disposed {
            return;
        }
        self.element.set_pointer_capture(id);
        self.add(ListenerKind::PointerMove);
        self.add(ListenerKind::PointerUp);
    }

    /// Last contact left.
    pub(crate) fn end_contacts(&mut self, id: PointerId) {
        self.element.release_pointer_capture(id);
        self.remove(ListenerKind::PointerMove);
        self.remove(ListenerKind::PointerUp);
    }

    pub(crate) fn listen_for_keyboard(&mut self, mut target: Box<dyn EventTarget>) {
        if self.disposed {
            return;
        }
        if let Some(mut previous) = self.keyboard.take() {
            previous.remove_listener(ListenerKind::KeyDown);
        }
        target.add_listener(ListenerKind::KeyDown);
        self.keyboard = Some(target);
    }

    /// Move every live listener to a new element target.
    pub(crate) fn attach(&mut self, mut target: Box<dyn EventTarget>) {
        if self.disposed {
            return;
        }
        for &kind in &self.active {
            self.element.remove_listener(kind);
            target.add_listener(kind);
        }
        self.element = target;
    }

    pub(crate) fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for kind in std::mem::take(&mut self.active) {
            self.element.remove_listener(kind);
        }
        if let Some(mut keyboard) = self.keyboard.take() {
            keyboard.remove_listener(ListenerKind::KeyDown);
        }
        self.disposed = true;
    }
}
