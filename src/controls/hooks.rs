use crate::camera::Camera;
use crate::input::InteractionMode;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

type ChangeHook = Box<dyn FnMut(&Camera)>;
type GestureHook = Box<dyn FnMut(InteractionMode)>;

/// Subscriber lists for camera change and gesture start / end.
///
/// Hooks run synchronously from inside the controller and must not call
/// back into it.
#[derive(Default)]
pub struct Hooks {
    next_id: u64,
    change: Vec<(HookId, ChangeHook)>,
    start: Vec<(HookId, GestureHook)>,
    end: Vec<(HookId, GestureHook)>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("change", &self.change.len())
            .field("start", &self.start.len())
            .field("end", &self.end.len())
            .finish()
    }
}

impl Hooks {
    fn next(&mut self) -> HookId {
        self.next_id += 1;
        HookId(self.next_id)
    }

    /// Called after every update that moved the camera.
    pub fn on_change(&mut self, hook: impl FnMut(&Camera) + 'static) -> HookId {
        let id = self.next();
        self.change.push((id, Box::new(hook)));
        id
    }

    /// Called when a gesture begins.
    pub fn on_start(
        &mut self,
        hook: impl FnMut(InteractionMode) + 'static,
    ) -> HookId {
        let id = self.next();
        self.start.push((id, Box::new(hook)));
        id
    }

    /// Called when a gesture ends.
    pub fn on_end(
        &mut self,
        hook: impl FnMut(InteractionMode) + 'static,
    ) -> HookId {
        let id = self.next();
        self.end.push((id, Box::new(hook)));
        id
    }

    /// Remove a hook. Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: HookId) -> bool {
        let before = self.change.len() + self.start.len() + self.end.len();
        self.change.retain(|(hook, _)| *hook != id);
        self.start.retain(|(hook, _)| *hook != id);
        self.end.retain(|(hook, _)| *hook != id);
        before != self.change.len() + self.start.len() + self.end.len()
    }

    pub(crate) fn emit_change(&mut self, camera: &Camera) {
        for (_, hook) in &mut self.change {
            hook(camera);
        }
    }

    pub(crate) fn emit_start(&mut self, mode: InteractionMode) {
        for (_, hook) in &mut self.start {
            hook(mode);
        }
    }

    pub(crate) fn emit_end(&mut self, mode: InteractionMode) {
        for (_, hook) in &mut self.end {
            hook(mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut hooks = Hooks::default();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let id = hooks.on_start(move |_| seen.set(seen.get() + 1));

        hooks.emit_start(InteractionMode::Rotate);
        assert_eq!(count.get(), 1);

        assert!(hooks.unsubscribe(id));
        assert!(!hooks.unsubscribe(id));
        hooks.emit_start(InteractionMode::Rotate);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn hooks_receive_the_mode() {
        let mut hooks = Hooks::default();
        let last = Rc::new(Cell::new(InteractionMode::Idle));
        let seen = Rc::clone(&last);
        let _ = hooks.on_end(move |mode| seen.set(mode));
        hooks.emit_end(InteractionMode::TouchDollyPan);
        assert_eq!(last.get(), InteractionMode::TouchDollyPan);
    }
}
