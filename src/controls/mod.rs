//! Orbit camera controller.
//!
//! [`OrbitControls`] routes [`InputEvent`]s through the pointer tracker and
//! gesture classifier into the [`OrbitState`], owns the camera, and reports
//! pose changes and gesture boundaries through [`Hooks`].
//!
//! # Example
//!
//! ```
//! use glam::{Vec2, Vec3};
//! use orbit_view::camera::Camera;
//! use orbit_view::controls::OrbitControls;
//! use orbit_view::input::{InputEvent, MouseButton, PointerEvent};
//! use orbit_view::options::ControlOptions;
//!
//! let mut camera = Camera::perspective(50.0, 1.0, 0.1, 1000.0);
//! camera.position = Vec3::new(0.0, 0.0, 100.0);
//! let mut controls =
//!     OrbitControls::new(camera, Vec3::ZERO, ControlOptions::default());
//! controls.set_viewport(800.0, 600.0);
//!
//! let at = |x, y| PointerEvent::mouse(MouseButton::Left, Vec2::new(x, y));
//! let _ = controls.handle_event(&InputEvent::PointerDown(at(400.0, 300.0)));
//! let _ = controls.handle_event(&InputEvent::PointerMove(at(450.0, 300.0)));
//! let _ = controls.handle_event(&InputEvent::PointerUp(at(450.0, 300.0)));
//! assert!(controls.azimuthal_angle() < 0.0);
//! ```

mod hooks;
mod listeners;

use glam::{Vec2, Vec3};
pub use hooks::{HookId, Hooks};
pub use listeners::{EventTarget, ListenerKind, NullTarget};
use listeners::Listeners;

use crate::camera::{Camera, DollyDirection, OrbitState, Viewport};
use crate::input::{
    classify_mouse, classify_touch, Capabilities, GestureStart, InputEvent,
    InteractionMode, PointerEvent, PointerKind, PointerTracker,
};
use crate::options::{ControlOptions, PanKey};
use crate::picking::Ray;

/// Orbit, pan and dolly a camera around a target from pointer, wheel and
/// keyboard input.
#[derive(Debug)]
pub struct OrbitControls {
    camera: Camera,
    options: ControlOptions,
    orbit: OrbitState,
    tracker: PointerTracker,
    mode: InteractionMode,
    gesture: GestureStart,
    viewport: Viewport,
    hooks: Hooks,
    listeners: Listeners,
}

impl OrbitControls {
    /// Take control of `camera`, orbiting around `target`. The initial pose
    /// becomes the reset state.
    #[must_use]
    pub fn new(camera: Camera, target: Vec3, options: ControlOptions) -> Self {
        let orbit = OrbitState::new(&camera, target);
        let mut controls = Self {
            camera,
            options,
            orbit,
            tracker: PointerTracker::new(),
            mode: InteractionMode::Idle,
            gesture: GestureStart {
                mode: InteractionMode::Idle,
                anchor: Vec2::ZERO,
                spread: 0.0,
            },
            viewport: Viewport::default(),
            hooks: Hooks::default(),
            listeners: Listeners::new(Box::new(NullTarget)),
        };
        let _ = controls.update();
        controls
    }

    // -- Accessors --

    /// The controlled camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access for projection changes (aspect, fov). Pose
    /// edits are picked up by the next [`OrbitControls::update`].
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Current orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.orbit.target()
    }

    /// Move the orbit target. Takes effect on the next update.
    pub fn set_target(&mut self, target: Vec3) {
        self.orbit.set_target(target);
    }

    /// Polar angle from the up axis, as of the last update.
    #[must_use]
    pub fn polar_angle(&self) -> f32 {
        self.orbit.spherical().phi
    }

    /// Azimuth around the up axis, as of the last update.
    #[must_use]
    pub fn azimuthal_angle(&self) -> f32 {
        self.orbit.spherical().theta
    }

    /// Distance from the camera to the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.camera.position.distance(self.orbit.target())
    }

    /// Active gesture.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Number of tracked contacts.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.tracker.count()
    }

    /// Orbit integration state.
    #[must_use]
    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &ControlOptions {
        &self.options
    }

    /// Mutable options. Changes apply to the next event or update.
    pub fn options_mut(&mut self) -> &mut ControlOptions {
        &mut self.options
    }

    /// Replace all options.
    pub fn set_options(&mut self, options: ControlOptions) {
        self.options = options;
    }

    /// Client area used to scale pointer deltas.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Record the size of the element receiving input.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Subscriber lists.
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Subscribe to camera changes.
    pub fn on_change(&mut self, hook: impl FnMut(&Camera) + 'static) -> HookId {
        self.hooks.on_change(hook)
    }

    /// Subscribe to gesture starts.
    pub fn on_start(
        &mut self,
        hook: impl FnMut(InteractionMode) + 'static,
    ) -> HookId {
        self.hooks.on_start(hook)
    }

    /// Subscribe to gesture ends.
    pub fn on_end(
        &mut self,
        hook: impl FnMut(InteractionMode) + 'static,
    ) -> HookId {
        self.hooks.on_end(hook)
    }

    // -- Listener lifecycle --

    /// Mirror listener registration onto `target`. Live listeners move over
    /// from the previous target.
    pub fn attach(&mut self, target: Box<dyn EventTarget>) {
        self.listeners.attach(target);
    }

    /// Start handling arrow keys delivered through `target`.
    pub fn listen_for_keyboard(&mut self, target: Box<dyn EventTarget>) {
        self.listeners.listen_for_keyboard(target);
    }

    /// True while events of `kind` are being handled.
    #[must_use]
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.is_active(kind)
    }

    /// True once [`OrbitControls::dispose`] has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.listeners.is_disposed()
    }

    /// Remove every listener. Idempotent; later events are ignored.
    pub fn dispose(&mut self) {
        self.listeners.dispose();
    }

    // -- Frame integration --

    /// Apply pending input to the camera. Returns true (and notifies
    /// `on_change`) when the camera moved.
    pub fn update(&mut self) -> bool {
        self.apply(None)
    }

    /// Like [`OrbitControls::update`] but first sets the azimuth and polar
    /// angle, discarding pending rotation.
    pub fn update_with_angles(&mut self, theta: f32, phi: f32) -> bool {
        self.apply(Some((theta, phi)))
    }

    fn apply(&mut self, explicit: Option<(f32, f32)>) -> bool {
        let changed = self.orbit.apply_frame(
            &mut self.camera,
            &self.options,
            self.mode.is_idle(),
            explicit,
        );
        if changed {
            self.hooks.emit_change(&self.camera);
        }
        changed
    }

    /// Remember the current pose for [`OrbitControls::reset`].
    pub fn save_state(&mut self) {
        self.orbit.save_state(&self.camera);
    }

    /// Return to the saved pose and drop any active gesture.
    pub fn reset(&mut self) {
        self.orbit.restore_state(&mut self.camera);
        self.hooks.emit_change(&self.camera);
        let _ = self.update();
        self.mode = InteractionMode::Idle;
    }

    /// Re-target the orbit at `point` and move the camera towards it, keeping
    /// the current viewing angles. The camera keeps
    /// `zoom_to_point_scale` of its previous distance to the point.
    pub fn zoom_to_point(&mut self, point: Vec3) {
        let theta = self.azimuthal_angle();
        let phi = self.polar_angle();
        let scale = self.options.zoom_to_point_scale;
        self.camera.position = point + (self.camera.position - point) * scale;
        self.orbit.set_target(point);
        let _ = self.update_with_angles(theta, phi);
    }

    /// World ray through a client-space position.
    #[must_use]
    pub fn pick_ray(&self, x: f32, y: f32) -> Ray {
        self.camera
            .screen_to_ray(x, y, self.viewport.width, self.viewport.height)
    }

    // -- Event routing --

    /// Feed one input event. Returns true when the host should suppress the
    /// platform's default action for it.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        let kind = match event {
            InputEvent::PointerDown(_) => ListenerKind::PointerDown,
            InputEvent::PointerMove(_) => ListenerKind::PointerMove,
            InputEvent::PointerUp(_) => ListenerKind::PointerUp,
            InputEvent::PointerCancel(_) => ListenerKind::PointerCancel,
            InputEvent::Wheel { .. } => ListenerKind::Wheel,
            InputEvent::KeyDown { .. } => ListenerKind::KeyDown,
            InputEvent::ContextMenu => ListenerKind::ContextMenu,
            InputEvent::Resize { width, height } => {
                self.set_viewport(*width, *height);
                return false;
            }
            InputEvent::DoubleClick { .. } => return false,
        };
        if !self.listeners.is_active(kind) {
            return false;
        }

        match event {
            InputEvent::PointerDown(e) => self.on_pointer_down(e),
            InputEvent::PointerMove(e) => self.on_pointer_move(e),
            InputEvent::PointerUp(e) | InputEvent::PointerCancel(e) => {
                self.on_pointer_up(e);
            }
            InputEvent::Wheel { delta_y } => return self.on_wheel(*delta_y),
            InputEvent::KeyDown { code } => return self.on_key_down(code),
            InputEvent::ContextMenu => return self.options.enabled,
            InputEvent::Resize { .. } | InputEvent::DoubleClick { .. } => {}
        }
        false
    }

    fn on_pointer_down(&mut self, e: &PointerEvent) {
        if !self.options.enabled {
            return;
        }
        if self.tracker.is_empty() {
            self.listeners.begin_contacts(e.id);
        }
        self.tracker.add_contact(e.id, e.position);

        match e.kind {
            PointerKind::Touch => self.on_touch_start(e),
            PointerKind::Mouse | PointerKind::Pen => self.on_mouse_down(e),
        }
    }

    fn on_mouse_down(&mut self, e: &PointerEvent) {
        // No overlapping single-pointer gestures
        if !self.mode.is_idle() {
            return;
        }
        let mode = classify_mouse(
            e.button,
            e.modifiers,
            &self.options.mouse_buttons,
            self.capabilities(),
        );
        if !mode.is_idle() {
            self.begin(mode, e.position);
        }
    }

    fn on_touch_start(&mut self, e: &PointerEvent) {
        let count = self.tracker.count();
        let mode =
            classify_touch(count, &self.options.touches, self.capabilities());

        match self.mode {
            InteractionMode::Idle => {
                if !mode.is_idle() {
                    self.begin(mode, e.position);
                }
            }
            InteractionMode::TouchRotate | InteractionMode::TouchPan
                if count == 2 =>
            {
                // One finger became two: switch without a new start, or
                // stop if the two-finger gesture is unavailable
                if mode.is_idle() {
                    self.end_gesture();
                } else {
                    self.mode = mode;
                    self.gesture =
                        GestureStart::capture(mode, &self.tracker, e.position);
                }
            }
            _ if count > 2 => self.end_gesture(),
            _ => {}
        }
    }

    fn begin(&mut self, mode: InteractionMode, position: Vec2) {
        self.mode = mode;
        self.gesture = GestureStart::capture(mode, &self.tracker, position);
        self.hooks.emit_start(mode);
    }

    fn end_gesture(&mut self) {
        if self.mode.is_idle() {
            return;
        }
        let mode = std::mem::take(&mut self.mode);
        self.hooks.emit_end(mode);
    }

    fn on_pointer_move(&mut self, e: &PointerEvent) {
        if !self.options.enabled {
            return;
        }
        self.tracker.update_contact(e.id, e.position);
        let handled = match e.kind {
            PointerKind::Touch => self.on_touch_move(),
            PointerKind::Mouse | PointerKind::Pen => self.on_mouse_move(e),
        };
        if handled {
            let _ = self.update();
        }
    }

    fn on_mouse_move(&mut self, e: &PointerEvent) -> bool {
        let delta = e.position - self.gesture.anchor;
        match self.mode {
            InteractionMode::Rotate if self.options.enable_rotate => {
                self.rotate(delta);
            }
            InteractionMode::Dolly if self.options.enable_zoom => {
                if delta.y > 0.0 {
                    self.dolly(DollyDirection::Out, self.options.zoom_scale());
                } else if delta.y < 0.0 {
                    self.dolly(DollyDirection::In, self.options.zoom_scale());
                }
            }
            InteractionMode::Pan if self.options.enable_pan => {
                self.pan(delta * self.options.pan_speed);
            }
            _ => return false,
        }
        self.gesture.anchor = e.position;
        true
    }

    fn on_touch_move(&mut self) -> bool {
        let Some(anchor) = self.tracker.centroid() else {
            return false;
        };
        let delta = anchor - self.gesture.anchor;
        let caps = self.capabilities();
        match self.mode {
            InteractionMode::TouchRotate if caps.rotate => self.rotate(delta),
            InteractionMode::TouchPan if caps.pan => {
                self.pan(delta * self.options.pan_speed);
            }
            InteractionMode::TouchDollyPan if caps.zoom || caps.pan => {
                if caps.zoom {
                    self.pinch();
                }
                if caps.pan {
                    self.pan(delta * self.options.pan_speed);
                }
            }
            InteractionMode::TouchDollyRotate if caps.zoom || caps.rotate => {
                if caps.zoom {
                    self.pinch();
                }
                if caps.rotate {
                    self.rotate(delta);
                }
            }
            _ => return false,
        }
        self.gesture.anchor = anchor;
        true
    }

    fn on_pointer_up(&mut self, e: &PointerEvent) {
        if !self.tracker.remove_contact(e.id) {
            return;
        }
        if self.tracker.is_empty() {
            self.listeners.end_contacts(e.id);
        }
        self.end_gesture();
    }

    fn on_wheel(&mut self, delta_y: f32) -> bool {
        if !self.options.enabled
            || !self.options.enable_zoom
            || !self.mode.is_idle()
        {
            return false;
        }
        self.hooks.emit_start(InteractionMode::Dolly);
        if delta_y < 0.0 {
            self.dolly(DollyDirection::In, self.options.zoom_scale());
        } else if delta_y > 0.0 {
            self.dolly(DollyDirection::Out, self.options.zoom_scale());
        }
        let _ = self.update();
        self.hooks.emit_end(InteractionMode::Dolly);
        true
    }

    fn on_key_down(&mut self, code: &str) -> bool {
        if !self.options.enabled || !self.options.enable_pan {
            return false;
        }
        let Some(key) = self.options.keys.lookup(code) else {
            return false;
        };
        let k = self.options.key_pan_speed;
        let delta = match key {
            PanKey::Up => Vec2::new(0.0, k),
            PanKey::Bottom => Vec2::new(0.0, -k),
            PanKey::Left => Vec2::new(k, 0.0),
            PanKey::Right => Vec2::new(-k, 0.0),
        };
        self.pan(delta);
        let _ = self.update();
        true
    }

    // -- Delta recording --

    fn capabilities(&self) -> Capabilities {
        Capabilities::from(&self.options)
    }

    fn rotate(&mut self, delta: Vec2) {
        self.orbit.record_rotation(
            delta,
            self.viewport.height,
            self.options.rotate_speed,
        );
    }

    fn pan(&mut self, delta: Vec2) {
        let result = self.orbit.record_pan(
            delta,
            &self.camera,
            self.viewport,
            self.options.screen_space_panning,
        );
        if let Err(e) = result {
            log::warn!("{e}: pan disabled");
            self.options.enable_pan = false;
        }
    }

    fn dolly(&mut self, direction: DollyDirection, scale: f32) {
        let result = self.orbit.record_dolly(
            direction,
            scale,
            &mut self.camera,
            &self.options.limits,
        );
        if let Err(e) = result {
            log::warn!("{e}: dolly/zoom disabled");
            self.options.enable_zoom = false;
        }
    }

    /// Two-finger pinch: spreading the fingers dollies in.
    fn pinch(&mut self) {
        let Some(spread) = self.tracker.spread() else {
            return;
        };
        if self.gesture.spread > 0.0 && spread > 0.0 {
            let ratio =
                (spread / self.gesture.spread).powf(self.options.zoom_speed);
            self.dolly(DollyDirection::Out, ratio);
        }
        self.gesture.spread = spread;
    }
}
