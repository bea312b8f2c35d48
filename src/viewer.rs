//! Standalone model viewer window backed by winit.
//!
//! Window events are translated into [`InputEvent`]s and fed to a
//! [`Stage`] drawing through the wgpu [`MeshRenderer`].
//!
//! ```no_run
//! # use orbit_view::Viewer;
//! Viewer::builder()
//!     .with_path("assets/models/duck.glb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    asset::GltfLoader,
    controls::NullTarget,
    error::OrbitError,
    gpu::{MeshRenderer, RenderContext},
    input::{ClickTracker, InputEvent, Modifiers, MouseButton, PointerEvent},
    options::Options,
    stage::Stage,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    path: Option<String>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            path: None,
            options: None,
            title: "Orbit View".into(),
        }
    }

    /// Model to load: a `.gltf` / `.glb` path or an http(s) URL.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the [`Options::model_viewer`] preset.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            path: self.path,
            options: self.options.unwrap_or_else(Options::model_viewer),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window that displays one model under orbit controls.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    path: Option<String>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::Viewer`] if the event loop cannot be created
    /// or exits abnormally.
    pub fn run(self) -> Result<(), OrbitError> {
        let event_loop =
            EventLoop::new().map_err(|e| OrbitError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            stage: None,
            input: InputTranslator::default(),
            path: self.path,
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| OrbitError::Viewer(e.to_string()))
    }
}

// ── Event translation ────────────────────────────────────────────────────

/// Turns winit's cursor-relative window events into pointer events.
///
/// winit reports button changes without a position, so the last cursor
/// position and modifier state are carried here.
#[derive(Debug, Default)]
struct InputTranslator {
    cursor: Vec2,
    modifiers: Modifiers,
    clicks: ClickTracker,
}

impl InputTranslator {
    fn mouse(&self, button: MouseButton) -> PointerEvent {
        PointerEvent::mouse(button, self.cursor).with_modifiers(self.modifiers)
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    fn cursor_moved(&mut self, x: f32, y: f32) -> InputEvent {
        self.cursor = Vec2::new(x, y);
        InputEvent::PointerMove(self.mouse(MouseButton::Left))
    }

    /// Press or release, plus a trailing double click when a left release
    /// completes one.
    fn mouse_input(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Vec<InputEvent> {
        let event = self.mouse(button);
        if pressed {
            if button == MouseButton::Left {
                self.clicks.press(self.cursor);
            }
            return vec![InputEvent::PointerDown(event)];
        }

        let mut events = vec![InputEvent::PointerUp(event)];
        if button == MouseButton::Left && self.clicks.release(self.cursor) {
            events.push(InputEvent::DoubleClick {
                x: self.cursor.x,
                y: self.cursor.y,
            });
        }
        events
    }

    fn wheel(delta: MouseScrollDelta) -> InputEvent {
        // winit scrolls up with positive deltas, the DOM with negative ones
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y,
            MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
        };
        InputEvent::Wheel { delta_y }
    }

    fn touch(phase: TouchPhase, id: u64, x: f32, y: f32) -> InputEvent {
        let event = PointerEvent::touch(id, Vec2::new(x, y));
        match phase {
            TouchPhase::Started => InputEvent::PointerDown(event),
            TouchPhase::Moved => InputEvent::PointerMove(event),
            TouchPhase::Ended => InputEvent::PointerUp(event),
            TouchPhase::Cancelled => InputEvent::PointerCancel(event),
        }
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            code: format!("{code:?}"),
        }
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    stage: Option<Stage<MeshRenderer>>,
    input: InputTranslator,
    path: Option<String>,
    options: Options,
    title: String,
}

impl ViewerApp {
    fn dispatch(&mut self, event: &InputEvent) {
        if let Some(stage) = &mut self.stage {
            let _ = stage.handle_event(event);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(stage) = &mut self.stage {
            let _ = stage.resume();
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let context = match pollster::block_on(RenderContext::new(
            window.clone(),
            (inner.width, inner.height),
        )) {
            Ok(context) => context,
            Err(e) => {
                log::error!("Failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };
        let renderer = MeshRenderer::new(context, &self.options.display);

        let mut stage = Stage::from_options(&self.options);
        stage.controls_mut().listen_for_keyboard(Box::new(NullTarget));
        stage.resize(inner.width, inner.height);
        let _ = stage.mount(|| renderer);

        if let Some(path) = &self.path {
            let _ = pollster::block_on(stage.load(&GltfLoader, path));
        }

        window.request_redraw();
        self.window = Some(window);
        self.stage = Some(stage);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(stage) = &mut self.stage {
            stage.pause();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(stage) = &mut self.stage {
                stage.controls_mut().dispose();
            }
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                self.dispatch(&InputEvent::Resize {
                    width: size.width as f32,
                    height: size.height as f32,
                });
            }

            WindowEvent::RedrawRequested => {
                if let Some(stage) = &mut self.stage {
                    let _ = stage.frame();
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.input.set_modifiers(Modifiers {
                    ctrl: state.control_key(),
                    meta: state.super_key(),
                    shift: state.shift_key(),
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input
                    .cursor_moved(position.x as f32, position.y as f32);
                self.dispatch(&event);
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                for event in
                    self.input.mouse_input(MouseButton::from(button), pressed)
                {
                    self.dispatch(&event);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.dispatch(&InputTranslator::wheel(delta));
            }

            WindowEvent::Touch(touch) => {
                let event = InputTranslator::touch(
                    touch.phase,
                    touch.id,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
                self.dispatch(&event);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if code == KeyCode::KeyR {
                    if let Some(stage) = &mut self.stage {
                        stage.controls_mut().reset();
                    }
                    return;
                }
                self.dispatch(&InputTranslator::key(code));
            }

            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_use_last_cursor_position() {
        let mut input = InputTranslator::default();
        let _ = input.cursor_moved(10.0, 20.0);
        let events = input.mouse_input(MouseButton::Right, true);
        let InputEvent::PointerDown(down) = &events[0] else {
            panic!("expected a press, got {events:?}");
        };
        assert_eq!(down.position, Vec2::new(10.0, 20.0));
        assert_eq!(down.button, MouseButton::Right);
    }

    #[test]
    fn modifiers_ride_along_with_presses() {
        let mut input = InputTranslator::default();
        input.set_modifiers(Modifiers {
            shift: true,
            ..Default::default()
        });
        let events = input.mouse_input(MouseButton::Left, true);
        assert!(matches!(
            &events[0],
            InputEvent::PointerDown(e) if e.modifiers.shift
        ));
    }

    #[test]
    fn second_quick_click_adds_double_click() {
        let mut input = InputTranslator::default();
        let _ = input.cursor_moved(50.0, 60.0);
        let _ = input.mouse_input(MouseButton::Left, true);
        assert_eq!(input.mouse_input(MouseButton::Left, false).len(), 1);
        let _ = input.mouse_input(MouseButton::Left, true);
        let events = input.mouse_input(MouseButton::Left, false);
        assert_eq!(
            events.last(),
            Some(&InputEvent::DoubleClick { x: 50.0, y: 60.0 })
        );
    }

    #[test]
    fn right_clicks_never_double_click() {
        let mut input = InputTranslator::default();
        for _ in 0..2 {
            let _ = input.mouse_input(MouseButton::Right, true);
            assert_eq!(input.mouse_input(MouseButton::Right, false).len(), 1);
        }
    }

    #[test]
    fn scrolling_up_zooms_in() {
        let event =
            InputTranslator::wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert_eq!(event, InputEvent::Wheel { delta_y: -1.0 });
    }

    #[test]
    fn touch_phases_map_to_pointer_events() {
        assert!(matches!(
            InputTranslator::touch(TouchPhase::Started, 3, 1.0, 2.0),
            InputEvent::PointerDown(e) if e.id.0 == 3
        ));
        assert!(matches!(
            InputTranslator::touch(TouchPhase::Cancelled, 3, 1.0, 2.0),
            InputEvent::PointerCancel(_)
        ));
    }

    #[test]
    fn key_codes_use_dom_names() {
        assert_eq!(
            InputTranslator::key(KeyCode::ArrowLeft),
            InputEvent::KeyDown {
                code: "ArrowLeft".into()
            }
        );
    }
}
