//! Browser bindings: DOM listeners for [`OrbitControls`] and a `fetch`
//! based asset loader.
//!
//! The controller decides which listeners are live; [`DomTarget`] mirrors
//! those decisions onto a DOM element with one cached closure per
//! [`ListenerKind`].

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::asset::{load_slice, AssetLoader, LoadError};
use crate::controls::{EventTarget, ListenerKind, OrbitControls};
use crate::input::{
    InputEvent, Modifiers, MouseButton, PointerEvent, PointerId, PointerKind,
};
use crate::scene::SceneFragment;

type Shared = Rc<RefCell<OrbitControls>>;
type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Install the console logger and panic hook. Safe to call repeatedly.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

// ── DOM translation ──────────────────────────────────────────────────────

fn pointer_kind(pointer_type: &str) -> PointerKind {
    match pointer_type {
        "touch" => PointerKind::Touch,
        "pen" => PointerKind::Pen,
        _ => PointerKind::Mouse,
    }
}

fn pointer_sample(e: &web_sys::PointerEvent) -> PointerEvent {
    PointerEvent {
        id: PointerId(u64::from(e.pointer_id().unsigned_abs())),
        kind: pointer_kind(&e.pointer_type()),
        button: MouseButton::from_dom(e.button()),
        position: Vec2::new(e.offset_x() as f32, e.offset_y() as f32),
        modifiers: Modifiers {
            ctrl: e.ctrl_key(),
            meta: e.meta_key(),
            shift: e.shift_key(),
        },
    }
}

/// Convert a DOM event delivered for `kind`.
fn translate(kind: ListenerKind, event: &web_sys::Event) -> Option<InputEvent> {
    match kind {
        ListenerKind::PointerDown
        | ListenerKind::PointerMove
        | ListenerKind::PointerUp
        | ListenerKind::PointerCancel => {
            let sample = pointer_sample(event.dyn_ref()?);
            Some(match kind {
                ListenerKind::PointerDown => InputEvent::PointerDown(sample),
                ListenerKind::PointerMove => InputEvent::PointerMove(sample),
                ListenerKind::PointerUp => InputEvent::PointerUp(sample),
                _ => InputEvent::PointerCancel(sample),
            })
        }
        ListenerKind::Wheel => {
            let wheel: &web_sys::WheelEvent = event.dyn_ref()?;
            Some(InputEvent::Wheel {
                delta_y: wheel.delta_y() as f32,
            })
        }
        ListenerKind::KeyDown => {
            let key: &web_sys::KeyboardEvent = event.dyn_ref()?;
            Some(InputEvent::KeyDown { code: key.code() })
        }
        ListenerKind::ContextMenu => Some(InputEvent::ContextMenu),
    }
}

// ── Event target ─────────────────────────────────────────────────────────

/// DOM-backed [`EventTarget`].
///
/// Closures are created on first registration and kept until the target is
/// dropped, because the controller removes listeners from inside the very
/// callbacks that are running.
pub struct DomTarget {
    node: web_sys::EventTarget,
    capture: Option<web_sys::Element>,
    controls: Weak<RefCell<OrbitControls>>,
    listeners: Vec<(ListenerKind, Listener, bool)>,
}

impl DomTarget {
    fn new(
        node: web_sys::EventTarget,
        capture: Option<web_sys::Element>,
        controls: Weak<RefCell<OrbitControls>>,
    ) -> Self {
        Self {
            node,
            capture,
            controls,
            listeners: Vec::new(),
        }
    }

    fn closure(&self, kind: ListenerKind) -> Listener {
        let controls = self.controls.clone();
        Closure::new(move |event: web_sys::Event| {
            let Some(controls) = controls.upgrade() else {
                return;
            };
            let Some(input) = translate(kind, &event) else {
                return;
            };
            // A nested dispatch while the controller is busy is dropped
            let Ok(mut controls) = controls.try_borrow_mut() else {
                return;
            };
            if controls.handle_event(&input) {
                event.prevent_default();
            }
        })
    }
}

impl EventTarget for DomTarget {
    fn add_listener(&mut self, kind: ListenerKind) {
        let index = match self.listeners.iter().position(|(k, ..)| *k == kind)
        {
            Some(index) => index,
            None => {
                let closure = self.closure(kind);
                self.listeners.push((kind, closure, false));
                self.listeners.len() - 1
            }
        };
        let (_, closure, registered) = &mut self.listeners[index];
        if *registered {
            return;
        }
        let options = web_sys::AddEventListenerOptions::new();
        // Wheel and touch defaults can only be suppressed when not passive
        options.set_passive(false);
        let result = self
            .node
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.dom_name(),
                closure.as_ref().unchecked_ref(),
                &options,
            );
        match result {
            Ok(()) => *registered = true,
            Err(e) => log::warn!("failed to add {} listener: {e:?}", kind.dom_name()),
        }
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        let Some((_, closure, registered)) =
            self.listeners.iter_mut().find(|(k, ..)| *k == kind)
        else {
            return;
        };
        if !*registered {
            return;
        }
        let _ = self.node.remove_event_listener_with_callback(
            kind.dom_name(),
            closure.as_ref().unchecked_ref(),
        );
        *registered = false;
    }

    fn set_pointer_capture(&mut self, id: PointerId) {
        if let (Some(element), Ok(id)) = (&self.capture, i32::try_from(id.0)) {
            let _ = element.set_pointer_capture(id);
        }
    }

    fn release_pointer_capture(&mut self, id: PointerId) {
        if let (Some(element), Ok(id)) = (&self.capture, i32::try_from(id.0)) {
            let _ = element.release_pointer_capture(id);
        }
    }
}

// ── Controls handle ──────────────────────────────────────────────────────

/// [`OrbitControls`] bound to a canvas.
///
/// The controller is shared with the DOM callbacks; borrow it through
/// [`WebControls::controls`] between events, e.g. in the animation frame.
/// Double-click zoom needs the scene, which the controller does not own:
/// hosts opt in with [`WebControls::on_double_click`].
pub struct WebControls {
    controls: Shared,
    canvas: web_sys::HtmlCanvasElement,
    double_click: RefCell<Option<Listener>>,
}

impl WebControls {
    /// Wire `controls` to `canvas`: registers the persistent listeners,
    /// disables browser touch gestures on the canvas and sizes the viewport
    /// from its client size.
    #[must_use]
    pub fn attach(
        canvas: web_sys::HtmlCanvasElement,
        controls: OrbitControls,
    ) -> Self {
        let shared = Rc::new(RefCell::new(controls));
        let target = DomTarget::new(
            canvas.clone().into(),
            Some(canvas.clone().into()),
            Rc::downgrade(&shared),
        );
        shared.borrow_mut().attach(Box::new(target));
        set_touch_action(&canvas, "none");

        let handle = Self {
            controls: shared,
            canvas,
            double_click: RefCell::new(None),
        };
        handle.resize();
        handle
    }

    /// Enable arrow-key panning with key events from `element` (usually the
    /// window or document).
    pub fn listen_for_keyboard(&self, element: &web_sys::EventTarget) {
        let target =
            DomTarget::new(element.clone(), None, Rc::downgrade(&self.controls));
        self.controls
            .borrow_mut()
            .listen_for_keyboard(Box::new(target));
    }

    /// Shared controller handle.
    #[must_use]
    pub fn controls(&self) -> Shared {
        Rc::clone(&self.controls)
    }

    /// Re-read the canvas client size into the controller viewport.
    pub fn resize(&self) {
        let event = InputEvent::Resize {
            width: self.canvas.client_width() as f32,
            height: self.canvas.client_height() as f32,
        };
        let _ = self.controls.borrow_mut().handle_event(&event);
    }

    /// Per-frame integration; call from `requestAnimationFrame`.
    pub fn update(&self) -> bool {
        self.controls.borrow_mut().update()
    }

    /// Deliver canvas double-clicks to `hook` as
    /// [`InputEvent::DoubleClick`], typically forwarded to
    /// [`Stage::handle_event`](crate::stage::Stage::handle_event) for
    /// zoom-to-point. Replaces an earlier hook; must not be called from
    /// inside the hook itself.
    pub fn on_double_click(&self, mut hook: impl FnMut(InputEvent) + 'static) {
        self.unlisten_double_click();
        let closure: Listener = Closure::new(move |event: web_sys::Event| {
            let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
                return;
            };
            event.prevent_default();
            hook(double_click_at(mouse.offset_x(), mouse.offset_y()));
        });
        let result = self.canvas.add_event_listener_with_callback(
            DOUBLE_CLICK,
            closure.as_ref().unchecked_ref(),
        );
        match result {
            Ok(()) => *self.double_click.borrow_mut() = Some(closure),
            Err(e) => log::warn!("failed to add {DOUBLE_CLICK} listener: {e:?}"),
        }
    }

    /// Unregisters but keeps the closure, which may be the one running.
    fn unlisten_double_click(&self) {
        if let Some(closure) = self.double_click.borrow().as_ref() {
            let _ = self.canvas.remove_event_listener_with_callback(
                DOUBLE_CLICK,
                closure.as_ref().unchecked_ref(),
            );
        }
    }

    /// Remove every listener and restore the canvas touch behavior.
    pub fn dispose(&self) {
        self.controls.borrow_mut().dispose();
        self.unlisten_double_click();
        set_touch_action(&self.canvas, "auto");
    }
}

const DOUBLE_CLICK: &str = "dblclick";

fn double_click_at(offset_x: i32, offset_y: i32) -> InputEvent {
    InputEvent::DoubleClick {
        x: offset_x as f32,
        y: offset_y as f32,
    }
}

fn set_touch_action(canvas: &web_sys::HtmlCanvasElement, value: &str) {
    let element: &web_sys::HtmlElement = canvas.as_ref();
    let _ = element.style().set_property("touch-action", value);
}

// ── Asset loading ────────────────────────────────────────────────────────

/// Loads binary glTF (`.glb`) over `fetch`. Text `.gltf` files referencing
/// external buffers are not resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchLoader;

impl AssetLoader for FetchLoader {
    fn load(
        &self,
        source: &str,
    ) -> impl Future<Output = Result<SceneFragment, LoadError>> {
        let url = source.to_owned();
        async move {
            let bytes = fetch_bytes(&url).await?;
            load_slice(&bytes)
        }
    }
}

fn js_error(e: JsValue) -> LoadError {
    LoadError::Network(format!("{e:?}"))
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let window = web_sys::window()
        .ok_or_else(|| LoadError::Unsupported("no browser window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_error)?;
    let response: web_sys::Response = response.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(LoadError::Network(format!(
            "HTTP {} fetching {url}",
            response.status()
        )));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Load `url` in the background and hand the result to `done` on the main
/// thread.
pub fn spawn_load(
    url: &str,
    done: impl FnOnce(Result<SceneFragment, LoadError>) + 'static,
) {
    let url = url.to_owned();
    wasm_bindgen_futures::spawn_local(async move {
        done(FetchLoader.load(&url).await);
    });
}
