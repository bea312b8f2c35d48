//! Render-surface harness.
//!
//! A [`Stage`] owns the [`OrbitControls`], the accumulated
//! [`SceneFragment`] and a [`Rasterizer`]. Each [`Stage::frame`] integrates
//! pending controller input before anything is drawn.

use crate::asset::{AssetLoader, LoadError};
use crate::camera::Camera;
use crate::controls::OrbitControls;
use crate::input::InputEvent;
use crate::options::Options;
use crate::picking::{raycast, Hit};
use crate::scene::SceneFragment;

/// Draws the scene for a camera. Implemented by the wgpu mesh renderer and
/// by test doubles.
pub trait Rasterizer {
    /// Resize the drawing surface in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Replace the drawn geometry.
    fn set_scene(&mut self, scene: &SceneFragment);

    /// Draw one frame from `camera`.
    fn draw(&mut self, camera: &Camera);
}

/// Controls, scene and rasterizer wired into a frame loop.
#[derive(Debug)]
pub struct Stage<R> {
    controls: OrbitControls,
    scene: SceneFragment,
    rasterizer: Option<R>,
    size: (u32, u32),
    animating: bool,
}

impl<R: Rasterizer> Stage<R> {
    /// Stage around existing controls. Nothing is drawn until
    /// [`Stage::mount`].
    #[must_use]
    pub fn new(controls: OrbitControls) -> Self {
        Self {
            controls,
            scene: SceneFragment::new(),
            rasterizer: None,
            size: (1, 1),
            animating: false,
        }
    }

    /// Stage with a camera and controls built from `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let camera = options.camera.build_camera(1.0);
        let controls = OrbitControls::new(
            camera,
            options.camera.target(),
            options.controls.clone(),
        );
        Self::new(controls)
    }

    /// Attach a rasterizer and start animating. `make` only runs on the
    /// first call; later calls just resume. Returns true when a rasterizer
    /// was created.
    pub fn mount(&mut self, make: impl FnOnce() -> R) -> bool {
        self.animating = true;
        if self.rasterizer.is_some() {
            return false;
        }
        let mut rasterizer = make();
        rasterizer.resize(self.size.0, self.size.1);
        rasterizer.set_scene(&self.scene);
        self.rasterizer = Some(rasterizer);
        log::debug!("stage mounted at {}x{}", self.size.0, self.size.1);
        true
    }

    /// Resume drawing on an already mounted stage. Returns false when
    /// nothing is mounted yet.
    pub fn resume(&mut self) -> bool {
        self.animating = self.rasterizer.is_some();
        self.animating
    }

    /// Whether a rasterizer is attached.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.rasterizer.is_some()
    }

    /// Whether [`Stage::frame`] currently draws.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Stop drawing until the next [`Stage::mount`].
    pub fn pause(&mut self) {
        self.animating = false;
    }

    /// Propagate a surface size to the camera aspect, the controller
    /// viewport and the rasterizer.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        self.size = (width, height);
        self.controls
            .camera_mut()
            .set_aspect(width as f32 / height as f32);
        self.controls.set_viewport(width as f32, height as f32);
        if let Some(rasterizer) = &mut self.rasterizer {
            rasterizer.resize(width, height);
        }
    }

    /// Surface size in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Integrate pending input, then draw. Returns false when paused or
    /// not yet mounted.
    pub fn frame(&mut self) -> bool {
        if !self.animating {
            return false;
        }
        let Some(rasterizer) = &mut self.rasterizer else {
            return false;
        };
        let _ = self.controls.update();
        rasterizer.draw(self.controls.camera());
        true
    }

    /// Merge geometry into the scene.
    pub fn add_fragment(&mut self, fragment: SceneFragment) {
        if fragment.is_empty() {
            return;
        }
        log::info!(
            "adding {} meshes ({} triangles)",
            fragment.meshes.len(),
            fragment.triangle_count()
        );
        self.scene.extend(fragment);
        if let Some(rasterizer) = &mut self.rasterizer {
            rasterizer.set_scene(&self.scene);
        }
    }

    /// Merge a load result. Failures are logged and leave the scene
    /// unchanged. Returns true when geometry was added.
    pub fn add_loaded(
        &mut self,
        result: Result<SceneFragment, LoadError>,
    ) -> bool {
        match result {
            Ok(fragment) => {
                self.add_fragment(fragment);
                true
            }
            Err(e) => {
                log::error!("failed to load asset: {e}");
                false
            }
        }
    }

    /// Load `source` with `loader` and merge the result.
    pub async fn load<L: AssetLoader>(
        &mut self,
        loader: &L,
        source: &str,
    ) -> bool {
        let result = loader.load(source).await;
        self.add_loaded(result)
    }

    /// Zoom towards the scene point under a client-space position.
    pub fn double_click(&mut self, x: f32, y: f32) -> Option<Hit> {
        let ray = self.controls.pick_ray(x, y);
        let hit = raycast(&self.scene, &ray)?;
        self.controls.zoom_to_point(hit.point);
        Some(hit)
    }

    /// Route an input event. Returns true when the host should suppress
    /// the platform default.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::DoubleClick { x, y } => {
                self.double_click(*x, *y).is_some()
            }
            InputEvent::Resize { width, height } => {
                self.resize(*width as u32, *height as u32);
                false
            }
            other => self.controls.handle_event(other),
        }
    }

    /// The orbit controller.
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// Mutable controller access.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Geometry merged so far.
    pub fn scene(&self) -> &SceneFragment {
        &self.scene
    }

    /// The mounted rasterizer.
    pub fn rasterizer(&self) -> Option<&R> {
        self.rasterizer.as_ref()
    }

    /// Mutable rasterizer access.
    pub fn rasterizer_mut(&mut self) -> Option<&mut R> {
        self.rasterizer.as_mut()
    }
}
