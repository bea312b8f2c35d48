use std::fmt;

/// Why the viewer could not get a GPU surface to draw on.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window handle could not back a surface.
    NoSurface(wgpu::CreateSurfaceError),
    /// No adapter can present to the window surface.
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter refused the WebGL2-level limits the mesh pass needs.
    NoDevice(wgpu::RequestDeviceError),
    /// The adapter offered no usable surface format.
    SurfaceFormat,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSurface(e) => write!(f, "cannot draw to window: {e}"),
            Self::NoAdapter(e) => write!(f, "no GPU can present here: {e}"),
            Self::NoDevice(e) => write!(f, "GPU device unavailable: {e}"),
            Self::SurfaceFormat => f.write_str("window surface has no format"),
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoSurface(e) => Some(e),
            Self::NoAdapter(e) => Some(e),
            Self::NoDevice(e) => Some(e),
            Self::SurfaceFormat => None,
        }
    }
}

/// Device, queue and the window surface the model is presented on.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Upload and submit queue.
    pub queue: wgpu::Queue,
    /// Presented each frame.
    pub surface: wgpu::Surface<'static>,
    /// Swapchain setup; `width`/`height` track the window in physical
    /// pixels.
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Open a vsynced surface on `window`. A zero-sized window is treated
    /// as 1x1 until the first resize.
    ///
    /// # Errors
    ///
    /// Fails when no adapter or device can present to the window.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        (width, height): (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::NoSurface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::NoAdapter)?;
        log::info!("using adapter {}", adapter.get_info().name);

        // Flat-shaded meshes fit in WebGL2 limits; only texture size
        // follows the adapter.
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orbit-view"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::NoDevice)?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(RenderContextError::SurfaceFormat)?;
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Color target format for pipelines.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Follow a window resize. Minimized (zero-sized) windows keep the old
    /// swapchain.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Rebuild the swapchain after `Lost` / `Outdated`.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Next swapchain image.
    ///
    /// # Errors
    ///
    /// Passes through [`wgpu::SurfaceError`]; the mesh renderer decides
    /// which ones to recover from.
    pub fn acquire_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Encoder for one frame.
    #[must_use]
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mesh frame"),
            })
    }

    /// Finish and queue `encoder`.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_surface_format_has_no_source() {
        let e = RenderContextError::SurfaceFormat;
        assert_eq!(e.to_string(), "window surface has no format");
        assert!(std::error::Error::source(&e).is_none());
    }
}
