//! GPU resources for the native viewer.
//!
//! Provides wgpu device/surface initialization, growable geometry buffers
//! and the flat-lit mesh rasterizer.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Flat-lit triangle rasterizer implementing [`crate::stage::Rasterizer`].
pub mod mesh_renderer;
/// Bind-group and pipeline construction helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth attachment.
pub mod texture;

pub use mesh_renderer::MeshRenderer;
pub use render_context::{RenderContext, RenderContextError};
