//! Asset loading: glTF / GLB files into [`SceneFragment`]s.
//!
//! Decoding is done by the `gltf` crate; this module only flattens the node
//! hierarchy into world-space triangle meshes.

use std::fmt;
use std::future::Future;
use std::path::Path;

use glam::{Mat3, Mat4, Vec3};

use crate::scene::{Mesh, SceneFragment};

/// Why an asset could not be turned into a scene fragment.
#[derive(Debug)]
pub enum LoadError {
    /// Reading the file failed.
    Io(std::io::Error),
    /// Fetching a remote asset failed.
    Network(String),
    /// The bytes are not a valid glTF / GLB asset.
    Parse(String),
    /// The asset decoded but contains no triangles.
    Empty,
    /// The source cannot be loaded in this build (e.g. a URL without the
    /// `remote` feature).
    Unsupported(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Empty => write!(f, "asset contains no triangle meshes"),
            Self::Unsupported(msg) => write!(f, "unsupported source: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<gltf::Error> for LoadError {
    fn from(e: gltf::Error) -> Self {
        match e {
            gltf::Error::Io(e) => Self::Io(e),
            other => Self::Parse(other.to_string()),
        }
    }
}

/// Asynchronously produces scene content from a path or URL.
pub trait AssetLoader {
    /// Load `source`. Failures are reported once to the caller.
    fn load(
        &self,
        source: &str,
    ) -> impl Future<Output = Result<SceneFragment, LoadError>>;
}

/// True for `http://` and `https://` sources.
#[must_use]
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads glTF / GLB assets from disk, or over HTTP with the `remote`
/// feature. Loading blocks the calling thread; the returned future is
/// already complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfLoader;

impl AssetLoader for GltfLoader {
    fn load(
        &self,
        source: &str,
    ) -> impl Future<Output = Result<SceneFragment, LoadError>> {
        std::future::ready(self.load_blocking(source))
    }
}

impl GltfLoader {
    /// Load synchronously.
    pub fn load_blocking(&self, source: &str) -> Result<SceneFragment, LoadError> {
        if is_remote(source) {
            let bytes = fetch(source)?;
            return load_slice(&bytes);
        }
        load_path(Path::new(source))
    }
}

/// Decode a glTF / GLB file, resolving external buffers relative to it.
pub fn load_path(path: &Path) -> Result<SceneFragment, LoadError> {
    let (document, buffers, _images) = gltf::import(path)?;
    let fragment = fragment_from_document(&document, &buffers)?;
    log::info!(
        "Loaded {}: {} meshes, {} triangles",
        path.display(),
        fragment.meshes.len(),
        fragment.triangle_count()
    );
    Ok(fragment)
}

/// Decode an in-memory GLB (or self-contained glTF).
pub fn load_slice(bytes: &[u8]) -> Result<SceneFragment, LoadError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    fragment_from_document(&document, &buffers)
}

#[cfg(feature = "remote")]
fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    log::info!("Downloading {url}...");
    ureq::get(url)
        .call()
        .map_err(|e| LoadError::Network(format!("failed to download {url}: {e}")))?
        .into_body()
        .read_to_vec()
        .map_err(|e| LoadError::Network(format!("failed to read response: {e}")))
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    Err(LoadError::Unsupported(format!(
        "{url} (built without the `remote` feature)"
    )))
}

/// Flatten the default scene (or every mesh, if the asset has no scenes)
/// into world-space meshes.
pub fn fragment_from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<SceneFragment, LoadError> {
    let mut fragment = SceneFragment::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, Mat4::IDENTITY, buffers, &mut fragment);
            }
        }
        None => {
            for mesh in document.meshes() {
                append_mesh(&mesh, Mat4::IDENTITY, buffers, &mut fragment);
            }
        }
    }
    if fragment.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(fragment)
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    fragment: &mut SceneFragment,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, world, buffers, fragment);
    }
    for child in node.children() {
        visit_node(&child, world, buffers, fragment);
    }
}

fn append_mesh(
    mesh: &gltf::Mesh<'_>,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
    fragment: &mut SceneFragment,
) {
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
    for primitive in mesh.primitives() {
        let reader = primitive
            .reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<Vec3> = positions
            .map(|p| transform.transform_point3(Vec3::from(p)))
            .collect();

        let raw: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        let Some(indices) = triangulate(primitive.mode(), &raw) else {
            log::debug!(
                "Skipping {:?} primitive in mesh {}",
                primitive.mode(),
                mesh.index()
            );
            continue;
        };

        let built = match reader.read_normals() {
            Some(normals) => Mesh::with_normals(
                positions,
                normals
                    .map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero())
                    .collect(),
                indices,
            ),
            None => Mesh::new(positions, indices),
        };
        fragment.push(built);
    }
}

/// Convert strip / fan index orders to a plain triangle list. Points and
/// lines have no triangles.
fn triangulate(mode: gltf::mesh::Mode, indices: &[u32]) -> Option<Vec<u32>> {
    use gltf::mesh::Mode;

    let mut out = Vec::with_capacity(indices.len());
    match mode {
        Mode::Triangles => {
            for face in indices.chunks_exact(3) {
                out.extend_from_slice(face);
            }
        }
        Mode::TriangleStrip => {
            for (i, w) in indices.windows(3).enumerate() {
                // Odd triangles flip winding
                if i % 2 == 0 {
                    out.extend_from_slice(&[w[0], w[1], w[2]]);
                } else {
                    out.extend_from_slice(&[w[0], w[2], w[1]]);
                }
            }
        }
        Mode::TriangleFan => {
            if let Some((&hub, rest)) = indices.split_first() {
                for w in rest.windows(2) {
                    out.extend_from_slice(&[hub, w[0], w[1]]);
                }
            }
        }
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => {
            return None;
        }
    }
    Some(out)
}
