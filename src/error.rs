//! Crate-level error types.

use std::fmt;

use crate::asset::LoadError;
#[cfg(feature = "viewer")]
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the orbit-view crate.
#[derive(Debug)]
pub enum OrbitError {
    /// Failed to load a model.
    AssetLoad(LoadError),
    /// GPU context initialization failure.
    #[cfg(feature = "viewer")]
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for OrbitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetLoad(e) => write!(f, "asset load error: {e}"),
            #[cfg(feature = "viewer")]
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for OrbitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AssetLoad(e) => Some(e),
            #[cfg(feature = "viewer")]
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) | Self::Viewer(_) => None,
        }
    }
}

impl From<LoadError> for OrbitError {
    fn from(e: LoadError) -> Self {
        Self::AssetLoad(e)
    }
}

#[cfg(feature = "viewer")]
impl From<RenderContextError> for OrbitError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for OrbitError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn load_errors_keep_their_source() {
        let err = OrbitError::from(LoadError::Empty);
        assert!(err.to_string().starts_with("asset load error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_errors_have_no_source() {
        let err = OrbitError::OptionsParse("bad key".into());
        assert_eq!(err.to_string(), "options parse error: bad key");
        assert!(err.source().is_none());
    }
}
