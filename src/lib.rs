// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]
#![warn(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
// Test code may unwrap and panic freely
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! Orbit-camera controls for 3D viewers, with a small glTF model viewer
//! built on top.
//!
//! The controller keeps a camera on a sphere around a target point and
//! turns pointer, wheel, touch and keyboard input into rotation, dolly and
//! panning, with optional damping and auto-rotation.
//!
//! # Key entry points
//!
//! - [`controls::OrbitControls`] - the controller; feed it
//!   [`input::InputEvent`]s and call `update` once per frame
//! - [`camera::OrbitState`] - the underlying spherical state machine
//! - [`options::Options`] - camera, controller and display configuration
//!   with TOML presets
//! - [`stage::Stage`] - controls, scene and a [`stage::Rasterizer`] wired
//!   into a frame loop
//! - [`asset::GltfLoader`] - glTF / GLB loading into
//!   [`scene::SceneFragment`]s
//!
//! # Features
//!
//! - `viewer` - wgpu mesh renderer and the winit [`Viewer`] window
//! - `remote` - load assets over HTTP(S)
//! - `web` - DOM listener bindings and a `fetch` asset loader

pub mod asset;
pub mod camera;
pub mod controls;
pub mod error;
#[cfg(feature = "viewer")]
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod scene;
pub mod stage;
#[cfg(feature = "viewer")]
mod viewer;
#[cfg(feature = "web")]
pub mod web;

pub use asset::{AssetLoader, GltfLoader, LoadError};
pub use camera::{Camera, Projection};
pub use controls::OrbitControls;
pub use error::OrbitError;
pub use input::InputEvent;
pub use options::Options;
pub use stage::{Rasterizer, Stage};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
