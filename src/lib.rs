// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
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
// Complexity limits (clippy default thresholds)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
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
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive point-cloud viewer for a cubic sample lattice, built on wgpu.
//!
//! A fixed lattice of points is uploaded once and drawn as a point cloud.
//! Holding any pointer button and moving orbits the camera around the
//! origin at a fixed radius; every accepted move re-uploads the view matrix
//! and redraws.
//!
//! # Key entry points
//!
//! - [`MandelbulbEngine`] - startup sequence, drag handling and drawing,
//!   generic over [`gpu::GpuBackend`]
//! - [`gpu::WgpuBackend`] - the wgpu implementation of the backend
//! - [`lattice::generate`] - the sample lattice
//! - [`camera::OrbitCamera`] - drag accumulator and eye position
//! - [`options::Options`] - TOML-backed configuration
//! - `Viewer` - standalone winit window (`viewer` feature)

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod lattice;
pub mod options;
pub mod renderer;
pub mod shaders;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{command::CameraCommand, MandelbulbEngine};
pub use error::MandelbulbError;
pub use input::{InputEvent, InputProcessor, MouseButton};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
