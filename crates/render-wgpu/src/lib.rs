//! wgpu render backend for the ocean grid.
//!
//! Builds one triangle-list pipeline with depth testing, uploads the static
//! mesh once, and redraws it each frame under the camera's view/projection
//! transforms.
//!
//! # Invariants
//! - The renderer never mutates the camera or the mesh.
//! - Depth testing is scoped to the render pass; no render state survives
//!   across frames.

mod gpu;
mod shaders;

pub use gpu::{GridRenderer, RenderError};
