//! Presentation-surface contract between the frame driver and a backend.
//!
//! # Invariants
//! - A surface receives the view transform, the projection transform, and
//!   the static mesh; it never mutates either.
//! - Depth testing applies for the duration of one `present` call only; no
//!   render state leaks across frames.

mod surface;

pub use surface::{DebugTextSurface, FrameTransforms, PresentationSurface};
