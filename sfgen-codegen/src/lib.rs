//! Rendering and emission for the sfgen source file generator.
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`render`] - Declaration and definition streams of a module
//! - [`emit`] - The emission driver and idempotent writing
//! - [`testing`] - Test utilities (feature-gated)

pub mod builder;
mod comment;
pub mod emit;
pub mod render;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use comment::{block_comment, doc_lines};
pub use emit::{EmissionDriver, EmitReport, EmittedPair, FileOutcome, render};
pub use render::Renderer;
