//! Core utilities for the sfgen source file generator.
//!
//! This crate owns the boundary to the filesystem: generated files,
//! the rules for (re)writing them, and the result of a write.

mod file;

pub use file::{File, FileRules, Overwrite, WriteResult};
