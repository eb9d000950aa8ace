//! Core operations.
//!
//! Business logic for sfgen commands, separated from argument parsing
//! and report rendering.

pub mod check;
pub mod emit;
pub mod load;

pub use check::check;
pub use emit::emit;
pub use load::{LoadOptions, load};
