//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod emit;
mod output;

pub use check::CheckReport;
pub use emit::{EmitOutcome, EmitSummary, PreviewFile, WrittenFile};
pub use output::{Report, TerminalOutput};
