//! Check operation - validate and render without writing.

use std::path::Path;

use eyre::{Context, Result};
use sfgen_codegen::render;

use super::{emit::diagnostics, load::Loaded};
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// The module is rendered in memory so that configuration problems
/// surface here rather than on the next emit.
pub fn check(loaded: &Loaded, description_path: &Path) -> Result<CheckReport> {
    let pair = render(&loaded.module, &loaded.config).wrap_err("Validation failed")?;
    let (warnings, infos) = diagnostics(&loaded.module);

    Ok(CheckReport {
        description_path: description_path.to_path_buf(),
        module: loaded.module.name().to_string(),
        artifact_count: loaded.module.artifact_count(),
        header: pair.header_filename(),
        implementation: pair.impl_filename(),
        warnings,
        infos,
    })
}
