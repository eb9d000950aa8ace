//! Emit operation - render a loaded module and write or preview it.

use eyre::{Context, Result};
use sfgen_codegen::EmissionDriver;
use sfgen_model::Severity;

use super::load::Loaded;
use crate::reports::{EmitOutcome, EmitSummary, PreviewFile, WrittenFile};

/// Execute the emit operation.
pub fn emit(loaded: Loaded, dry_run: bool) -> Result<EmitSummary> {
    let Loaded { module, config } = loaded;

    let (warnings, infos) = diagnostics(&module);
    let driver = EmissionDriver::new(config);
    let pair = driver
        .render(&module)
        .wrap_err_with(|| format!("Failed to render module '{}'", module.name()))?;

    let outcome = if dry_run {
        EmitOutcome::Preview(vec![
            PreviewFile {
                path: pair.output.header_path(),
                content: pair.declaration.clone(),
            },
            PreviewFile {
                path: pair.output.impl_path(),
                content: pair.definition.clone(),
            },
        ])
    } else {
        let report = driver.write(&pair).wrap_err("Failed to write generated files")?;
        tracing::info!(
            module = module.name(),
            written = report.written_count(),
            "emission finished"
        );
        EmitOutcome::Written(
            [report.header, report.implementation]
                .into_iter()
                .map(|f| WrittenFile {
                    path: f.path,
                    result: f.result,
                })
                .collect(),
        )
    };

    Ok(EmitSummary {
        module: module.name().to_string(),
        artifact_count: module.artifact_count(),
        warnings,
        infos,
        outcome,
    })
}

/// Split module diagnostics into (warnings, infos).
pub(crate) fn diagnostics(module: &sfgen_model::Module) -> (Vec<String>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut infos = Vec::new();
    for diag in module.diagnostics() {
        let text = match &diag.location {
            Some(loc) => format!("{} ({})", diag.message, loc),
            None => diag.message.clone(),
        };
        match diag.severity {
            Severity::Warning => warnings.push(text),
            Severity::Info => infos.push(text),
        }
    }
    (warnings, infos)
}
