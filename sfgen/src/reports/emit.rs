//! Emit command report data structures.

use std::path::PathBuf;

use sfgen_core::WriteResult;

use super::output::{Output, Report};

/// Report data from an emit run.
#[derive(Debug)]
pub struct EmitSummary {
    /// Module name.
    pub module: String,
    /// Number of emitted artifacts.
    pub artifact_count: usize,
    /// Warning diagnostics from the module builder.
    pub warnings: Vec<String>,
    /// Informational diagnostics from the module builder.
    pub infos: Vec<String>,
    pub outcome: EmitOutcome,
}

/// Files written, or a dry-run preview.
#[derive(Debug)]
pub enum EmitOutcome {
    Written(Vec<WrittenFile>),
    Preview(Vec<PreviewFile>),
}

#[derive(Debug)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub result: WriteResult,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: PathBuf,
    pub content: String,
}

impl Report for EmitSummary {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        match &self.outcome {
            EmitOutcome::Written(files) => self.render_written(out, files),
            EmitOutcome::Preview(files) => self.render_preview(out, files),
        }
    }
}

impl EmitSummary {
    fn render_written(&self, out: &mut dyn Output, files: &[WrittenFile]) {
        out.key_value(
            "Module",
            &format!("{} ({} artifacts)", self.module, self.artifact_count),
        );
        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }
        out.newline();

        out.section("Files");
        for file in files {
            let path = file.path.display().to_string();
            match file.result {
                WriteResult::Written => out.added_item(&path),
                WriteResult::Unchanged => out.list_item(&format!("{} (unchanged)", path)),
                WriteResult::Skipped => out.list_item(&format!("{} (skipped)", path)),
            }
        }
    }

    fn render_preview(&self, out: &mut dyn Output, files: &[PreviewFile]) {
        for file in files {
            out.divider(&file.path.display().to_string());
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", files.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::tests::Recorded;

    fn summary(outcome: EmitOutcome) -> EmitSummary {
        EmitSummary {
            module: "scale".into(),
            artifact_count: 2,
            warnings: vec!["module 'scale' has no artifacts; emitting empty files".into()],
            infos: vec![],
            outcome,
        }
    }

    #[test]
    fn test_written_marks_unchanged_files() {
        let report = summary(EmitOutcome::Written(vec![
            WrittenFile {
                path: "out/scale.h".into(),
                result: WriteResult::Written,
            },
            WrittenFile {
                path: "out/scale.cpp".into(),
                result: WriteResult::Unchanged,
            },
        ]));
        let mut out = Recorded::default();
        report.render(&mut out);

        assert_eq!(out.lines[0], "warning: module 'scale' has no artifacts; emitting empty files");
        assert!(out.lines.contains(&"  + out/scale.h".to_string()));
        assert!(out.lines.contains(&"  - out/scale.cpp (unchanged)".to_string()));
    }

    #[test]
    fn test_preview_counts_files() {
        let report = summary(EmitOutcome::Preview(vec![PreviewFile {
            path: "scale.h".into(),
            content: "#pragma once".into(),
        }]));
        let mut out = Recorded::default();
        report.render(&mut out);

        assert_eq!(out.lines[1], "── scale.h ──");
        assert_eq!(out.lines.last().unwrap(), "1 files would be generated");
    }
}
