//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from description validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the description file.
    pub description_path: PathBuf,
    pub module: String,
    pub artifact_count: usize,
    /// Header filename that emit would produce.
    pub header: String,
    /// Implementation filename that emit would produce.
    pub implementation: String,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.infos.is_empty() {
            out.newline();
        }

        out.preformatted(&format!("✓ {} is valid", self.description_path.display()));
        out.newline();
        out.key_value(
            "  module",
            &format!(
                "{} ({} artifact{})",
                self.module,
                self.artifact_count,
                if self.artifact_count == 1 { "" } else { "s" }
            ),
        );
        out.key_value("  outputs", &format!("{}, {}", self.header, self.implementation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::tests::Recorded;

    #[test]
    fn test_check_report_singular_artifact() {
        let report = CheckReport {
            description_path: "scale.toml".into(),
            module: "scale".into(),
            artifact_count: 1,
            header: "scale.h".into(),
            implementation: "scale.cpp".into(),
            warnings: vec![],
            infos: vec![],
        };
        let mut out = Recorded::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "✓ scale.toml is valid".to_string(),
                String::new(),
                "  module: scale (1 artifact)".to_string(),
                "  outputs: scale.h, scale.cpp".to_string(),
            ]
        );
    }
}
