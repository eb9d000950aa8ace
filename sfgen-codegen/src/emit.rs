//! Emission driver: render a module and hand the pair to the file writer.

use std::path::PathBuf;

use eyre::{Context, Result};
use sfgen_core::{File, WriteResult};
use sfgen_model::{Config, Module, OutputSpec};

use crate::render::Renderer;

/// The rendered declaration and definition texts of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedPair {
    /// Header text.
    pub declaration: String,
    /// Implementation text.
    pub definition: String,
    /// Where the pair goes.
    pub output: OutputSpec,
}

impl EmittedPair {
    pub fn header_filename(&self) -> String {
        self.output.header_filename()
    }

    pub fn impl_filename(&self) -> String {
        self.output.impl_filename()
    }

    /// The two files to write, header first.
    pub fn files(&self) -> [File; 2] {
        [
            File::new(self.output.header_path(), self.declaration.clone()),
            File::new(self.output.impl_path(), self.definition.clone()),
        ]
    }
}

/// Render a module under a configuration.
///
/// The result depends only on `module` and `config`.
///
/// # Errors
///
/// Fails only if `config` names an invalid root namespace.
pub fn render(module: &Module, config: &Config) -> sfgen_model::Result<EmittedPair> {
    let renderer = Renderer::new(config)?;
    let pair = EmittedPair {
        declaration: renderer.declaration(module),
        definition: renderer.definition(module),
        output: config.output_spec(module.name()),
    };
    tracing::debug!(
        module = module.name(),
        declaration_bytes = pair.declaration.len(),
        definition_bytes = pair.definition.len(),
        "rendered module"
    );
    Ok(pair)
}

/// Outcome of writing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: WriteResult,
}

/// Outcome of writing a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    pub header: FileOutcome,
    pub implementation: FileOutcome,
}

impl EmitReport {
    /// Number of files actually written.
    pub fn written_count(&self) -> usize {
        [&self.header, &self.implementation]
            .iter()
            .filter(|f| f.result.is_written())
            .count()
    }
}

/// Renders modules and writes them, skipping byte-identical files.
#[derive(Debug, Clone, Default)]
pub struct EmissionDriver {
    config: Config,
}

impl EmissionDriver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render without touching the filesystem.
    pub fn render(&self, module: &Module) -> sfgen_model::Result<EmittedPair> {
        render(module, &self.config)
    }

    /// Write a rendered pair.
    ///
    /// Each file is left untouched when its content is already identical.
    /// I/O failures are returned as-is, without retrying.
    pub fn write(&self, pair: &EmittedPair) -> Result<EmitReport> {
        let [header, implementation] = pair.files();
        let outcome = |file: File| -> Result<FileOutcome> {
            let result = file.write()?;
            tracing::debug!(path = %file.path().display(), ?result, "write finished");
            Ok(FileOutcome {
                path: file.path().to_path_buf(),
                result,
            })
        };
        Ok(EmitReport {
            header: outcome(header)?,
            implementation: outcome(implementation)?,
        })
    }

    /// Render and write a module.
    pub fn emit(&self, module: &Module) -> Result<EmitReport> {
        let pair = self
            .render(module)
            .wrap_err_with(|| format!("failed to render module '{}'", module.name()))?;
        self.write(&pair)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use sfgen_model::{Function, Identifier, KernelBody};
    use tempfile::TempDir;

    use super::*;

    fn module() -> Module {
        let mut builder = Module::builder("pair");
        builder
            .add_function(
                Function::new(Identifier::parse("demo::run").unwrap())
                    .body(KernelBody::new("return;")),
            )
            .unwrap();
        builder.build().unwrap()
    }

    fn driver(dir: &TempDir) -> EmissionDriver {
        EmissionDriver::new(Config {
            output_directory: dir.path().to_path_buf(),
            ..Default::default()
        })
    }

    #[test]
    fn test_emit_writes_both_files() {
        let temp = TempDir::new().unwrap();
        let report = driver(&temp).emit(&module()).unwrap();

        assert_eq!(report.written_count(), 2);
        assert_eq!(report.header.path, temp.path().join("pair.h"));
        let definition = fs::read_to_string(temp.path().join("pair.cpp")).unwrap();
        assert!(definition.starts_with("#include \"pair.h\"\n"));
    }

    #[test]
    fn test_second_emit_is_unchanged() {
        let temp = TempDir::new().unwrap();
        let driver = driver(&temp);
        driver.emit(&module()).unwrap();

        let report = driver.emit(&module()).unwrap();
        assert_eq!(report.header.result, WriteResult::Unchanged);
        assert_eq!(report.implementation.result, WriteResult::Unchanged);
        assert_eq!(report.written_count(), 0);
    }

    #[test]
    fn test_changed_definition_rewrites_only_that_file() {
        let temp = TempDir::new().unwrap();
        let driver = driver(&temp);
        driver.emit(&module()).unwrap();

        let mut pair = driver.render(&module()).unwrap();
        pair.definition.push_str("// extra\n");
        let report = driver.write(&pair).unwrap();

        assert_eq!(report.header.result, WriteResult::Unchanged);
        assert_eq!(report.implementation.result, WriteResult::Written);
    }

    #[test]
    fn test_invalid_root_namespace_fails_render() {
        let config = Config {
            root_namespace: Some("1bad".to_string()),
            ..Default::default()
        };
        assert!(render(&module(), &config).is_err());
    }

    #[test]
    fn test_custom_extensions() {
        let config = Config {
            header_extension: "hpp".to_string(),
            impl_extension: "cc".to_string(),
            ..Default::default()
        };
        let pair = render(&module(), &config).unwrap();
        assert_eq!(pair.header_filename(), "pair.hpp");
        assert_eq!(pair.impl_filename(), "pair.cc");
        assert!(pair.definition.starts_with("#include \"pair.hpp\"\n"));
    }
}
