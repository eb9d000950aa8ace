//! Rendering and output configuration.
//!
//! Configuration is assembled from layers: built-in defaults, an optional
//! project file (`sfgen.toml`), the `[config]` table of a module
//! description, and finally command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result, identifier::parse_namespace_path};

/// Name of the optional project-level configuration file.
pub const PROJECT_CONFIG_FILE: &str = "sfgen.toml";

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Fully-qualified scope wrapping the whole module, e.g. `a::b`.
    pub root_namespace: Option<String>,
    /// Token used for no-alias pointer parameters. `None` writes the
    /// qualifier directly.
    pub restrict_macro_name: Option<String>,
    /// Macro prefixed to kernel definitions. `None` disables the prefix.
    pub func_prefix_macro_name: Option<String>,
    pub header_extension: String,
    pub impl_extension: String,
    pub output_directory: PathBuf,
    /// Fail on body includes the module does not declare.
    pub strict_includes: bool,
    /// Mark kernel, class and function sections in the definition text.
    pub section_comments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_width: 2,
            root_namespace: None,
            restrict_macro_name: Some("RESTRICT".to_string()),
            func_prefix_macro_name: Some("FUNC_PREFIX".to_string()),
            header_extension: "h".to_string(),
            impl_extension: "cpp".to_string(),
            output_directory: PathBuf::from("."),
            strict_includes: false,
            section_comments: false,
        }
    }
}

/// One layer of configuration. Unset keys defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub indent_width: Option<usize>,
    pub root_namespace: Option<String>,
    pub restrict_macro_name: Option<String>,
    pub func_prefix_macro_name: Option<String>,
    pub header_extension: Option<String>,
    pub impl_extension: Option<String>,
    pub output_directory: Option<PathBuf>,
    pub strict_includes: Option<bool>,
    pub section_comments: Option<bool>,
}

impl ConfigLayer {
    /// Parse a layer from TOML text.
    pub fn from_toml_str(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::parse(e, content, filename))
    }

    /// Read a layer from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Stack `upper` on top of this layer.
    pub fn merge(self, upper: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            indent_width: upper.indent_width.or(self.indent_width),
            root_namespace: upper.root_namespace.or(self.root_namespace),
            restrict_macro_name: upper.restrict_macro_name.or(self.restrict_macro_name),
            func_prefix_macro_name: upper.func_prefix_macro_name.or(self.func_prefix_macro_name),
            header_extension: upper.header_extension.or(self.header_extension),
            impl_extension: upper.impl_extension.or(self.impl_extension),
            output_directory: upper.output_directory.or(self.output_directory),
            strict_includes: upper.strict_includes.or(self.strict_includes),
            section_comments: upper.section_comments.or(self.section_comments),
        }
    }

    /// Fail if a key set here disagrees with the same key in `overrides`.
    pub fn check_conflicts(&self, overrides: &ConfigLayer) -> Result<()> {
        fn check<T: PartialEq + std::fmt::Debug>(
            key: &str,
            found: &Option<T>,
            requested: &Option<T>,
        ) -> Result<()> {
            match (found, requested) {
                (Some(found), Some(requested)) if found != requested => {
                    Err(Box::new(Error::ConfigConflict {
                        key: key.to_string(),
                        found: format!("{:?}", found),
                        requested: format!("{:?}", requested),
                    }))
                }
                _ => Ok(()),
            }
        }

        check("indent_width", &self.indent_width, &overrides.indent_width)?;
        check("root_namespace", &self.root_namespace, &overrides.root_namespace)?;
        check(
            "restrict_macro_name",
            &self.restrict_macro_name,
            &overrides.restrict_macro_name,
        )?;
        check(
            "func_prefix_macro_name",
            &self.func_prefix_macro_name,
            &overrides.func_prefix_macro_name,
        )?;
        check(
            "header_extension",
            &self.header_extension,
            &overrides.header_extension,
        )?;
        check("impl_extension", &self.impl_extension, &overrides.impl_extension)?;
        check(
            "output_directory",
            &self.output_directory,
            &overrides.output_directory,
        )?;
        check(
            "strict_includes",
            &self.strict_includes,
            &overrides.strict_includes,
        )?;
        check(
            "section_comments",
            &self.section_comments,
            &overrides.section_comments,
        )
    }
}

impl Config {
    /// Defaults with the project file at `path` applied.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let layer = ConfigLayer::from_file(path)?;
        Config::default().merge(layer)
    }

    /// Apply a layer on top of this configuration.
    pub fn merge(mut self, layer: ConfigLayer) -> Result<Self> {
        if let Some(width) = layer.indent_width {
            self.indent_width = width;
        }
        if let Some(root) = layer.root_namespace {
            self.root_namespace = non_empty(root);
        }
        if let Some(name) = layer.restrict_macro_name {
            self.restrict_macro_name = non_empty(name);
        }
        if let Some(name) = layer.func_prefix_macro_name {
            self.func_prefix_macro_name = non_empty(name);
        }
        if let Some(ext) = layer.header_extension {
            self.header_extension = strip_dot(&ext);
        }
        if let Some(ext) = layer.impl_extension {
            self.impl_extension = strip_dot(&ext);
        }
        if let Some(dir) = layer.output_directory {
            self.output_directory = dir;
        }
        if let Some(strict) = layer.strict_includes {
            self.strict_includes = strict;
        }
        if let Some(sections) = layer.section_comments {
            self.section_comments = sections;
        }
        self.validate()?;
        Ok(self)
    }

    /// Apply a module description's layer, then command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigConflict`] if the description sets a key to a
    /// different value than the command line explicitly requests.
    pub fn with_overrides(self, description: ConfigLayer, cli: ConfigLayer) -> Result<Self> {
        description.check_conflicts(&cli)?;
        self.merge(description.merge(cli))
    }

    /// The wrapping scope, split into validated segments.
    pub fn root_scope(&self) -> Result<Vec<String>> {
        match &self.root_namespace {
            Some(root) => parse_namespace_path(root),
            None => Ok(Vec::new()),
        }
    }

    /// File naming for a module with the given stem.
    pub fn output_spec(&self, basename: impl Into<String>) -> OutputSpec {
        OutputSpec {
            output_directory: self.output_directory.clone(),
            basename: basename.into(),
            header_extension: self.header_extension.clone(),
            impl_extension: self.impl_extension.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        self.root_scope()?;
        for (key, ext) in [
            ("header_extension", &self.header_extension),
            ("impl_extension", &self.impl_extension),
        ] {
            if ext.is_empty() {
                return Err(Error::invalid_identifier(
                    ext.as_str(),
                    key,
                    "file extension cannot be empty",
                ));
            }
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn strip_dot(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

/// Where and under what names a module's pair of files is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub output_directory: PathBuf,
    pub basename: String,
    pub header_extension: String,
    pub impl_extension: String,
}

impl OutputSpec {
    /// `<basename>.<header_extension>`, as referenced by the definition text.
    pub fn header_filename(&self) -> String {
        format!("{}.{}", self.basename, self.header_extension)
    }

    pub fn impl_filename(&self) -> String {
        format!("{}.{}", self.basename, self.impl_extension)
    }

    pub fn header_path(&self) -> PathBuf {
        self.output_directory.join(self.header_filename())
    }

    pub fn impl_path(&self) -> PathBuf {
        self.output_directory.join(self.impl_filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(toml: &str) -> ConfigLayer {
        ConfigLayer::from_toml_str(toml, "test.toml").unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.restrict_macro_name.as_deref(), Some("RESTRICT"));
        assert_eq!(config.func_prefix_macro_name.as_deref(), Some("FUNC_PREFIX"));
        assert!(config.root_scope().unwrap().is_empty());
    }

    #[test]
    fn test_merge_strips_dots_and_disables_prefix() {
        let config = Config::default()
            .merge(layer(
                r#"
header_extension = ".hpp"
impl_extension = "cc"
func_prefix_macro_name = ""
root_namespace = "demo::sub"
"#,
            ))
            .unwrap();
        assert_eq!(config.header_extension, "hpp");
        assert_eq!(config.impl_extension, "cc");
        assert_eq!(config.func_prefix_macro_name, None);
        assert_eq!(config.root_scope().unwrap(), ["demo", "sub"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ConfigLayer::from_toml_str("indent = 4", "sfgen.toml").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_invalid_root_namespace_rejected() {
        let err = Config::default()
            .merge(layer(r#"root_namespace = "demo::1bad""#))
            .unwrap_err();
        assert!(matches!(*err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_upper_layer_wins() {
        let merged = layer("indent_width = 4\nsection_comments = true")
            .merge(layer("indent_width = 8"));
        assert_eq!(merged.indent_width, Some(8));
        assert_eq!(merged.section_comments, Some(true));
    }

    #[test]
    fn test_cli_conflict_detected() {
        let description = layer("indent_width = 4");
        let cli = ConfigLayer {
            indent_width: Some(3),
            ..Default::default()
        };
        let err = Config::default()
            .with_overrides(description, cli)
            .unwrap_err();
        match *err {
            Error::ConfigConflict {
                key,
                found,
                requested,
            } => {
                assert_eq!(key, "indent_width");
                assert_eq!(found, "4");
                assert_eq!(requested, "3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_matching_values_do_not_conflict() {
        let cli = ConfigLayer {
            indent_width: Some(4),
            strict_includes: Some(true),
            ..Default::default()
        };
        let config = Config::default()
            .with_overrides(layer("indent_width = 4"), cli)
            .unwrap();
        assert_eq!(config.indent_width, 4);
        assert!(config.strict_includes);
    }

    #[test]
    fn test_load_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, "indent_width = 4\noutput_directory = \"gen\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.output_directory, PathBuf::from("gen"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/sfgen.toml").unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_output_spec_paths() {
        let config = Config {
            output_directory: PathBuf::from("out"),
            ..Default::default()
        };
        let spec = config.output_spec("grid");
        assert_eq!(spec.header_filename(), "grid.h");
        assert_eq!(spec.impl_path(), PathBuf::from("out/grid.cpp"));
        assert_eq!(spec.header_path(), PathBuf::from("out/grid.h"));
    }
}
