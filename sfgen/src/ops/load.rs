//! Load operation - description file and configuration layers to a module.

use std::path::{Path, PathBuf};

use sfgen_codegen::block_comment;
use sfgen_model::{Config, ConfigLayer, Module, ModuleDescription, PROJECT_CONFIG_FILE, Result};

/// Options for loading a module.
pub struct LoadOptions<'a> {
    /// Module description file.
    pub description: &'a Path,
    /// Explicit project configuration file.
    pub project_config: Option<&'a Path>,
    /// Values given on the command line.
    pub overrides: ConfigLayer,
    /// Prelude text used when the description has none.
    pub prelude: Option<&'a str>,
}

/// A validated module and the configuration it renders under.
#[derive(Debug)]
pub struct Loaded {
    pub module: Module,
    pub config: Config,
}

/// Load and validate a module description.
///
/// Configuration layers apply in order: defaults, project file,
/// the description's `[config]` table, command-line overrides.
pub fn load(opts: LoadOptions) -> Result<Loaded> {
    let base = match project_config_path(opts.description, opts.project_config) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using project configuration");
            Config::load(&path)?
        }
        None => Config::default(),
    };

    let description = ModuleDescription::from_file(opts.description)?;
    let config = base.with_overrides(description.config.clone(), opts.overrides)?;

    let mut builder = description.to_builder()?;
    builder.strict_includes(config.strict_includes);
    if description.prelude.is_none() {
        if let Some(text) = opts.prelude {
            builder.prelude(block_comment(text));
        }
    }
    let module = builder.build()?;

    Ok(Loaded { module, config })
}

/// The explicit project file, or `sfgen.toml` beside the description.
fn project_config_path(description: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = description
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(PROJECT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}
