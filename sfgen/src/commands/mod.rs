mod check;
mod completions;
mod emit;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use emit::EmitCommand;
use eyre::Result;

/// Extension trait for exiting on model errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for sfgen_model::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "sfgen")]
#[command(version)]
#[command(about = "Generate paired C++ header and implementation files")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Emit(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a module description and write the header/implementation pair
    Emit(EmitCommand),

    /// Validate a module description without writing anything
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Arguments shared by commands that load a module description.
#[derive(Args)]
pub(crate) struct DescriptionArgs {
    /// Module description (TOML, or JSON by extension)
    pub description: PathBuf,

    /// Project configuration file (defaults to sfgen.toml next to the description)
    #[arg(long)]
    pub project_config: Option<PathBuf>,

    /// Wrap the whole module in this namespace, e.g. `demo::sub`
    #[arg(long)]
    pub root_namespace: Option<String>,

    /// Spaces per nesting level
    #[arg(long)]
    pub indent_width: Option<usize>,

    /// Fail when a body requires an include the module does not declare
    #[arg(long)]
    pub strict_includes: bool,
}

impl DescriptionArgs {
    /// Configuration values given explicitly on the command line.
    ///
    /// `--strict-includes` only counts when present, so leaving it off
    /// never conflicts with a description that enables it.
    pub fn overrides(&self) -> sfgen_model::ConfigLayer {
        sfgen_model::ConfigLayer {
            root_namespace: self.root_namespace.clone(),
            indent_width: self.indent_width,
            strict_includes: self.strict_includes.then_some(true),
            ..Default::default()
        }
    }
}
