use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{DescriptionArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct EmitCommand {
    #[command(flatten)]
    pub args: DescriptionArgs,

    /// Output directory (overrides output_directory from configuration)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the generated pair without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Comment placed at the top of both files when the description has no prelude
    #[arg(long)]
    pub prelude: Option<String>,
}

impl EmitCommand {
    /// Run the emit command
    pub fn run(&self) -> Result<()> {
        let mut overrides = self.args.overrides();
        overrides.output_directory = self.output_dir.clone();

        let loaded = ops::load(ops::LoadOptions {
            description: &self.args.description,
            project_config: self.args.project_config.as_deref(),
            overrides,
            prelude: self.prelude.as_deref(),
        })
        .unwrap_or_exit();

        let summary = ops::emit(loaded, self.dry_run)?;
        summary.render(&mut TerminalOutput::new());

        Ok(())
    }
}
