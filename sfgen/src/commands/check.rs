use clap::Args;
use eyre::Result;

use super::{DescriptionArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: DescriptionArgs,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let loaded = ops::load(ops::LoadOptions {
            description: &self.args.description,
            project_config: self.args.project_config.as_deref(),
            overrides: self.args.overrides(),
            prelude: None,
        })
        .unwrap_or_exit();

        let report = ops::check(&loaded, &self.args.description)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
