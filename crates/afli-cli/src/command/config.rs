use std::path::PathBuf;

use anyhow::Context;

use crate::{command::ConfigSource, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    #[clap(flatten)]
    source: ConfigSource,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ConfigArg) -> anyhow::Result<()> {
    let ConfigArg { source, output } = arg;
    let config = source.load()?;
    config
        .world
        .validate()
        .context("World configuration is invalid")?;
    config
        .network
        .validate()
        .context("Controller topology is invalid")?;
    config
        .mutation
        .validate()
        .context("Mutation parameters are invalid")?;
    util::save_json(&config, output.as_deref())
}
