//! Prints the market cycle table the analysis would use.

use anyhow::{Context, Result};
use clap::Args;
use launch_cycle_core::ConfigLoader;

/// Arguments for the cycles command.
#[derive(Args, Debug, Clone)]
pub struct CyclesArgs {
    /// Analysis config file (TOML); defaults apply if it does not exist
    #[arg(short, long, default_value = "config/Analysis.toml")]
    pub config: String,
}

pub fn run_cycles(args: CyclesArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config))?;

    tracing::info!("{} cycles configured", config.cycles.len());
    println!("{}", serde_json::to_string_pretty(&config.cycles)?);
    Ok(())
}
