use clap::{Parser, Subcommand};

mod commands;

use commands::{AnalyzeArgs, CyclesArgs};

#[derive(Parser)]
#[command(name = "launch-cycle")]
#[command(about = "Does launching in a bull or bear market predict a token's long-term return?", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over a token dataset
    Analyze(AnalyzeArgs),
    /// Print the configured market cycle table as JSON
    Cycles(CyclesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => {
            commands::run_analyze(args).await?;
        }
        Commands::Cycles(args) => {
            commands::run_cycles(args)?;
        }
    }

    Ok(())
}
