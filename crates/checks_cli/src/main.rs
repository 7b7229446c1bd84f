mod commands;
mod output;

use anyhow::Result;
use checks_compiler::{CompileJob, DEFAULT_CONTRACT, DEFAULT_MODEL, DEFAULT_OUTPUT, DEFAULT_TABLE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dcc")]
#[command(version, about = "Data contract to SodaCL check compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one model of a contract into a SodaCL checks file
    Generate {
        /// Path to the contract file (YAML or TOML)
        #[arg(short, long, env = "DCC_CONTRACT", default_value = DEFAULT_CONTRACT)]
        contract: PathBuf,

        /// Name of the model to compile
        #[arg(short, long, env = "DCC_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// Output file (.yml, .yaml or .json), overwritten if present
        #[arg(short, long, env = "DCC_OUTPUT", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Table identifier used in the `checks for <table>` key
        #[arg(short, long, env = "DCC_TABLE", default_value = DEFAULT_TABLE)]
        table: String,
    },

    /// Compile several models, from a TOML job manifest or the default pair
    Batch {
        /// Job manifest (TOML); runs the default jobs when omitted
        #[arg(short, long)]
        jobs: Option<PathBuf>,
    },

    /// List the models of a contract and the checks they would produce
    Inspect {
        /// Path to the contract file (YAML or TOML)
        #[arg(short, long, env = "DCC_CONTRACT", default_value = DEFAULT_CONTRACT)]
        contract: PathBuf,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Generate {
            contract,
            model,
            output,
            table,
        } => {
            let job = CompileJob {
                contract,
                model,
                table,
                output,
            };
            commands::generate::execute(&job).await
        }

        Commands::Batch { jobs } => commands::batch::execute(jobs.as_deref()).await,

        Commands::Inspect { contract, format } => {
            commands::inspect::execute(&contract, &format).await
        }
    }
}
