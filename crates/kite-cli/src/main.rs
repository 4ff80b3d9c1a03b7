use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use kite_cli::{commands, AuthMethodArg, OutputFormat, ScopeArg};

#[derive(Parser)]
#[command(name = "kite")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Synthetic authenticated page-load testing",
    long_about = "Kite simulates an authenticated page load end to end: it synthesizes a \
                  resource waterfall and API session for a target URL, aggregates the \
                  telemetry, grades the result, and suggests fixes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a test session against a target URL
    Run {
        /// Target page URL
        #[arg(long)]
        url: String,

        /// Authentication method to simulate
        #[arg(long, value_enum, default_value_t = AuthMethodArg::Memberstack)]
        auth_method: AuthMethodArg,

        /// Authentication token to inject
        #[arg(long)]
        token: String,

        /// Override the method's default token name
        #[arg(long)]
        token_name: Option<String>,

        /// What the simulated session covers
        #[arg(long, value_enum, default_value_t = ScopeArg::FullPage)]
        scope: ScopeArg,

        /// Seed for deterministic generation
        #[arg(long)]
        seed: Option<u64>,

        /// Delay between pipeline steps in milliseconds
        #[arg(long, default_value_t = 400)]
        pacing_ms: u64,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            url,
            auth_method,
            token,
            token_name,
            scope,
            seed,
            pacing_ms,
            output,
        } => {
            commands::run::execute(
                &url,
                auth_method.into(),
                &token,
                token_name,
                scope.into(),
                seed,
                pacing_ms,
                output,
                cli.format,
            )
            .await
        }
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("kite=debug,kite_core=debug,kite_synth=debug,kite_runner=debug")
    } else {
        EnvFilter::new("kite=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
