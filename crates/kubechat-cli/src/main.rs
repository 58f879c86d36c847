mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kubechat",
    about = "Interactive kubectl command builder for chat platforms",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, short = 'c', global = true, env = "KUBECHAT_CONFIG", default_value = "kubechat.yaml")]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interaction HTTP server
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,
    },

    /// Render a single interaction request and print the resulting message
    Render {
        /// Request JSON file, or `-` for stdin
        #[arg(long, default_value = "-")]
        request: PathBuf,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve { port } => cmd::serve::run(&cli.config, port),
        Commands::Render { request } => cmd::render::run(&cli.config, &request),
        Commands::Config { subcommand } => cmd::config::run(&cli.config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
