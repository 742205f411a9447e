mod cmd;
mod output;

use clap::{Parser, Subcommand};

use tokenwatch_core::config::Config;
use tokenwatch_core::lifecycle::LifecycleAction;

#[derive(Parser)]
#[command(
    name = "tokenwatch",
    about = "Operator inventory of vault token accessors — inspect, renew, and revoke tracked tokens",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of every tracked token
    List,

    /// Renew the token behind an accessor by the configured increment
    Renew {
        accessor: String,
        /// Override the configured renewal increment, in hours
        #[arg(
            long,
            value_parser = clap::value_parser!(u64)
                .range(1..=tokenwatch_core::config::MAX_RENEW_INCREMENT_HOURS)
        )]
        increment_hours: Option<u64>,
    },

    /// Revoke the token behind an accessor
    Revoke { accessor: String },

    /// Start the web UI server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
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
        .init();

    let result = match Config::from_env() {
        Ok(config) => run(&cli, &config),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    match &cli.command {
        Commands::List => cmd::list::run(config, cli.json),
        Commands::Renew {
            accessor,
            increment_hours,
        } => cmd::action::run(
            config,
            LifecycleAction::Renew,
            accessor,
            *increment_hours,
            cli.json,
        ),
        Commands::Revoke { accessor } => {
            cmd::action::run(config, LifecycleAction::Revoke, accessor, None, cli.json)
        }
        Commands::Serve { port } => cmd::serve::run(config, *port),
    }
}
