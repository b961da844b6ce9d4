use clap::{Args, Parser, Subcommand};
use config::{Config, ConfigError};
use oauth_relay::event::GatewayEvent;
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod observability;

#[derive(Parser)]
#[command(about = "HTTP relays for a helpdesk API and OAuth2 backends")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Relay requests to the helpdesk API
    HelpdeskRelay(ConfigArgs),
    /// Relay OAuth2 authorize and token requests
    OauthRelay(ConfigArgs),
    /// Run a single gateway event through the OAuth relay and print the response
    OauthInvoke(InvokeArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long)]
    config_path: PathBuf,
}

#[derive(Args)]
struct InvokeArgs {
    #[arg(long)]
    config_path: PathBuf,
    /// JSON file holding the gateway event
    #[arg(long)]
    event: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("could not read event: {0}")]
    Event(#[source] std::io::Error),
    #[error("could not set up metrics: {0}")]
    Metrics(#[from] metrics_exporter_statsd::StatsdError),
    #[error(transparent)]
    HelpdeskRelay(#[from] helpdesk_relay::errors::HelpdeskRelayError),
    #[error(transparent)]
    OauthRelay(#[from] oauth_relay::errors::OauthRelayError),
    #[error("could not render response: {0}")]
    Render(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = match &cli.command {
        CliCommand::HelpdeskRelay(args) | CliCommand::OauthRelay(args) => &args.config_path,
        CliCommand::OauthInvoke(args) => &args.config_path,
    };

    let config = match Config::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let sentry_guard = observability::init_sentry(config.sentry_dsn());
    observability::init_logging(sentry_guard.is_some());

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Relay exited");
            ExitCode::FAILURE
        }
    }
}

fn run(command: CliCommand, config: Config) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    match command {
        CliCommand::HelpdeskRelay(_) => {
            let relay_config = config
                .helpdesk_relay
                .ok_or(ConfigError::MissingSection("helpdesk_relay"))?;
            relay_config.validate().map_err(ConfigError::from)?;

            runtime.block_on(async {
                if let Some(metrics) = &config.common.metrics {
                    observability::init_metrics(
                        metrics,
                        &[helpdesk_relay::metrics_defs::ALL_METRICS],
                    )?;
                }
                helpdesk_relay::run(relay_config).await?;
                Ok::<(), CliError>(())
            })
        }
        CliCommand::OauthRelay(_) => {
            let relay_config = config
                .oauth_relay
                .ok_or(ConfigError::MissingSection("oauth_relay"))?;
            relay_config.validate().map_err(ConfigError::from)?;

            runtime.block_on(async {
                if let Some(metrics) = &config.common.metrics {
                    observability::init_metrics(
                        metrics,
                        &[oauth_relay::metrics_defs::ALL_METRICS],
                    )?;
                }
                oauth_relay::run(relay_config).await?;
                Ok::<(), CliError>(())
            })
        }
        CliCommand::OauthInvoke(args) => {
            let relay_config = config
                .oauth_relay
                .ok_or(ConfigError::MissingSection("oauth_relay"))?;
            relay_config.validate().map_err(ConfigError::from)?;

            let raw = std::fs::read(&args.event).map_err(CliError::Event)?;
            let event = GatewayEvent::from_slice(&raw)?;
            let response = runtime.block_on(oauth_relay::invoke(&relay_config, event))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
