mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::VimSession;
use application::{CheckError, CheckService};
use config::Config;
use interface::cli::{self, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the plugin output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("check_vsphere={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::resolve(args) {
        Ok(config) => config,
        Err(e) => {
            let e = CheckError::from(e);
            eprintln!("{}", e);
            eprintln!("Try 'check_vsphere --help' for more information.");
            return ExitCode::from(e.exit_code());
        }
    };

    info!("check_vsphere v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);
    info!("Endpoint: {}", config.endpoint);

    match check(&config).await {
        Ok(report) => {
            println!("{}", cli::render(&report, config.format));
            ExitCode::from(report.state.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            println!("{}", cli::render_error(&e, config.format));
            ExitCode::from(e.exit_code())
        }
    }
}

async fn check(config: &Config) -> Result<application::CheckReport, CheckError> {
    let session = VimSession::login(
        &config.endpoint,
        &config.username,
        config.password.expose(),
        &config.session,
    )
    .await?;

    CheckService::new(Arc::new(session)).run(config).await
}
