mod api;
mod http_client;
mod model;
mod ops;
mod store;
mod ui;

use std::sync::Arc;

use clap::Parser;

use api::{HttpTokenApi, TokenApi};
use model::arg::{Args, Command};
use model::config::Config;
use ops::{BatchDelays, TokenController};
use ui::{AutoConfirm, ConfirmGate, ConsoleGate, ConsoleNotifier, ConsoleProgress, ConsoleRenderer};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path).unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {}", e);
        std::process::exit(1);
    });
    tracing::debug!("Config loaded from {:?}", config.config_path());

    // Command line overrides
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(access_token) = args.access_token {
        config.access_token = Some(access_token);
    }

    let access_token = config.access_token.clone().unwrap_or_else(|| {
        tracing::error!("accessToken not set in config file (or pass --access-token)");
        std::process::exit(1);
    });

    let client = http_client::build_client(&config).unwrap_or_else(|e| {
        tracing::error!("Failed to build HTTP client: {}", e);
        std::process::exit(1);
    });

    let api = HttpTokenApi::new(client, config.effective_base_url(), access_token);

    let gate: Box<dyn ConfirmGate> = if args.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(ConsoleGate)
    };

    let mut controller = TokenController::new(
        api,
        Arc::new(ConsoleProgress::new()),
        gate,
        Box::new(ConsoleNotifier),
        Box::new(ConsoleRenderer::new()),
        BatchDelays::default(),
    );

    if let Err(e) = run(&mut controller, args.command, args.yes).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run<A: TokenApi>(
    controller: &mut TokenController<A>,
    command: Command,
    yes: bool,
) -> anyhow::Result<()> {
    if !controller.load().await? {
        anyhow::bail!("Admin access token rejected by the backend");
    }

    match command {
        Command::List => controller.render(),
        Command::TestAll => controller.test_all().await,
        Command::DisableLow => controller.disable_low_quota().await,
        Command::EnableEligible => controller.enable_eligible(yes).await,
        Command::Cleanup => controller.cleanup_problematic().await,
    }

    Ok(())
}
