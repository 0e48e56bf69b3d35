use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use storegate::{
    api::routes::build_app,
    auth::jwt::AuthService,
    cli::{output::Output, Cli, Commands},
    db::{DatabaseProvider, DeadlineClient},
    utils::toml_config::LogFormat,
    AppState, StoregateConfig,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already carry the secret
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Config { validate }) => show_config(&cli, &output, validate),
        Some(Commands::Serve) | None => serve(&cli, &output).await,
    }
}

fn show_config(cli: &Cli, output: &Output, validate: bool) -> anyhow::Result<()> {
    let config = match StoregateConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output.failure(&e.to_string());
            return Err(e.into());
        }
    };

    output.config_summary(&cli.config, &config);

    if validate {
        // load() already validated; reaching here means the file is usable
        output.config_valid();
    }

    Ok(())
}

async fn serve(cli: &Cli, output: &Output) -> anyhow::Result<()> {
    let config = StoregateConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    init_tracing(&config);
    output.banner();

    let secret = config.jwt_secret()?;
    let auth_service = AuthService::new(secret, config.auth.token_ttl_secs());

    let provider = DatabaseProvider::from_url(&config.database.url);
    let client = provider
        .create_client()
        .await
        .map_err(|e| anyhow::anyhow!("failed to open database: {e}"))?;
    let db = DeadlineClient::new(Arc::from(client), config.database.timeout());
    info!(url = %config.database.url, timeout = ?config.database.timeout(), "database ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server.host / server.port")?;

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
        auth_service: Arc::new(auth_service),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    output.listening(addr);
    info!(%addr, "server started");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully shutdown");
    Ok(())
}

fn init_tracing(config: &StoregateConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.server.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
