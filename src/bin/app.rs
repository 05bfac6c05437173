use adapter::database::connect_database_with;
use anyhow::{Context, Result};
use api::{model::roster::read_users_csv, route::v1};
use registry::AppRegistry;
use shared::{
    config::{AppConfig, SeedConfig},
    env::{which, Environment},
};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::{
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

// 起動時に名簿 CSV があれば取り込んでおく
async fn seed_users(registry: &AppRegistry, seed: &SeedConfig) -> Result<()> {
    let Some(path) = &seed.users_csv else {
        return Ok(());
    };
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    let rows = read_users_csv(file)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let summary = registry.user_repository().import(rows).await?;
    tracing::info!(
        added = summary.new_users_added,
        skipped = summary.skipped_rows,
        "seeded users from {}",
        path.display()
    );
    for message in &summary.messages {
        tracing::warn!("{message}");
    }
    Ok(())
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let db = connect_database_with(&app_config.ledger);
    let registry = AppRegistry::new(db, &app_config)?;

    seed_users(&registry, &app_config.seed).await?;

    let app = v1::routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let host: IpAddr = app_config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid SERVER_HOST: {}", app_config.server.host))?;
    let addr = SocketAddr::new(host, app_config.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        locations = app_config.ledger.locations.len(),
        admission = %app_config.ledger.admission,
        "Listening on {}",
        addr
    );
    axum::serve(listener, app)
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,error.message = %e, "Unexpected error"
            )
        })
}
