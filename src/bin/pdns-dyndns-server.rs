use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::Parser;
use pdns_dyndns::{
    AppState, SharedState, api,
    config::{AppConfig, SerialTimezone},
    db,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Path to the PowerDNS SQLite database file
    #[arg(long, value_name = "PATH", env = "PDNS_DYNDNS_DB_PATH")]
    db_path: PathBuf,
    /// Listen address for the HTTP server
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:8080", env = "PDNS_DYNDNS_LISTEN")]
    listen: SocketAddr,
    /// Do not apply the bundled schema migrations on startup
    #[arg(long, env = "PDNS_DYNDNS_NO_MIGRATE")]
    no_migrate: bool,
    /// TTL of records created by updates
    #[arg(long, value_name = "SECONDS", default_value_t = 86400, env = "PDNS_DYNDNS_DEFAULT_TTL")]
    default_ttl: u32,
    /// Take the caller address from X-Forwarded-For / X-Real-IP
    #[arg(long, env = "PDNS_DYNDNS_TRUST_FORWARDED_FOR")]
    trust_forwarded_for: bool,
    /// Reject requests without a User-Agent header with `badagent`
    #[arg(long, env = "PDNS_DYNDNS_REQUIRE_USER_AGENT")]
    require_user_agent: bool,
    /// Answer `nochg` when an update did not change anything
    #[arg(long, env = "PDNS_DYNDNS_REPORT_NOCHG")]
    report_nochg: bool,
    /// Calendar for date-based SOA serials: utc, local or an offset like +09:00
    #[arg(long, value_name = "TZ", default_value = "utc", env = "PDNS_DYNDNS_TIMEZONE")]
    timezone: SerialTimezone,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_app_config(&cli)?;
    let state = init_shared_state(&cli, config).await?;

    let app = api::create_router(state);

    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind to {}", cli.listen))?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server exited with error")?;

    Ok(())
}

async fn init_shared_state(cli: &Cli, config: AppConfig) -> Result<SharedState> {
    if let Some(parent) = cli.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create db directory {}", parent.display()))?;
    }

    let db = db::init_db(&cli.db_path, !cli.no_migrate)
        .await
        .with_context(|| format!("failed to open database {}", cli.db_path.display()))?;

    Ok(Arc::new(AppState::new(config, db)))
}

fn build_app_config(cli: &Cli) -> Result<AppConfig> {
    if cli.default_ttl == 0 {
        bail!("--default-ttl must be greater than zero");
    }

    Ok(AppConfig {
        default_ttl: cli.default_ttl,
        trust_forwarded_for: cli.trust_forwarded_for,
        require_user_agent: cli.require_user_agent,
        report_nochg: cli.report_nochg,
        serial_timezone: cli.timezone,
    })
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
