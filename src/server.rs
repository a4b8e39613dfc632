//! Server initialization and startup logic for GameHooks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gamehooks_api::{ApiServer, ApiServerConfig, AppState};
use gamehooks_config::{Config, ConfigLoader, ConfigValidator};
use gamehooks_registry::{EndpointStore, HttpDispatcher, StaticEventCatalog, WebhookRegistry};

/// Get the default data directory (`~/.gamehooks`).
pub(crate) fn gamehooks_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".gamehooks"))
        .unwrap_or_else(|| PathBuf::from(".gamehooks"))
}

/// Initialize tracing with console and file output.
///
/// Console logs go to stderr so command output on stdout stays parseable.
/// Log files are written to `<data_dir>/logs/` with daily rotation.
pub(crate) fn init_tracing(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("gamehooks")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load and validate configuration.
///
/// A missing file yields defaults. `data_dir`, when given, relocates the
/// endpoint document to `<data_dir>/webhooks.json`.
pub(crate) fn load_config(
    path: &Path,
    data_dir: Option<&Path>,
) -> Result<Config, Box<dyn std::error::Error>> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
    }
    let mut config = ConfigLoader::load_or_default(path)?;

    if let Some(dir) = data_dir {
        config.storage.path = dir.join("webhooks.json").to_string_lossy().into_owned();
    }

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    Ok(config)
}

/// Wire store, catalog and dispatcher into a registry.
pub(crate) async fn build_registry(
    config: &Config,
) -> Result<Arc<WebhookRegistry>, Box<dyn std::error::Error>> {
    let store_path = config.storage.resolved_path();
    let store = Arc::new(EndpointStore::open(&store_path).await?);
    let catalog = Arc::new(StaticEventCatalog::new(config.catalog.events.clone()));
    let dispatcher = Arc::new(HttpDispatcher::new(&config.dispatch)?);

    info!(
        "Registry ready: {} endpoint(s), {} catalog event(s), store at {}",
        store.len().await,
        catalog.len(),
        store_path.display()
    );

    let registry = WebhookRegistry::new(store, catalog, dispatcher)
        .with_max_in_flight(config.dispatch.max_in_flight)
        .with_max_in_flight_per_endpoint(config.dispatch.max_in_flight_per_endpoint)
        .with_max_queued_per_endpoint(config.dispatch.max_queued_per_endpoint);
    Ok(Arc::new(registry))
}

/// Run the server in foreground.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting GameHooks v{}", env!("CARGO_PKG_VERSION"));

    let registry = build_registry(&config).await?;
    let state = Arc::new(AppState::new(registry));
    let server = ApiServer::new(ApiServerConfig::from_config(&config), state);

    info!("Serving on http://{}{}", server.addr(), config.api.prefix);
    server.run().await?;

    info!("GameHooks stopped");
    Ok(())
}
