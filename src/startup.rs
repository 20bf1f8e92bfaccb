use crate::shutdown;
use schedule_assistant::components::SchedulingAssistant;
use schedule_assistant::config::Config;
use schedule_assistant::error::{config_error, Error};
use schedule_assistant::set_ui_locale;
use schedule_assistant::web::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config; missing or malformed secrets stop startup
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the web app and serve it until shutdown
pub async fn start_server(config: Config) -> miette::Result<()> {
    if set_ui_locale(&config.locale) {
        info!("Setting locale to {}", config.locale);
    } else {
        warn!("Unknown locale {}, keeping the default", config.locale);
    }

    let assistant = Arc::new(SchedulingAssistant::from_config(&config));
    let state = AppState::new(assistant, &config.locale);
    let app = router(state, config.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| config_error(&format!("Invalid listen address: {}", e)))?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
