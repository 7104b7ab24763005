mod config;
mod display;
mod error;
mod extractors;
mod history;
mod routes;
mod theme;
mod ui;
mod weather;

use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, Mode};
use crate::history::{HistoryLog, RecentSearches};
use crate::ui::{Command, DisplayLoop, TerminalSurface, UiEvent};
use crate::weather::{WeatherService, WeatherSource};

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<dyn WeatherSource>,
    pub history: Arc<HistoryLog>,
    pub recent: Arc<Mutex<RecentSearches>>,
    pub config: Arc<AppConfig>,
}

/// Create the HTTP client used for upstream calls
fn create_http_client(timeout_secs: u64) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .build()
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

async fn run_server(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn run_terminal(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let display = DisplayLoop::new(
        TerminalSurface::stdout(config.color),
        state.weather,
        state.history,
        config.cities.clone(),
        config.recent_limit,
    );

    let events = display.sender();
    events.send(UiEvent::Input(Command::Help))?;
    events.send(UiEvent::Input(Command::Cities))?;
    // Show the default city right away
    events.send(UiEvent::Input(Command::Search(config.default_city.clone())))?;
    let reader = ui::spawn_stdin_reader(events);

    display.run().await;
    reader.abort();

    tracing::info!("Goodbye");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the terminal card on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skycast=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!(mode = ?config.mode, "Configuration loaded successfully");

    let http_client = create_http_client(config.request_timeout_secs)?;
    let weather_service = WeatherService::new(http_client, &config.api_key, &config.base_url);

    let state = AppState {
        weather: Arc::new(weather_service),
        history: Arc::new(HistoryLog::new(&config.history_path, config.history_limit)),
        recent: Arc::new(Mutex::new(RecentSearches::new(config.recent_limit))),
        config: Arc::new(config.clone()),
    };

    match config.mode {
        Mode::Server => run_server(&config, state).await,
        Mode::Terminal => run_terminal(&config, state).await,
    }
}
