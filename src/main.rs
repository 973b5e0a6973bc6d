//! Zene - session timer service for Pomodoro focus and meditation
//!
//! This is the main entry point for the zene application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use zene::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::TimerHandle,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("zene={},tower_http=info", config.log_level()))
        .init();

    info!("Starting zene v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, profile={:?}, auto_continue={}",
          config.host, config.port, config.profile, config.auto_continue);
    match &config.backend_url {
        Some(url) => info!("Recording completed intervals to {}", url),
        None => info!("No backend configured, completed intervals will only be logged"),
    }

    // Start the session timer task
    let timer = TimerHandle::spawn(config.timer_options(), config.recorder());
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer            - Current timer state");
    info!("  GET  /timer/presets    - Duration presets per mode");
    info!("  POST /timer/start      - Start or resume the countdown");
    info!("  POST /timer/pause      - Pause the countdown");
    info!("  POST /timer/reset      - Rewind the current interval");
    info!("  POST /timer/reset-all  - Rewind the whole Pomodoro session");
    info!("  POST /timer/duration   - Select a duration preset");
    info!("  POST /timer/mode       - Switch mode");
    info!("  GET  /events           - Timer event stream");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
