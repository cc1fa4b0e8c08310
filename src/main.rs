use std::sync::{Arc, Mutex};
use tracing::{error, info};

use storyreel::config::Config;
use storyreel::session::StoryViewer;
use storyreel::ui::{make_config, App, AppContext};

/// Build the tokio runtime the story services run on
fn create_runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("storyreel-worker")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    // Use RUST_LOG env var if set, otherwise default to info
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load story catalog: {}", e);
            std::process::exit(1);
        }
    };
    info!("Loaded {} stories", catalog.len());

    let runtime = create_runtime();
    let viewer = StoryViewer::new(catalog, config.playback, runtime.handle().clone());

    let context = AppContext {
        config,
        viewer: Arc::new(Mutex::new(viewer)),
    };

    info!("Starting storyreel");
    dioxus::LaunchBuilder::desktop()
        .with_cfg(make_config())
        .with_context(context)
        .launch(App);
}
