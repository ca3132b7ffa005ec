//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    use whiteboard_app::{App, AppConfig};
    use whiteboard_core::WhiteboardConfig;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting Whiteboard");

    let mut config = AppConfig::default();
    if let Ok(path) = std::env::var("WHITEBOARD_CONFIG") {
        match WhiteboardConfig::load(&path) {
            Ok(whiteboard) => {
                log::info!("Loaded config from {}", path);
                config.whiteboard = whiteboard;
            }
            Err(e) => log::warn!("Ignoring config {}: {}", path, e),
        }
    }

    pollster::block_on(App::run_with_config(config));
}

#[cfg(not(feature = "native"))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
}
