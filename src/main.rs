use std::sync::Arc;

use tracing::{error, info};

use learnsync::{ChatHub, Config, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = learnsync::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        learnsync::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("LearnSync chat server");

    let hub = Arc::new(ChatHub::from_config(&config));
    let server = match WebServer::new(&config, hub) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            std::process::exit(1);
        }
    };

    info!("Server configured on {}", server.addr());

    if let Err(e) = server.run().await {
        error!("Web server stopped: {}", e);
        std::process::exit(1);
    }
}
