use actix_web::HttpServer;
use log::{info, warn};

use st_api::app::{build_state, create_app};
use st_api::config::Config;
use st_core::repositories::InMemoryIdentityDirectory;
use st_shared::Environment;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables, the environment-specific file first
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize logger
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.app.logging.level.as_str()),
    );

    info!(
        "Starting session token service ({} environment)",
        config.app.environment
    );

    let identities = config.load_identities()?;
    if identities.is_empty() {
        warn!("Identity directory is empty; every login will be rejected");
    } else {
        info!("Loaded {} identities", identities.len());
    }
    let directory = InMemoryIdentityDirectory::with_principals(identities);

    let state = build_state(&config.app, directory)?;

    let bind_address = config.app.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.app.server.workers > 0 {
        server = server.workers(config.app.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    Ok(())
}
