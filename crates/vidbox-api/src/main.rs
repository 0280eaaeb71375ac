mod auth;
mod error;
mod handlers;
mod services;
mod setup;
mod state;
mod telemetry;
mod utils;

use vidbox_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    telemetry::init();

    let config = Config::from_env()?;

    // Initialize the application (database, storage, routes)
    let (state, router) = setup::initialize_app(config).await?;

    // Start the server
    setup::server::start_server(&state.config, router).await?;

    Ok(())
}
