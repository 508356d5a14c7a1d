use metaclean_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under large uploads.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, engine, routes)
    let (_state, router) = metaclean_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    metaclean_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
