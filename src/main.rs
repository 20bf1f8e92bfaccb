mod shutdown;
mod startup;

use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting scheduling assistant");

    // Load configuration
    let config = startup::load_config()?;

    // Serve until a shutdown signal arrives
    startup::start_server(config).await
}
