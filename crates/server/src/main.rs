use anyhow::{Context, Result};
use tracing::info;

use server::{Settings, init_tracing, serve};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env().context("Failed to load settings")?;
    info!(?settings, "Loaded settings");

    serve(settings).await.context("Server stopped with an error")?;
    Ok(())
}
