/// Taskboard server entry point
///
/// Loads `.env` if present, reads configuration from the environment and
/// starts the HTTP server:
/// - Project and task API at /api/projects/*, /api/tasks/*
/// - CSV bulk transfer at /api/admin/*
/// - Health check at /healthz

use taskboard::{config::Config, server::start_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
