use dotenvy::dotenv;
use expense_tracker::{
    api,
    config::{self, database, seed::load_seed_config},
    core::seed::seed_hierarchy,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: expense-tracker [serve | seed <username> | reset]";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Dispatch the requested command
    let args: Vec<String> = env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["serve"] => api::run_server(&app_config, db).await?,
        ["seed", username] => {
            let seed = load_seed_config(&app_config.seed_file)?;
            let summary = seed_hierarchy(&db, username, &seed).await?;
            info!(
                "Seeded {} heads, {} categories, {} subcategories for {}",
                summary.heads_created,
                summary.categories_created,
                summary.subcategories_created,
                username
            );
        }
        ["reset"] => {
            database::reset_database(&db).await?;
            info!("Database reset complete.");
        }
        _ => {
            error!("{}", USAGE);
            return Err(Error::Config {
                message: USAGE.to_string(),
            });
        }
    }

    Ok(())
}
