//! One-time provisioning of the service database and schemas, the Rust
//! counterpart of the old init-rds script.

use clap::Parser;

use plantcare_api::config;
use plantcare_api::database::{self, provision};

#[derive(Parser)]
#[command(name = "provision")]
#[command(about = "Create the plantcare database and provision its schemas")]
#[command(version)]
struct Cli {
    /// Database to create and provision
    #[arg(long, default_value = "plantcare_db")]
    database: String,

    /// Drop and recreate the schemas (destroys all rows)
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = &config::config().database;

    // Administrative connection for create-database, then a pool on the
    // target database for the schema DDL. Each is closed before moving on.
    let admin_pool = database::connect("postgres", settings).await?;
    provision::create_database_if_missing(&admin_pool, &cli.database).await?;
    admin_pool.close().await;

    let pool = database::connect(&cli.database, settings).await?;
    provision::provision_delegates(&pool, cli.reset).await?;
    provision::provision_plants(&pool, cli.reset).await?;
    provision::provision_reminders(&pool, cli.reset).await?;
    pool.close().await;

    println!("Provisioned {}", cli.database);
    Ok(())
}
