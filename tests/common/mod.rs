use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use plantcare_api::database::provision;

/// Connect to the database named by TEST_DATABASE_URL and make sure both
/// service schemas exist. Returns `None` when the variable is unset so the
/// suite skips cleanly on machines without Postgres.
pub async fn test_pool() -> Result<Option<PgPool>> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => return Ok(None),
    };

    let pool = PgPoolOptions::new().max_connections(5).connect(&url).await?;
    provision::provision_delegates(&pool, false).await?;
    provision::provision_plants(&pool, false).await?;
    provision::provision_reminders(&pool, false).await?;
    Ok(Some(pool))
}

/// Fresh owner id per test so suites never see each other's rows.
pub fn unique_owner(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
