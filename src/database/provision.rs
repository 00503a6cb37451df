//! One-time database and schema provisioning.
//!
//! Concurrent provisioning runs are serialized with an advisory lock around
//! the create-database-if-missing step; everything below that is
//! `IF NOT EXISTS` idempotent.

use sqlx::PgPool;
use tracing::info;

use super::pool::{is_valid_db_name, PoolError};

const DELEGATE_DDL: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    "CREATE SCHEMA IF NOT EXISTS proxys",
    "CREATE TABLE IF NOT EXISTS proxys.proxy_list (
        id            uuid        PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id       text        NOT NULL,
        name          text        NOT NULL,
        start_date    date        NOT NULL,
        end_date      date        NOT NULL,
        phone_number  text        NOT NULL,
        created_at    timestamptz NOT NULL DEFAULT now(),
        updated_at    timestamptz NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_proxy_list_user_id ON proxys.proxy_list (user_id)",
];

const REMINDER_DDL: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    "CREATE SCHEMA IF NOT EXISTS reminders",
    "CREATE TABLE IF NOT EXISTS reminders.reminder_list (
        id          uuid        PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id     text        NOT NULL,
        name        text        NOT NULL,
        notes       text        NULL,
        is_active   boolean     NOT NULL DEFAULT true,
        due_at      timestamptz NOT NULL,
        due_day     integer[]   NOT NULL DEFAULT ARRAY[]::integer[],
        is_proxy    boolean     NOT NULL DEFAULT false,
        proxy       text        NULL,
        created_at  timestamptz NOT NULL DEFAULT now(),
        updated_at  timestamptz NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_reminder_list_user_id ON reminders.reminder_list (user_id)",
];

const PLANT_DDL: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    "CREATE SCHEMA IF NOT EXISTS user_plants",
    "CREATE TABLE IF NOT EXISTS user_plants.user_plant_list (
        id          uuid        PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id     text        NOT NULL,
        s3_id       text        NOT NULL,
        name        text        NOT NULL,
        notes       text        NULL,
        created_at  timestamptz NOT NULL DEFAULT now(),
        updated_at  timestamptz NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_user_plant_list_user_id ON user_plants.user_plant_list (user_id)",
];

/// Create a database unless it already exists. Concurrent callers racing on
/// the same name are serialized by an advisory lock keyed on the name.
pub async fn create_database_if_missing(admin_pool: &PgPool, name: &str) -> Result<(), PoolError> {
    if !is_valid_db_name(name) {
        return Err(PoolError::InvalidDatabaseName(name.to_string()));
    }

    sqlx::query("SELECT pg_advisory_lock(hashtext($1))")
        .bind(name)
        .execute(admin_pool)
        .await?;

    let result = async {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
                .bind(name)
                .fetch_one(admin_pool)
                .await?;

        if !exists {
            info!("Creating database {}", name);
            sqlx::query(&format!("CREATE DATABASE {}", quote_identifier(name)))
                .execute(admin_pool)
                .await?;
        } else {
            info!("Database exists: {}", name);
        }
        Ok::<(), PoolError>(())
    }
    .await;

    // Release the lock on every exit path; a failed unlock must not mask
    // the original error.
    let _ = sqlx::query("SELECT pg_advisory_unlock(hashtext($1))")
        .bind(name)
        .execute(admin_pool)
        .await;

    // A concurrent run can still win the create; duplicate_database is fine.
    match result {
        Err(PoolError::Sqlx(sqlx::Error::Database(ref db))) if db.code().as_deref() == Some("42P04") => {
            Ok(())
        }
        other => other,
    }
}

/// Schema, table and index for the proxy delegate service.
pub async fn provision_delegates(pool: &PgPool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        sqlx::query("DROP SCHEMA IF EXISTS proxys CASCADE")
            .execute(pool)
            .await?;
    }
    run_ddl(pool, DELEGATE_DDL).await?;
    info!("Provisioned proxys.proxy_list");
    Ok(())
}

/// Schema, table and index for the reminder service.
pub async fn provision_reminders(pool: &PgPool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        sqlx::query("DROP SCHEMA IF EXISTS reminders CASCADE")
            .execute(pool)
            .await?;
    }
    run_ddl(pool, REMINDER_DDL).await?;
    info!("Provisioned reminders.reminder_list");
    Ok(())
}

/// Schema, table and index for the user plant service.
pub async fn provision_plants(pool: &PgPool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        sqlx::query("DROP SCHEMA IF EXISTS user_plants CASCADE")
            .execute(pool)
            .await?;
    }
    run_ddl(pool, PLANT_DDL).await?;
    info!("Provisioned user_plants.user_plant_list");
    Ok(())
}

async fn run_ddl(pool: &PgPool, statements: &[&str]) -> Result<(), sqlx::Error> {
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Quote SQL identifier to prevent injection
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
