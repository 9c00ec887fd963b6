//! Postgres wiring: connection pool, schema bootstrap, and value conversions
//! shared by the Postgres-backed stores.
//!
//! Money and quantities are unsigned in the domain and `BIGINT` in the
//! database; conversions are checked in both directions.

pub use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;

use crate::error::StoreError;

/// Idempotent schema statements, applied in order at startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT        NOT NULL,
        description TEXT        NOT NULL DEFAULT '',
        image       TEXT        NOT NULL DEFAULT '',
        price       BIGINT      NOT NULL CHECK (price >= 0),
        quantity    BIGINT      NOT NULL CHECK (quantity >= 0),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id          BIGSERIAL PRIMARY KEY,
        user_id     BIGINT      NOT NULL,
        total_price BIGINT      NOT NULL CHECK (total_price >= 0),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        order_id   BIGINT  NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
        line_no    INTEGER NOT NULL,
        product_id BIGINT  NOT NULL,
        quantity   BIGINT  NOT NULL CHECK (quantity > 0),
        unit_price BIGINT  NOT NULL CHECK (unit_price >= 0),
        PRIMARY KEY (order_id, line_no)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS orders_user_id_idx ON orders (user_id)",
];

/// Open a connection pool.
#[instrument(skip(url), err)]
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create tables and indexes that do not exist yet.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    tracing::info!(statements = SCHEMA.len(), "database schema ensured");
    Ok(())
}

pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::storage(
                operation,
                format!("database error (code {code}): {}", db_err.message()),
            )
        }
        sqlx::Error::PoolClosed => StoreError::storage(operation, "connection pool closed"),
        sqlx::Error::PoolTimedOut => StoreError::storage(operation, "connection pool timed out"),
        other => StoreError::storage(operation, other.to_string()),
    }
}

pub(crate) fn to_db(operation: &'static str, value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::storage(operation, format!("value {value} exceeds BIGINT")))
}

pub(crate) fn from_db(operation: &'static str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::storage(operation, format!("negative value {value} in row")))
}
