use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use pension_core::store::{IN_MEMORY, RESULTS_KEY, USER_INPUT_KEY, decode_entry, encode_entry};
use pension_core::{CalculationStore, LastCalculation, ScenarioResult, StoreError, UserInput};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const UPSERT_ENTRY: &str = "INSERT INTO key_value (key, value, updated_at) VALUES (?, ?, ?)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens a store from a bare connection string: a file path, created if
    /// missing, or `:memory:` for a private in-memory database.
    pub async fn open(connection_string: &str) -> Result<Self> {
        let pool = if connection_string == IN_MEMORY {
            // Every connection to `sqlite::memory:` is its own database, so
            // keep exactly one alive.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
        } else {
            let options = SqliteConnectOptions::new()
                .filename(connection_string)
                .create_if_missing(true);
            SqlitePoolOptions::new().connect_with(options).await
        }
        .with_context(|| format!("Failed to open database: {}", connection_string))?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Database(format!("Failed to parse timestamp '{}': {}", s, e)))
}

#[async_trait]
impl CalculationStore for SqliteStore {
    async fn save_last_calculation(
        &self,
        input: &UserInput,
        results: &[ScenarioResult],
    ) -> Result<(), StoreError> {
        let input = encode_entry(input)?;
        let results = encode_entry(results)?;
        let now = Utc::now().format(TIMESTAMP_FORMAT).to_string();

        let mut tx = self.pool.begin().await.map_err(database_error)?;
        for (key, value) in [(USER_INPUT_KEY, &input), (RESULTS_KEY, &results)] {
            sqlx::query(UPSERT_ENTRY)
                .bind(key)
                .bind(value)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(database_error)?;
        }
        tx.commit().await.map_err(database_error)?;

        debug!(bytes = input.len() + results.len(), "saved last calculation");
        Ok(())
    }

    async fn load_last_calculation(&self) -> Result<LastCalculation, StoreError> {
        let rows = sqlx::query("SELECT key, value FROM key_value WHERE key IN (?, ?)")
            .bind(USER_INPUT_KEY)
            .bind(RESULTS_KEY)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        let mut input_raw = None;
        let mut results_raw = None;
        for row in rows {
            let key: String = row.try_get("key").map_err(database_error)?;
            let value: String = row.try_get("value").map_err(database_error)?;
            match key.as_str() {
                USER_INPUT_KEY => input_raw = Some(value),
                RESULTS_KEY => results_raw = Some(value),
                _ => {}
            }
        }

        Ok(LastCalculation {
            user_input: decode_entry(USER_INPUT_KEY, input_raw.as_deref()),
            results: decode_entry(RESULTS_KEY, results_raw.as_deref()),
        })
    }

    async fn clear_last_calculation(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM key_value WHERE key IN (?, ?)")
            .bind(USER_INPUT_KEY)
            .bind(RESULTS_KEY)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(())
    }

    async fn last_saved_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT MAX(updated_at) FROM key_value WHERE key IN (?, ?)")
                .bind(USER_INPUT_KEY)
                .bind(RESULTS_KEY)
                .fetch_one(&self.pool)
                .await
                .map_err(database_error)?;

        raw.as_deref().map(parse_timestamp).transpose()
    }
}
