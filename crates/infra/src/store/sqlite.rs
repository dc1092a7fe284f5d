//! SQLite-backed durable store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use super::r#trait::{DurableStore, StoreError};

/// SQLite key-value store (`kv_store` table).
///
/// Cheap to clone; clones share one lazily-opened pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteStore {
    /// Create a store for the database file at `path` (lazy initialization).
    ///
    /// The file and its parent directory are created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    async fn ensure_initialized(&self) -> anyhow::Result<SqlitePool> {
        let mut pool_guard = self.pool.lock().await;
        if let Some(pool) = pool_guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create store directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        // One connection: writes are already serialized by the engine.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite store at {:?}", self.path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key       TEXT PRIMARY KEY,
                value     TEXT NOT NULL,
                saved_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_store table")?;

        tracing::debug!(path = ?self.path, "sqlite store initialized");

        *pool_guard = Some(pool.clone());
        Ok(pool)
    }

    async fn load_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        let pool = self.ensure_initialized().await?;

        let row = sqlx::query(
            r#"
            SELECT value
            FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&pool)
        .await
        .with_context(|| format!("failed to load key '{key}'"))?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn save_value(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let pool = self.ensure_initialized().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to save key '{key}'"))?;

        Ok(())
    }

    async fn remove_value(&self, key: &str) -> anyhow::Result<()> {
        let pool = self.ensure_initialized().await?;

        sqlx::query(
            r#"
            DELETE FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to remove key '{key}'"))?;

        Ok(())
    }
}

fn backend(err: anyhow::Error) -> StoreError {
    StoreError::Backend(format!("{err:#}"))
}

#[async_trait]
impl DurableStore for SqliteStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.load_value(key).await.map_err(backend)
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.save_value(key, value).await.map_err(backend)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.remove_value(key).await.map_err(backend)
    }
}

/// Resolve the default database path: `{app_data_dir}/stocktake/store.db`.
pub fn default_store_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("stocktake");
    path.push("store.db");
    Ok(path)
}
