use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use super::{validate_identifier, GraphStore, Properties};
use crate::config::SqliteConfig;
use crate::error::{StoreError, StoreResult};

/// Static migrator that embeds migrations at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Embedded SQLite property-graph backend
#[derive(Clone)]
pub struct SqliteGraphStore {
    pool: SqlitePool,
}

impl SqliteGraphStore {
    /// Create a new SQLite graph store
    pub async fn new(config: &SqliteConfig) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Connection {
                message: format!("Failed to create database directory: {}", e),
            })?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|e| StoreError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory store (tests, ephemeral runs)
    pub async fn new_in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StoreError::Connection {
                message: format!("Invalid in-memory database URL: {}", e),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection {
                message: format!("Failed to open in-memory database: {}", e),
            })?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run embedded migrations
    async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running graph store migrations...");

        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration {
                message: format!("Failed to run migrations: {}", e),
            })?;

        Ok(())
    }

    /// Get the underlying pool for advanced queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl GraphStore for SqliteGraphStore {
    async fn create_node(&self, label: &str, properties: Properties) -> StoreResult<String> {
        validate_identifier(label)?;

        let store_id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        // Store-assigned values win over caller-supplied ones
        let mut props = properties;
        props.insert("id".to_string(), Value::String(store_id.clone()));
        props.insert("created_at".to_string(), Value::String(created_at.clone()));

        let properties_json =
            serde_json::to_string(&props).map_err(|e| StoreError::Query {
                message: format!("Failed to serialize node properties: {}", e),
            })?;

        sqlx::query(
            r#"
            INSERT INTO graph_nodes (id, label, properties, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&store_id)
        .bind(label)
        .bind(&properties_json)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        debug!(store_id = %store_id, label = %label, "Created graph node");

        Ok(store_id)
    }

    async fn get_node(&self, store_id: &str) -> StoreResult<Option<Properties>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT properties FROM graph_nodes WHERE id = ?")
                .bind(store_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((json,)) => {
                let props: Properties =
                    serde_json::from_str(&json).map_err(|e| StoreError::Query {
                        message: format!("Corrupt node properties for {}: {}", store_id, e),
                    })?;
                Ok(Some(props))
            }
            None => Ok(None),
        }
    }

    async fn create_relationship(
        &self,
        from_id: &str,
        to_id: &str,
        rel_type: &str,
        properties: Properties,
    ) -> StoreResult<bool> {
        validate_identifier(rel_type)?;

        let endpoints: (i64,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM graph_nodes WHERE id = ?)
               AND EXISTS(SELECT 1 FROM graph_nodes WHERE id = ?)
            "#,
        )
        .bind(from_id)
        .bind(to_id)
        .fetch_one(&self.pool)
        .await?;

        if endpoints.0 == 0 {
            debug!(
                from_id = %from_id,
                to_id = %to_id,
                rel_type = %rel_type,
                "Relationship endpoint missing"
            );
            return Ok(false);
        }

        let properties_json =
            serde_json::to_string(&properties).map_err(|e| StoreError::Query {
                message: format!("Failed to serialize relationship properties: {}", e),
            })?;

        sqlx::query(
            r#"
            INSERT INTO graph_relationships (from_id, to_id, rel_type, properties, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (from_id, to_id, rel_type)
            DO UPDATE SET properties = excluded.properties
            "#,
        )
        .bind(from_id)
        .bind(to_id)
        .bind(rel_type)
        .bind(&properties_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(
            from_id = %from_id,
            to_id = %to_id,
            rel_type = %rel_type,
            "Upserted relationship"
        );

        Ok(true)
    }
}
