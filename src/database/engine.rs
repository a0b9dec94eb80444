//! DuckDB-based database engine
//!
//! Attaches the configured relational store read-only as `source_db` and
//! runs queries against it through an in-memory DuckDB connection.

use crate::config::{mask_uri, DbType, RelationalStoreConfig};
use crate::error::{Error, Result};
use duckdb::Connection;

/// Database query engine using DuckDB
pub struct DatabaseEngine {
    /// DuckDB connection
    pub(super) conn: Connection,
    /// Database type
    db_type: DbType,
    /// Connection string used (for logging)
    connection_string: String,
}

impl DatabaseEngine {
    /// Open DuckDB and attach the configured database
    pub fn connect(config: &RelationalStoreConfig) -> Result<Self> {
        let db_type = config.engine;

        let conn = Connection::open_in_memory().map_err(|e| {
            Error::unavailable(
                db_type.to_string(),
                format!("Failed to create DuckDB connection: {e}"),
            )
        })?;

        let connection_string = Self::build_connection_string(config)?;

        let engine = Self {
            conn,
            db_type,
            connection_string,
        };

        engine.attach_database()?;

        tracing::info!("Attached {} ({})", db_type, engine.connection_info());

        Ok(engine)
    }

    /// Build connection string from config
    pub(super) fn build_connection_string(config: &RelationalStoreConfig) -> Result<String> {
        if let Some(conn_str) = &config.connection_string {
            return Ok(conn_str.clone());
        }

        match config.engine {
            DbType::Postgres => {
                let host = config.host.as_deref().unwrap_or("localhost");
                let user = config.user.as_deref().unwrap_or("postgres");
                let password = config.password.as_deref().unwrap_or_default();
                let database = config.database.as_deref().unwrap_or("postgres");
                let port = config.port.unwrap_or(5432);

                Ok(format!(
                    "postgresql://{user}:{password}@{host}:{port}/{database}?sslmode={}",
                    config.ssl_mode
                ))
            }
            // File-backed engines use database as file path
            DbType::Sqlite | DbType::Duckdb => config
                .database
                .clone()
                .ok_or_else(|| Error::missing_field("relational_store.connection_string")),
        }
    }

    /// Attach external database to DuckDB
    fn attach_database(&self) -> Result<()> {
        let target = self.connection_string.replace('\'', "''");

        let sql = match self.db_type {
            DbType::Postgres => format!(
                "INSTALL postgres; LOAD postgres; ATTACH '{target}' AS source_db (TYPE POSTGRES, READ_ONLY);"
            ),
            DbType::Sqlite => format!(
                "INSTALL sqlite; LOAD sqlite; ATTACH '{target}' AS source_db (TYPE SQLITE, READ_ONLY);"
            ),
            DbType::Duckdb => format!("ATTACH '{target}' AS source_db (READ_ONLY);"),
        };

        self.conn.execute_batch(&sql).map_err(|e| {
            Error::unavailable(
                self.db_type.to_string(),
                format!("Failed to attach {}: {e}", self.connection_info()),
            )
        })
    }

    /// Test database connection
    pub fn check_connection(&self) -> Result<()> {
        let query = match self.db_type {
            DbType::Postgres => "SELECT 1 FROM source_db.pg_catalog.pg_tables LIMIT 1",
            DbType::Sqlite => "SELECT 1 FROM source_db.sqlite_master LIMIT 1",
            DbType::Duckdb => {
                "SELECT 1 FROM information_schema.schemata WHERE catalog_name = 'source_db' LIMIT 1"
            }
        };

        self.conn.execute(query, []).map_err(|e| {
            Error::unavailable(
                self.db_type.to_string(),
                format!("Connection check failed: {e}"),
            )
        })?;

        Ok(())
    }

    /// Get database type
    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    /// Get connection string (for logging - password masked)
    pub fn connection_info(&self) -> String {
        mask_uri(&self.connection_string)
    }
}
