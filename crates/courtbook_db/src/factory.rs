//! Factory for creating database clients
//!
//! This module provides a factory for creating database clients from the
//! different configuration sources the backend knows about.

use crate::client::DbClient;
use crate::error::DbError;
use courtbook_config::{AppConfig, DatabaseConfig};
use std::sync::Arc;
use tracing::debug;

/// Factory for creating database clients
#[derive(Debug, Clone)]
pub struct DbClientFactory;

impl DbClientFactory {
    /// Create a new database client factory
    pub fn new() -> Self {
        Self
    }

    /// Create a new database client from an application configuration
    ///
    /// Falls back to [`DatabaseConfig::default`] when the configuration has no
    /// `[database]` section.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    ///
    /// * The database URL is empty
    /// * The database connection fails
    pub async fn from_app_config(&self, config: &Arc<AppConfig>) -> Result<DbClient, DbError> {
        debug!("Creating database client from application configuration");

        match config.database.as_ref() {
            Some(db_config) => self.from_db_config(db_config).await,
            None => {
                debug!("No database section configured, using defaults");
                self.from_db_config(&DatabaseConfig::default()).await
            }
        }
    }

    /// Create a new database client from a database configuration
    pub async fn from_db_config(&self, db_config: &DatabaseConfig) -> Result<DbClient, DbError> {
        debug!("Creating database client from database configuration");
        DbClient::from_config(db_config).await
    }
}

impl Default for DbClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_app_config_uses_configured_database() {
        let config = Arc::new(AppConfig {
            database: Some(DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: Some(3),
            }),
            ..AppConfig::default()
        });

        let client = DbClientFactory::new().from_app_config(&config).await.unwrap();
        // in-memory databases are pinned to one connection
        assert_eq!(client.pool().options().get_max_connections(), 1);
    }
}
