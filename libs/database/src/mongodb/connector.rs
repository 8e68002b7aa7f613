use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use thiserror::Error;
use tracing::{debug, info};

use crate::common::{RetryConfig, retry_with_backoff};

use super::config::MongoConfig;

#[derive(Debug, Error)]
pub enum MongoError {
    #[error("Failed to parse connection string: {0}")]
    InvalidUrl(mongodb::error::Error),

    #[error("Failed to connect to MongoDB: {0}")]
    ConnectionFailed(mongodb::error::Error),

    #[error("Ping failed: {0}")]
    PingFailed(mongodb::error::Error),
}

/// Connect to MongoDB and verify the connection with a ping.
pub async fn connect(url: &str, database: &str) -> Result<Database, MongoError> {
    connect_from_config(&MongoConfig::new(url, database)).await
}

/// Connect using a full [`MongoConfig`], verifying with a ping before returning.
pub async fn connect_from_config(config: &MongoConfig) -> Result<Database, MongoError> {
    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(MongoError::InvalidUrl)?;

    options.app_name = config.app_name.clone();
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    let client = Client::with_options(options).map_err(MongoError::ConnectionFailed)?;

    debug!("Pinging MongoDB at {}", config.url);
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(MongoError::PingFailed)?;

    info!(database = %config.database, "Connected to MongoDB");
    Ok(client.database(&config.database))
}

/// Connect with retries using the given retry configuration.
pub async fn connect_with_retry(
    url: &str,
    database: &str,
    retry_config: RetryConfig,
) -> Result<Database, MongoError> {
    let config = MongoConfig::new(url, database);
    retry_with_backoff(|| connect_from_config(&config), retry_config).await
}

/// Connect from a [`MongoConfig`] with retries.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: RetryConfig,
) -> Result<Database, MongoError> {
    retry_with_backoff(|| connect_from_config(config), retry_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_invalid_url() {
        let result = connect("not-a-mongodb-url", "test").await;
        assert!(matches!(result, Err(MongoError::InvalidUrl(_))));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB instance
    async fn test_connect_success() {
        let db = connect("mongodb://localhost:27017", "test_db")
            .await
            .unwrap();
        assert_eq!(db.name(), "test_db");
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB instance
    async fn test_connect_with_retry_success() {
        let config = RetryConfig::new().with_max_retries(2).with_initial_delay(50);
        let db = connect_with_retry("mongodb://localhost:27017", "test_db", config)
            .await
            .unwrap();
        assert_eq!(db.name(), "test_db");
    }
}
