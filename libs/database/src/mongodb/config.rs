use core_config::{ConfigError, FromEnv, env_parse_or};

/// MongoDB connection configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`
    pub url: String,

    /// Database name
    pub database: String,

    /// Application name reported to the server
    pub app_name: Option<String>,

    /// Maximum connections in the pool
    pub max_pool_size: u32,

    /// Minimum connections kept open
    pub min_pool_size: u32,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "bazaar".to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

impl MongoConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }
}

impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        // MONGODB_* preferred, MONGO_* accepted for older deployments
        let url = std::env::var("MONGODB_URL")
            .or_else(|_| std::env::var("MONGO_URL"))
            .unwrap_or(defaults.url);

        let database = std::env::var("MONGODB_DATABASE")
            .or_else(|_| std::env::var("MONGO_DATABASE"))
            .unwrap_or(defaults.database);

        let app_name = std::env::var("MONGODB_APP_NAME").ok();

        Ok(Self {
            url,
            database,
            app_name,
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?,
            connect_timeout_secs: env_parse_or(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(
            [
                "MONGODB_URL",
                "MONGO_URL",
                "MONGODB_DATABASE",
                "MONGO_DATABASE",
                "MONGODB_APP_NAME",
                "MONGODB_MAX_POOL_SIZE",
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://localhost:27017");
                assert_eq!(config.database, "bazaar");
                assert_eq!(config.app_name, None);
                assert_eq!(config.max_pool_size, 100);
                assert_eq!(config.min_pool_size, 5);
            },
        );
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://db.internal:27017")),
                ("MONGODB_DATABASE", Some("bazaar_test")),
                ("MONGODB_MAX_POOL_SIZE", Some("25")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://db.internal:27017");
                assert_eq!(config.database, "bazaar_test");
                assert_eq!(config.max_pool_size, 25);
            },
        );
    }

    #[test]
    fn test_legacy_var_fallback() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None),
                ("MONGO_URL", Some("mongodb://legacy:27017")),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", Some("legacy_db")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://legacy:27017");
                assert_eq!(config.database, "legacy_db");
            },
        );
    }

    #[test]
    fn test_invalid_pool_size() {
        temp_env::with_var("MONGODB_MAX_POOL_SIZE", Some("not-a-number"), || {
            let result = MongoConfig::from_env();
            assert!(result.is_err());
        });
    }
}
