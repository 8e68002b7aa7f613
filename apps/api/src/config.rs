use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_notifications::email::SmtpConfig;
use domain_tasks::AssetStoreConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub assets: AssetStoreConfig,
    /// Public base URL, used to build verification links
    pub base_url: String,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;
        let smtp = SmtpConfig::from_env()?;

        let assets = AssetStoreConfig {
            base_url: env_or_default("ASSET_STORE_URL", "http://localhost:9000/assets"),
            api_key: std::env::var("ASSET_STORE_API_KEY").ok(),
        };

        let base_url = env_or_default("APP_BASE_URL", "http://localhost:8080");

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            jwt,
            smtp,
            assets,
            base_url,
            environment,
        })
    }
}
