use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub endpoint: String,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the endpoint without trailing slashes, ready to be joined
    /// with an API prefix.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Ask OCS endpoints for JSON (`?format=json`) instead of XML.
    pub json_output: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables (`NXC__SECTION__KEY`)
    /// and an optional `nxc.toml` file into `Settings`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("server.endpoint", "http://localhost")?
            .set_default("client.json_output", true)?
            .set_default("client.timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .add_source(config::File::with_name("nxc.toml").required(false))
            .add_source(
                config::Environment::with_prefix("NXC")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks the values a client cannot work without.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` when the endpoint is not an
    /// `http(s)` URL or the timeout is zero.
    pub fn validate(&self) -> CoreResult<()> {
        let endpoint = self.server.base_url();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(CoreError::ConfigError(format!(
                "server.endpoint must be an http(s) URL, got {endpoint:?}"
            )));
        }
        if self.client.timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "client.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
