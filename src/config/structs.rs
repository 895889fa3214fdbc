//! The configuration structs used to build the AppConfig, and their impls.
use std::path::Path;

use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::SecretString;
use serde::Deserialize;
use strum_macros::AsRefStr;
use tower_http::cors::AllowOrigin;

use crate::config::{ConfigError, ConfigResult};
use crate::waitlist::ValidEmail;

/// Environment variable holding the email delivery API credential.
pub const CREDENTIAL_ENV_VAR: &str = "RESEND_API_KEY";
/// Where the nurture credential comes from, it has no dedicated variable.
pub const NURTURE_CREDENTIAL_ENV_VAR: &str = "APP_NURTURE_CONFIG__AUTH_TOKEN";
/// Port assigned by the hosting platform, overrides `net_config.app_port`.
const PORT_ENV_VAR: &str = "PORT";
const ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub email_config: EmailConfig,
    #[serde(default)]
    pub nurture_config: NurtureConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
    /// `*` or a comma separated list of origins allowed to call the API from a browser.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailConfig {
    pub sender_addr: String,
    pub url: String,
    /// Missing in the config files on purpose, comes from `RESEND_API_KEY`.
    #[serde(default)]
    pub auth_token: Option<SecretString>,
    pub timeout_millis: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct NurtureConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub auth_token: Option<SecretString>,
    #[serde(default = "default_timeout_millis")]
    pub timeout_millis: u64,
}

fn default_timeout_millis() -> u64 {
    5_000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

// ###################################
// ->   IMPLs
// ###################################
impl AppConfig {
    /// Loads the configuration from `./config` for the environment named by `APP_ENVIRONMENT`.
    pub fn load() -> ConfigResult<Self> {
        let config_dir = std::env::current_dir()?.join("config");
        let environment = Environment::from_env()?;

        let config = Self::figment(config_dir, environment).extract()?;
        Ok(config)
    }

    /// Layers, from lowest to highest priority:
    /// `base.toml`, `{environment}.toml`, `APP_*` env vars (`__` separates nested keys),
    /// and finally `RESEND_API_KEY` and `PORT`.
    pub fn figment(config_dir: impl AsRef<Path>, environment: Environment) -> Figment {
        let config_dir = config_dir.as_ref();

        Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment.file_name())))
            .merge(Env::prefixed("APP_").split("__"))
            .merge(
                Env::raw()
                    .only(&[CREDENTIAL_ENV_VAR])
                    .map(|_| "email_config.auth_token".into()),
            )
            .merge(
                Env::raw()
                    .only(&[PORT_ENV_VAR])
                    .map(|_| "net_config.app_port".into()),
            )
    }
}

impl NetConfig {
    pub fn cors_origin(&self) -> ConfigResult<AllowOrigin> {
        let origin = self.cors_origin.trim();
        if origin == "*" {
            return Ok(AllowOrigin::any());
        }

        let origins = origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidCorsOrigin(o.to_string()))
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        if origins.is_empty() {
            return Err(ConfigError::InvalidCorsOrigin(self.cors_origin.clone()));
        }
        Ok(AllowOrigin::list(origins))
    }
}

impl EmailConfig {
    pub fn valid_sender(&self) -> ConfigResult<ValidEmail> {
        let addr = ValidEmail::parse(&self.sender_addr)
            .map_err(|er| ConfigError::InvalidEmail(er.to_string()))?;
        Ok(addr)
    }
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl NurtureConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl Default for NurtureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            auth_token: None,
            timeout_millis: default_timeout_millis(),
        }
    }
}

impl Environment {
    pub fn from_env() -> ConfigResult<Self> {
        std::env::var(ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| "local".into())
            .try_into()
    }

    pub fn file_name(&self) -> String {
        format!("{}.toml", self.as_ref().to_lowercase())
    }
}

// ###################################
// ->   TRY FROMs
// ###################################
impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}
