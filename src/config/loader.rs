use std::time::Duration;
use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result, bail};
use config::{Config, Environment};
use log::info;
use serde::Deserialize;

use crate::auth::{PasswordAuthentication, StaticToken};
use crate::http::{Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Connection and credential settings for the service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub token: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// A client builder authenticating with the token when one is set, and
    /// with the username and password otherwise. Password clients share one
    /// transport with their token exchange.
    pub fn client_builder(&self) -> Result<ClientBuilder> {
        let builder = Client::builder().base_url(&self.base_url).timeout(self.timeout());

        if !self.token.is_empty() {
            return Ok(builder.auth_provider(StaticToken::new(self.token.clone())));
        }
        if self.username.is_empty() {
            bail!("Either a token or a username and password must be configured");
        }

        let http = reqwest::Client::builder()
            .build()
            .context("Could not build the HTTP transport")?;

        Ok(builder.http_client(http.clone()).auth_provider(
            PasswordAuthentication::new(self.username.clone(), self.password.clone())
                .with_base_url(&self.base_url)
                .with_http_client(http)
                .with_timeout(self.timeout()),
        ))
    }

    pub fn client(&self) -> Result<Client> {
        self.client_builder()?
            .build()
            .context("Could not build the API client")
    }
}

/// What to look for when sourcing mortgages.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourcingSettings {
    pub group_name: String,
    pub loan_amount: i64,
    pub max_cost: i64,
    pub sync_interval_secs: u64,
}

impl Default for SourcingSettings {
    fn default() -> Self {
        Self {
            group_name: String::new(),
            loan_amount: 200_000,
            max_cost: 10_000,
            sync_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub sourcing: SourcingSettings,
}

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

/// Reads settings from `path`, writing the defaults there first if the file
/// does not exist. `CAPIS_`-prefixed environment variables take precedence
/// over the file, with `__` separating sections: `CAPIS_API__TOKEN`.
pub fn load_configuration(path: &Path) -> Result<Settings> {
    if !path.exists() {
        write_config_to(path, get_default_config()).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(Environment::with_prefix("CAPIS").prefix_separator("_").separator("__"))
        .build()
        .context("Could not build config")?
        .try_deserialize()
        .context("Invalid configuration")
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}
