//! Settings resolution for runify
//!
//! Provides two-tier resolution with ENV → TOML priority, falling back to
//! built-in defaults. Credentials have no default: every missing one is
//! reported in a single configuration error.

use runify_common::config::{env_value, is_valid_value, LoggingConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::error::{Result, RunifyError};
use crate::models::{track::DEFAULT_LOWER_BPM, track::DEFAULT_UPPER_BPM, CadenceBand};
use crate::services::spotify_auth::DEFAULT_ACCOUNTS_BASE_URL;
use crate::services::spotify_client::{
    DEFAULT_API_BASE_URL, DEFAULT_REQUESTS_PER_SECOND, DEFAULT_TIMEOUT_SECS,
};
use crate::services::{ClientOptions, OAuthCredentials};
use crate::workflow::{CollectorOptions, MissingAnalysisPolicy};

pub const ENV_CLIENT_ID: &str = "RUNIFY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "RUNIFY_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "RUNIFY_REDIRECT_URI";
pub const ENV_SCOPES: &str = "RUNIFY_SCOPES";
pub const ENV_USERNAME: &str = "RUNIFY_USERNAME";
pub const ENV_ACCESS_TOKEN: &str = "RUNIFY_ACCESS_TOKEN";
pub const ENV_REFRESH_TOKEN: &str = "RUNIFY_REFRESH_TOKEN";
pub const ENV_LOWER_BPM: &str = "RUNIFY_LOWER_BPM";
pub const ENV_UPPER_BPM: &str = "RUNIFY_UPPER_BPM";
pub const ENV_ON_MISSING_ANALYSIS: &str = "RUNIFY_ON_MISSING_ANALYSIS";

pub const DEFAULT_SCOPES: &[&str] = &[
    "playlist-modify-public",
    "playlist-modify-private",
    "playlist-read-private",
];

/// TOML config file schema
///
/// Every field is optional; absent sections fall back to environment and
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunifyConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub cadence: CadenceSection,
    #[serde(default)]
    pub collector: CollectorSection,
    #[serde(default)]
    pub service: ServiceSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub username: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CadenceSection {
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorSection {
    pub concurrency: Option<usize>,
    pub on_missing_analysis: Option<MissingAnalysisPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSection {
    pub api_base_url: Option<String>,
    pub accounts_base_url: Option<String>,
    pub requests_per_second: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Load the TOML config file, or defaults when none exists
pub fn load_runify_config() -> Result<(RunifyConfig, Option<PathBuf>)> {
    Ok(runify_common::config::load_config()?)
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: OAuthCredentials,
    /// Account that owns the generated playlist
    pub username: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub band: CadenceBand,
    pub collector: CollectorOptions,
    pub client: ClientOptions,
    pub accounts_base_url: String,
}

impl Settings {
    /// Resolve settings from environment and `config`
    ///
    /// **Priority:** ENV → TOML → built-in default
    pub fn resolve(config: &RunifyConfig) -> Result<Self> {
        let auth = &config.auth;
        let mut missing = Vec::new();

        let mut required = |name: &str, env_var: &str, toml_value: Option<&String>| {
            let value = resolve_value(name, env_var, toml_value);
            if value.is_none() {
                missing.push(format!("{} ({} or auth.{})", name, env_var, name));
            }
            value.unwrap_or_default()
        };

        let client_id = required("client_id", ENV_CLIENT_ID, auth.client_id.as_ref());
        let client_secret = required("client_secret", ENV_CLIENT_SECRET, auth.client_secret.as_ref());
        let redirect_uri = required("redirect_uri", ENV_REDIRECT_URI, auth.redirect_uri.as_ref());
        let username = required("username", ENV_USERNAME, auth.username.as_ref());

        if !missing.is_empty() {
            return Err(RunifyError::Config(format!(
                "missing required settings: {}. Set them in the environment, a .env file, \
                 or the [auth] section of the config file.",
                missing.join(", ")
            )));
        }

        let scopes = resolve_scopes(auth.scopes.as_ref());
        let access_token = env_value(ENV_ACCESS_TOKEN);
        let refresh_token =
            resolve_value("refresh_token", ENV_REFRESH_TOKEN, auth.refresh_token.as_ref());

        let lower = resolve_number(ENV_LOWER_BPM, config.cadence.lower_bound, DEFAULT_LOWER_BPM)?;
        let upper = resolve_number(ENV_UPPER_BPM, config.cadence.upper_bound, DEFAULT_UPPER_BPM)?;
        let band = CadenceBand::new(lower, upper)?;

        let on_missing_analysis = match env_value(ENV_ON_MISSING_ANALYSIS) {
            Some(value) => value.parse()?,
            None => config.collector.on_missing_analysis.unwrap_or_default(),
        };
        let concurrency = config.collector.concurrency.unwrap_or(1);
        if concurrency == 0 {
            return Err(RunifyError::Config(
                "collector.concurrency must be at least 1".to_string(),
            ));
        }

        let service = &config.service;
        let requests_per_second = service
            .requests_per_second
            .unwrap_or(DEFAULT_REQUESTS_PER_SECOND);
        if requests_per_second == 0 {
            return Err(RunifyError::Config(
                "service.requests_per_second must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            credentials: OAuthCredentials {
                client_id,
                client_secret,
                redirect_uri,
                scopes,
            },
            username,
            access_token,
            refresh_token,
            band,
            collector: CollectorOptions {
                concurrency,
                on_missing_analysis,
            },
            client: ClientOptions {
                base_url: service
                    .api_base_url
                    .clone()
                    .filter(|v| is_valid_value(v))
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                requests_per_second,
                timeout: Duration::from_secs(service.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            },
            accounts_base_url: service
                .accounts_base_url
                .clone()
                .filter(|v| is_valid_value(v))
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_BASE_URL.to_string()),
        })
    }
}

/// Resolve a string setting, warning when both sources provide it
fn resolve_value(name: &str, env_var: &str, toml_value: Option<&String>) -> Option<String> {
    let env = env_value(env_var);
    let toml = toml_value
        .filter(|v| is_valid_value(v))
        .map(|v| v.trim().to_string());

    if env.is_some() && toml.is_some() {
        warn!(
            setting = name,
            "Setting found in environment and TOML config. Using environment (highest priority)."
        );
    }

    env.or(toml)
}

fn resolve_number(env_var: &str, toml_value: Option<f64>, default: f64) -> Result<f64> {
    match env_value(env_var) {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| RunifyError::Config(format!("{} must be a number, got '{}'", env_var, raw))),
        None => Ok(toml_value.unwrap_or(default)),
    }
}

/// Scopes come from a comma-separated env list, a TOML array, or the defaults
fn resolve_scopes(toml_scopes: Option<&Vec<String>>) -> Vec<String> {
    let split = |raw: &str| -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    if let Some(raw) = env_value(ENV_SCOPES) {
        let scopes = split(&raw);
        if !scopes.is_empty() {
            return scopes;
        }
    }

    match toml_scopes {
        Some(scopes) if scopes.iter().any(|s| is_valid_value(s)) => scopes
            .iter()
            .filter(|s| is_valid_value(s))
            .map(|s| s.trim().to_string())
            .collect(),
        _ => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
    }
}
