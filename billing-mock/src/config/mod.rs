use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::fmt;
use std::str::FromStr;

/// How much detail success responses carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Fully populated nested fixtures, as the real vendor returns them.
    #[default]
    Strict,
    /// Bare `{error_code, error_msg}` plus the identifiers a caller needs.
    Loose,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Strict => "strict",
            ResponseMode::Loose => "loose",
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, ResponseMode::Strict)
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ResponseMode::Strict),
            "loose" => Ok(ResponseMode::Loose),
            _ => Err(format!("Invalid response mode: {}", s)),
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub response_mode: ResponseMode,
}

impl MockConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(MockConfig {
            common: common_config,
            service_name: get_env("SERVICE_NAME", Some("billing-mock"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            response_mode: get_env("MOCK_RESPONSE_MODE", Some("strict"), is_prod)?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
        })
    }

    /// Configuration for an in-process test server on a random port.
    pub fn for_tests(response_mode: ResponseMode) -> Self {
        MockConfig {
            common: core_config::Config { port: 0 },
            service_name: "billing-mock-test".to_string(),
            log_level: "warn".to_string(),
            otlp_endpoint: None,
            response_mode,
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod && default.is_none() {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
