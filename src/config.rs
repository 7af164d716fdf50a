//! Configuration for the AI dispatcher

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use log::debug;

pub const DEFAULT_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_BASE: &str = "UNITCONV_API_BASE";
pub const ENV_MODEL: &str = "UNITCONV_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "UNITCONV_TIMEOUT_SECS";

fn default_api_base() -> String
{   DEFAULT_API_BASE.to_string()
}

fn default_model() -> String
{   DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64
{   DEFAULT_TIMEOUT_SECS
}

/// Generation API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig
{   /// API key, passed as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>
  , /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_api_base")]
    pub api_base: String
  , /// Model name embedded in the endpoint path
    #[serde(default = "default_model")]
    pub model: String
  , /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64
}

// Hand-written so the key never lands in logs.
impl std::fmt::Debug for GeminiConfig
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   f.debug_struct("GeminiConfig")
          .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
          .field("api_base", &self.api_base)
          .field("model", &self.model)
          .field("timeout_secs", &self.timeout_secs)
          .finish()
    }
}

impl Default for GeminiConfig
{   fn default() -> Self
    {   GeminiConfig
        {   api_key: None
          , api_base: default_api_base()
          , model: default_model()
          , timeout_secs: default_timeout_secs()
        }
    }
}

impl GeminiConfig
{   /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration
    {   Duration::from_secs(self.timeout_secs)
    }

    /// Check values the dispatcher cannot work with
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.timeout_secs == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeout_secs must be greater than zero".to_string()
            ));
        }
        if self.model.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "model must not be empty".to_string()
            ));
        }
        if self.api_base.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "api_base must not be empty".to_string()
            ));
        }
        Ok(())
    }
}

/// unitconv configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig
{   /// Generation API configuration
    #[serde(default)]
    pub gemini: GeminiConfig
}

impl ConverterConfig
{   /// Build configuration from process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any name -> value lookup
    pub fn from_lookup<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   let mut gemini = GeminiConfig::default();

        gemini.api_key = lookup(ENV_API_KEY)
          .filter(|k| !k.trim().is_empty());
        if let Some(base) = lookup(ENV_API_BASE)
        {   gemini.api_base = base;
        }
        if let Some(model) = lookup(ENV_MODEL)
        {   gemini.model = model;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS)
        {   gemini.timeout_secs = raw.trim().parse()
              .map_err(|_| {
                crate::error::Error::InvalidConfiguration(format!(
                  "{} is not a number of seconds: {}",
                  ENV_TIMEOUT_SECS, raw
                ))
              })?;
        }

        let config = ConverterConfig { gemini };
        config.gemini.validate()?;
        debug!("Loaded config from environment: {:?}", config);
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(format!(
              "cannot read {}: {}", path.display(), e
            ))
          })?;
        let config: ConverterConfig = serde_json::from_str(&raw)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(format!(
              "cannot parse {}: {}", path.display(), e
            ))
          })?;
        config.gemini.validate()?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
