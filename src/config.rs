//! Configuration for the inference endpoints and the fan-out grid

use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::debug;

pub const DEFAULT_API_BASE: &str
  = "https://api-inference.huggingface.co";

/// Environment variable holding the bearer credential
pub const API_KEY_ENV: &str = "API_KEY_HUGGINGFACE";
pub const API_BASE_ENV: &str = "POLYGEN_API_BASE";
pub const REQUEST_TIMEOUT_ENV: &str = "POLYGEN_REQUEST_TIMEOUT_SECS";
pub const BATCH_TIMEOUT_ENV: &str = "POLYGEN_BATCH_TIMEOUT_SECS";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BATCH_TIMEOUT_SECS: u64 = 120;

/// polygen configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig
{   /// Inference API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String
  , /// Bearer credential, never written out
    #[serde(skip)]
    pub api_key: Option<String>
  , /// Per-call transport timeout in seconds
    pub request_timeout_secs: Option<u64>
  , /// Deadline for a whole fan-out batch in seconds
    pub batch_timeout_secs: Option<u64>
  , /// Default target languages
    #[serde(default = "default_languages")]
    pub languages: Vec<String>
  , /// Default backing models
    #[serde(default = "default_models")]
    pub models: Vec<String>
}

fn default_api_base() -> String
{   DEFAULT_API_BASE.to_string()
}

fn default_languages() -> Vec<String>
{   vec!["python".into(), "javascript".into(), "cpp".into()]
}

fn default_models() -> Vec<String>
{   crate::ModelFamily::ALL
      .iter()
      .map(|m| m.id().to_string())
      .collect()
}

impl Default for CodegenConfig
{   fn default() -> Self
    {   CodegenConfig
        {   api_base: default_api_base()
          , api_key: None
          , request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS)
          , batch_timeout_secs: Some(DEFAULT_BATCH_TIMEOUT_SECS)
          , languages: default_languages()
          , models: default_models()
        }
    }
}

impl CodegenConfig
{   /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   let mut config = CodegenConfig::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a JSON file; the credential still
    /// comes from the environment
    pub fn from_json_file(
      path: impl AsRef<std::path::Path>
    ) -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)
          .map_err(|e| crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          ))?;
        let mut config: CodegenConfig = serde_json::from_str(&text)
          .map_err(|e| crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          ))?;
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), crate::error::Error>
    {   if let Ok(key) = std::env::var(API_KEY_ENV)
        {   debug!("Using credential from {}", API_KEY_ENV);
            self.api_key = Some(key);
        }
        if let Ok(base) = std::env::var(API_BASE_ENV)
        {   self.api_base = base;
        }
        if let Some(secs) = env_secs(REQUEST_TIMEOUT_ENV)?
        {   self.request_timeout_secs = Some(secs);
        }
        if let Some(secs) = env_secs(BATCH_TIMEOUT_ENV)?
        {   self.batch_timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self
    {   self.api_key = Some(key.into());
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self
    {   self.api_base = base.into();
        self
    }

    pub fn request_timeout(&self) -> Option<Duration>
    {   self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn batch_timeout(&self) -> Option<Duration>
    {   self.batch_timeout_secs.map(Duration::from_secs)
    }

    /// Endpoint serving a given model family
    pub fn endpoint(&self, family: crate::ModelFamily) -> String
    {   format!(
          "{}/models/{}",
          self.api_base.trim_end_matches('/'),
          family.repository()
        )
    }
}

fn env_secs(var: &str)
  -> Result<Option<u64>, crate::error::Error>
{   match std::env::var(var)
    {   Ok(value) => value
          .trim()
          .parse::<u64>()
          .map(Some)
          .map_err(|_| crate::error::Error::InvalidConfiguration(
            format!("{} must be a whole number of seconds, got {:?}", var, value)
          ))
      , Err(_) => Ok(None)
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn endpoint_joins_base_and_repository()
    {   let config = CodegenConfig::default()
          .with_api_base("http://localhost:8080/");
        assert_eq!(
          config.endpoint(crate::ModelFamily::StarCoder),
          "http://localhost:8080/models/bigcode/starcoder2-15b"
        );
    }

    #[test]
    fn json_fills_missing_fields_with_defaults()
    {   let config: CodegenConfig = serde_json::from_str(
          r#"{"request_timeout_secs": 5, "batch_timeout_secs": null}"#
        ).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.languages, vec!["python", "javascript", "cpp"]);
        assert_eq!(config.models, vec!["qwen", "starcoder"]);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert!(config.batch_timeout().is_none());
    }

    #[test]
    fn credential_is_not_serialized()
    {   let config = CodegenConfig::default().with_api_key("hf_secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hf_secret"));
    }
}
