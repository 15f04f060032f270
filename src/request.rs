//! Unified request and response types for polygen

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_MAX_TOKENS: u32 = 100;
pub const MAX_MAX_TOKENS: u32 = 1000;
pub const MIN_TEMPERATURE: f32 = 0.1;
pub const MAX_TEMPERATURE: f32 = 1.0;
pub const MIN_TOP_P: f32 = 0.1;
/// Product ceiling; the backend itself would take 1.0
pub const MAX_TOP_P: f32 = 0.99;

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.95;

/// Sampling parameters shared by every call in a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters
{   /// Maximum new tokens to generate
    pub max_tokens: u32
  , /// Sampling randomness
    pub temperature: f32
  , /// Nucleus sampling threshold
    pub top_p: f32
  , /// Sampling mode, honoured by StarCoder only
    #[serde(default = "default_do_sample")]
    pub do_sample: bool
}

fn default_do_sample() -> bool
{   true
}

impl GenerationParameters
{   /// Build parameters, checking the product bounds
    pub fn new(
      max_tokens: u32
    , temperature: f32
    , top_p: f32
    ) -> Result<Self, crate::error::Error>
    {   let params = GenerationParameters
        {   max_tokens
          , temperature
          , top_p
          , do_sample: true
        };
        params.validate()?;
        Ok(params)
    }

    /// Same parameters with a different sampling mode
    pub fn with_do_sample(self, do_sample: bool) -> Self
    {   GenerationParameters { do_sample, ..self }
    }

    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&self.max_tokens)
        {   return Err(crate::error::Error::InvalidParameters(format!(
              "max_tokens {} outside [{}, {}]",
              self.max_tokens, MIN_MAX_TOKENS, MAX_MAX_TOKENS
            )));
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature)
        {   return Err(crate::error::Error::InvalidParameters(format!(
              "temperature {} outside [{}, {}]",
              self.temperature, MIN_TEMPERATURE, MAX_TEMPERATURE
            )));
        }
        if !(MIN_TOP_P..=MAX_TOP_P).contains(&self.top_p)
        {   return Err(crate::error::Error::InvalidParameters(format!(
              "top_p {} outside [{}, {}]",
              self.top_p, MIN_TOP_P, MAX_TOP_P
            )));
        }
        Ok(())
    }
}

impl Default for GenerationParameters
{   fn default() -> Self
    {   GenerationParameters
        {   max_tokens: DEFAULT_MAX_TOKENS
          , temperature: DEFAULT_TEMPERATURE
          , top_p: DEFAULT_TOP_P
          , do_sample: true
        }
    }
}

/// One cell of the fan-out grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPair
{   pub language: String
  , pub model: String
}

/// An immutable generation submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest
{   /// Free-form task description
    pub task: String
  , /// Target programming languages
    pub languages: Vec<String>
  , /// Backing model identifiers
    pub models: Vec<String>
  , pub params: GenerationParameters
}

impl GenerationRequest
{   pub fn new(
      task: impl Into<String>
    , languages: Vec<String>
    , models: Vec<String>
    , params: GenerationParameters
    ) -> Self
    {   GenerationRequest
        {   task: task.into()
          , languages
          , models
          , params
        }
    }

    /// Request over the configured default grid
    pub fn with_defaults(
      task: impl Into<String>
    , config: &crate::config::CodegenConfig
    , params: GenerationParameters
    ) -> Self
    {   GenerationRequest::new(
          task
        , config.languages.clone()
        , config.models.clone()
        , params
        )
    }

    /// Language-major, model-minor enumeration of the grid
    pub fn target_pairs(&self) -> Vec<TargetPair>
    {   self.languages
          .iter()
          .flat_map(|language| {
            self.models.iter().map(move |model| TargetPair
            {   language: language.clone()
              , model: model.clone()
            })
          })
          .collect()
    }

    /// Position of a (language, model) cell in the result list
    pub fn panel_index(
      &self
    , language_index: usize
    , model_index: usize
    ) -> usize
    {   language_index * self.models.len() + model_index
    }
}

/// Uniform result of one backing model call.
///
/// `status` is true exactly when `error` is absent; the only
/// constructors are [`ModelResponse::success`],
/// [`ModelResponse::from_error`] and [`ModelResponse::failure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse
{   generated_text: String
  , raw_response: Value
  , status: bool
  , error: Option<String>
}

impl ModelResponse
{   pub fn success(
      generated_text: impl Into<String>
    , raw_response: Value
    ) -> Self
    {   ModelResponse
        {   generated_text: generated_text.into()
          , raw_response
          , status: true
          , error: None
        }
    }

    /// Fold an error into a failed response; the raw payload
    /// keeps whatever body or message caused it
    pub fn from_error(err: crate::error::Error) -> Self
    {   let raw_response = match &err
        {   crate::error::Error::UnknownModel(_) => Value::Null
          , crate::error::Error::ApiError { body, .. } => {
              Value::String(body.clone())
            }
          , crate::error::Error::Query { message, .. } => {
              Value::String(message.clone())
            }
          , other => Value::String(other.to_string())
        };
        ModelResponse::failure(err, raw_response)
    }

    /// Failed response with an explicit raw payload
    pub fn failure(
      err: crate::error::Error
    , raw_response: Value
    ) -> Self
    {   ModelResponse
        {   generated_text: String::new()
          , raw_response
          , status: false
          , error: Some(err.to_string())
        }
    }

    pub fn generated_text(&self) -> &str
    {   &self.generated_text
    }

    pub fn raw_response(&self) -> &Value
    {   &self.raw_response
    }

    pub fn status(&self) -> bool
    {   self.status
    }

    pub fn error(&self) -> Option<&str>
    {   self.error.as_deref()
    }
}
