//! Placeholder completion: fill `[...]` / `<...>` gaps in Python code

use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{debug, trace, error, info, warn};

use crate::config::CodegenConfig;
use crate::error::Error;
use crate::providers::Session;
use crate::request::{ModelResponse, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::syntax::{PythonSyntax, SyntaxValidator};
use crate::ModelFamily;

/// Markers the backend is asked to fill in
pub const PLACEHOLDERS: [&str; 2] = ["[...]", "<...>"];

/// Stand-in statement used for the pre-check
pub const NEUTRAL_STATEMENT: &str = "pass";

pub const SYSTEM_INSTRUCTION: &str = "You are an expert code completion assistant. \
Complete the code by replacing [...] or <...> with appropriate code. \
Respond ONLY with the completed code, no explanations.";

/// Completion always goes to the instruction-tuned model
pub const COMPLETION_MODEL: ModelFamily = ModelFamily::Qwen;

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   fn new(role: &str, content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: role.to_string()
          , content: content.into()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub max_tokens: u32
  , pub temperature: f32
  , pub stream: bool
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse
{   pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ChatMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

// ===== Flow =====

/// Parameters for a completion call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionParameters
{   pub max_tokens: u32
  , pub temperature: f32
}

impl Default for CompletionParameters
{   fn default() -> Self
    {   CompletionParameters
        {   max_tokens: DEFAULT_MAX_TOKENS
          , temperature: DEFAULT_TEMPERATURE
        }
    }
}

/// Result of [`CodeCompleter::complete`]
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome
{   /// Input failed the syntax check; nothing was sent
    Rejected
  , /// The backend was called. `post_valid` is advisory only.
    Completed
    {   result: ModelResponse
      , post_valid: bool
    }
}

impl CompletionOutcome
{   pub fn pre_valid(&self) -> bool
    {   matches!(self, CompletionOutcome::Completed { .. })
    }

    pub fn post_valid(&self) -> bool
    {   matches!(self, CompletionOutcome::Completed { post_valid: true, .. })
    }

    pub fn result(&self) -> Option<&ModelResponse>
    {   match self
        {   CompletionOutcome::Completed { result, .. } => Some(result)
          , CompletionOutcome::Rejected => None
        }
    }
}

/// Replace every placeholder with [`NEUTRAL_STATEMENT`]
pub fn fill_placeholders(code: &str) -> String
{   PLACEHOLDERS
      .iter()
      .fold(code.to_string(), |acc, marker| {
        acc.replace(marker, NEUTRAL_STATEMENT)
      })
}

/// Starter snippets offered to the user
pub fn templates() -> [(&'static str, &'static str); 3]
{   [ ( "Function Template"
      , "def calculate_sum(a, b):\n    [...]\n    return result"
      )
    , ( "Class Template"
      , "class DataProcessor:\n    def __init__(self, data):\n        self.data = data\n\n    def process(self):\n        [...]"
      )
    , ( "Loop Template"
      , "for item in items:\n    <...>"
      )
    ]
}

/// Single-call completion of placeholder code
pub struct CodeCompleter<V = PythonSyntax>
{   config: CodegenConfig
  , validator: V
}

impl CodeCompleter<PythonSyntax>
{   pub fn new(config: CodegenConfig) -> Self
    {   CodeCompleter
        {   config
          , validator: PythonSyntax
        }
    }
}

impl<V: SyntaxValidator> CodeCompleter<V>
{   pub fn with_validator(config: CodegenConfig, validator: V) -> Self
    {   CodeCompleter { config, validator }
    }

    fn endpoint(&self) -> String
    {   format!("{}/v1/chat/completions", self.config.endpoint(COMPLETION_MODEL))
    }

    /// Check, complete and re-check `code`.
    ///
    /// Fails only when the HTTP session cannot be opened; call
    /// errors are carried in the returned `ModelResponse`.
    pub async fn complete(
      &self
    , code: &str
    , params: &CompletionParameters
    ) -> Result<CompletionOutcome, Error>
    {   if !self.validator.is_valid(&fill_placeholders(code))
        {   warn!("Input failed syntax check, not sending");
            return Ok(CompletionOutcome::Rejected);
        }

        let session = Session::open(&self.config)?;
        let result = match self.request_completion(&session, code, params).await
        {   Ok(response) => response
          , Err(e) => ModelResponse::from_error(e)
        };

        let post_valid = result.status()
          && self.validator.is_valid(result.generated_text());
        if result.status() && !post_valid
        {   warn!("Completed code did not pass the syntax check");
        }
        info!("Completion finished: status={}, post_valid={}", result.status(), post_valid);

        Ok(CompletionOutcome::Completed { result, post_valid })
    }

    async fn request_completion(
      &self
    , session: &Session
    , code: &str
    , params: &CompletionParameters
    ) -> Result<ModelResponse, Error>
    {   let model = COMPLETION_MODEL.id().to_string();
        let request = ChatCompletionRequest
        {   model: COMPLETION_MODEL.repository().to_string()
          , messages: vec![
              ChatMessage::new("system", SYSTEM_INSTRUCTION)
            , ChatMessage::new("user", format!("Complete this code:\n{}", code))
            ]
          , max_tokens: params.max_tokens
          , temperature: params.temperature
          , stream: false
        };
        trace!("Completion request: {:?}", request);

        let mut builder = session.http_client()
          .post(self.endpoint())
          .json(&request);
        if let Some(key) = &self.config.api_key
        {   builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
          error!("HTTP error: {}", e);
          Error::Query { model: model.clone(), message: e.to_string() }
        })?;

        let status = response.status();
        trace!("Completion response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Completion API error ({}): {}", status, error_text);
            return Err(Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        let body: Value = response.json().await.map_err(|e| {
          error!("Parse error: {}", e);
          Error::Query { model: model.clone(), message: e.to_string() }
        })?;

        let chat: ChatCompletionResponse = serde_json::from_value(body.clone())
          .map_err(|e| Error::Query
          {   model: model.clone()
            , message: Error::ParseError(e.to_string()).to_string()
          })?;

        let text = chat.choices
          .into_iter()
          .next()
          .map(|c| c.message.content)
          .ok_or_else(|| {
            error!("No choices in response");
            Error::Query
            {   model: model.clone()
              , message: Error::ParseError(
                  "response contained no choices".to_string()
                ).to_string()
            }
          })?;
        if text.trim().is_empty()
        {   error!("Completion for {} came back empty", model);
            return Err(Error::Query
            {   model: model.clone()
              , message: Error::ParseError(
                  "response contained no code".to_string()
                ).to_string()
            });
        }

        debug!("Completion returned {} bytes", text.len());
        Ok(ModelResponse::success(text, body))
    }
}
