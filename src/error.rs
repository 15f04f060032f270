use std::fmt;

/// Custom error type for polygen operations
/// Implements Clone so a failure can be kept inside a `ModelResponse`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Model identifier is not one of the known backing models
    UnknownModel(String)
  , /// Backend answered with a non-2xx status
    ApiError
    {   status: u16
      , body: String
    }
  , /// Transport or parse failure while querying a model
    Query
    {   model: String
      , message: String
    }
  , /// Offline generator has no answer for the pair
    NoMockResponse
    {   language: String
      , model: String
    }
  , /// Failed to parse API response
    ParseError(String)
  , /// The shared HTTP session could not be built
    SessionUnavailable(String)
  , /// Task description is empty
    EmptyPrompt
  , /// Generation parameters are out of bounds
    InvalidParameters(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Source code failed the local syntax check
    InvalidSyntax
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::UnknownModel(model) => {
              write!(f, "Unknown model: {}", model)
            }
          , Error::ApiError { status, body } => {
              write!(f, "API Error ({}): {}", status, body)
            }
          , Error::Query { model, message } => {
              write!(f, "Error querying {}: {}", model, message)
            }
          , Error::NoMockResponse { language, model } => {
              write!(f,
                "No mock response for language: {} and model: {}",
                language, model
              )
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::SessionUnavailable(msg) => {
              write!(f, "Failed to open HTTP session: {}", msg)
            }
          , Error::EmptyPrompt => {
              write!(f, "Task description is empty")
            }
          , Error::InvalidParameters(msg) => {
              write!(f, "Invalid generation parameters: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::InvalidSyntax => {
              write!(f, "Invalid code syntax")
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
