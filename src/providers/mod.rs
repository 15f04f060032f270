//! Code generation backends

pub mod huggingface;
pub mod mock;

// Re-export for convenience
pub use huggingface::CodeGenerationApi;
pub use mock::MockCodeGenerationApi;

use std::future::Future;
use log::{debug, error};

/// Shared HTTP transport for one batch of calls.
/// Dropping it releases the connection pool.
#[derive(Debug, Clone)]
pub struct Session
{   http_client: reqwest::Client
}

impl Session
{   /// Build a fresh connection pool
    pub fn open(
      config: &crate::config::CodegenConfig
    ) -> Result<Self, crate::error::Error>
    {   debug!("Opening HTTP session");
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout()
        {   builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          crate::error::Error::SessionUnavailable(e.to_string())
        })?;
        Ok(Session { http_client })
    }

    pub fn http_client(&self) -> &reqwest::Client
    {   &self.http_client
    }
}

/// A backend able to answer one (prompt, model) request.
///
/// Implementations never fail: every problem is folded into a
/// `ModelResponse` with `status() == false`.
pub trait CodeGenerator
{   fn generate(
      &self
    , session: &Session
    , prompt: &str
    , model: &str
    , language: &str
    , params: &crate::request::GenerationParameters
    ) -> impl Future<Output = crate::request::ModelResponse> + Send;
}
