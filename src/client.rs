//! Fan-out over the (language, model) grid

use std::future::Future;
use std::time::Duration;

use log::{debug, error, info};

use crate::config::CodegenConfig;
use crate::error::Error;
use crate::prompt::PromptFormatter;
use crate::providers::{CodeGenerationApi, CodeGenerator, Session};
use crate::request::{GenerationRequest, ModelResponse, TargetPair};

/// Responses of one batch, in language-major, model-minor order
#[derive(Debug, Clone)]
pub struct BatchResults
{   pairs: Vec<TargetPair>
  , responses: Vec<ModelResponse>
  , model_count: usize
}

impl BatchResults
{   pub fn len(&self) -> usize
    {   self.responses.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.responses.is_empty()
    }

    pub fn pairs(&self) -> &[TargetPair]
    {   &self.pairs
    }

    pub fn responses(&self) -> &[ModelResponse]
    {   &self.responses
    }

    pub fn into_responses(self) -> Vec<ModelResponse>
    {   self.responses
    }

    /// Response shown in the panel for a language/model index
    pub fn panel(
      &self
    , language_index: usize
    , model_index: usize
    ) -> Option<&ModelResponse>
    {   if model_index >= self.model_count
        {   return None;
        }
        self.responses.get(language_index * self.model_count + model_index)
    }

    pub fn iter(&self)
      -> impl Iterator<Item = (&TargetPair, &ModelResponse)>
    {   self.pairs.iter().zip(self.responses.iter())
    }

    /// Number of cells whose call failed
    pub fn failures(&self) -> usize
    {   self.responses.iter().filter(|r| !r.status()).count()
    }
}

/// Dispatches one generator call per grid cell and waits for all
pub struct CodegenClient<G = CodeGenerationApi>
{   generator: G
  , config: CodegenConfig
}

impl CodegenClient<CodeGenerationApi>
{   /// Client talking to the configured inference API
    pub fn new(config: CodegenConfig) -> Self
    {   debug!("Creating CodegenClient for {}", config.api_base);
        CodegenClient
        {   generator: CodeGenerationApi::new(&config)
          , config
        }
    }
}

impl<G: CodeGenerator> CodegenClient<G>
{   pub fn with_generator(generator: G, config: CodegenConfig) -> Self
    {   CodegenClient { generator, config }
    }

    pub fn config(&self) -> &CodegenConfig
    {   &self.config
    }

    /// Run every (language, model) call of `request` concurrently.
    ///
    /// Individual failures come back inside the results, including
    /// calls still pending at the batch deadline. Only a rejected
    /// request or a session that cannot be opened fail the whole call.
    pub async fn generate_all(
      &self
    , request: &GenerationRequest
    ) -> Result<BatchResults, Error>
    {   if request.task.trim().is_empty()
        {   return Err(Error::EmptyPrompt);
        }
        request.params.validate()?;

        info!(
          "Generating for {} languages x {} models",
          request.languages.len(), request.models.len()
        );

        let session = Session::open(&self.config)?;
        let session = &session;
        let params = &request.params;
        let deadline = self.config.batch_timeout();

        // One prompt per language, shared by all of its models
        let prompts: Vec<String> = request.languages
          .iter()
          .map(|language| PromptFormatter::format(&request.task, language))
          .collect();

        let calls = request.languages
          .iter()
          .zip(prompts.iter())
          .flat_map(|(language, prompt)| {
            request.models.iter().map(move |model| {
              let call = self.generator
                .generate(session, prompt, model, language, params);
              settle(call, model, language, deadline)
            })
          });
        let responses = futures::future::join_all(calls).await;

        let results = BatchResults
        {   pairs: request.target_pairs()
          , responses
          , model_count: request.models.len()
        };
        debug!(
          "Batch settled: {} results, {} failed",
          results.len(), results.failures()
        );
        Ok(results)
    }
}

/// Await one call, folding an expired deadline into its own slot
async fn settle(
  call: impl Future<Output = ModelResponse>
, model: &str
, language: &str
, deadline: Option<Duration>
) -> ModelResponse
{   let limit = match deadline
    {   Some(limit) => limit
      , None => return call.await
    };
    match tokio::time::timeout(limit, call).await
    {   Ok(response) => response
      , Err(_) => {
          error!("{}/{} did not settle within {:?}", language, model, limit);
          ModelResponse::from_error(Error::Query
          {   model: model.to_string()
            , message: Error::Timeout.to_string()
          })
        }
    }
}
