use serde::Serialize;
use serde_json::Value;
use log::{debug, trace, error};

use crate::error::Error;
use crate::request::{GenerationParameters, ModelResponse};
use crate::ModelFamily;

// ===== Payload Types =====

#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a>
{   pub inputs: &'a str
  , pub parameters: InferenceParameters
}

#[derive(Debug, Clone, Serialize)]
pub struct InferenceParameters
{   pub max_new_tokens: u32
  , pub temperature: f32
  , pub top_p: f32
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>
}

impl<'a> InferenceRequest<'a>
{   /// Payload for `family`; `do_sample` only goes to
    /// families that accept it
    pub fn new(
      prompt: &'a str
    , family: ModelFamily
    , params: &GenerationParameters
    ) -> Self
    {   InferenceRequest
        {   inputs: prompt
          , parameters: InferenceParameters
            {   max_new_tokens: params.max_tokens
              , temperature: params.temperature
              , top_p: params.top_p
              , do_sample: family
                  .accepts_do_sample()
                  .then_some(params.do_sample)
            }
        }
    }
}

// ===== Reply Shapes =====

/// First element of a text-generation reply
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyShape
{   /// `[{"generated_text": "..."}]`
    Mapping(String)
  , /// `["..."]`
    BareText(String)
  , Unrecognized
}

impl ReplyShape
{   pub fn classify(body: &Value) -> ReplyShape
    {   match body.as_array().and_then(|items| items.first())
        {   Some(Value::Object(map)) => match map.get("generated_text")
            {   Some(Value::String(text)) => ReplyShape::Mapping(text.clone())
              , _ => ReplyShape::Unrecognized
            }
          , Some(Value::String(text)) => ReplyShape::BareText(text.clone())
          , _ => ReplyShape::Unrecognized
        }
    }

    /// Pull the generated text out, as far as `family` allows
    pub fn extract(self, family: ModelFamily) -> Result<String, Error>
    {   match self
        {   ReplyShape::Mapping(text) => Ok(text)
          , ReplyShape::BareText(text) if family.allows_bare_text() => {
              Ok(text)
            }
          , ReplyShape::BareText(_) => Err(Error::ParseError(format!(
              "{} replied with a bare string", family
            )))
          , ReplyShape::Unrecognized => Err(Error::ParseError(
              "unrecognized response shape".to_string()
            ))
        }
    }
}

// ===== Gateway =====

/// Text-generation gateway for the Hugging Face inference API
#[derive(Debug, Clone)]
pub struct CodeGenerationApi
{   config: crate::config::CodegenConfig
}

impl CodeGenerationApi
{   pub fn new(config: &crate::config::CodegenConfig) -> Self
    {   debug!("Creating CodeGenerationApi for {}", config.api_base);
        CodeGenerationApi
        {   config: config.clone()
        }
    }

    async fn query_model(
      &self
    , session: &crate::providers::Session
    , prompt: &str
    , family: ModelFamily
    , params: &GenerationParameters
    ) -> Result<ModelResponse, Error>
    {   let payload = InferenceRequest::new(prompt, family, params);
        trace!("{} request: {:?}", family, payload);

        let mut request = session.http_client()
          .post(self.config.endpoint(family))
          .json(&payload);
        if let Some(key) = &self.config.api_key
        {   request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
          error!("HTTP error from {}: {}", family, e);
          Error::Query
          {   model: family.id().to_string()
            , message: e.to_string()
          }
        })?;

        let status = response.status();
        trace!("{} response status: {}", family, status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("{} API error ({}): {}", family, status, error_text);
            return Err(Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        let body: Value = response.json().await.map_err(|e| {
          error!("Parse error from {}: {}", family, e);
          Error::Query
          {   model: family.id().to_string()
            , message: e.to_string()
          }
        })?;

        let text = ReplyShape::classify(&body)
          .extract(family)
          .map_err(|e| {
            error!("Unexpected reply from {}: {}", family, body);
            Error::Query
            {   model: family.id().to_string()
              , message: e.to_string()
            }
          })?;

        debug!("{} returned {} bytes", family, text.len());
        Ok(ModelResponse::success(text, body))
    }
}

impl crate::providers::CodeGenerator for CodeGenerationApi
{   async fn generate(
      &self
    , session: &crate::providers::Session
    , prompt: &str
    , model: &str
    , language: &str
    , params: &GenerationParameters
    ) -> ModelResponse
    {   debug!("Generating code: language={}, model={}", language, model);
        let family = match ModelFamily::from_id(model)
        {   Some(family) => family
          , None => {
              error!("Unknown model requested: {}", model);
              return ModelResponse::from_error(
                Error::UnknownModel(model.to_string())
              );
            }
        };

        match self.query_model(session, prompt, family, params).await
        {   Ok(response) => response
          , Err(e) => ModelResponse::from_error(e)
        }
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use serde_json::json;

    #[test]
    fn do_sample_only_sent_to_starcoder()
    {   let params = GenerationParameters::default();
        let starcoder = serde_json::to_value(
          InferenceRequest::new("p", ModelFamily::StarCoder, &params)
        ).unwrap();
        let qwen = serde_json::to_value(
          InferenceRequest::new("p", ModelFamily::Qwen, &params)
        ).unwrap();
        assert_eq!(starcoder["parameters"]["do_sample"], json!(true));
        assert!(qwen["parameters"].get("do_sample").is_none());
        assert_eq!(qwen["parameters"]["max_new_tokens"], json!(500));
        assert_eq!(qwen["inputs"], json!("p"));
    }

    #[test]
    fn reply_shapes_by_family()
    {   let mapping = json!([{"generated_text": "a"}]);
        let bare = json!(["b", "c"]);
        assert_eq!(
          ReplyShape::classify(&mapping).extract(ModelFamily::StarCoder),
          Ok("a".to_string())
        );
        assert_eq!(
          ReplyShape::classify(&bare).extract(ModelFamily::Qwen),
          Ok("b".to_string())
        );
        assert!(ReplyShape::classify(&bare)
          .extract(ModelFamily::StarCoder)
          .is_err());
    }

    #[test]
    fn odd_shapes_are_unrecognized()
    {   for body in [json!([]), json!({"generated_text": "x"}), json!([42]), json!([{"text": "x"}])]
        {   assert_eq!(ReplyShape::classify(&body), ReplyShape::Unrecognized);
        }
    }
}
