pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod prompt;
pub mod syntax;
pub mod completion;
pub mod client;
use serde::{Deserialize, Serialize};

/*

polygen fans one code-generation task out over a grid of
(target language, backing model) pairs on the Hugging Face
inference API and hands back one result per pair, in grid order.

polygen/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and backing model families
│   ├── error.rs        # Error taxonomy
│   ├── config.rs       # Endpoint, credential, timeouts, default grid
│   ├── request.rs      # Parameters, target pairs, uniform response
│   ├── prompt.rs       # Per-language prompt templates
│   ├── providers/      # CodeGenerator seam
│   │   ├── mod.rs      # Trait + shared session
│   │   ├── huggingface.rs
│   │   └── mock.rs     # Offline canned answers
│   ├── client.rs       # Fan-out over the (language, model) grid
│   ├── syntax.rs       # Local syntax checks (Python 3 parser)
│   ├── completion.rs   # Placeholder completion flow
│   └── main.rs         # CLI front end
└── tests/

*/

pub use client::{BatchResults, CodegenClient};
pub use completion::{CodeCompleter, CompletionOutcome, CompletionParameters};
pub use config::CodegenConfig;
pub use error::Error;
pub use prompt::PromptFormatter;
pub use providers::{CodeGenerator, Session};
pub use providers::huggingface::CodeGenerationApi;
pub use providers::mock::MockCodeGenerationApi;
pub use request::{GenerationParameters, GenerationRequest, ModelResponse, TargetPair};

/// POLYGEN STRUCTURES:

/// Backing model families reachable through the inference API.
/// Each family has its own endpoint, payload and reply shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily
{   /// Qwen2.5 Coder (instruction tuned)
    Qwen
  , /// BigCode StarCoder2
    StarCoder
}

impl ModelFamily
{   /// Every known family, in default fan-out order
    pub const ALL: [ModelFamily; 2]
      = [ModelFamily::Qwen, ModelFamily::StarCoder];

    /// Resolve a model identifier, ignoring case
    pub fn from_id(id: &str) -> Option<ModelFamily>
    {   match id.to_lowercase().as_str()
        {   "qwen" => Some(ModelFamily::Qwen)
          , "starcoder" => Some(ModelFamily::StarCoder)
          , _ => None
        }
    }

    /// Short identifier used in requests and logs
    pub fn id(&self) -> &'static str
    {   match self
        {   ModelFamily::Qwen => "qwen"
          , ModelFamily::StarCoder => "starcoder"
        }
    }

    /// Hub repository serving this family
    pub fn repository(&self) -> &'static str
    {   match self
        {   ModelFamily::Qwen => "Qwen/Qwen2.5-Coder-32B-Instruct"
          , ModelFamily::StarCoder => "bigcode/starcoder2-15b"
        }
    }

    /// Only StarCoder takes the `do_sample` flag
    pub fn accepts_do_sample(&self) -> bool
    {   matches!(self, ModelFamily::StarCoder)
    }

    /// Whether the family may reply with bare strings
    /// instead of `{generated_text}` mappings
    pub fn allows_bare_text(&self) -> bool
    {   matches!(self, ModelFamily::Qwen)
    }
}

impl std::fmt::Display for ModelFamily
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   f.write_str(self.id())
    }
}
