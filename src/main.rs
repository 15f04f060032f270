use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{debug, error};

use polygen::{
    CodeCompleter, CodegenClient, CodegenConfig, CompletionOutcome,
    CompletionParameters, Error, GenerationParameters, GenerationRequest,
    MockCodeGenerationApi, BatchResults,
};
use polygen::request::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};

#[derive(Debug, Parser)]
#[command(name = "polygen", version, about = "Generate code across languages and models")]
struct Cli
{   /// JSON configuration file
    #[arg(long, global = true, env = "POLYGEN_CONFIG")]
    config: Option<PathBuf>
  , #[command(subcommand)]
    command: Command
}

#[derive(Debug, Subcommand)]
enum Command
{   /// Fan a task out over every (language, model) pair
    Generate(GenerateArgs)
  , /// Fill `[...]` / `<...>` placeholders in a Python file
    Complete(CompleteArgs)
}

#[derive(Debug, Args)]
struct GenerateArgs
{   /// Task description
    task: String
  , #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32
  , #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32
  , #[arg(long, default_value_t = DEFAULT_TOP_P)]
    top_p: f32
  , /// Use canned offline answers instead of the API
    #[arg(long)]
    mock: bool
}

#[derive(Debug, Args)]
struct CompleteArgs
{   /// Python file containing placeholders
    file: PathBuf
  , #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32
  , #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32
}

#[tokio::main]
async fn main() -> ExitCode
{   dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    debug!("{:?}", cli.command);

    match run(cli).await
    {   Ok(()) => ExitCode::SUCCESS
      , Err(e) => {
          error!("{}", e);
          eprintln!("polygen: {}", e);
          ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error>
{   let config = match &cli.config
    {   Some(path) => CodegenConfig::from_json_file(path)?
      , None => CodegenConfig::from_env()?
    };

    match cli.command
    {   Command::Generate(args) => generate(config, args).await
      , Command::Complete(args) => complete(config, args).await
    }
}

async fn generate(config: CodegenConfig, args: GenerateArgs)
  -> Result<(), Error>
{   let params = GenerationParameters::new(
      args.max_tokens
    , args.temperature
    , args.top_p
    )?;
    let request = GenerationRequest::with_defaults(args.task, &config, params);

    let results = if args.mock
    {   CodegenClient::with_generator(MockCodeGenerationApi::new(), config)
          .generate_all(&request)
          .await?
    } else
    {   CodegenClient::new(config)
          .generate_all(&request)
          .await?
    };

    print_panels(&results);
    Ok(())
}

fn print_panels(results: &BatchResults)
{   for (pair, response) in results.iter()
    {   println!("===== {} / {} =====", pair.language, pair.model);
        match response.error()
        {   None => println!("{}\n", response.generated_text())
          , Some(err) => println!("Error: {}\n", err)
        }
    }
}

async fn complete(config: CodegenConfig, args: CompleteArgs)
  -> Result<(), Error>
{   let code = std::fs::read_to_string(&args.file)
      .map_err(|e| Error::InvalidConfiguration(
        format!("{}: {}", args.file.display(), e)
      ))?;
    let params = CompletionParameters
    {   max_tokens: args.max_tokens
      , temperature: args.temperature
    };

    match CodeCompleter::new(config).complete(&code, &params).await?
    {   CompletionOutcome::Rejected => Err(Error::InvalidSyntax)
      , CompletionOutcome::Completed { result, post_valid } => {
          if let Some(err) = result.error()
          {   return Err(Error::Other(err.to_string()));
          }
          println!("### Completed Code:\n{}\n", result.generated_text());
          if post_valid
          {   println!("Generated code is syntactically correct!");
          } else
          {   println!("Warning: generated code might have syntax errors");
          }
          Ok(())
        }
    }
}
