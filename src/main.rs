use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{debug, warn};

use unitconv::{AiQuery, ConversionRequest, ConverterBackend, ConverterConfig};

#[derive(Parser)]
#[command(
  name = "unitconv"
, version
, about = "Convert values between physical units, directly or through an AI model"
)]
struct Cli
{   /// JSON config file (defaults to environment variables)
    #[arg(long, global = true, env = "UNITCONV_CONFIG")]
    config: Option<PathBuf>
  , #[command(subcommand)]
    mode: Mode
}

#[derive(Subcommand)]
enum Mode
{   /// Convert with the built-in unit registry
    #[command(allow_negative_numbers = true)]
    Simple
    {   /// Value to convert (non-negative)
        #[arg(value_parser = parse_non_negative)]
        value: f64
      , /// Source unit, e.g. "meters" or "kilometers per hour"
        from_unit: String
      , /// Target unit
        to_unit: String
      , /// Require both units to belong to this category
        #[arg(long)]
        category: Option<String>
    }
  , /// Ask the AI model, e.g. `advanced 100 meters to feet`
    Advanced
    {   #[arg(required = true, num_args = 1..)]
        query: Vec<String>
    }
  , /// List categories and their units
    Categories
}

fn parse_non_negative(raw: &str) -> Result<f64, String>
{   let value: f64 = raw.trim().parse()
      .map_err(|_| format!("'{}' is not a number", raw))?;
    if value < 0.0
    {   return Err("value must be non-negative".to_string());
    }
    Ok(value)
}

fn load_config(path: Option<&PathBuf>)
  -> Result<ConverterConfig, unitconv::Error>
{   match path
    {   Some(path) => ConverterConfig::from_json_file(path)
      , None => ConverterConfig::from_env()
    }
}

async fn run(cli: Cli) -> Result<String, unitconv::Error>
{   let config = match (load_config(cli.config.as_ref()), &cli.mode)
    {   (Ok(config), _) => config
      , (Err(e), Mode::Advanced { .. }) => return Err(e)
      , (Err(e), _) => {
          // Only the AI path needs configuration.
          warn!("Ignoring configuration error: {}", e);
          ConverterConfig::default()
        }
    };
    let backend = ConverterBackend::new(config);

    let closed = || unitconv::Error::Other(
      "Backend closed without replying".to_string()
    );

    let output = match cli.mode
    {   Mode::Simple { value, from_unit, to_unit, category } => {
          let mut request
            = ConversionRequest::new(value, &from_unit, &to_unit);
          if let Some(category) = category
          {   request = request.in_category(&category);
          }
          let mut rx = backend.convert(request).await?;
          rx.recv().await
            .ok_or_else(closed)
            .and_then(|reply| reply)
            .map(|conversion| format!("Result: {}", conversion))
        }
      , Mode::Advanced { query } => {
          let mut rx = backend
            .ai_convert(AiQuery::new(query.join(" ")))
            .await?;
          rx.recv().await
            .ok_or_else(closed)
            .and_then(|reply| reply)
            .map(|text| format!("AI Response: {}", text.trim_end()))
        }
      , Mode::Categories => {
          let mut rx = backend.get_categories().await?;
          rx.recv().await
            .ok_or_else(closed)
            .and_then(|reply| reply)
            .map(|categories| {
              categories.iter()
                .map(|c| format!("{}: {}", c.name, c.units.join(", ")))
                .collect::<Vec<_>>()
                .join("\n")
            })
        }
    };

    if let Err(e) = backend.shutdown().await
    {   debug!("Backend shutdown: {}", e);
    }
    output
}

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::init();
    let cli = Cli::parse();

    match run(cli).await
    {   Ok(output) => {
          println!("{}", output);
          ExitCode::SUCCESS
        }
      , Err(e) => {
          eprintln!("{}", e);
          ExitCode::FAILURE
        }
    }
}
