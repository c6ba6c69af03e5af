use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use transpub_core::config::RootConfig;
use transpub_infrastructure::ConfigService;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "transpub")]
#[command(about = "Publish locale translations to the shared translations repository", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a translations file for a locale
    Publish {
        /// Locale identifier, e.g. `fr` or `zh-cn`
        #[arg(long, short)]
        locale: String,
        /// JSON object mapping translation keys to strings
        #[arg(long, short)]
        file: PathBuf,
        /// GitHub access token; overrides secret.json and the environment
        #[arg(long)]
        token: Option<String>,
    },
    /// Print the repository path of a locale's translations file
    Path {
        locale: String,
    },
    /// Print the effective configuration
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<RootConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new_default()?,
    };
    service
        .get_config()
        .with_context(|| format!("Failed to load {}", service.path().display()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Publish {
            locale,
            file,
            token,
        } => {
            commands::publish::run(&config, &locale, &file, token, cli.config.as_deref()).await
        }
        Commands::Path { locale } => {
            println!("{}", commands::path::resolve(&config, &locale)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            print!("{}", commands::config::render(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
