//! Pizza Compare CLI
//!
//! Compares a pizza photo against a reference photo using a vision model and
//! a checklist of criteria.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pizza_compare::prelude::*;
use pizza_compare_cli::config::{
    CompareConfig, ConfigError, IssueLevel, SettingsOverrides, config_path as default_config_path,
    init_config, load_config_from, resolve_criteria,
};
use pizza_compare_cli::error::{CliError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Pizza Compare - check a pizza photo against a reference with a vision model
#[derive(Parser)]
#[command(name = "pizza-compare")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "PIZZA_COMPARE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a pizza image against a reference image
    Compare(CompareArgs),

    /// Print the prompt that would be sent, without calling the model
    Prompt(PromptArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Show configuration and API key status
    Status,
}

/// Images and checklist shared by `compare` and `prompt`.
#[derive(Args)]
struct InputArgs {
    /// Reference (standard) pizza image
    reference: PathBuf,

    /// Pizza image to check against the reference
    candidate: PathBuf,

    /// TOML file with [[criteria]] tables (replaces the configured checklist)
    #[arg(long, value_name = "FILE")]
    criteria: Option<PathBuf>,

    /// Criterion as NAME=DESC[;DESC...]; repeatable
    #[arg(long = "criterion", value_name = "SPEC")]
    criterion: Vec<String>,

    /// Prompt template (concise, detailed)
    #[arg(short, long)]
    template: Option<PromptTemplate>,
}

/// Arguments for the compare command
#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Model to use (overrides config)
    #[arg(short, long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Maximum output tokens (overrides config and template)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature (overrides config and template)
    #[arg(long)]
    temperature: Option<f32>,

    /// Print the prompt and exit without calling the model
    #[arg(long)]
    dry_run: bool,
}

/// Arguments for the prompt command
#[derive(Args)]
struct PromptArgs {
    #[command(flatten)]
    input: InputArgs,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration
    Validate,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ComparisonFailed) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
///
/// Logs go to stderr so that stdout carries only the analysis.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pizza_compare_cli={level},pizza_compare={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let config_file = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        Commands::Compare(args) => cmd_compare(args, &config_file).await,
        Commands::Prompt(args) => cmd_prompt(args, &config_file).await,
        Commands::Config(args) => cmd_config(args, &config_file).await,
        Commands::Status => cmd_status(&config_file).await,
    }
}

/// Images and rendered prompt for one comparison.
struct PreparedInput {
    reference: EncodedImage,
    candidate: EncodedImage,
    prompt: String,
}

async fn prepare(
    args: &InputArgs,
    config: &CompareConfig,
    template: PromptTemplate,
) -> Result<PreparedInput> {
    let criteria =
        resolve_criteria(args.criteria.as_deref(), &args.criterion, &config.criteria).await?;

    let reference = EncodedImage::load(&args.reference).await?;
    let candidate = EncodedImage::load(&args.candidate).await?;
    let prompt = template.render(reference.label(), candidate.label(), &criteria);

    tracing::debug!(
        template = %template,
        criteria = criteria.len(),
        reference = %reference,
        candidate = %candidate,
        "prepared comparison input"
    );

    Ok(PreparedInput {
        reference,
        candidate,
        prompt,
    })
}

/// Run a comparison.
async fn cmd_compare(args: CompareArgs, config_file: &Path) -> Result<()> {
    let config = load_config_from(config_file).await?;
    let settings = config.model.resolve(SettingsOverrides {
        model: args.model,
        template: args.input.template,
        max_tokens: args.max_tokens,
        temperature: args.temperature,
    });
    let input = prepare(&args.input, &config, settings.template).await?;

    if args.dry_run {
        println!("{}", input.prompt);
        return Ok(());
    }

    let openai_config = config.openai_config().ok_or_else(|| {
        ConfigError::MissingField(
            "provider.api_key (or set OPENAI_API_KEY / openai_api_key)".to_owned(),
        )
    })?;
    let client = OpenAI::new(openai_config)?;

    let request = ComparisonRequest::new(input.prompt, input.reference, input.candidate)
        .model(settings.model)
        .max_tokens(settings.max_tokens)
        .temperature(settings.temperature);

    let result = Comparator::new(client).compare(&request).await;
    println!("{result}");

    if result.is_success() {
        Ok(())
    } else {
        Err(CliError::ComparisonFailed)
    }
}

/// Print the rendered prompt.
async fn cmd_prompt(args: PromptArgs, config_file: &Path) -> Result<()> {
    let config = load_config_from(config_file).await?;
    let template = args.input.template.unwrap_or(config.model.template);
    let input = prepare(&args.input, &config, template).await?;
    println!("{}", input.prompt);
    Ok(())
}

/// Show status.
async fn cmd_status(config_file: &Path) -> Result<()> {
    println!("Pizza Compare Status\n");

    println!("Configuration:");
    println!("  Path:   {}", config_file.display());
    println!(
        "  Exists: {}",
        if config_file.exists() { "yes" } else { "no" }
    );

    match load_config_from(config_file).await {
        Ok(config) => {
            println!("  Valid:  yes");
            println!();
            println!("Model:");
            println!("  Endpoint:    {}", config.provider.base_url);
            println!("  Name:        {}", config.model.name);
            println!("  Template:    {}", config.model.template);
            println!("  Max tokens:  {}", config.model.effective_max_tokens());
            println!("  Temperature: {}", config.model.effective_temperature());
            println!();
            println!("Criteria:");
            for (idx, criterion) in config.criteria.iter().enumerate() {
                println!(
                    "  {}. {} ({} descriptions)",
                    idx + 1,
                    criterion.name,
                    criterion.descriptions.len()
                );
            }
            println!();
            println!(
                "API key: {}",
                if config.openai_config().is_some() { "available" } else { "missing" }
            );
        }
        Err(e) => {
            println!("  Valid:  no ({e})");
        }
    }

    println!();
    println!("Environment:");
    for name in OpenAIConfig::API_KEY_VARS {
        print_env_status(name);
    }
    print_env_status("OPENAI_MODEL");

    Ok(())
}

/// Configuration management.
async fn cmd_config(args: ConfigArgs, config_file: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommands::Show => {
            if config_file.exists() {
                let content = tokio::fs::read_to_string(config_file)
                    .await
                    .map_err(ConfigError::from)?;
                println!("{content}");
            } else {
                println!("Configuration file does not exist.");
                println!("Run 'pizza-compare config init' to create one.");
            }
        }
        ConfigCommands::Init { force } => {
            if init_config(config_file, force).await? {
                println!("Configuration created: {}", config_file.display());
                println!();
                println!("Next steps:");
                println!("  1. Edit the [[criteria]] tables in the file above");
                println!("  2. export OPENAI_API_KEY=<key>  (or put it in .env)");
                println!("  3. pizza-compare compare reference.jpg candidate.jpg");
            } else {
                println!("Configuration already exists at: {}", config_file.display());
                println!("Use --force to overwrite.");
            }
        }
        ConfigCommands::Validate => {
            let config = load_config_from(config_file).await?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("Configuration is valid");
            }
            for issue in &issues {
                let level = match issue.level {
                    IssueLevel::Warning => "warning",
                    IssueLevel::Error => "error",
                };
                println!("{level}: {}: {}", issue.field, issue.message);
            }
        }
    }

    Ok(())
}

/// Print environment variable status.
fn print_env_status(name: &str) {
    let status = if std::env::var(name).is_ok() {
        "set"
    } else {
        "-"
    };
    println!("  {name}: {status}");
}
