//! CLI binary entry point for uml-schema-cli

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use uml_schema_sdk::cli::CliConfig;
#[cfg(feature = "cli")]
use uml_schema_sdk::cli::commands::generate::{GenerateArgs, handle_generate};
#[cfg(feature = "cli")]
use uml_schema_sdk::cli::commands::validate::handle_validate;
#[cfg(feature = "cli")]
use uml_schema_sdk::cli::error::CliError;
#[cfg(feature = "cli")]
use uml_schema_sdk::models::CollisionPolicy;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "uml-schema-cli")]
#[command(about = "Derive PostgreSQL DDL from UML class diagrams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Generate an idempotent PostgreSQL script from a diagram
    Generate {
        /// Input file path (.json, .yaml) or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the JSON response (script plus statistics) instead of the bare script
        #[arg(long)]
        json: bool,
        /// Rename colliding table names with _2, _3, ... instead of warning
        #[arg(long)]
        suffix_collisions: bool,
        /// Omit the header and trailer comments
        #[arg(long)]
        no_banner: bool,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },
    /// Check a diagram for naming collisions, orphaned relationships and inheritance cycles
    Validate {
        /// Input file path or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            json,
            suffix_collisions,
            no_banner,
            force,
        } => load_config().and_then(|config| {
            let mut options = config.generator;
            if suffix_collisions {
                options.collision_policy = CollisionPolicy::Suffix;
            }
            if no_banner {
                options.include_banner = false;
            }

            handle_generate(&GenerateArgs {
                input,
                output,
                json,
                force,
                options,
            })
        }),
        Commands::Validate { input } => handle_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_config() -> Result<CliConfig, CliError> {
    let cwd = std::env::current_dir().map_err(|e| CliError::ConfigError(e.to_string()))?;
    CliConfig::load(&cwd).map_err(|e| CliError::ConfigError(format!("{:#}", e)))
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
