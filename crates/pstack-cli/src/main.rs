//! # validate-prompt-stack CLI Entry Point
//!
//! Loads a prompt-stack configuration, validates it against the JSON
//! Schema, and reports advisory role/model cross-reference warnings.
//!
//! Exit codes:
//! - `0` — configuration conforms to the schema (warnings do not change this)
//! - `1` — configuration fails schema validation
//! - `2` — usage error, or an execution error (unreadable file, bad YAML or
//!   JSON, uncompilable schema)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pstack_schema::{SchemaValidationError, SchemaValidator};

/// Default schema location, relative to the working directory.
const DEFAULT_SCHEMA_PATH: &str = "docs/prompt-stack.schema.json";

/// Validate a prompt-stack configuration file.
///
/// Runs strict JSON Schema validation, then an advisory scan that warns
/// about role candidates referencing undeclared models.
#[derive(Parser, Debug)]
#[command(name = "validate-prompt-stack", version, about)]
struct Cli {
    /// Path to the prompt-stack configuration file (YAML).
    config: Option<PathBuf>,

    /// Path to the JSON Schema to validate against.
    #[arg(long, default_value = DEFAULT_SCHEMA_PATH)]
    schema: PathBuf,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only the validation report.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(config) = cli.config else {
        println!("Usage: validate-prompt-stack <path-to-prompt-stack.yaml>");
        return ExitCode::from(2);
    };

    run(&config, &cli.schema)
}

fn run(config: &Path, schema: &Path) -> ExitCode {
    let validator = match SchemaValidator::from_file(schema) {
        Ok(validator) => validator,
        Err(e) => return execution_error(e),
    };
    tracing::debug!(schema = %schema.display(), "schema loaded");

    match validator.validate_config_file(config) {
        Ok(doc) => {
            println!("Validation passed (advisory).");
            for warning in doc.unknown_model_refs() {
                println!("{warning}");
            }
            println!("Done.");
            ExitCode::SUCCESS
        }
        Err(SchemaValidationError::ValidationFailed { violations, .. }) => {
            println!("Validation failed:");
            println!("{violations}");
            ExitCode::from(1)
        }
        Err(e) => execution_error(e),
    }
}

fn execution_error(e: SchemaValidationError) -> ExitCode {
    eprintln!("Error: {e}");
    ExitCode::from(2)
}
