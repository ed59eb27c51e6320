//! Command-line interface for polyconf
//!
//! Validates, displays, converts and default-fills configuration files from
//! the shell.

use crate::config::{load_schema, ConfigManager};
use crate::format::Format;
use crate::models::Schema;
use crate::{trace_performance, PolyconfError, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// polyconf command-line interface
#[derive(Parser, Debug)]
#[command(name = "polyconf")]
#[command(about = "Validate and convert JSON, YAML, TOML and INI configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct PolyconfCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a configuration file against a schema
    Validate {
        /// Configuration file
        file: PathBuf,

        /// Schema document; the built-in schema is used when omitted
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Fill schema defaults before validating
        #[arg(long)]
        apply_defaults: bool,
    },

    /// Print a configuration file
    Show {
        /// Configuration file
        file: PathBuf,

        /// Comma-separated dotted paths to mask (e.g. "database.password")
        #[arg(short, long, value_delimiter = ',')]
        mask: Vec<String>,

        /// Output format; defaults to the format of the input file
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Rewrite a configuration file in the format of the output extension
    Convert {
        input: PathBuf,
        output: PathBuf,
    },

    /// Fill schema defaults into a configuration file
    Defaults {
        /// Configuration file
        file: PathBuf,

        /// Schema document; the built-in schema is used when omitted
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Write the result here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// CLI command executor
pub struct CliExecutor {
    json_output: bool,
}

impl CliExecutor {
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<()> {
        debug!(?command, "executing command");

        match command {
            Commands::Validate {
                file,
                schema,
                apply_defaults,
            } => self.validate(&file, schema.as_deref(), apply_defaults),
            Commands::Show { file, mask, format } => self.show(&file, &mask, format),
            Commands::Convert { input, output } => self.convert(&input, &output),
            Commands::Defaults {
                file,
                schema,
                output,
            } => self.defaults(&file, schema.as_deref(), output.as_deref()),
        }
    }

    fn validate(&self, file: &Path, schema: Option<&Path>, apply_defaults: bool) -> Result<()> {
        let mut manager = ConfigManager::load(file, load_optional_schema(schema)?)?;
        if apply_defaults {
            manager.apply_defaults();
        }

        manager.validate().map_err(PolyconfError::from)?;
        info!(file = %file.display(), "configuration is valid");

        if self.json_output {
            let report = json!({
                "file": file.display().to_string(),
                "valid": true,
                "defaults_applied": apply_defaults,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}: valid", file.display());
        }
        Ok(())
    }

    fn show(&self, file: &Path, mask: &[String], format: Option<Format>) -> Result<()> {
        let manager = ConfigManager::load(file, None)?;
        let masked = manager.masked(mask);

        if self.json_output {
            println!("{}", serde_json::to_string_pretty(&masked)?);
            return Ok(());
        }

        let format = match format.or_else(|| Format::from_path(file)) {
            Some(format) => format,
            None => anyhow::bail!("Cannot determine output format for {}", file.display()),
        };
        let rendered = format.serialize(&masked)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let manager = ConfigManager::load(input, None)?;
        trace_performance!("convert", { manager.save(output) })?;

        info!(input = %input.display(), output = %output.display(), "converted");
        if self.json_output {
            let report = json!({
                "input": input.display().to_string(),
                "output": output.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("Wrote {}", output.display());
        }
        Ok(())
    }

    fn defaults(&self, file: &Path, schema: Option<&Path>, output: Option<&Path>) -> Result<()> {
        let mut manager = ConfigManager::load(file, load_optional_schema(schema)?)?;
        manager.apply_defaults();

        match output {
            Some(output) => {
                manager.save(output)?;
                if self.json_output {
                    let report = json!({ "output": output.display().to_string() });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("Wrote {}", output.display());
                }
            }
            None if self.json_output => {
                println!("{}", serde_json::to_string_pretty(manager.config())?);
            }
            None => {
                let format = Format::from_path(file).unwrap_or(Format::Json);
                println!("{}", manager.render(format)?.trim_end());
            }
        }
        Ok(())
    }
}

fn load_optional_schema(path: Option<&Path>) -> std::result::Result<Option<Schema>, PolyconfError> {
    path.map(load_schema).transpose()
}

/// Run a parsed command line, exiting with status 1 on failure
pub fn run_cli(cli: PolyconfCli) -> Result<()> {
    let executor = CliExecutor::new(cli.json);

    if let Err(e) = executor.execute(cli.command) {
        if cli.json {
            let error_json = json!({
                "error": true,
                "message": e.to_string()
            });
            println!("{}", serde_json::to_string_pretty(&error_json)?);
        } else {
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
