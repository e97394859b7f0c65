//! gfbmdl-export - GFBMDL model tool
//!
//! Converts JSON host scenes to .gfbmdl files and inspects existing models.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gfbmdl_common::formats::schema::{ALL_SCHEMAS, find_schema};
use gfbmdl_common::{DecodeMode, decode_model_with};
use std::path::{Path, PathBuf};

use gfbmdl_export::{ModelSummary, config, export, import, scene};

#[derive(Parser)]
#[command(name = "gfbmdl-export")]
#[command(about = "GFBMDL model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a JSON host scene to .gfbmdl
    Export {
        /// Input scene JSON
        input: PathBuf,

        /// Output .gfbmdl file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export settings (export.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Decode a .gfbmdl into the host-facing scene view (JSON)
    Import {
        /// Input .gfbmdl file
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep going past broken materials, meshes and bones
        #[arg(long)]
        best_effort: bool,
    },

    /// Print version, counts and per-mesh layout
    Info {
        /// Input .gfbmdl file
        input: PathBuf,
    },

    /// Dump the full document as JSON
    Dump {
        /// Input .gfbmdl file
        input: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print table schemas with their vtable slots
    Schema {
        /// Only this table type
        table: Option<String>,
    },
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))
}

/// Write to `output` if given, stdout otherwise.
fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => write_file(path, text.as_bytes()),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config: config_path,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("gfbmdl"));
            tracing::info!("Exporting {:?} -> {:?}", input, output);

            let config = config::load_config_or_default(config_path.as_deref())?;
            let scene = scene::load_scene(&input)?;
            let (bytes, warnings) = export::export_to_bytes(&scene, &config)
                .with_context(|| format!("Failed to export {:?}", input))?;
            for warning in &warnings {
                tracing::warn!("{}", warning);
            }
            write_file(&output, &bytes)?;
            tracing::info!("Wrote {} bytes", bytes.len());
        }

        Commands::Import {
            input,
            output,
            best_effort,
        } => {
            let mode = if best_effort {
                DecodeMode::BestEffort
            } else {
                DecodeMode::Strict
            };
            let bytes = read_file(&input)?;
            let scene = import::import_bytes(&bytes, mode)
                .with_context(|| format!("Failed to import {:?}", input))?;
            for error in &scene.errors {
                tracing::warn!("{}", error);
            }
            let json = serde_json::to_string_pretty(&scene)?;
            emit(output.as_deref(), &json)?;
        }

        Commands::Info { input } => {
            let bytes = read_file(&input)?;
            let report = decode_model_with(&bytes, DecodeMode::BestEffort)
                .with_context(|| format!("Failed to decode {:?}", input))?;
            println!("{}", ModelSummary::new(&report.model));
            for error in &report.errors {
                println!("error: {}", error);
            }
        }

        Commands::Dump { input, output } => {
            let bytes = read_file(&input)?;
            let report = decode_model_with(&bytes, DecodeMode::BestEffort)
                .with_context(|| format!("Failed to decode {:?}", input))?;
            for error in &report.errors {
                tracing::warn!("{}", error);
            }
            let json = serde_json::to_string_pretty(&report.model)?;
            emit(output.as_deref(), &json)?;
        }

        Commands::Schema { table } => match table {
            Some(name) => {
                let schema = find_schema(&name)
                    .with_context(|| format!("Unknown table type '{}'", name))?;
                println!("{}", schema);
            }
            None => {
                for schema in ALL_SCHEMAS {
                    println!("{}\n", schema);
                }
            }
        },
    }

    Ok(())
}
