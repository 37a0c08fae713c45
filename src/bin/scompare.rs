//! scompare - Structured Compare CLI tool
//!
//! A command line tool for comparing two documents that share a schema.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::debug;

use structured_compare::typed::{Parser as SchemaParser, DEFAULT_PAYLOAD_NAME};
use structured_compare::{Comparer, Loader};

/// Structured Compare - schema-driven comparison of configuration documents
#[derive(Parser, Debug)]
#[command(name = "scompare")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the schema file
    #[arg(short, long, global = true, env = "SCOMPARE_SCHEMA")]
    schema: Option<PathBuf>,

    /// Name of the document root type (defaults to the first schema type)
    #[arg(short, long, global = true, env = "SCOMPARE_TYPE")]
    type_name: Option<String>,

    /// Archive entry holding the document when a `.zip` file is given
    #[arg(short, long, global = true, env = "SCOMPARE_PAYLOAD", default_value = DEFAULT_PAYLOAD_NAME)]
    payload: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all types in the schema
    ListTypes,

    /// Check that a document decodes against the schema
    Validate {
        /// Document to validate
        file: PathBuf,
    },

    /// Compare two documents
    Compare {
        /// Source (old) document
        source: PathBuf,

        /// Target (new) document
        target: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Leave unchanged nodes out of the report
        #[arg(long)]
        only_differences: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let schema_path = match cli.schema {
        Some(ref path) => path,
        None => bail!("a schema is required: pass --schema or set SCOMPARE_SCHEMA"),
    };
    let parser = load_schema(schema_path)?;

    let type_name = match cli.type_name {
        Some(name) => name,
        None => match parser.type_names().first() {
            Some(name) => name.to_string(),
            None => bail!("no types found in schema {}", schema_path.display()),
        },
    };
    debug!("using root type {}", type_name);

    let parseable = parser.type_by_name(&type_name);
    if !parseable.is_valid() {
        bail!("type '{}' not found in schema", type_name);
    }

    let loader = Loader::new(parseable).with_payload_name(cli.payload);
    let mut output = io::stdout().lock();
    match cli.command {
        Command::ListTypes => {
            writeln!(output, "Types in schema:")?;
            for name in parser.type_names() {
                writeln!(output, "  - {}", name)?;
            }
        }
        Command::Validate { file } => {
            loader.load(&file)?;
            writeln!(output, "{}: valid", file.display())?;
        }
        Command::Compare {
            source,
            target,
            format,
            only_differences,
        } => {
            let comparer = Comparer::with_loader(loader);
            let pair = comparer.load_pair(&source, &target)?;
            let mut tree = comparer.compare(&pair);
            if only_differences {
                tree = tree.differences();
            }

            match format {
                Format::Text => {
                    if tree.differs() {
                        writeln!(output, "Documents differ:")?;
                    } else {
                        writeln!(output, "Documents are identical")?;
                    }
                    writeln!(output, "{}", tree)?;
                }
                Format::Json => {
                    serde_json::to_writer_pretty(&mut output, &tree)
                        .context("failed to write report")?;
                    writeln!(output)?;
                }
            }
        }
    }

    Ok(())
}

fn load_schema(path: &Path) -> Result<SchemaParser> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    SchemaParser::new(&content)
        .with_context(|| format!("failed to parse schema file {}", path.display()))
}
