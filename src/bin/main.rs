//! Morphe PSQL CLI - Compile Morphe specifications to PostgreSQL DDL
//!
//! Usage:
//!   morphe-psql compile <spec.toml> [--config <file>] [--out <dir>] [--format <format>]
//!   morphe-psql validate <spec.toml> [--config <file>]
//!   morphe-psql list <spec.toml>
//!
//! Examples:
//!   morphe-psql compile schema.toml
//!   morphe-psql compile schema.toml --out db/ --config morphe-psql.toml
//!   morphe-psql compile schema.toml --format json

use clap::{Parser, Subcommand, ValueEnum};
use morphe_psql::compile::CompiledSchema;
use morphe_psql::model::{InMemoryRegistry, Registry};
use morphe_psql::writer::{write_to_directory, Writers};
use morphe_psql::{Compiler, Settings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morphe-psql")]
#[command(about = "Morphe PSQL - Compile Morphe specifications to PostgreSQL schemas")]
#[command(version)]
struct Cli {
    /// Log compilation progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a specification to SQL
    Compile {
        /// Path to the specification file
        file: PathBuf,

        /// Settings file (defaults to MORPHE_PSQL_CONFIG, ./morphe-psql.toml, then the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write one file per artifact plus schema.sql into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format for stdout
        #[arg(short, long, default_value = "sql")]
        format: OutputFormat,
    },

    /// Compile a specification without emitting anything
    Validate {
        /// Path to the specification file
        file: PathBuf,

        /// Settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the objects in a specification
    List {
        /// Path to the specification file
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// The combined DDL script
    Sql,
    /// The compiled IR as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compile {
            file,
            config,
            out,
            format,
        } => cmd_compile(&file, config.as_deref(), out.as_deref(), format),
        Commands::Validate { file, config } => cmd_validate(&file, config.as_deref()),
        Commands::List { file } => cmd_list(&file),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "morphe_psql=debug" } else { "morphe_psql=info" };
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = level.parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config: Option<&Path>) -> Result<Settings, String> {
    let settings = match config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    settings
        .and_then(Settings::resolve)
        .map_err(|e| format!("Error loading settings: {}", e))
}

fn load_registry(file: &Path) -> Result<InMemoryRegistry, String> {
    InMemoryRegistry::from_file(file)
        .map_err(|e| format!("Error reading specification '{}': {}", file.display(), e))
}

fn compile(file: &Path, config: Option<&Path>) -> Result<CompiledSchema, String> {
    let settings = load_settings(config)?;
    let registry = load_registry(file)?;
    let compiler = Compiler::new(settings);

    compiler
        .compile_all(&registry, &mut Writers::psql())
        .map_err(|e| format!("Compilation error: {}", e))
}

fn cmd_compile(
    file: &Path,
    config: Option<&Path>,
    out: Option<&Path>,
    format: OutputFormat,
) -> ExitCode {
    let schema = match compile(file, config) {
        Ok(schema) => schema,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = out {
        return match write_to_directory(&schema, dir) {
            Ok(paths) => {
                for path in paths {
                    println!("wrote {}", path.display());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error writing to '{}': {}", dir.display(), e);
                ExitCode::FAILURE
            }
        };
    }

    match format {
        OutputFormat::Sql => {
            print!("{}", schema.to_script());
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&schema) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn cmd_validate(file: &Path, config: Option<&Path>) -> ExitCode {
    match compile(file, config) {
        Ok(schema) => {
            println!(
                "OK: {} is valid ({} artifacts)",
                file.display(),
                schema.len()
            );
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn cmd_list(file: &Path) -> ExitCode {
    let registry = match load_registry(file) {
        Ok(registry) => registry,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    println!("File: {}", file.display());
    println!();

    let sections = [
        ("Models", registry.model_names()),
        ("Enums", registry.enum_names()),
        ("Entities", registry.entity_names()),
        ("Structures", registry.structure_names()),
    ];

    let mut empty = true;
    for (title, names) in sections {
        if names.is_empty() {
            continue;
        }
        empty = false;
        println!("{}:", title);
        for name in names {
            println!("  - {}", name);
        }
        println!();
    }

    if empty {
        println!("No objects defined.");
    }

    ExitCode::SUCCESS
}
