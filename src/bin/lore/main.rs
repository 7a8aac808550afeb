//! lore CLI tool
//!
//! Command-line interface for validating a lore corpus and generating its site data.
//!
//! ## Commands
//!
//! - `validate [root]`: Run every check and print the report
//! - `build [root]`: Validate, then write the site data JSON files
//! - `graph [root]`: Print the merged relationship graph, or one map's location graph, as JSON
//!
//! Exit status is 0 when the corpus has no errors and 1 otherwise. A missing vocabulary, schema or
//! malformed `lore.toml` aborts with the error's own exit code before any record is read.

use clap::{Parser, Subcommand};
use lore_core::{compiler::CorpusCompiler, LoreError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lore")]
#[command(author, version, about = "Validate a narrative knowledge base and build its site data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every record and print the report
    Validate {
        /// Corpus root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate, then write site data files
    Build {
        /// Corpus root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output directory (default: `output_dir` from lore.toml, i.e. site/data)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the merged relationship graph as JSON without writing files
    Graph {
        /// Corpus root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Print this map's location graph instead
        #[arg(long)]
        map: Option<String>,
    },
}

fn run(command: Commands) -> Result<bool, LoreError> {
    match command {
        Commands::Validate { root, verbose } => {
            if verbose {
                println!("Validating: {root:?}");
            }
            let compiler = CorpusCompiler::open(&root)?;
            let compilation = compiler.compile()?;
            println!("{}", "=".repeat(60));
            println!("Lore Validation Report");
            println!("{}", "=".repeat(60));
            print!("{}", compilation.report);
            Ok(compilation.passed())
        }

        Commands::Build {
            root,
            output,
            verbose,
        } => {
            let compiler = CorpusCompiler::open(&root)?;
            let outcome = compiler.build(output.as_deref())?;
            print!("{}", outcome.report);
            if !outcome.passed() {
                eprintln!("Site data not generated: fix the errors above first");
                return Ok(false);
            }
            for path in &outcome.written {
                if verbose {
                    println!("✓ Generated {}", path.display());
                }
            }
            println!("✓ Generated {} site data files", outcome.written.len());
            Ok(true)
        }

        Commands::Graph { root, map } => {
            let compiler = CorpusCompiler::open(&root)?;
            let compilation = compiler.compile()?;
            let json = match map {
                Some(map_id) => {
                    let graph = compilation.location_graph(&map_id).ok_or_else(|| {
                        LoreError::NotFound(format!("map '{map_id}' not found or has no root"))
                    })?;
                    serde_json::to_string_pretty(&graph)?
                }
                None => serde_json::to_string_pretty(&compilation.relation_graph())?,
            };
            println!("{json}");
            Ok(compilation.passed())
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
