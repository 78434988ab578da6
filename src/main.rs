//! typeinfer - CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use typeinfer::util::config::{load_config, Config};
use typeinfer::util::logger;
use typeinfer::{check_file, NAME, VERSION};

/// Hindley-Milner type inference over JSON syntax trees
#[derive(Parser, Debug)]
#[command(name = "typeinfer")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Infer types for a JSON syntax tree and report type errors
    Check {
        /// Syntax tree file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// TOML configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Check { file, config, json } => {
            let config = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                None => Config::default(),
            };
            if args.verbose {
                logger::init_debug();
            } else {
                logger::init_with_level(config.log.level()?);
            }

            let report = check_file(&file, &config)
                .with_context(|| format!("Failed to check: {}", file.display()))?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                for (node, ty) in report.annotation_lines()? {
                    println!("{}: {}", node, ty);
                }
                eprint!("{}", report.render_diagnostics());
            }
            if report.has_errors() {
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}
