// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use pset_compose::config::{load_config, PublishedConfig};
use pset_compose::observability::init_tracing;
use pset_compose::params::ParameterDiff;
use std::path::{Path, PathBuf};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "pset-compose")]
#[command(about = "Compose, validate and dump producer configurations", long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `pset_compose=trace`; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a document and check the dependency order of every sequence.
    Check { file: PathBuf },

    /// Print the published configuration.
    Dump {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,

        /// Only this sequence and what it schedules
        #[arg(short, long)]
        sequence: Option<String>,
    },

    /// Show how module `b` differs from module `a`.
    Diff { file: PathBuf, a: String, b: String },

    /// Print a sequence's modules in execution order.
    Flatten { file: PathBuf, sequence: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.cmd {
        Commands::Check { file } => {
            let config = load(&file)?;
            let mut failed = 0;
            for sequence in config.sequences() {
                match config.validate_dependencies(sequence.name()) {
                    Ok(()) => println!("ok    {} ({} modules)", sequence.name(), sequence.modules().len()),
                    Err(errors) => {
                        failed += 1;
                        println!("FAIL  {}", sequence.name());
                        for error in errors {
                            println!("      {}", error);
                        }
                    }
                }
            }
            if failed > 0 {
                bail!("{} sequence(s) in {} failed dependency validation", failed, file.display());
            }
        }
        Commands::Dump { file, format, sequence } => {
            let config = load(&file)?;
            let output = match sequence {
                Some(name) => {
                    let view = config
                        .subset(&name)
                        .with_context(|| format!("no sequence named '{}' in {}", name, file.display()))?;
                    match format {
                        Format::Yaml => view.to_yaml()?,
                        Format::Json => view.to_json()?,
                    }
                }
                None => match format {
                    Format::Yaml => config.to_yaml()?,
                    Format::Json => config.to_json()?,
                },
            };
            println!("{}", output.trim_end());
        }
        Commands::Diff { file, a, b } => {
            let config = load(&file)?;
            let left = config
                .module(&a)
                .with_context(|| format!("no module named '{}'", a))?;
            let right = config
                .module(&b)
                .with_context(|| format!("no module named '{}'", b))?;

            if left.kind() != right.kind() {
                println!("~ kind: {} -> {}", left.kind(), right.kind());
            }
            for diff in left.diff(right) {
                match diff {
                    ParameterDiff::Added { name, value } => println!("+ {}: {}", name, value),
                    ParameterDiff::Removed { name, value } => println!("- {}: {}", name, value),
                    ParameterDiff::Changed { name, before, after } => {
                        println!("~ {}: {} -> {}", name, before, after)
                    }
                    ParameterDiff::TrackingChanged { name, untracked } => {
                        println!("~ {}: {}", name, if untracked { "now untracked" } else { "now tracked" })
                    }
                }
            }
        }
        Commands::Flatten { file, sequence } => {
            let config = load(&file)?;
            let published = config
                .sequence(&sequence)
                .with_context(|| format!("no sequence named '{}' in {}", sequence, file.display()))?;
            for module in published.modules() {
                println!("{}", module);
            }
        }
    }

    Ok(())
}

fn load(file: &Path) -> Result<PublishedConfig> {
    load_config(file).with_context(|| format!("loading {}", file.display()))
}
