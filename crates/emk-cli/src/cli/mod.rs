//! CLI for the emk Emoji Kitchen downloader.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use emk_core::config::{self, EmkConfig};
use emk_core::storage::FilenameFormat;
use std::path::PathBuf;

use commands::{
    run_all, run_batch, run_bulk, run_checksum, run_completions, run_count, run_get, run_man,
    run_metadata,
};

/// Top-level CLI for emk.
#[derive(Debug, Parser)]
#[command(name = "emk", version)]
#[command(about = "emk: download Emoji Kitchen combination images", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Per-invocation overrides of config.toml.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Directory images are written to.
    #[arg(long, short = 'o', global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Image size in pixels (16-1024).
    #[arg(long, global = true, value_name = "PX")]
    pub size: Option<u32>,

    /// Maximum downloads in flight.
    #[arg(long, short = 'c', global = true, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Minimum spacing between requests, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Download even if the image is already on disk.
    #[arg(long, global = true)]
    pub no_skip: bool,

    /// File naming: emoji, codepoint, or auto.
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<FilenameFormat>,

    /// Only print errors and the final totals.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalArgs {
    pub fn apply(&self, cfg: &mut EmkConfig) {
        if let Some(dir) = &self.output {
            cfg.output_dir = Some(dir.clone());
        }
        if let Some(size) = self.size {
            cfg.size = size;
        }
        if let Some(n) = self.concurrency {
            cfg.max_concurrent = n;
        }
        if let Some(ms) = self.delay_ms {
            cfg.delay_ms = ms;
        }
        if self.no_skip {
            cfg.skip_existing = false;
        }
        if let Some(format) = self.format {
            cfg.filename_format = format;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one combination.
    Get {
        /// First emoji (or code point, e.g. 1f600).
        left: String,
        /// Second emoji.
        right: String,
    },

    /// Download every pair listed in a file (one `left right` per line).
    Batch {
        /// Path to the pair file.
        file: PathBuf,
    },

    /// Download all pairs of a set of emoji (default: 100 popular emoji).
    Bulk {
        /// Emoji to combine; repeat the flag for each one.
        #[arg(long = "emoji", value_name = "EMOJI")]
        emoji: Vec<String>,
    },

    /// Download every known combination of one emoji, per the metadata catalog.
    All {
        /// Base emoji.
        emoji: String,
        /// Stop after N combinations.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Manage the cached metadata catalog.
    Metadata {
        #[command(subcommand)]
        command: MetadataCommand,
    },

    /// Count downloaded images, overall or for one emoji.
    Count {
        /// Only count images under this emoji's directory.
        emoji: Option<String>,
    },

    /// Compute SHA-256 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

#[derive(Debug, Subcommand)]
pub enum MetadataCommand {
    /// Download the catalog and replace the cached copy.
    Update,
    /// Show the cached catalog's location, size, and age.
    Info,
    /// Check whether a combination exists.
    Check {
        left: String,
        right: String,
    },
    /// List the combinations of one emoji.
    List {
        emoji: String,
        /// Print at most N entries.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
}

fn load_config(global: &GlobalArgs) -> Result<EmkConfig> {
    let mut cfg = config::load_or_init()?;
    global.apply(&mut cfg);
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    /// Parses the process arguments and runs the command. `Ok(false)` means
    /// the command ran but some downloads failed.
    pub async fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();
        let quiet = cli.global.quiet;

        match cli.command {
            CliCommand::Get { left, right } => {
                run_get(&load_config(&cli.global)?, &left, &right, quiet).await
            }
            CliCommand::Batch { file } => run_batch(&load_config(&cli.global)?, &file, quiet).await,
            CliCommand::Bulk { emoji } => run_bulk(&load_config(&cli.global)?, &emoji, quiet).await,
            CliCommand::All { emoji, limit } => {
                run_all(&load_config(&cli.global)?, &emoji, limit, quiet).await
            }
            CliCommand::Metadata { command } => {
                run_metadata(&load_config(&cli.global)?, command).await?;
                Ok(true)
            }
            CliCommand::Count { emoji } => {
                run_count(&load_config(&cli.global)?, emoji.as_deref())?;
                Ok(true)
            }
            CliCommand::Checksum { path } => {
                run_checksum(&path)?;
                Ok(true)
            }
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(true)
            }
            CliCommand::Man => {
                run_man()?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests;
