//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract message descriptors and write per-file catalogs
//! - `init`: Initialize an intlx configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Arguments shared by commands that read a project.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root: where the config file is searched and catalogs are mirrored from
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Catalog output directory (overrides config file). Relative to --source-root,
    /// and catalogs mirror each source file's path relative to --source-root
    #[arg(long)]
    pub messages_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to create the config file in
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Pre-fill `messagesDir` in the generated config
    #[arg(long)]
    pub messages_dir: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract message descriptors, rewrite call sites and write JSON catalogs
    Extract(ExtractCommand),
    /// Initialize a new .intlxrc.json configuration file
    Init(InitCommand),
}
