//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Map each subcommand to its static task descriptor.
//!
//! Non-responsibilities:
//! - Does not execute tasks (see `dispatch` module).
//! - Does not load configuration (see `main()`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tasks::{self, TaskDescriptor};

#[derive(Parser, Debug)]
#[command(name = "ftrack-services")]
#[command(about = "Launch and maintain the ftrack addon services", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
#[command(
    after_help = "Examples:\n  ftrack-services install\n  ftrack-services leecher\n  ftrack-services processor\n  ftrack-services package --output /srv/addons\n"
)]
pub struct Cli {
    /// Task to run; prints the usage banner when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the usage banner
    Help,

    /// Print the usage banner
    Default,

    /// Install service dependencies into the virtual environment
    Install,

    /// Start the ftrack event leecher
    Leecher,

    /// Start the ftrack event processor
    Processor,

    /// Build the addon server package
    Package {
        /// Directory where the package is created (purged if it already exists)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Create only the server folder structure, skip zipping
        #[arg(long)]
        skip_zip: bool,

        /// Keep the folder structure after the server zip is created
        #[arg(long)]
        keep_sources: bool,
    },
}

impl Commands {
    /// Static descriptor of the task this subcommand runs.
    pub fn descriptor(&self) -> &'static TaskDescriptor {
        match self {
            Commands::Help => &tasks::HELP,
            Commands::Default => &tasks::DEFAULT,
            Commands::Install => &tasks::INSTALL,
            Commands::Leecher => &tasks::LEECHER,
            Commands::Processor => &tasks::PROCESSOR,
            Commands::Package { .. } => &tasks::PACKAGE,
        }
    }
}
