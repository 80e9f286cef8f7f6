//! Command-line arguments.

use std::path::PathBuf;

use arbor_application::FailurePolicy;
use clap::{Parser, Subcommand, ValueEnum};

use crate::settings::Overrides;

#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(about = "Reorganize the folders and requests of an API collection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Collection directory
    #[arg(value_name = "COLLECTION_DIR")]
    pub collection: PathBuf,

    /// Per-operation persistence timeout in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// What to do with the in-memory tree when writing to disk fails
    #[arg(long, value_enum, value_name = "POLICY", global = true)]
    pub on_failure: Option<FailureArg>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Settings given on the command line, applied over file and environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            persistence_timeout_ms: self.timeout_ms,
            on_failure: self.on_failure.map(FailurePolicy::from),
        }
    }
}

/// Items are addressed by uid or by path relative to the collection directory.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the collection tree
    Tree {
        /// Show item uids
        #[arg(long)]
        uids: bool,
    },
    /// Drop an item onto another item
    Move { dragged: String, target: String },
    /// Move an item to the top level of the collection
    MoveRoot { item: String },
    /// Duplicate an item next to the original
    Clone {
        item: String,
        name: String,
        filename: String,
    },
    /// Change the display name and/or file name of an item
    Rename {
        item: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        filename: Option<String>,
    },
    /// Delete an item and everything below it
    Delete { item: String },
    /// Create a request at the end of a container
    NewRequest {
        name: String,
        filename: String,
        /// Containing folder; the collection root when omitted
        #[arg(long)]
        parent: Option<String>,
        /// Request definition as JSON
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
    },
    /// Create an empty folder
    NewFolder {
        name: String,
        directory: String,
        /// Containing folder; the collection root when omitted
        #[arg(long)]
        parent: Option<String>,
    },
    /// Renumber the requests of a container to 1..n
    Resequence {
        /// Folder to renumber; the collection root when omitted
        #[arg(long)]
        parent: Option<String>,
    },
    /// Create an empty collection in COLLECTION_DIR
    Init { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailureArg {
    /// Keep the intended tree and report the failure
    KeepOptimistic,
    /// Reload the tree from disk
    Resync,
}

impl From<FailureArg> for FailurePolicy {
    fn from(arg: FailureArg) -> Self {
        match arg {
            FailureArg::KeepOptimistic => Self::KeepOptimistic,
            FailureArg::Resync => Self::Resync,
        }
    }
}
