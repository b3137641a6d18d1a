//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use geonear::augment::AugmentError;
use geonear::table::TableError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Input file does not exist
    InputNotFound(PathBuf),
    /// A --distance or --neighbor payload failed to parse
    InvalidRequest(String),
    /// Table loading or saving failed
    Table(TableError),
    /// An augmentation operation failed
    Augment(AugmentError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        if let CliError::InvalidRequest(_) = self {
            eprintln!();
            eprintln!("Request formats:");
            eprintln!("  --distance NAME,LAT,LON     e.g. --distance d_hq,40.0,-75.0");
            eprintln!("  --neighbor ID,DIST,FILE     e.g. --neighbor nn,nn_dist,stations.csv");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InputNotFound(path) => {
                write!(f, "Input file '{}' does not exist", path.display())
            }
            CliError::InvalidRequest(msg) => write!(f, "{}", msg),
            CliError::Table(e) => write!(f, "{}", e),
            CliError::Augment(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Table(e) => Some(e),
            CliError::Augment(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TableError> for CliError {
    fn from(e: TableError) -> Self {
        CliError::Table(e)
    }
}

impl From<AugmentError> for CliError {
    fn from(e: AugmentError) -> Self {
        CliError::Augment(e)
    }
}
