use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("There should be the same number of peak tables as coverage tracks (tracks={tracks}, peak tables={peak_tables})")]
    MismatchedInput { tracks: usize, peak_tables: usize },

    #[error("No peak regions found across all peak tables")]
    NoPeaks,

    #[error("Invalid score bundle: {0}")]
    InvalidBundle(String),

    #[error("Invalid peaks in {} at line {line}: {message}", path.display())]
    InvalidPeaks {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Coverage track {}: {message}", path.display())]
    Coverage { path: PathBuf, message: String },

    #[error("Pattern discovery failed: {0}")]
    Discovery(String),

    #[error("Invalid discovery result: {0}")]
    InvalidDiscoveryResult(String),

    #[error("Failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_bundle(message: impl Into<String>) -> Self {
        Error::InvalidBundle(message.into())
    }

    pub fn invalid_peaks(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::InvalidPeaks {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub fn handle_error_and_exit(err: Error) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
