//! Errors surfaced while loading configuration/problem files and while
//! writing search output.

use std::path::PathBuf;

/// Errors from parsing a `key=value` configuration or problem file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Could not read the file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A required key was absent.
    #[error("{path} is missing required key {key}")]
    MissingKey {
        /// The file being parsed.
        path: PathBuf,
        /// The missing key.
        key: &'static str,
    },
    /// A key expected an integer value but got something else.
    #[error("{path}: key {key} expects an integer, got {value:?}")]
    NotAnInteger {
        /// The file being parsed.
        path: PathBuf,
        /// The offending key.
        key: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },
}

/// Errors from assembling a [`crate::problem::Problem`] from a parsed
/// problem file.
#[derive(Debug, thiserror::Error)]
pub enum ProblemError {
    /// The file itself could not be loaded or had a malformed key.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `START_SFEN` or `TARGET_SFEN` could not be parsed.
    #[error("{field} is not a valid SFEN: {source}")]
    Sfen {
        /// Which field failed (`START_SFEN` or `TARGET_SFEN`).
        field: &'static str,
        /// The underlying parse error.
        #[source]
        source: proof_core::SfenError,
    },
    /// A `FIXED_PIECES` entry was not a valid two-digit square code.
    #[error(transparent)]
    Validation(#[from] proof_engine::ValidationError),
}

/// Top-level error returned by the binary's `run` entry point.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Loading `config.txt` failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Loading the problem file failed.
    #[error(transparent)]
    Problem(#[from] ProblemError),
    /// The search itself reported an error (invalid start/target pair, or
    /// an internal legal-move-generation failure).
    #[error(transparent)]
    Search(#[from] proof_engine::SearchError),
    /// Writing a solution to the output file failed.
    #[error("failed to write {path}: {source}")]
    OutputWrite {
        /// The output file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Neither `-i`/`--input` nor the config file's `INPUT_FILE` was set.
    #[error("no input file: pass -i/--input or set INPUT_FILE in config.txt")]
    NoInputFile,
    /// Neither `-o`/`--output` nor the config file's `OUTPUT_FILE` was set.
    #[error("no output file: pass -o/--output or set OUTPUT_FILE in config.txt")]
    NoOutputFile,
}
