//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: Issues with rule files, patterns and templates (fatal at load)
//! - TaskError: Issues while running a candidate's post-upgrade pipeline
//! - IoError: File system operation failures
//!
//! Two situations are deliberately *not* errors: a file that matches a path
//! pattern but yields no references (an extraction miss), and a guard command
//! exiting non-zero (the skip convention for conditional pipelines).

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Task pipeline related errors
    #[error(transparent)]
    Task(#[from] TaskError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to rule configuration
///
/// All of these are surfaced at load time where possible and terminate the
/// process; a malformed rule set is never silently ignored or deferred to
/// per-file processing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Rule file not found
    #[error("rule file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read rule file
    #[error("failed to read rule file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rule file parsing error (JSON or TOML)
    #[error("failed to parse rule file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Unsupported rule file format
    #[error("unsupported rule file format: {path} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },

    /// A regex in a rule failed to compile
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Extraction pattern is missing a required named capture group
    #[error("extraction pattern '{pattern}' is missing named capture group '{group}'")]
    MissingCaptureGroup { pattern: String, group: String },

    /// A command template references a variable that is never defined
    #[error("undefined template variable '{name}' in command '{command}'")]
    UndefinedVariable { name: String, command: String },

    /// Invalid --bump specification
    #[error("invalid bump spec '{value}': expected name=newValue")]
    InvalidBumpSpec { value: String },

    /// Failed to read or parse the bump plan file
    #[error("failed to load bump plan {path}: {message}")]
    InvalidPlan { path: PathBuf, message: String },
}

/// Errors related to a single candidate's post-upgrade pipeline
///
/// These isolate to the one candidate; the rest of the batch continues.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A command could not be spawned at all
    #[error("failed to spawn command '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A non-guard command exited non-zero
    #[error("command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// A file filter glob pattern is invalid
    #[error("invalid file filter glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Template rendering failed at run time
    #[error(transparent)]
    Template(#[from] ConfigError),
}

/// Errors related to IO operations during a scan
#[derive(Error, Debug)]
pub enum IoError {
    /// Scan root directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read a scanned file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ConfigError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidPattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a new MissingCaptureGroup error
    pub fn missing_capture_group(pattern: impl Into<String>, group: impl Into<String>) -> Self {
        ConfigError::MissingCaptureGroup {
            pattern: pattern.into(),
            group: group.into(),
        }
    }

    /// Creates a new UndefinedVariable error
    pub fn undefined_variable(name: impl Into<String>, command: impl Into<String>) -> Self {
        ConfigError::UndefinedVariable {
            name: name.into(),
            command: command.into(),
        }
    }
}

impl TaskError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        TaskError::SpawnFailed {
            command: command.into(),
            source,
        }
    }

    /// Creates a new CommandFailed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        TaskError::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new InvalidGlob error
    pub fn invalid_glob(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        TaskError::InvalidGlob {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::ReadError {
            path: path.into(),
            source,
        }
    }
}
