//! Error types for classmail.

use std::path::PathBuf;

/// Top-level error type for a sorting run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Mailbox error: {0}")]
    Mailbox(#[from] MailboxError),
}

/// Configuration-related errors. All of these are fatal before any
/// mailbox connection is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Roster loading errors.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Failed to list roster directory {}: {source}", .path.display())]
    Dir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open roster file {}: {source}", .path.display())]
    Open { path: PathBuf, source: csv::Error },

    #[error("Malformed record in {}, line {line}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        source: csv::Error,
    },
}

/// Mailbox transport errors.
///
/// The sorter treats an error from a single move as a per-message failure
/// and keeps going; any other mailbox error aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    #[error("Connection to {host}:{port} failed: {reason}")]
    ConnectionFailed {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Login rejected for {user}")]
    AuthFailed { user: String },

    #[error("Unexpected response to {command}: {response}")]
    Protocol { command: String, response: String },

    #[error("Connection closed by server")]
    Disconnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for classmail.
pub type Result<T> = std::result::Result<T, Error>;
