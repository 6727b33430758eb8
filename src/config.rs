//! Run configuration — a JSON file plus environment overrides.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration, loaded from the JSON file named on the
/// command line.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding one roster CSV per class or cohort.
    pub roster_dir: PathBuf,
    /// IMAP folder under which the per-class folders live.
    #[serde(default = "default_folder_prefix")]
    pub folder_prefix: String,
    /// Mail account connection parameters.
    pub imap: ImapConfig,
}

/// IMAP connection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ImapConfig {
    pub host: String,
    #[serde(default = "default_imap_port")]
    pub port: u16,
    pub user: String,
    pub password: SecretString,
}

fn default_folder_prefix() -> String {
    "INBOX/STUDENTS".to_string()
}

fn default_imap_port() -> u16 {
    993
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// `CLASSMAIL_IMAP_PASSWORD`, when set, overrides the password from
    /// the file so credentials can stay out of checked-in configs.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Ok(password) = std::env::var("CLASSMAIL_IMAP_PASSWORD") {
            config.imap.password = SecretString::from(password);
        }

        Ok(config)
    }
}
