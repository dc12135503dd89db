//! Error types for bindAN
//!
//! One variant per failure kind of a run. Every kind except
//! [`Error::StoreWrite`] aborts the run; see [`Error::is_terminal`].

use std::fmt;
use thiserror::Error;

/// Result type alias for bindAN operations
pub type Result<T> = std::result::Result<T, Error>;

/// How a service reload failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadFailure {
    /// The reload command could not be started
    Launch,
    /// Waiting for the command was interrupted; the child was killed
    WaitInterrupted,
    /// The command ran but exited unsuccessfully
    ExitStatus,
}

impl fmt::Display for ReloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ReloadFailure::Launch => "launch",
            ReloadFailure::WaitInterrupted => "wait-interrupted",
            ReloadFailure::ExitStatus => "exit-status",
        };
        f.write_str(kind)
    }
}

/// Core error type for bindAN
#[derive(Error, Debug)]
pub enum Error {
    /// The properties file is missing, unreadable or incomplete
    #[error("Configuration error: {0}")]
    ConfigLoad(String),

    /// The address store could not be opened
    #[error("Could not connect to database: {0}")]
    StoreConnect(String),

    /// The last known address could not be read
    #[error("Could not retrieve old ip from db: {0}")]
    StoreRead(String),

    /// A new address record could not be appended
    #[error("Could not insert new ip into db: {0}")]
    StoreWrite(String),

    /// The tracked domain did not resolve
    #[error("Could not resolve host: {0}")]
    Resolution(String),

    /// The name-server configuration could not be read or written
    #[error("Could not rewrite bind configuration: {0}")]
    ConfigIo(String),

    /// The name-server reload failed
    #[error("Could not reload bind ({kind}): {message}")]
    Reload {
        /// Which stage of the reload failed
        kind: ReloadFailure,
        /// Detail from the OS or the command
        message: String,
    },
}

impl Error {
    /// Create a configuration load error
    pub fn config_load(msg: impl Into<String>) -> Self {
        Self::ConfigLoad(msg.into())
    }

    /// Create a store connect error
    pub fn store_connect(msg: impl Into<String>) -> Self {
        Self::StoreConnect(msg.into())
    }

    /// Create a store read error
    pub fn store_read(msg: impl Into<String>) -> Self {
        Self::StoreRead(msg.into())
    }

    /// Create a store write error
    pub fn store_write(msg: impl Into<String>) -> Self {
        Self::StoreWrite(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a config file I/O error
    pub fn config_io(msg: impl Into<String>) -> Self {
        Self::ConfigIo(msg.into())
    }

    /// Create a reload error
    pub fn reload(kind: ReloadFailure, message: impl Into<String>) -> Self {
        Self::Reload {
            kind,
            message: message.into(),
        }
    }

    /// Whether this error aborts the run
    ///
    /// Only a failed commit of the new address is survivable: by then the
    /// ACL is live and the service has been reloaded.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::StoreWrite(_))
    }
}
