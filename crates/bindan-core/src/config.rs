//! Configuration for a bindAN run
//!
//! The configuration is read once at startup from a Java-style properties
//! file (`bindAN.properties` in the working directory unless
//! `BINDAN_PROPERTIES` points elsewhere). Keys are camelCase:
//!
//! ```text
//! dbUrl=jdbc:mysql://localhost:3306/bindan
//! dbUser=bindan
//! dbPassword=s3cret
//! domain=home.example.org
//! loglevel=info
//! aclMarker=acl "heathcliff26" {
//! ```
//!
//! Values are taken literally up to the end of the line; only backslash
//! escapes and line continuations are interpreted.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};

/// Properties file looked up in the working directory
pub const DEFAULT_PROPERTIES_FILE: &str = "bindAN.properties";

/// Environment variable overriding the properties file location
pub const PROPERTIES_PATH_ENV: &str = "BINDAN_PROPERTIES";

/// Log file used when none is configured
pub const DEFAULT_LOG_FILE: &str = "bindAN.log";

/// Main bindAN configuration
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindanConfig {
    /// Store connection target (`mysql://...`, `sqlite://...` or a `jdbc:` URL)
    pub db_url: String,

    /// Store user, folded into the connection URL when non-empty
    #[serde(default)]
    pub db_user: String,

    /// Store password, folded into the connection URL when non-empty
    #[serde(default)]
    pub db_password: String,

    /// Dynamic DNS name whose address is allowed by the ACL
    pub domain: String,

    /// Raw log level (`severe`, `error`, `info`, `fine`, `off`)
    #[serde(default)]
    pub loglevel: Option<String>,

    /// Name-server configuration file holding the ACL
    #[serde(default = "default_bind_config")]
    pub bind_config: PathBuf,

    /// Line preceding the address line that gets replaced
    #[serde(default = "default_acl_marker")]
    pub acl_marker: String,

    /// Command reloading the name server
    #[serde(default = "default_reload_command")]
    pub reload_command: String,

    /// Append-only log file
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl BindanConfig {
    /// Location of the properties file for this process
    pub fn properties_path() -> PathBuf {
        std::env::var_os(PROPERTIES_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROPERTIES_FILE))
    }

    /// Load and validate the configuration from a properties file
    pub fn from_properties_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::config_load(format!("Could not load {}: {}", path.display(), e))
        })?;

        let pairs = java_properties::read(BufReader::new(file)).map_err(|e| {
            Error::config_load(format!("Could not parse {}: {}", path.display(), e))
        })?;

        Self::from_pairs(pairs)
    }

    /// Build the configuration from key/value pairs
    ///
    /// Later pairs override earlier ones with the same key.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), serde_json::Value::String(v.into())))
            .collect();

        let config: Self = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| Error::config_load(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.db_url.trim().is_empty() {
            return Err(Error::config_load("dbUrl cannot be empty"));
        }
        if self.domain.trim().is_empty() {
            return Err(Error::config_load("domain cannot be empty"));
        }
        if self.acl_marker.is_empty() {
            return Err(Error::config_load("aclMarker cannot be empty"));
        }
        if self.reload_command.trim().is_empty() {
            return Err(Error::config_load("reloadCommand cannot be empty"));
        }
        if self.bind_config.as_os_str().is_empty() {
            return Err(Error::config_load("bindConfig cannot be empty"));
        }

        Ok(())
    }

    /// The configured log level
    ///
    /// An absent `loglevel` yields the default. An unrecognized one is
    /// returned as `Err` so the caller can report it once logging is up.
    pub fn log_level(&self) -> std::result::Result<LogLevel, &str> {
        match self.loglevel.as_deref() {
            None => Ok(LogLevel::default()),
            Some(raw) => LogLevel::parse(raw).ok_or(raw),
        }
    }
}

impl fmt::Debug for BindanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindanConfig")
            .field("db_url", &self.db_url)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("domain", &self.domain)
            .field("loglevel", &self.loglevel)
            .field("bind_config", &self.bind_config)
            .field("acl_marker", &self.acl_marker)
            .field("reload_command", &self.reload_command)
            .field("log_file", &self.log_file)
            .finish()
    }
}

/// Log verbosity accepted in the `loglevel` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Abort paths only (`severe` or `error`)
    Severe,
    /// Committed address changes
    Info,
    /// Everything, including unchanged runs
    #[default]
    Fine,
    /// Nothing
    Off,
}

impl LogLevel {
    /// Parse a `loglevel` value; matching is exact
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "severe" | "error" => Some(LogLevel::Severe),
            "info" => Some(LogLevel::Info),
            "fine" => Some(LogLevel::Fine),
            "off" => Some(LogLevel::Off),
            _ => None,
        }
    }

    /// The tracing filter for this level
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Severe => LevelFilter::ERROR,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Fine => LevelFilter::DEBUG,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

fn default_bind_config() -> PathBuf {
    PathBuf::from("/etc/bind/named.conf.options")
}

fn default_acl_marker() -> String {
    "acl \"heathcliff26\" {".to_string()
}

fn default_reload_command() -> String {
    "/etc/init.d/bind9 reload".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}
