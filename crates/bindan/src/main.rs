// # bindan - bind allow network
//
// Run-once synchronizer: resolves a dynamic DNS name and, when its address
// changed since the last run, rewrites the matching BIND ACL entry, reloads
// BIND and records the new address.
//
// This binary is a thin integration layer. All decisions live in
// bindan-core; this file only wires configuration, logging and the concrete
// collaborators together and maps the result to an exit code.
//
// ## Configuration
//
// Read from `bindAN.properties` in the working directory, or from the file
// named by `BINDAN_PROPERTIES`:
//
// - `dbUrl`: Store URL (`mysql://...`, `sqlite://...`, `jdbc:` prefix allowed)
// - `dbUser` / `dbPassword`: Store credentials (optional)
// - `domain`: Dynamic DNS name to track
// - `loglevel`: `severe`, `error`, `info`, `fine` or `off` (default `fine`)
// - `bindConfig`: ACL file (default `/etc/bind/named.conf.options`)
// - `aclMarker`: Line preceding the address (default `acl "heathcliff26" {`)
// - `reloadCommand`: Reload command (default `/etc/init.d/bind9 reload`)
// - `logFile`: Append-only log (default `bindAN.log`)
//
// ## Scheduling
//
// bindan runs once and exits. Run it periodically from cron or a systemd
// timer, and never twice at the same time:
//
// ```bash
// */5 * * * * cd /opt/bindan && flock -n /run/bindan.lock ./bindan
// ```

use anyhow::{Context, Result};
use bindan_core::config::DEFAULT_LOG_FILE;
use bindan_core::{
    AclFile, BindanConfig, CommandReloader, Error, LogLevel, RunOutcome, SyncEngine,
    SystemResolver,
};
use bindan_store_sql::SqlAddressStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Exit codes for the ways a run can end
///
/// - 0: Run completed (address changed or not)
/// - 1: Configuration could not be loaded
/// - 2: Run aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindanExitCode {
    /// Run reached its end
    Clean = 0,
    /// Properties missing or invalid
    ConfigError = 1,
    /// A step of the run failed
    RunAborted = 2,
}

impl From<BindanExitCode> for ExitCode {
    fn from(code: BindanExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl BindanExitCode {
    fn for_result(result: &bindan_core::Result<RunOutcome>) -> Self {
        match result {
            Ok(_) => BindanExitCode::Clean,
            Err(e) if !e.is_terminal() => BindanExitCode::Clean,
            Err(Error::ConfigLoad(_)) => BindanExitCode::ConfigError,
            Err(_) => BindanExitCode::RunAborted,
        }
    }
}

fn main() -> ExitCode {
    let loaded = BindanConfig::from_properties_file(BindanConfig::properties_path());

    // Logging comes up first so a broken properties file still gets logged
    let (log_file, level, rejected_level) = match &loaded {
        Ok(config) => match config.log_level() {
            Ok(level) => (config.log_file.clone(), level, None),
            Err(raw) => (config.log_file.clone(), LogLevel::default(), Some(raw.to_string())),
        },
        Err(_) => (PathBuf::from(DEFAULT_LOG_FILE), LogLevel::default(), None),
    };
    init_logging(&log_file, level);

    if let Some(raw) = rejected_level {
        error!("Could not set loglevel '{}', keeping default", raw);
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            return BindanExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return BindanExitCode::RunAborted.into();
        }
    };

    let result = rt.block_on(run(&config));
    match &result {
        Ok(RunOutcome::Unchanged { .. }) => debug!("Run finished, nothing to do"),
        Ok(RunOutcome::Updated { current, .. }) => debug!("Run finished, ACL now allows {}", current),
        Err(e) => debug!("Run aborted: {}", e),
    }

    BindanExitCode::for_result(&result).into()
}

/// Open the store, wire the collaborators and run once
async fn run(config: &BindanConfig) -> bindan_core::Result<RunOutcome> {
    debug!("Starting bindAN for {}", config.domain);

    let store = SqlAddressStore::connect(&config.db_url, &config.db_user, &config.db_password)
        .await
        .inspect_err(|e| error!("Could not connect to db: {}", e))?;

    let engine = SyncEngine::new(
        Box::new(store),
        Box::new(SystemResolver::new()),
        Box::new(AclFile::new(
            config.bind_config.clone(),
            config.acl_marker.clone(),
        )),
        Box::new(CommandReloader::new(config.reload_command.clone())),
        config.domain.clone(),
    )?;

    engine.run().await
}

/// Install the global subscriber, appending to `log_file`
///
/// Falls back to stderr when the file cannot be opened.
fn init_logging(log_file: &Path, level: LogLevel) {
    let writer = match file_appender(log_file) {
        Ok(appender) => BoxMakeWriter::new(appender),
        Err(e) => {
            eprintln!("Could not initialize Logger: {:#}", e);
            BoxMakeWriter::new(std::io::stderr)
        }
    };

    let installed = tracing_subscriber::fmt()
        .with_max_level(level.as_filter())
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    if let Err(e) = installed {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn file_appender(log_file: &Path) -> Result<RollingFileAppender> {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = log_file
        .file_name()
        .with_context(|| format!("logFile {} has no file name", log_file.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("cannot open {}", log_file.display()))
}
