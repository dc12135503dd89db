//! Command reloader
//!
//! Runs the configured reload command (for example `/etc/init.d/bind9 reload`
//! or `rndc reload`) as a child process and waits for it. The command string is
//! split on whitespace into a program and its arguments; no shell is involved.

use async_trait::async_trait;
use std::future::Future;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::Error;
use crate::error::ReloadFailure;
use crate::traits::ServiceReloader;

/// Reloads the name server by running an external command
#[derive(Debug, Clone)]
pub struct CommandReloader {
    command: String,
}

impl CommandReloader {
    /// Create a reloader for `command`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Run the command, giving up when `interrupt` completes first
    ///
    /// On interrupt the child is killed before returning
    /// [`ReloadFailure::WaitInterrupted`]. [`ServiceReloader::reload`] uses
    /// SIGINT as the interrupt.
    pub async fn reload_until<F>(&self, interrupt: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::reload(ReloadFailure::Launch, "reload command is empty"))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::reload(ReloadFailure::Launch, format!("{}: {}", self.command, e)))?;

        debug!("Started '{}' (pid {:?})", self.command, child.id());

        tokio::pin!(interrupt);
        let status = tokio::select! {
            status = child.wait() => status,
            _ = &mut interrupt => {
                if let Err(e) = child.kill().await {
                    warn!("Could not kill '{}': {}", self.command, e);
                }
                return Err(Error::reload(
                    ReloadFailure::WaitInterrupted,
                    format!("interrupted while waiting for '{}'", self.command),
                ));
            }
        };

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                if let Err(kill_err) = child.kill().await {
                    warn!("Could not kill '{}': {}", self.command, kill_err);
                }
                return Err(Error::reload(
                    ReloadFailure::WaitInterrupted,
                    format!("waiting for '{}' failed: {}", self.command, e),
                ));
            }
        };

        if !status.success() {
            return Err(Error::reload(
                ReloadFailure::ExitStatus,
                format!("'{}' exited with {}", self.command, status),
            ));
        }

        debug!("'{}' finished", self.command);
        Ok(())
    }
}

#[async_trait]
impl ServiceReloader for CommandReloader {
    async fn reload(&self) -> Result<(), Error> {
        self.reload_until(async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler: never interrupt
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
