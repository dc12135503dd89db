//! Run orchestrator
//!
//! The SyncEngine performs one synchronization run:
//! - Reading the last recorded address from the AddressStore
//! - Resolving the tracked domain
//! - Rewriting the ACL and reloading the name server when the address changed
//! - Recording the new address after a successful reload
//!
//! ## Flow
//!
//! ```text
//! START ─► FETCH_LAST ─► RESOLVE ─┬─► UNCHANGED ─────────────────────────► END
//!                                 └─► REWRITE_CONFIG ─► RELOAD ─► COMMIT ─► END
//!
//! any of FETCH_LAST, RESOLVE, REWRITE_CONFIG, RELOAD failing ─► ABORT
//! ```
//!
//! ## Failure Policy
//!
//! 1. Every failure before COMMIT aborts the run and is returned as `Err`
//! 2. A store write failure at COMMIT is logged and the run still succeeds;
//!    the ACL is already live and the store lags behind until the next change.
//!    Any other error kind at COMMIT aborts like the earlier stages
//! 3. A RELOAD failure leaves the rewritten ACL on disk with the store
//!    unchanged, so the next run rewrites and reloads again
//! 4. The store is closed on every path out of [`SyncEngine::run`]

use std::fmt;

use crate::change::has_changed;
use crate::error::{Error, Result};
use crate::traits::{AclWriter, AddressStore, Resolver, ServiceReloader};
use tracing::{debug, error, info};

/// Steps of a run that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Reading the last recorded address
    FetchLast,
    /// Resolving the tracked domain
    Resolve,
    /// Rewriting the ACL line
    RewriteConfig,
    /// Reloading the name server
    Reload,
    /// Recording the new address
    Commit,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::FetchLast => "FETCH_LAST",
            RunStage::Resolve => "RESOLVE",
            RunStage::RewriteConfig => "REWRITE_CONFIG",
            RunStage::Reload => "RELOAD",
            RunStage::Commit => "COMMIT",
        };
        f.write_str(name)
    }
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The domain still resolves to the recorded address; nothing was touched
    Unchanged {
        /// The current (and recorded) address
        address: String,
    },

    /// The ACL was rewritten and the name server reloaded
    Updated {
        /// The previously recorded address, if any
        previous: Option<String>,
        /// The newly resolved address
        current: String,
        /// Whether the marker was found and the address line replaced
        acl_replaced: bool,
        /// Whether the new address was recorded in the store
        recorded: bool,
    },
}

/// One-shot synchronization engine
///
/// All collaborators are passed in; the engine holds no global state.
///
/// ## Lifecycle
///
/// 1. Open the store, then create with [`SyncEngine::new()`]
/// 2. Call [`SyncEngine::run()`] once
/// 3. The store is released before `run()` returns
pub struct SyncEngine {
    /// Record of resolved addresses
    store: Box<dyn AddressStore>,

    /// Name resolution
    resolver: Box<dyn Resolver>,

    /// ACL rewrite target
    acl: Box<dyn AclWriter>,

    /// Name-server reload
    reloader: Box<dyn ServiceReloader>,

    /// Tracked domain
    domain: String,
}

impl SyncEngine {
    /// Create a new engine for `domain`
    pub fn new(
        store: Box<dyn AddressStore>,
        resolver: Box<dyn Resolver>,
        acl: Box<dyn AclWriter>,
        reloader: Box<dyn ServiceReloader>,
        domain: impl Into<String>,
    ) -> Result<Self> {
        let domain = domain.into();
        if domain.trim().is_empty() {
            return Err(Error::config_load("domain cannot be empty"));
        }

        Ok(Self {
            store,
            resolver,
            acl,
            reloader,
            domain,
        })
    }

    /// Run one synchronization and release the store
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: The run reached END (a failed commit included)
    /// - `Err(Error)`: The run aborted; the error names the failed step
    pub async fn run(&self) -> Result<RunOutcome> {
        let result = self.run_once().await;

        if let Err(e) = self.store.close().await {
            error!("Could not close db connection: {}", e);
        }

        result
    }

    async fn run_once(&self) -> Result<RunOutcome> {
        let last = self
            .store
            .last_address()
            .await
            .map_err(|e| Self::abort(RunStage::FetchLast, e))?;

        let current = self
            .resolver
            .resolve(&self.domain)
            .await
            .map_err(|e| Self::abort(RunStage::Resolve, e))?;

        if !has_changed(last.as_deref(), &current) {
            debug!("IP is still {}", current);
            return Ok(RunOutcome::Unchanged { address: current });
        }

        debug!(
            "Address of {} changed: {} -> {}",
            self.domain,
            last.as_deref().unwrap_or("<none>"),
            current
        );

        let acl_replaced = self
            .acl
            .rewrite(&current)
            .await
            .map_err(|e| Self::abort(RunStage::RewriteConfig, e))?;

        // From here on the ACL on disk is ahead of the store
        self.reloader
            .reload()
            .await
            .map_err(|e| Self::abort(RunStage::Reload, e))?;

        let recorded = match self.store.append_address(&current).await {
            Ok(()) => {
                info!("IP updated to {}", current);
                true
            }
            Err(e) if !e.is_terminal() => {
                error!("Could not insert new ip into db: {}", e);
                false
            }
            Err(e) => return Err(Self::abort(RunStage::Commit, e)),
        };

        Ok(RunOutcome::Updated {
            previous: last,
            current,
            acl_replaced,
            recorded,
        })
    }

    fn abort(stage: RunStage, err: Error) -> Error {
        error!("{} failed, aborting run: {}", stage, err);
        err
    }
}
