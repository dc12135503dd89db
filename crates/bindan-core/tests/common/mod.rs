//! Test doubles and common utilities for run contract tests
//!
//! Every double records its calls in a shared [`CallLog`] so tests can check
//! both call counts and call order across collaborators.

#![allow(dead_code)]

use bindan_core::error::{ReloadFailure, Result};
use bindan_core::traits::{AclWriter, AddressStore, Resolver, ServiceReloader};
use bindan_core::{Error, SyncEngine};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DOMAIN: &str = "home.example.org";
pub const MARKER: &str = "acl \"heathcliff26\" {";

/// Ordered log of collaborator calls shared by all doubles of one test
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    /// Number of times `call` was made
    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }
}

/// A store with a fixed baseline that records appended addresses
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another.
#[derive(Clone)]
pub struct MockStore {
    log: CallLog,
    last: Arc<Mutex<Option<String>>>,
    appended: Arc<Mutex<Vec<String>>>,
    fail_read: bool,
    fail_write: bool,
    lose_connection: bool,
    close_count: Arc<AtomicUsize>,
}

impl MockStore {
    pub fn new(log: &CallLog, last: Option<&str>) -> Self {
        Self {
            log: log.clone(),
            last: Arc::new(Mutex::new(last.map(str::to_owned))),
            appended: Arc::new(Mutex::new(Vec::new())),
            fail_read: false,
            fail_write: false,
            lose_connection: false,
            close_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    pub fn failing_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    /// append_address fails with a connection error instead of a write error
    pub fn losing_connection_on_write(mut self) -> Self {
        self.lose_connection = true;
        self
    }

    /// Addresses appended so far
    pub fn appended(&self) -> Vec<String> {
        self.appended.lock().unwrap().clone()
    }

    /// Number of times close() was called
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressStore for MockStore {
    async fn last_address(&self) -> Result<Option<String>> {
        self.log.push("fetch_last");
        if self.fail_read {
            return Err(Error::store_read("connection reset"));
        }
        Ok(self.last.lock().unwrap().clone())
    }

    async fn append_address(&self, address: &str) -> Result<()> {
        self.log.push("append");
        if self.fail_write {
            return Err(Error::store_write("table is read-only"));
        }
        if self.lose_connection {
            return Err(Error::store_connect("server has gone away"));
        }
        self.appended.lock().unwrap().push(address.to_string());
        *self.last.lock().unwrap() = Some(address.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.log.push("close");
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A resolver returning a fixed answer
pub struct MockResolver {
    log: CallLog,
    answer: Option<String>,
}

impl MockResolver {
    pub fn resolving_to(log: &CallLog, address: &str) -> Self {
        Self {
            log: log.clone(),
            answer: Some(address.to_string()),
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            answer: None,
        }
    }
}

#[async_trait::async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, domain: &str) -> Result<String> {
        self.log.push("resolve");
        self.answer
            .clone()
            .ok_or_else(|| Error::resolution(format!("{}: Name or service not known", domain)))
    }
}

/// An ACL writer that only records what it was asked to write
#[derive(Clone)]
pub struct MockAcl {
    log: CallLog,
    written: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockAcl {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            written: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AclWriter for MockAcl {
    async fn rewrite(&self, address: &str) -> Result<bool> {
        self.log.push("rewrite");
        if self.fail {
            return Err(Error::config_io("permission denied"));
        }
        self.written.lock().unwrap().push(address.to_string());
        Ok(true)
    }
}

/// A reloader that succeeds or fails with a chosen kind
#[derive(Clone)]
pub struct MockReloader {
    log: CallLog,
    failure: Option<ReloadFailure>,
    reloaded: Arc<AtomicBool>,
}

impl MockReloader {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            failure: None,
            reloaded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn failing(log: &CallLog, kind: ReloadFailure) -> Self {
        Self {
            failure: Some(kind),
            ..Self::new(log)
        }
    }

    /// Whether a reload completed successfully
    pub fn reloaded(&self) -> bool {
        self.reloaded.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ServiceReloader for MockReloader {
    async fn reload(&self) -> Result<()> {
        self.log.push("reload");
        match self.failure {
            Some(kind) => Err(Error::reload(kind, "simulated")),
            None => {
                self.reloaded.store(true, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}

/// Build an engine over the given doubles
pub fn engine(
    store: &MockStore,
    resolver: MockResolver,
    acl: Box<dyn AclWriter>,
    reloader: &MockReloader,
) -> SyncEngine {
    SyncEngine::new(
        Box::new(store.clone()),
        Box::new(resolver),
        acl,
        Box::new(reloader.clone()),
        DOMAIN,
    )
    .expect("engine construction succeeds")
}

/// A name-server configuration with the ACL holding `address`
pub fn named_conf(address: &str) -> String {
    format!(
        "options {{\n\
         \tdirectory \"/var/cache/bind\";\n\
         \tallow-recursion {{ heathcliff26; }};\n\
         }};\n\
         {}\n\
         \t{};\n\
         }};\n",
        MARKER, address
    )
}
