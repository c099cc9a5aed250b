//! Mock [`StreamSource`] and [`EventHandler`] implementations for testing.
//!
//! - [`ScriptedSource`] - Pre-loaded connection outcomes, one per `connect()`.
//!   Records when each connect happened so tests can check reconnect timing
//!   under paused tokio time.
//!
//! - [`RecordingHandler`] - Collects every event the consumer hands over.
//!
//! - [`MemoryRuleStore`] - In-memory rule set that logs every mutation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::application::EventHandler;
use crate::domain::{Rule, StreamEvent};
use crate::error::{Error, Result, StreamError};
use crate::port::{Connection, InstalledRule, LineStream, RuleStore, StreamSource};

/// One scripted outcome of `connect()`.
#[derive(Debug, Clone)]
pub enum ScriptedConnection {
    /// Accepts, yields the items, then closes cleanly. `Err` items become
    /// mid-stream read failures.
    Open(Vec<std::result::Result<String, String>>),
    /// Accepts, yields the lines, then stays open without sending anything.
    OpenThenSilent(Vec<String>),
    RateLimited { reset_at: i64 },
    Rejected { status: u16 },
    /// Transport failure before any response.
    Fail(String),
}

impl ScriptedConnection {
    /// Open connection delivering `lines` and closing cleanly.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Open(lines.into_iter().map(|l| Ok(l.into())).collect())
    }
}

fn to_line_stream(items: Vec<std::result::Result<String, String>>) -> LineStream {
    Box::pin(stream::iter(items.into_iter().map(|item| {
        item.map_err(|e| Error::from(StreamError::Read(e)))
    })))
}

/// A source with scripted connection outcomes.
///
/// When the script runs out, the source signals shutdown (if a sender was
/// attached) and then never resolves, so the consumer loop exits cleanly.
pub struct ScriptedSource {
    script: Mutex<VecDeque<ScriptedConnection>>,
    connects: Arc<Mutex<Vec<Instant>>>,
    connect_count: Arc<AtomicU32>,
    shutdown: Option<watch::Sender<bool>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<ScriptedConnection>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            connects: Arc::new(Mutex::new(Vec::new())),
            connect_count: Arc::new(AtomicU32::new(0)),
            shutdown: None,
        }
    }

    /// Signal `shutdown` once every scripted connection has been used.
    #[must_use]
    pub fn shutdown_when_exhausted(mut self, shutdown: watch::Sender<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Shared handle to the connect timestamps.
    pub fn connect_times(&self) -> Arc<Mutex<Vec<Instant>>> {
        Arc::clone(&self.connects)
    }

    /// Shared connect counter.
    pub fn connect_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.connect_count)
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamSource for ScriptedSource {
    async fn connect(&self) -> Result<Connection> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connects
            .lock()
            .expect("lock connect times")
            .push(Instant::now());

        let next = self.script.lock().expect("lock script").pop_front();
        let Some(next) = next else {
            if let Some(shutdown) = &self.shutdown {
                let _ = shutdown.send(true);
            }
            return std::future::pending().await;
        };

        match next {
            ScriptedConnection::Open(items) => Ok(Connection::Open(to_line_stream(items))),
            ScriptedConnection::OpenThenSilent(lines) => {
                let lines: LineStream = Box::pin(
                    stream::iter(lines.into_iter().map(Ok::<String, Error>))
                        .chain(stream::pending()),
                );
                Ok(Connection::Open(lines))
            }
            ScriptedConnection::RateLimited { reset_at } => {
                Ok(Connection::RateLimited { reset_at })
            }
            ScriptedConnection::Rejected { status } => Ok(Connection::Rejected {
                status,
                body: String::new(),
            }),
            ScriptedConnection::Fail(reason) => Err(Error::Connection(reason)),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// Collects handled events.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<StreamEvent>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StreamEvent> {
        self.events.lock().expect("lock handled events").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("lock handled events").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: StreamEvent) {
        self.events.lock().expect("lock handled events").push(event);
    }
}

/// Mutation applied to a [`MemoryRuleStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOp {
    Delete(Vec<String>),
    Add(Vec<Rule>),
}

/// Rule store backed by a vector. Ids are assigned sequentially on add.
#[derive(Clone, Default)]
pub struct MemoryRuleStore {
    installed: Arc<Mutex<Vec<InstalledRule>>>,
    ops: Arc<Mutex<Vec<RuleOp>>>,
    next_id: Arc<AtomicU32>,
    fail_add: Option<u16>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `rules` already installed.
    pub fn with_installed(rules: &[Rule]) -> Self {
        let store = Self::new();
        store.insert(rules);
        store
    }

    /// Make `add_rules` fail with the given HTTP status.
    #[must_use]
    pub fn failing_add(mut self, status: u16) -> Self {
        self.fail_add = Some(status);
        self
    }

    pub fn installed(&self) -> Vec<Rule> {
        self.installed
            .lock()
            .expect("lock installed rules")
            .iter()
            .map(|r| r.rule.clone())
            .collect()
    }

    pub fn ops(&self) -> Vec<RuleOp> {
        self.ops.lock().expect("lock rule ops").clone()
    }

    fn insert(&self, rules: &[Rule]) {
        let mut installed = self.installed.lock().expect("lock installed rules");
        for rule in rules {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            installed.push(InstalledRule {
                id: id.to_string(),
                rule: rule.clone(),
            });
        }
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn rules(&self) -> Result<Vec<InstalledRule>> {
        Ok(self.installed.lock().expect("lock installed rules").clone())
    }

    async fn delete_rules(&self, ids: &[String]) -> Result<()> {
        self.ops
            .lock()
            .expect("lock rule ops")
            .push(RuleOp::Delete(ids.to_vec()));
        self.installed
            .lock()
            .expect("lock installed rules")
            .retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    async fn add_rules(&self, rules: &[Rule]) -> Result<()> {
        self.ops
            .lock()
            .expect("lock rule ops")
            .push(RuleOp::Add(rules.to_vec()));
        if let Some(status) = self.fail_add {
            return Err(StreamError::Rules {
                action: "add",
                status,
                body: "rejected".to_string(),
            }
            .into());
        }
        self.insert(rules);
        Ok(())
    }
}
