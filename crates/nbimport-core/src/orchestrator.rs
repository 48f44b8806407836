// ── Worker orchestration ──
//
// One tokio task per input row, no bound: each pipeline spends its life
// waiting on NetBox, and a failing row must never affect another. Workers
// report through a single unbounded mpsc channel drained by one consumer
// task. The orchestrator joins every worker before sending `Shutdown`, so
// the consumer sees every terminal entry before it stops.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Level, debug, error, info, trace, warn};

use crate::config::UpdatePolicy;
use crate::error::{CoreError, RecordKind};
use crate::inventory::{Connector, Inventory};
use crate::model::RawFields;
use crate::pipeline::import_record;
use crate::profile::ImportProfile;
use crate::reconcile::{FailureCause, ReconcileOutcome};

// ── Input ───────────────────────────────────────────────────────────

/// One input row with its source line number.
#[derive(Debug)]
pub struct InputRow {
    pub line: u64,
    /// `Err` when the row could not be read into fields at all.
    pub fields: Result<RawFields, CoreError>,
}

impl InputRow {
    /// Device name if present, else the worker name.
    fn label(&self) -> String {
        self.fields
            .as_ref()
            .ok()
            .and_then(|f| f.get("name"))
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| worker_name(self.line))
    }
}

fn worker_name(line: u64) -> String {
    format!("csv-line-{line}")
}

// ── Log entries ─────────────────────────────────────────────────────

/// Where a record stands when an entry is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum EntryStatus {
    Progress,
    Created,
    Updated,
    Skipped,
    Failed {
        stage: RecordKind,
        cause: FailureCause,
    },
}

/// A single message from a worker.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub worker: String,
    pub record: String,
    pub level: Level,
    pub message: String,
    pub status: EntryStatus,
}

impl LogEntry {
    /// Terminal entries carry a record's final outcome; there is exactly
    /// one per input row.
    pub fn is_terminal(&self) -> bool {
        self.status != EntryStatus::Progress
    }

    fn from_outcome(worker: String, record: String, outcome: ReconcileOutcome) -> Self {
        let (level, message, status) = match outcome {
            ReconcileOutcome::Created { interfaces, .. } => (
                Level::INFO,
                format!(
                    "Successfully imported device '{record}' with interfaces [{}]",
                    interfaces.join(", ")
                ),
                EntryStatus::Created,
            ),
            ReconcileOutcome::Updated { interfaces, .. } => (
                Level::INFO,
                format!(
                    "Successfully updated device '{record}' with interfaces [{}]",
                    interfaces.join(", ")
                ),
                EntryStatus::Updated,
            ),
            ReconcileOutcome::Skipped => (
                Level::INFO,
                format!(
                    "Device '{record}' already exists and updates have been disabled. Skipping..."
                ),
                EntryStatus::Skipped,
            ),
            ReconcileOutcome::Failed {
                stage,
                cause,
                detail,
            } => (Level::ERROR, detail, EntryStatus::Failed { stage, cause }),
        };
        Self {
            worker,
            record,
            level,
            message,
            status,
        }
    }
}

/// Channel protocol between workers and the consumer.
#[derive(Debug)]
enum LogMessage {
    Entry(LogEntry),
    Shutdown,
}

/// Render an entry through `tracing` at its own level.
pub fn trace_entry(entry: &LogEntry) {
    let (record, worker, message) = (&entry.record, &entry.worker, &entry.message);
    if entry.level == Level::ERROR {
        error!(record = %record, worker = %worker, "{message}");
    } else if entry.level == Level::WARN {
        warn!(record = %record, worker = %worker, "{message}");
    } else if entry.level == Level::INFO {
        info!(record = %record, worker = %worker, "{message}");
    } else if entry.level == Level::DEBUG {
        debug!(record = %record, worker = %worker, "{message}");
    } else {
        trace!(record = %record, worker = %worker, "{message}");
    }
}

// ── Summary ─────────────────────────────────────────────────────────

/// A record that did not make it into NetBox.
#[derive(Debug, Clone, Serialize)]
pub struct FailedRecord {
    pub record: String,
    pub stage: RecordKind,
    pub cause: FailureCause,
    pub message: String,
}

/// Outcome counts for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub records: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<FailedRecord>,
}

impl RunSummary {
    fn observe(&mut self, entry: &LogEntry) {
        match entry.status {
            EntryStatus::Progress => return,
            EntryStatus::Created => self.created += 1,
            EntryStatus::Updated => self.updated += 1,
            EntryStatus::Skipped => self.skipped += 1,
            EntryStatus::Failed { stage, cause } => {
                self.failed += 1;
                self.failures.push(FailedRecord {
                    record: entry.record.clone(),
                    stage,
                    cause,
                    message: entry.message.clone(),
                });
            }
        }
        self.records += 1;
    }
}

// ── Orchestrator ────────────────────────────────────────────────────

/// Runs the import pipeline once per row, concurrently.
pub struct Orchestrator<C> {
    connector: Arc<C>,
    profile: Arc<ImportProfile>,
    policy: UpdatePolicy,
}

impl<C: Connector> Orchestrator<C> {
    pub fn new(connector: C, profile: ImportProfile, policy: UpdatePolicy) -> Self {
        Self {
            connector: Arc::new(connector),
            profile: Arc::new(profile),
            policy,
        }
    }

    /// Open one session and probe it. Connection and credential problems
    /// surface here, before any worker starts.
    pub async fn preflight(&self) -> Result<(), CoreError> {
        let session = self.connector.connect()?;
        session.check().await
    }

    /// Import every row and return the outcome counts once every worker's
    /// final entry has been rendered.
    pub async fn run<R>(&self, rows: Vec<InputRow>, render: R) -> Result<RunSummary, CoreError>
    where
        R: FnMut(&LogEntry) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let consumer = tokio::spawn(log_consumer(rx, render));

        let mut workers: Vec<(String, String, JoinHandle<()>)> = Vec::with_capacity(rows.len());
        for row in rows {
            let worker = Worker {
                name: worker_name(row.line),
                record: row.label(),
                connector: Arc::clone(&self.connector),
                profile: Arc::clone(&self.profile),
                policy: self.policy,
                tx: tx.clone(),
            };
            let (name, record) = (worker.name.clone(), worker.record.clone());
            workers.push((name, record, tokio::spawn(worker.run(row.fields))));
        }
        debug!(
            workers = workers.len(),
            kind = %self.profile.kind,
            "all workers spawned"
        );

        // Join barrier: every worker has reported before the sentinel.
        for (name, record, handle) in workers {
            if let Err(e) = handle.await {
                let entry = LogEntry {
                    worker: name,
                    record,
                    level: Level::ERROR,
                    message: format!("Worker stopped unexpectedly: {e}"),
                    status: EntryStatus::Failed {
                        stage: RecordKind::Device,
                        cause: FailureCause::Internal,
                    },
                };
                let _ = tx.send(LogMessage::Entry(entry));
            }
        }
        let _ = tx.send(LogMessage::Shutdown);

        consumer
            .await
            .map_err(|e| CoreError::Internal(format!("log consumer stopped: {e}")))
    }
}

/// Everything one worker task owns.
struct Worker<C> {
    name: String,
    record: String,
    connector: Arc<C>,
    profile: Arc<ImportProfile>,
    policy: UpdatePolicy,
    tx: mpsc::UnboundedSender<LogMessage>,
}

impl<C: Connector> Worker<C> {
    async fn run(self, fields: Result<RawFields, CoreError>) {
        let outcome = match fields {
            Err(err) => ReconcileOutcome::failed(
                RecordKind::Device,
                &err,
                format!("The CSV row does not appear to contain valid information: {err}"),
            ),
            Ok(fields) => {
                self.progress(format!("Processing device '{}'", self.record));
                match self.connector.connect() {
                    Ok(session) => {
                        import_record(&session, &self.profile, self.policy, &fields).await
                    }
                    Err(err) => ReconcileOutcome::failed(
                        RecordKind::Device,
                        &err,
                        format!("Device '{}' was not imported: {err}", self.record),
                    ),
                }
            }
        };

        let entry = LogEntry::from_outcome(self.name, self.record, outcome);
        let _ = self.tx.send(LogMessage::Entry(entry));
    }

    fn progress(&self, message: String) {
        let entry = LogEntry {
            worker: self.name.clone(),
            record: self.record.clone(),
            level: Level::DEBUG,
            message,
            status: EntryStatus::Progress,
        };
        let _ = self.tx.send(LogMessage::Entry(entry));
    }
}

/// Single consumer: render entries in arrival order until `Shutdown`.
async fn log_consumer<R>(mut rx: mpsc::UnboundedReceiver<LogMessage>, mut render: R) -> RunSummary
where
    R: FnMut(&LogEntry),
{
    let mut summary = RunSummary::default();
    while let Some(message) = rx.recv().await {
        match message {
            LogMessage::Entry(entry) => {
                summary.observe(&entry);
                render(&entry);
            }
            LogMessage::Shutdown => break,
        }
    }
    summary
}
