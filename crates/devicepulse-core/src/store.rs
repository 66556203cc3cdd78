//! Append-only telemetry store for diagnostic results and battery samples.
//!
//! Two tables, one mutation each: append. Records get a monotonically
//! increasing id and a defaulted timestamp at creation and are never updated
//! or deleted. Listing returns all records ordered by timestamp (then id);
//! callers window the result themselves.
//!
//! # Storage Format
//!
//! With a data directory the store journals each table to a JSONL file,
//! one record per line, flushed per append:
//! - `diagnostics.jsonl`
//! - `battery_logs.jsonl`
//!
//! Opening a store replays both journals into memory. A failed journal
//! append fails the create before the in-memory append, so a record is
//! either fully persisted or absent — never partial.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::model::{BatteryLog, DiagStatus, DiagnosticResult, NewBatteryLog, NewDiagnostic};

const DIAGNOSTICS_JOURNAL: &str = "diagnostics.jsonl";
const BATTERY_JOURNAL: &str = "battery_logs.jsonl";

/// Thread-safe append-only store for the two telemetry record kinds.
pub struct TelemetryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    diagnostics: Vec<DiagnosticResult>,
    battery_logs: Vec<BatteryLog>,
    next_diagnostic_id: i64,
    next_battery_id: i64,
    journal: Option<Journal>,
}

struct Journal {
    diagnostics: File,
    battery_logs: File,
}

impl Journal {
    fn append<T: Serialize>(file: &mut File, record: &T) -> Result<(), StoreError> {
        let line = serde_json::to_string(record)
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }
}

fn replay<T: DeserializeOwned>(path: &Path, table: &'static str) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| StoreError::CorruptJournal {
            table,
            line: idx + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn open_append(path: &PathBuf) -> Result<File, StoreError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

impl TelemetryStore {
    /// Create a store with no journal. Contents live only in memory.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner {
                diagnostics: Vec::new(),
                battery_logs: Vec::new(),
                next_diagnostic_id: 1,
                next_battery_id: 1,
                journal: None,
            }),
        }
    }

    /// Open a journaled store under `dir`, replaying any existing records.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let diag_path = dir.join(DIAGNOSTICS_JOURNAL);
        let battery_path = dir.join(BATTERY_JOURNAL);

        let diagnostics: Vec<DiagnosticResult> = replay(&diag_path, "diagnostics")?;
        let battery_logs: Vec<BatteryLog> = replay(&battery_path, "battery_logs")?;

        let next_diagnostic_id = diagnostics.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let next_battery_id = battery_logs.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        log::info!(
            "opened telemetry store at {} ({} diagnostics, {} battery logs)",
            dir.display(),
            diagnostics.len(),
            battery_logs.len()
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                diagnostics,
                battery_logs,
                next_diagnostic_id,
                next_battery_id,
                journal: Some(Journal {
                    diagnostics: open_append(&diag_path)?,
                    battery_logs: open_append(&battery_path)?,
                }),
            }),
        })
    }

    /// All diagnostic results, ordered by creation time ascending.
    pub async fn list_diagnostics(&self) -> Vec<DiagnosticResult> {
        let inner = self.inner.lock().await;
        let mut records = inner.diagnostics.clone();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }

    /// All battery samples, ordered by timestamp ascending.
    pub async fn list_battery_logs(&self) -> Vec<BatteryLog> {
        let inner = self.inner.lock().await;
        let mut records = inner.battery_logs.clone();
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        records
    }

    /// Append a diagnostic result, assigning its id and defaulting the
    /// timestamp to now when not supplied. All-or-nothing: a journal failure
    /// leaves the table unchanged.
    pub async fn create_diagnostic(
        &self,
        input: NewDiagnostic,
    ) -> Result<DiagnosticResult, StoreError> {
        let mut inner = self.inner.lock().await;
        let record = DiagnosticResult {
            id: inner.next_diagnostic_id,
            tool_name: input.tool_name,
            status: input.status,
            details: input.details,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        };
        if let Some(journal) = &mut inner.journal {
            Journal::append(&mut journal.diagnostics, &record)?;
        }
        inner.next_diagnostic_id += 1;
        inner.diagnostics.push(record.clone());
        Ok(record)
    }

    /// Append a battery sample. Same contract as [`create_diagnostic`].
    ///
    /// [`create_diagnostic`]: TelemetryStore::create_diagnostic
    pub async fn create_battery_log(
        &self,
        input: NewBatteryLog,
    ) -> Result<BatteryLog, StoreError> {
        let mut inner = self.inner.lock().await;
        let record = BatteryLog {
            id: inner.next_battery_id,
            level: input.level,
            is_charging: input.is_charging,
            timestamp: input.timestamp.unwrap_or_else(Utc::now),
        };
        if let Some(journal) = &mut inner.journal {
            Journal::append(&mut journal.battery_logs, &record)?;
        }
        inner.next_battery_id += 1;
        inner.battery_logs.push(record.clone());
        Ok(record)
    }

    /// Record counts per table: `(diagnostics, battery_logs)`.
    pub async fn counts(&self) -> (usize, usize) {
        let inner = self.inner.lock().await;
        (inner.diagnostics.len(), inner.battery_logs.len())
    }

    /// Seed initial records so charts render non-empty on first load.
    ///
    /// Fires only for tables that are empty; a no-op otherwise. Returns
    /// whether anything was written.
    pub async fn seed(&self) -> Result<bool, StoreError> {
        let mut seeded = false;

        if self.list_diagnostics().await.is_empty() {
            self.create_diagnostic(NewDiagnostic {
                tool_name: "System Initialization".to_string(),
                status: DiagStatus::Pass,
                details: Some("Initial system check completed successfully".to_string()),
                created_at: None,
            })
            .await?;
            seeded = true;
        }

        if self.list_battery_logs().await.is_empty() {
            for level in ["85", "84", "82", "80"] {
                self.create_battery_log(NewBatteryLog {
                    level: level.to_string(),
                    is_charging: false,
                    timestamp: None,
                })
                .await?;
            }
            seeded = true;
        }

        if seeded {
            log::info!("seeded initial telemetry records");
        }
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag_input(tool: &str) -> NewDiagnostic {
        NewDiagnostic {
            tool_name: tool.to_string(),
            status: DiagStatus::Pass,
            details: None,
            created_at: None,
        }
    }

    fn battery_input(level: &str) -> NewBatteryLog {
        NewBatteryLog {
            level: level.to_string(),
            is_charging: false,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn ids_are_unique_and_increasing() {
        let store = TelemetryStore::in_memory();
        let a = store.create_diagnostic(diag_input("Speaker Test")).await.unwrap();
        let b = store.create_diagnostic(diag_input("Vibration")).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.id, 1);
    }

    #[tokio::test]
    async fn created_at_defaults_to_now() {
        let store = TelemetryStore::in_memory();
        let before = Utc::now();
        let rec = store.create_diagnostic(diag_input("Mic")).await.unwrap();
        assert!(rec.created_at >= before);
        assert!(rec.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn supplied_timestamp_is_kept() {
        let store = TelemetryStore::in_memory();
        let ts = "2026-01-01T00:00:00Z".parse().unwrap();
        let rec = store
            .create_battery_log(NewBatteryLog {
                level: "50".to_string(),
                is_charging: true,
                timestamp: Some(ts),
            })
            .await
            .unwrap();
        assert_eq!(rec.timestamp, ts);
        assert!(rec.is_charging);
    }

    #[tokio::test]
    async fn list_returns_all_in_timestamp_order() {
        let store = TelemetryStore::in_memory();
        // Insert out of order via explicit timestamps.
        for (level, ts) in [("80", "2026-01-03"), ("85", "2026-01-01"), ("82", "2026-01-02")] {
            store
                .create_battery_log(NewBatteryLog {
                    level: level.to_string(),
                    is_charging: false,
                    timestamp: Some(format!("{ts}T00:00:00Z").parse().unwrap()),
                })
                .await
                .unwrap();
        }
        let logs = store.list_battery_logs().await;
        assert_eq!(logs.len(), 3);
        let levels: Vec<&str> = logs.iter().map(|l| l.level.as_str()).collect();
        assert_eq!(levels, ["85", "82", "80"]);
        assert!(logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn list_after_n_creates_returns_n() {
        let store = TelemetryStore::in_memory();
        for i in 0..5 {
            store.create_diagnostic(diag_input(&format!("Tool {i}"))).await.unwrap();
        }
        assert_eq!(store.list_diagnostics().await.len(), 5);
    }

    #[tokio::test]
    async fn seed_fills_empty_tables() {
        let store = TelemetryStore::in_memory();
        assert!(store.seed().await.unwrap());

        let diags = store.list_diagnostics().await;
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].tool_name, "System Initialization");
        assert_eq!(diags[0].status, DiagStatus::Pass);

        let logs = store.list_battery_logs().await;
        let levels: Vec<&str> = logs.iter().map(|l| l.level.as_str()).collect();
        assert_eq!(levels, ["85", "84", "82", "80"]);
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let store = TelemetryStore::in_memory();
        assert!(store.seed().await.unwrap());
        assert!(!store.seed().await.unwrap());
        assert_eq!(store.counts().await, (1, 4));
    }

    #[tokio::test]
    async fn seed_skips_non_empty_tables() {
        let store = TelemetryStore::in_memory();
        store.create_battery_log(battery_input("42")).await.unwrap();
        store.seed().await.unwrap();
        // Battery table already had a record, only diagnostics got seeded.
        assert_eq!(store.counts().await, (1, 1));
    }

    #[tokio::test]
    async fn journal_replays_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = TelemetryStore::open(dir.path()).unwrap();
            store.create_diagnostic(diag_input("Camera")).await.unwrap();
            store.create_battery_log(battery_input("77")).await.unwrap();
        }

        let store = TelemetryStore::open(dir.path()).unwrap();
        let diags = store.list_diagnostics().await;
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].tool_name, "Camera");
        assert_eq!(store.list_battery_logs().await[0].level, "77");

        // Ids continue past replayed records.
        let next = store.create_diagnostic(diag_input("Mic")).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn reopened_store_does_not_reseed() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = TelemetryStore::open(dir.path()).unwrap();
            store.seed().await.unwrap();
        }
        let store = TelemetryStore::open(dir.path()).unwrap();
        assert!(!store.seed().await.unwrap());
        assert_eq!(store.counts().await, (1, 4));
    }

    #[tokio::test]
    async fn corrupt_journal_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("diagnostics.jsonl"), "not json\n").unwrap();
        match TelemetryStore::open(dir.path()) {
            Err(StoreError::CorruptJournal { table, line, .. }) => {
                assert_eq!(table, "diagnostics");
                assert_eq!(line, 1);
            }
            Err(other) => panic!("expected corrupt journal error, got {other:?}"),
            Ok(_) => panic!("open should fail on a corrupt journal"),
        }
    }

    #[tokio::test]
    async fn concurrent_creates_all_land() {
        let store = std::sync::Arc::new(TelemetryStore::in_memory());
        let mut tasks = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.create_diagnostic(diag_input(&format!("Tool {i}"))).await.unwrap()
            }));
        }
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20, "every create must get a unique id");
        assert_eq!(store.list_diagnostics().await.len(), 20);
    }
}
