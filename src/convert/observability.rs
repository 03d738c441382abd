use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConversionError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Which role a table plays in the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    /// The main table; failures here abort the conversion.
    Main,
    /// A sub-table; failures here degrade to an empty join group.
    Sub,
}

/// Context about a table read attempt.
#[derive(Debug, Clone)]
pub struct TableContext {
    /// The input path for the table.
    pub path: PathBuf,
    /// Role of the table in this conversion.
    pub role: TableRole,
}

/// Minimal stats reported when a table is read successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Number of data rows read.
    pub rows: usize,
}

/// Observer interface for conversion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ConversionObserver: Send + Sync {
    /// Called when a table is read and processed successfully.
    fn on_success(&self, _ctx: &TableContext, _stats: TableStats) {}

    /// Called when reading or processing a table fails.
    fn on_failure(&self, _ctx: &TableContext, _severity: ConversionSeverity, _error: &ConversionError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &TableContext, severity: ConversionSeverity, error: &ConversionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ConversionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ConversionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ConversionObserver for CompositeObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &TableContext, severity: ConversionSeverity, error: &ConversionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &TableContext, severity: ConversionSeverity, error: &ConversionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs conversion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ConversionObserver for StdErrObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        eprintln!(
            "[convert][ok] role={:?} path={} rows={}",
            ctx.role,
            ctx.path.display(),
            stats.rows
        );
    }

    fn on_failure(&self, ctx: &TableContext, severity: ConversionSeverity, error: &ConversionError) {
        eprintln!(
            "[convert][{:?}] role={:?} path={} err={}",
            severity,
            ctx.role,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &TableContext, severity: ConversionSeverity, error: &ConversionError) {
        eprintln!(
            "[ALERT][convert][{:?}] role={:?} path={} err={}",
            severity,
            ctx.role,
            ctx.path.display(),
            error
        );
    }
}

/// Appends conversion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ConversionObserver for FileObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        self.append_line(&format!(
            "{} ok role={:?} path={} rows={}",
            unix_ts(),
            ctx.role,
            ctx.path.display(),
            stats.rows
        ));
    }

    fn on_failure(&self, ctx: &TableContext, severity: ConversionSeverity, error: &ConversionError) {
        self.append_line(&format!(
            "{} fail severity={:?} role={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.role,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &TableContext, severity: ConversionSeverity, error: &ConversionError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} role={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.role,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
