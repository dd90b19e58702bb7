use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::{DiagEvent, DiagSink};

#[derive(Serialize)]
struct JsonlRecord<'a> {
    seq: u64,
    written_at: String,
    #[serde(flatten)]
    event: &'a DiagEvent,
}

struct Inner {
    path: PathBuf,
    seq: u64,
    write_errors: u64,
}

/// Append-only JSON Lines sink: one event per line with a monotonically
/// increasing sequence number and a wall-clock write timestamp.
///
/// Write failures are swallowed (the sink contract is fire-and-forget) but
/// counted, so a harness can surface them after the run.
pub struct JsonlSink {
    inner: RefCell<Inner>,
}

impl JsonlSink {
    /// Creates the sink and ensures parent directories exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create_dir_all {:?}", parent))?;
        }
        Ok(Self {
            inner: RefCell::new(Inner {
                path,
                seq: 0,
                write_errors: 0,
            }),
        })
    }

    /// Number of events appended so far.
    pub fn seq(&self) -> u64 {
        self.inner.borrow().seq
    }

    /// Number of writes that failed and were dropped.
    pub fn write_errors(&self) -> u64 {
        self.inner.borrow().write_errors
    }

    fn append(&self, event: DiagEvent) {
        let mut inner = self.inner.borrow_mut();
        let record = JsonlRecord {
            seq: inner.seq,
            written_at: Utc::now().to_rfc3339(),
            event: &event,
        };
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(_) => {
                inner.write_errors += 1;
                return;
            }
        };
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&inner.path)
            .and_then(|mut f| writeln!(f, "{line}"));
        match written {
            Ok(()) => inner.seq += 1,
            Err(_) => inner.write_errors += 1,
        }
    }
}

impl DiagSink for JsonlSink {
    fn log(&self, message: &str) {
        self.append(DiagEvent::Log {
            message: message.to_string(),
        });
    }

    fn debug(&self, message: &str) {
        self.append(DiagEvent::Debug {
            message: message.to_string(),
        });
    }

    fn plot(&self, chart: &str, series: &str, value_micros: i64) {
        self.append(DiagEvent::Plot {
            chart: chart.to_string(),
            series: series.to_string(),
            value_micros,
        });
    }
}
