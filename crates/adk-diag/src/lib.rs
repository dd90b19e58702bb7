//! adk-diag
//!
//! Write-only diagnostics sinks for algorithm callbacks: log lines, debug
//! lines, and chart/series plot points. Sinks are fire-and-forget — a sink
//! failure never propagates into a callback.
//!
//! The callback model is single-threaded and host-driven, so sinks use
//! interior mutability (`RefCell`) behind `&self` methods rather than
//! locks.

mod jsonl;

pub use jsonl::JsonlSink;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

/// One diagnostics event emitted by an algorithm or the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum DiagEvent {
    Log { message: String },
    Debug { message: String },
    Plot {
        chart: String,
        series: String,
        value_micros: i64,
    },
}

/// Write-only diagnostics sink handed to algorithm callbacks.
pub trait DiagSink {
    fn log(&self, message: &str);
    fn debug(&self, message: &str);
    fn plot(&self, chart: &str, series: &str, value_micros: i64);
}

/// Discards everything.
pub struct NullSink;

impl DiagSink for NullSink {
    fn log(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
    fn plot(&self, _chart: &str, _series: &str, _value_micros: i64) {}
}

/// In-memory sink for tests and report assembly.
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<DiagEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagEvent> {
        self.events.borrow().clone()
    }

    /// Log messages containing `needle`, in emission order.
    pub fn logs_containing(&self, needle: &str) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                DiagEvent::Log { message } if message.contains(needle) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Plot points for a chart/series pair, in emission order.
    pub fn plot_points(&self, chart: &str, series: &str) -> Vec<i64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                DiagEvent::Plot {
                    chart: c,
                    series: s,
                    value_micros,
                } if c == chart && s == series => Some(*value_micros),
                _ => None,
            })
            .collect()
    }
}

impl DiagSink for RecordingSink {
    fn log(&self, message: &str) {
        self.events.borrow_mut().push(DiagEvent::Log {
            message: message.to_string(),
        });
    }

    fn debug(&self, message: &str) {
        self.events.borrow_mut().push(DiagEvent::Debug {
            message: message.to_string(),
        });
    }

    fn plot(&self, chart: &str, series: &str, value_micros: i64) {
        self.events.borrow_mut().push(DiagEvent::Plot {
            chart: chart.to_string(),
            series: series.to_string(),
            value_micros,
        });
    }
}

/// Forwards diagnostics to the `tracing` ecosystem (CLI runs).
pub struct TracingSink;

impl DiagSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "adk::algo", "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "adk::algo", "{message}");
    }

    fn plot(&self, chart: &str, series: &str, value_micros: i64) {
        tracing::debug!(target: "adk::plot", chart, series, value_micros);
    }
}
