//! Debugger observer contract.
//!
//! The engine notifies the attached debugger of four event categories: value
//! constructed, value requested, value served from the per-frame keep, and
//! context close. Observers trace; they must never alter resolution
//! outcomes.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::value::Value;

pub trait Debugger: Send + Sync {
    /// A value was computed for `name` (first construction in its frame).
    fn constructed(&self, _name: &str, _value: &Value) {}

    /// Resolution was asked for `name`.
    fn requested(&self, _name: &str) {}

    /// `name` was served from the per-frame keep without re-evaluation.
    fn retrieved(&self, _name: &str, _value: &Value) {}

    /// The context this debugger was attached to finished.
    fn closed(&self) {}
}

/// The default observer: ignores everything.
#[derive(Debug, Default)]
pub struct NoopDebugger;

impl Debugger for NoopDebugger {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub constructed: usize,
    pub requested: usize,
    pub retrieved: usize,
}

/// Counts events per name; useful for tracing and for asserting the
/// resolve-once-per-frame discipline.
#[derive(Debug, Default)]
pub struct CountingDebugger {
    counts: Mutex<HashMap<String, EventCounts>>,
    closes: Mutex<usize>,
}

impl CountingDebugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts_for(&self, name: &str) -> EventCounts {
        self.counts
            .lock()
            .ok()
            .and_then(|c| c.get(name).copied())
            .unwrap_or_default()
    }

    pub fn close_count(&self) -> usize {
        self.closes.lock().map(|c| *c).unwrap_or_default()
    }

    fn bump(&self, name: &str, f: impl FnOnce(&mut EventCounts)) {
        if let Ok(mut counts) = self.counts.lock() {
            f(counts.entry(name.to_string()).or_default());
        }
    }
}

impl Debugger for CountingDebugger {
    fn constructed(&self, name: &str, _value: &Value) {
        self.bump(name, |c| c.constructed += 1);
    }

    fn requested(&self, name: &str) {
        self.bump(name, |c| c.requested += 1);
    }

    fn retrieved(&self, name: &str, _value: &Value) {
        self.bump(name, |c| c.retrieved += 1);
    }

    fn closed(&self) {
        if let Ok(mut closes) = self.closes.lock() {
            *closes += 1;
        }
    }
}
