use crate::core::sync_impl::NodeValue;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// A single entry in the execution trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Seconds since the unix epoch
    pub timestamp: u64,
    pub stage: String,
    /// What `prep` handed to `exec`
    pub inputs: NodeValue,
    /// What `exec` produced
    pub outputs: NodeValue,
    pub action: Option<String>,
}

impl StageTrace {
    pub fn new(
        stage: impl Into<String>,
        inputs: NodeValue,
        outputs: NodeValue,
        action: Option<String>,
    ) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            timestamp,
            stage: stage.into(),
            inputs,
            outputs,
            action,
        }
    }
}

/// Trait for recording execution traces.
pub trait Telemetry: Send + Sync {
    fn record(&self, entry: StageTrace);
    fn flush(&self);
}

/// Simple in-memory collector for traces.
#[derive(Default)]
pub struct MemoryTelemetry {
    traces: Mutex<Vec<StageTrace>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StageTrace>> {
        self.traces.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_traces(&self) -> Vec<StageTrace> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Telemetry for MemoryTelemetry {
    fn record(&self, entry: StageTrace) {
        self.lock().push(entry);
    }

    fn flush(&self) {
        // No-op for memory collector
    }
}

/// Forwards every trace to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn record(&self, entry: StageTrace) {
        log::debug!(
            "trace stage={} action={:?} inputs={} outputs={}",
            entry.stage,
            entry.action,
            entry.inputs,
            entry.outputs
        );
    }

    fn flush(&self) {}
}
