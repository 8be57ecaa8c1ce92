//! Decision logging capability.
//!
//! The engine reports which gate produced (or would have produced) a denial
//! through this trait. Logging is advisory only: it never affects the
//! decision, never panics, never blocks.

use std::fmt;

/// Sink for denial diagnostics from the decision engine.
pub trait DecisionLog: Send + Sync {
    /// A gate evaluated to "deny" (or computed a deny that a documented
    /// override discarded). `gate` names the gate, `detail` carries context.
    fn denied(&self, gate: &str, detail: &str);
}

/// Discards all diagnostics. The default for [`crate::PrivilegeEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLog;

impl DecisionLog for NoOpLog {
    fn denied(&self, _gate: &str, _detail: &str) {}
}

/// Emits denial diagnostics as `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DecisionLog for TracingLog {
    fn denied(&self, gate: &str, detail: &str) {
        tracing::debug!(gate, detail, "privilege check denied");
    }
}

impl fmt::Debug for dyn DecisionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecisionLog")
    }
}

/// Test sink that records every denial event.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingLog {
    events: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl RecordingLog {
    pub(crate) fn gates(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("log mutex")
            .iter()
            .map(|(gate, _)| gate.clone())
            .collect()
    }
}

#[cfg(test)]
impl DecisionLog for RecordingLog {
    fn denied(&self, gate: &str, detail: &str) {
        self.events
            .lock()
            .expect("log mutex")
            .push((gate.to_owned(), detail.to_owned()));
    }
}
