//! Recording fakes for the orchestrator's capability interfaces.

use std::sync::Mutex;

use crate::pipeline::BuildLog;

/// `BuildLog` that records every event so tests can assert on the
/// logging side channel.
#[derive(Debug, Default)]
pub struct RecordingLog {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Info events received so far, in order.
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    /// Error events received so far, in order.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl BuildLog for RecordingLog {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
