//! User-facing notifications and confirmations.
//!
//! Both are fire-and-forget collaborators supplied by whatever front end
//! drives the browser.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Non-blocking notification sink (a toast in a GUI, a line on stderr in a CLI).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}

/// Sends notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "studysphere::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "studysphere::notify", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "studysphere::notify", "{}", message);
    }
}

/// Keeps every notification, for tests and for front ends that render a
/// history.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    log: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, message: &str) {
        self.log.lock().push(Notification {
            level,
            message: message.to_string(),
        });
    }

    /// Everything recorded so far.
    pub fn all(&self) -> Vec<Notification> {
        self.log.lock().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.log.lock())
    }

    pub fn last(&self) -> Option<Notification> {
        self.log.lock().last().cloned()
    }

    /// Messages at `level`, oldest first.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }
}

/// Yes/no prompt before a destructive action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let n = RecordingNotifier::new();
        n.success("uploaded");
        n.error("nope");
        n.info("fyi");
        assert_eq!(n.messages(Level::Error), vec!["nope"]);
        assert_eq!(n.last().unwrap().level, Level::Info);
        assert_eq!(n.take().len(), 3);
        assert!(n.all().is_empty());
    }

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        let no = |_: &str| false;
        assert!(yes.confirm("delete?"));
        assert!(!no.confirm("delete?"));
    }
}
