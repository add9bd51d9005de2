//! Toast call contract: a message and a severity tag.

use std::sync::Mutex;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Err,
    Info,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Ok => "✅",
            Severity::Err => "⚠️",
            Severity::Info => "🧵",
        }
    }
}

pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Sends notifications to the tracing subscriber only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Err => warn!(?severity, "{message}"),
            Severity::Ok | Severity::Info => info!(?severity, "{message}"),
        }
    }
}

/// Keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, Severity)> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<(String, Severity)> {
        self.sent().pop()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.sent()
            .iter()
            .filter(|(_, sent)| *sent == severity)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        if let Ok(mut guard) = self.sent.lock() {
            guard.push((message.to_string(), severity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify("Completa los campos requeridos.", Severity::Err);
        notifier.notify("¡Listo!", Severity::Ok);
        assert_eq!(notifier.count(Severity::Err), 1);
        assert_eq!(notifier.last(), Some(("¡Listo!".to_string(), Severity::Ok)));
    }
}
