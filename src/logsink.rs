//! Process-wide log sink.
//!
//! Every entry goes to `tracing` and into a bounded in-memory tail that backs
//! `GET /logs`. Errors flagged for notification are also handed to the
//! configured [`Notifier`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;

use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => f.write_str("INFO"),
            LogLevel::Error => f.write_str("ERROR"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub service: String,
    pub message: String,
    /// Whether the entry was forwarded to the notifier
    pub notify: bool,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.service,
            self.message
        )
    }
}

pub struct LogSink {
    service: String,
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
    notifier: Arc<dyn Notifier>,
}

impl LogSink {
    pub fn new(service: impl Into<String>, capacity: usize, notifier: Arc<dyn Notifier>) -> Self {
        let capacity = capacity.max(1);
        Self {
            service: service.into(),
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            notifier,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(service = %self.service, "{message}");
        self.record(LogLevel::Info, message, false);
    }

    /// Record an error. With `notify` set, the notifier is called before
    /// returning; a notifier failure is logged and otherwise ignored.
    pub async fn error(&self, message: impl Into<String>, notify: bool) {
        let message = message.into();
        tracing::error!(service = %self.service, notify, "{message}");
        self.record(LogLevel::Error, message.clone(), notify);

        if notify {
            if let Err(e) = self.notifier.notify(&self.service, &message).await {
                tracing::warn!("Failed to send error notification: {e:#}");
            }
        }
    }

    /// The most recent `limit` entries, oldest first.
    pub fn tail(&self, limit: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    /// The most recent `limit` entries rendered one per line.
    pub fn render_tail(&self, limit: usize) -> String {
        self.tail(limit)
            .iter()
            .map(|e| format!("{e}\n"))
            .collect()
    }

    fn record(&self, level: LogLevel, message: String, notify: bool) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            service: self.service.clone(),
            message,
            notify,
        };

        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoopNotifier;
    use anyhow::Result;
    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, service: &str, message: &str) -> Result<()> {
            self.sent.lock().push(format!("{service}:{message}"));
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _service: &str, _message: &str) -> Result<()> {
            anyhow::bail!("telegram down")
        }
    }

    #[test]
    fn test_tail_returns_newest_last() {
        let sink = LogSink::new("medai", 10, Arc::new(NoopNotifier));
        sink.info("first");
        sink.info("second");
        sink.info("third");

        let tail = sink.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].message, "second");
        assert_eq!(tail[1].message, "third");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let sink = LogSink::new("medai", 3, Arc::new(NoopNotifier));
        for i in 0..5 {
            sink.info(format!("msg {i}"));
        }
        let tail = sink.tail(100);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].message, "msg 2");
    }

    #[test]
    fn test_render_tail_line_format() {
        let sink = LogSink::new("medai", 10, Arc::new(NoopNotifier));
        sink.info("what causes anemia?");
        let text = sink.render_tail(5);
        assert!(text.ends_with("[INFO] medai: what causes anemia?\n"));
        assert_eq!(text.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_error_with_notify_reaches_notifier() {
        let notifier = Arc::new(RecordingNotifier::default());
        let sink = LogSink::new("medai", 10, notifier.clone());

        sink.error("model unavailable", true).await;
        sink.error("quiet failure", false).await;

        assert_eq!(*notifier.sent.lock(), vec!["medai:model unavailable"]);
        let tail = sink.tail(10);
        assert!(tail[0].notify);
        assert!(!tail[1].notify);
        assert_eq!(tail[0].level, LogLevel::Error);
    }

    #[tokio::test]
    async fn test_notifier_failure_is_swallowed() {
        let sink = LogSink::new("medai", 10, Arc::new(FailingNotifier));
        sink.error("boom", true).await;
        assert_eq!(sink.tail(1)[0].message, "boom");
    }
}
