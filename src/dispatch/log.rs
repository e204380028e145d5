//! Session event log shown in the shell

use std::collections::VecDeque;

use serde::Serialize;

/// Maximum log entries to keep
const MAX_LOG_ENTRIES: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Position in the session's full history
    pub seq: u64,
    pub message: String,
    pub category: LogCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogCategory {
    Emergency,
    Dispatch,
    Damage,
    Routing,
}

#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    next_seq: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            next_seq: 0,
        }
    }

    pub fn log(&mut self, message: String, category: LogCategory) {
        if self.entries.len() >= MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.next_seq += 1;
        self.entries.push_back(LogEntry {
            seq: self.next_seq,
            message,
            category,
        });
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The `n` most recent entries, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = EventLog::new();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            log.log(format!("entry {}", i), LogCategory::Routing);
        }
        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        let first = log.entries().next().unwrap();
        assert_eq!(first.message, "entry 10");
        assert_eq!(first.seq, 11);
    }

    #[test]
    fn test_recent() {
        let mut log = EventLog::new();
        log.log("a".into(), LogCategory::Emergency);
        log.log("b".into(), LogCategory::Dispatch);
        log.log("c".into(), LogCategory::Damage);

        let recent: Vec<_> = log.recent(2).map(|e| e.message.as_str()).collect();
        assert_eq!(recent, vec!["b", "c"]);
        assert_eq!(log.recent(10).count(), 3);
    }
}
