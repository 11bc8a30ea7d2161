use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable state of one account's refresh coordinator.
///
/// `last_success` is the availability flag: it reflects the outcome of the
/// most recent completed cycle and starts out `false` before any cycle has
/// run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RefreshStatus {
    pub is_running: bool,
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_success_time: Option<DateTime<Utc>>,
    pub last_success: bool,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub next_scheduled_refresh: Option<DateTime<Utc>>,
    pub sub_accounts: usize,
    pub cycles_completed: u64,
}

/// Outcome of a single `refresh` call.
///
/// A coalesced report means another caller's cycle completed while this one
/// waited; the fields then describe that cycle's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub sub_accounts: usize,
    pub duration_ms: u64,
    pub coalesced: bool,
    pub error: Option<String>,
}

impl RefreshReport {
    pub fn success(sub_accounts: usize, duration_ms: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            success: true,
            sub_accounts,
            duration_ms,
            coalesced: false,
            error: None,
        }
    }

    pub fn failure(error: &str, duration_ms: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            success: false,
            sub_accounts: 0,
            duration_ms,
            coalesced: false,
            error: Some(error.to_string()),
        }
    }

    pub fn coalesced(success: bool, sub_accounts: usize, error: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            success,
            sub_accounts,
            duration_ms: 0,
            coalesced: true,
            error,
        }
    }
}

/// Bounded log of completed refresh cycles, oldest entries evicted first.
#[derive(Debug, Clone)]
pub struct RefreshHistory {
    entries: Vec<RefreshHistoryEntry>,
    capacity: usize,
}

impl RefreshHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn add_entry(&mut self, entry: RefreshHistoryEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
    }

    pub fn recent(&self, limit: usize) -> &[RefreshHistoryEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.success).count()
    }

    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.success).count()
    }
}

impl Default for RefreshHistory {
    fn default() -> Self {
        Self::with_capacity(crate::config::DEFAULT_HISTORY_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub sub_accounts: usize,
    pub duration_ms: u64,
    pub error_message: Option<String>,
}

impl RefreshHistoryEntry {
    pub fn success(sub_accounts: usize, duration_ms: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            success: true,
            sub_accounts,
            duration_ms,
            error_message: None,
        }
    }

    pub fn failure(error: &str, duration_ms: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            success: false,
            sub_accounts: 0,
            duration_ms,
            error_message: Some(error.to_string()),
        }
    }
}
