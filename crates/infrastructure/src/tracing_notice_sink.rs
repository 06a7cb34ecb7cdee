//! Notice sink that logs through `tracing` and buffers notices for the shell.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use backoffice_application::{Notice, NoticeLevel, NoticeSink};
use tracing::{info, warn};

const DEFAULT_CAPACITY: usize = 16;

/// Logs every notice and keeps the most recent ones until the shell drains them.
#[derive(Debug)]
pub struct TracingNoticeSink {
    recent: Mutex<VecDeque<Notice>>,
    capacity: usize,
}

impl TracingNoticeSink {
    /// Creates a sink keeping up to 16 notices.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a sink keeping up to `capacity` notices; older ones are dropped.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Removes and returns the buffered notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

impl Default for TracingNoticeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeSink for TracingNoticeSink {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => warn!(text = %notice.message, "error notice"),
            NoticeLevel::Success | NoticeLevel::Info => info!(text = %notice.message, "notice"),
        }

        let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(notice);
    }
}
