//! Transient notices
//!
//! Each notice carries its own deadline. Notices stack in push order and
//! expire independently; dismissing one by hand removes it for good, so a
//! later expiry pass never sees it again.

use std::time::{Duration, Instant};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message shown until its deadline or until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    pub deadline: Instant,
}

/// Stack of active notices
#[derive(Debug)]
pub struct Notifications {
    timeout: Duration,
    next_id: u64,
    notices: Vec<Notice>,
}

impl Notifications {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            next_id: 1,
            notices: Vec::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Show an informational notice, returns its id
    pub fn push(&mut self, message: impl Into<String>) -> u64 {
        self.push_at(message, NoticeKind::Info, Instant::now())
    }

    /// Show an error notice, returns its id
    pub fn push_error(&mut self, message: impl Into<String>) -> u64 {
        self.push_at(message, NoticeKind::Error, Instant::now())
    }

    /// Show a notice created at `now`
    pub fn push_at(&mut self, message: impl Into<String>, kind: NoticeKind, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            message: message.into(),
            kind,
            deadline: now + self.timeout,
        });
        id
    }

    /// Close a notice by hand, returns false if it was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Close the most recent notice
    pub fn dismiss_latest(&mut self) -> Option<Notice> {
        self.notices.pop()
    }

    /// Drop notices whose deadline has passed, returns how many
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| n.deadline > now);
        before - self.notices.len()
    }

    /// Active notices, oldest first
    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
