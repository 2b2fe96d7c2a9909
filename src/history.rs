//! Per-room message log.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::message::Message;

/// Append-only record of messages delivered through a room.
///
/// Unbounded unless built with [`History::with_limit`], in which case the
/// oldest entries are evicted first.
#[derive(Default)]
pub struct History {
    entries: Mutex<VecDeque<Message>>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            limit,
        }
    }

    // push/pop cannot leave the deque half-updated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, message: Message) {
        let mut entries = self.lock();
        entries.push_back(message);
        if let Some(limit) = self.limit {
            while entries.len() > limit {
                entries.pop_front();
            }
        }
    }

    /// Display form of every stored message, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_in_arrival_order() {
        let history = History::new();
        history.append(Message::chat("alice", "one"));
        history.append(Message::system("two"));

        assert_eq!(history.snapshot(), ["<alice> one", "* two"]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn limit_evicts_oldest() {
        let history = History::with_limit(Some(2));
        for n in 0..5 {
            history.append(Message::system(n.to_string()));
        }
        assert_eq!(history.snapshot(), ["* 3", "* 4"]);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let history = History::with_limit(Some(0));
        history.append(Message::system("gone"));
        assert!(history.is_empty());
    }
}
