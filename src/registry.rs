//! Membership registry: the ordered, lock-guarded list of clients in a room.
//!
//! Every operation, reads included, goes through the same mutex. Callers
//! never see the underlying `Vec`; iteration happens over a
//! [`ClientList::snapshot`] copied out under the lock.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::Client;

struct Members {
    clients: Vec<Arc<dyn Client>>,
    count: usize,
}

/// Insertion-ordered set of room members. Duplicates are allowed.
pub struct ClientList {
    inner: Mutex<Members>,
}

impl Default for ClientList {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientList {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Members {
                clients: Vec::new(),
                count: 0,
            }),
        }
    }

    // A foreign `equals` can panic halfway through `remove`; the Vec stays
    // valid but `count` may lag behind it, so resync on recovery.
    fn lock(&self) -> MutexGuard<'_, Members> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            let mut members = poisoned.into_inner();
            members.count = members.clients.len();
            members
        })
    }

    /// Append `client` to the back of the list. No duplicate check.
    pub fn add(&self, client: Arc<dyn Client>) {
        let mut members = self.lock();
        members.clients.push(client);
        members.count += 1;
        debug_assert_eq!(members.count, members.clients.len());
    }

    /// Remove every entry that `client` reports equal to itself.
    ///
    /// Returns `true` if at least one entry went away.
    pub fn remove(&self, client: &dyn Client) -> bool {
        let mut members = self.lock();
        let before = members.clients.len();
        members.clients.retain(|entry| !client.equals(entry.as_ref()));
        let removed = before - members.clients.len();
        members.count -= removed;
        debug_assert_eq!(members.count, members.clients.len());
        removed > 0
    }

    /// Member names, sorted ascending.
    pub fn who(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .clients
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn present(&self, name: &str) -> bool {
        self.lock().clients.iter().any(|c| c.name() == name)
    }

    /// First member, in insertion order, whose name is `name`.
    pub fn get_client(&self, name: &str) -> Option<Arc<dyn Client>> {
        self.lock()
            .clients
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    /// Current members in insertion order, copied under the lock.
    pub fn snapshot(&self) -> Vec<Arc<dyn Client>> {
        self.lock().clients.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.lock().clients.first().is_none()
    }
}
