//! Last-call-wins debouncing keyed by target.
//!
//! Each key holds at most one pending entry: a deadline plus a generation token. Scheduling
//! again replaces the entry, so a burst of triggers collapses into one firing after the quiet
//! period. Time is supplied by the caller, which keeps the engine single-threaded; the host
//! polls [`Debouncer::take_due`] from its event loop, using [`Debouncer::next_deadline`] to
//! arm its own timer.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Identifies one scheduled firing. A newer token for the same key supersedes older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebounceToken(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Instant,
    token: DebounceToken,
}

/// Per-key debouncer.
#[derive(Debug)]
pub struct Debouncer<K> {
    delay: Duration,
    next_token: u64,
    pending: HashMap<K, Pending>,
}

impl<K: Eq + Hash + Clone> Debouncer<K> {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_token: 0,
            pending: HashMap::new(),
        }
    }

    /// Schedule `key` to fire once `delay` has passed since `now`, superseding any pending
    /// entry for the same key.
    pub fn schedule(&mut self, key: K, now: Instant) -> DebounceToken {
        self.next_token += 1;
        let token = DebounceToken(self.next_token);
        self.pending.insert(
            key,
            Pending {
                deadline: now + self.delay,
                token,
            },
        );
        token
    }

    /// Drop the pending entry for `key`. Returns `true` if there was one.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Drop every pending entry.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Returns `true` if `key` has a pending entry.
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// The token of the pending entry for `key`.
    pub fn pending_token(&self, key: &K) -> Option<DebounceToken> {
        self.pending.get(key).map(|p| p.token)
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Remove and return every key whose deadline is at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(K, Pending)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, p)| (k.clone(), *p))
            .collect();
        due.sort_by_key(|(_, p)| (p.deadline, p.token));

        for (key, _) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(key, _)| key).collect()
    }
}
