//! Debounced task scheduling on an explicit clock.
//!
//! The editor runs on a single event loop, so instead of timers this module keeps a deadline
//! per key and lets the loop ask which deadlines have passed. Re-scheduling a key cancels its
//! pending deadline and starts a new one, so only the settled state after a quiet period is
//! acted upon.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Work items the editor debounces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebounceKey {
    /// Record the current document in the edit history.
    Commit,
    /// Re-run the active search against the edited document.
    Search,
}

/// Keyed deadlines.
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    pending: HashMap<K, Instant>,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> Debouncer<K> {
    /// Create a debouncer with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, key: K, now: Instant, delay: Duration) {
        self.pending.insert(key, now + delay);
    }

    /// Cancel a pending deadline. Returns `true` if one was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    /// Returns `true` if `key` has a pending deadline.
    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    /// Deadline for `key`, if pending.
    pub fn deadline(&self, key: K) -> Option<Instant> {
        self.pending.get(&key).copied()
    }

    /// Earliest pending deadline (useful for sizing an event-loop poll timeout).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Remove and return every key whose deadline is at or before `now`, earliest first.
    pub fn poll(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(Instant, K)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);

        for (_, key) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Drop every pending deadline.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reschedule_restarts_the_delay() {
        let start = Instant::now();
        let delay = Duration::from_millis(500);
        let mut debouncer = Debouncer::new();

        debouncer.schedule(DebounceKey::Commit, start, delay);
        debouncer.schedule(
            DebounceKey::Commit,
            start + Duration::from_millis(400),
            delay,
        );

        assert!(debouncer.poll(start + Duration::from_millis(600)).is_empty());
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(900)),
            vec![DebounceKey::Commit]
        );
        assert!(!debouncer.is_pending(DebounceKey::Commit));
    }

    #[test]
    fn test_poll_orders_by_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        debouncer.schedule(DebounceKey::Commit, start, Duration::from_millis(500));
        debouncer.schedule(DebounceKey::Search, start, Duration::from_millis(300));

        assert_eq!(
            debouncer.next_deadline(),
            Some(start + Duration::from_millis(300))
        );
        assert_eq!(
            debouncer.poll(start + Duration::from_secs(1)),
            vec![DebounceKey::Search, DebounceKey::Commit]
        );
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        debouncer.schedule(DebounceKey::Search, start, Duration::ZERO);
        assert!(debouncer.cancel(DebounceKey::Search));
        assert!(!debouncer.cancel(DebounceKey::Search));
        assert!(debouncer.poll(start).is_empty());
    }
}
