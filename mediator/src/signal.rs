//! Lifecycle signals emitted by subscriptions
//!
//! A subscription emits `Signal::Trigger` after each successful dispatch and
//! `Signal::Cancel` when it is canceled. Listeners are plain closures kept in
//! a small list on the subscription; one-shot listeners are dropped the first
//! time their signal fires.

use std::fmt;
use std::sync::Arc;

/// Observable lifecycle signal of a subscription
///
/// Signals carry no payload. Listeners receive the subscription that emitted
/// them and can query its state from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The callback ran to completion
    Trigger,

    /// The subscription moved to the canceled state
    Cancel,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Trigger => write!(f, "trigger"),
            Signal::Cancel => write!(f, "cancel"),
        }
    }
}

/// Handle for a registered listener, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry<L: ?Sized> {
    id: ListenerId,
    signal: Signal,
    once: bool,
    listener: Arc<L>,
}

/// Ordered listener list for one subscription
///
/// Generic over the listener type so it knows nothing about subscriptions.
pub(crate) struct Listeners<L: ?Sized> {
    next_id: u64,
    entries: Vec<Entry<L>>,
}

impl<L: ?Sized> Listeners<L> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a listener, returning its id
    pub(crate) fn add(&mut self, signal: Signal, once: bool, listener: Arc<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            signal,
            once,
            listener,
        });
        id
    }

    /// Remove a listener, returning whether it was registered
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Collect the listeners for `signal` in registration order
    ///
    /// One-shot listeners are removed from the list as part of the take, so
    /// they can never run twice even if the signal is emitted again while
    /// they are executing.
    pub(crate) fn take(&mut self, signal: Signal) -> Vec<Arc<L>> {
        let selected = self
            .entries
            .iter()
            .filter(|entry| entry.signal == signal)
            .map(|entry| Arc::clone(&entry.listener))
            .collect();
        self.entries
            .retain(|entry| !(entry.signal == signal && entry.once));
        selected
    }

    pub(crate) fn count(&self, signal: Signal) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.signal == signal)
            .count()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
