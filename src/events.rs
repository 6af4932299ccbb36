//! Progress notifications for export runs.
//!
//! Observers register a callback with [`ExportEvents::subscribe`] and receive
//! every [`ExportEvent`] of subsequent exports. Job events are delivered from
//! worker threads, in completion order.

use std::path::Path;

use crate::catalog::SizeSpec;
use crate::error::JobError;
use crate::pipeline::ExportOutcome;

/// Something that happened during an export.
#[derive(Debug)]
pub enum ExportEvent<'a> {
    /// Directories are in place and `total` jobs are about to be dispatched.
    Started { total: usize, destination: &'a Path },

    JobCompleted { spec: &'a SizeSpec, path: &'a Path },

    JobFailed { spec: &'a SizeSpec, error: &'a JobError },

    /// Every job reached a terminal state.
    Finished { outcome: &'a ExportOutcome },
}

/// Handle returned by [`ExportEvents::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&ExportEvent<'_>) + Send + Sync>;

/// A list of event subscribers.
#[derive(Default)]
pub struct ExportEvents {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl ExportEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for all future events.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ExportEvent<'_>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub(crate) fn emit(&self, event: &ExportEvent<'_>) {
        for (_, subscriber) in &self.subscribers {
            subscriber(event);
        }
    }
}

impl std::fmt::Debug for ExportEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportEvents")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscribe_and_unsubscribe() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut events = ExportEvents::new();

        let counter = hits.clone();
        let id = events.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(events.len(), 1);

        let event = ExportEvent::Started {
            total: 3,
            destination: Path::new("/out"),
        };
        events.emit(&event);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
        assert!(events.is_empty());

        events.emit(&event);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut events = ExportEvents::new();
        let a = events.subscribe(|_| {});
        events.unsubscribe(a);
        let b = events.subscribe(|_| {});
        assert_ne!(a, b);
    }
}
