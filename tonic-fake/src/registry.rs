//! Storage for fake responses awaiting their calls.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Fake responses queued per call path, handed out in registration order.
///
/// Payload types are erased on insertion so that responses for methods
/// with different request/response types can share one map; callers
/// recover the concrete type at dequeue time and are expected to know it.
#[derive(Default)]
pub(crate) struct ResponseRegistry {
    pending: HashMap<String, VecDeque<Box<dyn Any + Send>>>,
}

impl ResponseRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the queue for `path`, creating the queue on
    /// first registration.
    pub(crate) fn register<T>(&mut self, path: &str, handler: T)
    where
        T: Send + 'static,
    {
        tracing::debug!(path, "enqueuing fake response");
        self.pending
            .entry(path.to_owned())
            .or_default()
            .push_back(Box::new(handler));
    }

    /// Returns true if at least one fake response is waiting for `path`.
    pub(crate) fn has_pending(&self, path: &str) -> bool {
        self.pending.get(path).is_some_and(|queue| !queue.is_empty())
    }

    /// Removes and returns the next fake response registered for `path`.
    ///
    /// The head of the queue is consumed even when it turns out to have
    /// been registered with different payload types than `T`; the
    /// mismatch is reported as `None`, indistinguishable from an empty
    /// queue. Callers must not lean on a mismatched dequeue to leave the
    /// slot in place for somebody else.
    pub(crate) fn dequeue<T: 'static>(&mut self, path: &str) -> Option<T> {
        let handler = self.pending.get_mut(path)?.pop_front()?;
        match handler.downcast::<T>() {
            Ok(handler) => Some(*handler),
            Err(_) => {
                tracing::debug!(path, "dequeued fake response has unexpected payload types");
                None
            }
        }
    }
}

impl fmt::Debug for ResponseRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pending.iter().map(|(path, queue)| (path, queue.len())))
            .finish()
    }
}
