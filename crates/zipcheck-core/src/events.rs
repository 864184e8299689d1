//! Progress events emitted by a verification run.
//!
//! A run emits, for each file entry, exactly one
//! [`EntryStarted`](VerifyEvent::EntryStarted) followed by zero or more
//! [`BytesRead`](VerifyEvent::BytesRead) events in read order, and ends with
//! exactly one [`Completed`](VerifyEvent::Completed). Nothing is emitted for
//! the run after `Completed`.
//!
//! Sinks must hand events off without blocking the producer; all sinks in
//! this module do so.

use std::sync::mpsc;

use crate::VerificationResult;

/// A progress notification from a verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyEvent {
    /// Checking of an entry has begun.
    EntryStarted {
        /// Catalog path of the entry.
        path: String,
        /// Declared uncompressed size in bytes.
        size: u64,
    },

    /// A chunk of the current entry has been read and checksummed.
    ///
    /// `count` is the chunk length, not a running total.
    BytesRead {
        /// Bytes in this chunk.
        count: u64,
    },

    /// The run is over. Carries the final or, on abort, partial result.
    Completed(VerificationResult),
}

/// Receiver side of the event protocol.
///
/// # Examples
///
/// ```
/// use zipcheck_core::events::EventSink;
/// use zipcheck_core::events::VerifyEvent;
///
/// #[derive(Default)]
/// struct ByteCounter(u64);
///
/// impl EventSink for ByteCounter {
///     fn emit(&mut self, event: VerifyEvent) {
///         if let VerifyEvent::BytesRead { count } = event {
///             self.0 += count;
///         }
///     }
/// }
///
/// let mut counter = ByteCounter::default();
/// counter.emit(VerifyEvent::BytesRead { count: 5 });
/// assert_eq!(counter.0, 5);
/// ```
pub trait EventSink: Send {
    /// Delivers one event.
    fn emit(&mut self, event: VerifyEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&mut self, _event: VerifyEvent) {}
}

/// Records events in memory.
impl EventSink for Vec<VerifyEvent> {
    fn emit(&mut self, event: VerifyEvent) {
        self.push(event);
    }
}

/// Forwards events to a single observer. A disconnected receiver is ignored.
impl EventSink for mpsc::Sender<VerifyEvent> {
    fn emit(&mut self, event: VerifyEvent) {
        let _ = self.send(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: VerifyEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: VerifyEvent) {
        (**self).emit(event);
    }
}

/// Fans each event out to any number of observers.
///
/// Observers that hang up are dropped on the next emit.
///
/// # Examples
///
/// ```
/// use zipcheck_core::events::{EventBroadcaster, EventSink, VerifyEvent};
///
/// let mut bus = EventBroadcaster::new();
/// let first = bus.subscribe();
/// let second = bus.subscribe();
///
/// bus.emit(VerifyEvent::BytesRead { count: 3 });
///
/// assert_eq!(first.try_recv().ok(), Some(VerifyEvent::BytesRead { count: 3 }));
/// assert_eq!(second.try_recv().ok(), Some(VerifyEvent::BytesRead { count: 3 }));
/// ```
#[derive(Debug, Default)]
pub struct EventBroadcaster {
    subscribers: Vec<mpsc::Sender<VerifyEvent>>,
}

impl EventBroadcaster {
    /// Creates a broadcaster with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer and returns its receiving end.
    pub fn subscribe(&mut self) -> mpsc::Receiver<VerifyEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Number of observers still connected as of the last emit.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl EventSink for EventBroadcaster {
    fn emit(&mut self, event: VerifyEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut events: Vec<VerifyEvent> = Vec::new();
        events.emit(VerifyEvent::EntryStarted {
            path: "a".to_string(),
            size: 1,
        });
        events.emit(VerifyEvent::BytesRead { count: 1 });

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], VerifyEvent::EntryStarted { .. }));
    }

    #[test]
    fn test_sender_ignores_disconnected_receiver() {
        let (mut tx, rx) = mpsc::channel::<VerifyEvent>();
        drop(rx);
        tx.emit(VerifyEvent::BytesRead { count: 1 });
    }

    #[test]
    fn test_broadcaster_drops_hung_up_observers() {
        let mut bus = EventBroadcaster::new();
        let kept = bus.subscribe();
        let gone = bus.subscribe();
        drop(gone);

        bus.emit(VerifyEvent::Completed(VerificationResult::new()));

        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(
            kept.try_recv().ok(),
            Some(VerifyEvent::Completed(VerificationResult::new()))
        );
    }

    #[test]
    fn test_boxed_sink() {
        let mut sink: Box<dyn EventSink> = Box::new(NoopSink);
        sink.emit(VerifyEvent::BytesRead { count: 9 });
    }
}
