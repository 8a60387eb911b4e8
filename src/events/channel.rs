//! Event channel implementation using crossbeam-channel.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the engine to whoever is listening.
///
/// Cloneable and `Send`, so rayon workers can hold one. A sender built by
/// [`null_sender`] has no channel behind it and drops every event.
#[derive(Clone)]
pub struct EventSender {
    inner: Option<Sender<Event>>,
}

impl EventSender {
    /// Wrap a raw crossbeam sender.
    pub fn new(sender: Sender<Event>) -> Self {
        Self {
            inner: Some(sender),
        }
    }

    /// Send an event. If the receiver is gone the event is discarded.
    pub fn send(&self, event: Event) {
        if let Some(sender) = &self.inner {
            let _ = sender.send(event);
        }
    }

    /// Whether events sent here can reach a receiver at all
    pub fn is_connected(&self) -> bool {
        self.inner.is_some()
    }
}

/// Receives events from the engine.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender has been dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Constructors for sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create an unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (EventSender::new(sender), EventReceiver { inner: receiver })
    }

    /// Create a bounded event channel (backpressure for slow consumers).
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (EventSender::new(sender), EventReceiver { inner: receiver })
    }
}

/// A sender that discards everything, for runs without a listener.
pub fn null_sender() -> EventSender {
    EventSender { inner: None }
}
