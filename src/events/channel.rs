//! Progress sinks: plain line callbacks and a crossbeam-channel sender.
//!
//! The batch operations only see `&mut dyn ProgressSink`. A closure taking
//! `&str` receives one rendered line per event; an [`EventSender`] forwards
//! the typed event to a receiver on another thread.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Receives progress from a batch operation, synchronously and in order.
pub trait ProgressSink {
    /// Deliver one event.
    fn emit(&mut self, event: Event);
}

impl<F> ProgressSink for F
where
    F: FnMut(&str),
{
    fn emit(&mut self, event: Event) {
        self(&event.to_string());
    }
}

/// Sends events from the core library.
///
/// This is a thin wrapper around crossbeam's Sender that can be
/// cloned and sent across threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Create a new EventSender from a raw crossbeam sender.
    pub fn new(sender: Sender<Event>) -> Self {
        Self { inner: sender }
    }

    /// Send an event. Non-blocking if the channel isn't full.
    ///
    /// If the receiver is dropped, the event is silently discarded.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

impl ProgressSink for EventSender {
    fn emit(&mut self, event: Event) {
        self.send(event);
    }
}

/// Receives events from the core library.
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

    /// Returns an iterator over received events; ends when every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// A channel between a batch operation and whatever displays its progress.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// Create a bounded event channel with the specified capacity.
    ///
    /// Gives backpressure when the display side is slow.
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}
