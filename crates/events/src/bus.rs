//! Publish/subscribe abstraction (mechanics only).
//!
//! The reconciliation engine publishes a fresh snapshot after every committed
//! mutation; presentation code subscribes and renders whatever it receives.
//!
//! - **Persist first**: messages are published only after the durable store
//!   accepted the new state, so a subscriber never sees state that could be lost.
//! - **Broadcast**: every subscription gets its own copy of each message.
//! - **Idempotent consumers**: a snapshot supersedes the previous one, so seeing
//!   the same snapshot twice is harmless.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to a message stream.
///
/// Designed for single-threaded consumption: the station's event loop drains it
/// with [`Subscription::drain_latest`] after handling each input event.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Consume everything queued so far and return only the newest message.
    pub fn drain_latest(&self) -> Option<M> {
        let mut latest = None;
        while let Ok(message) = self.receiver.try_recv() {
            latest = Some(message);
        }
        latest
    }
}

/// Transport-agnostic event bus.
///
/// `publish()` can fail (e.g. a poisoned lock); the caller decides whether that
/// is fatal. The engine treats it as a logged warning since the published
/// message is derived from state that is already persisted.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
