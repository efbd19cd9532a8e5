//! Hand-off of key events from input threads to the thread that owns the
//! practice session.
//!
//! Hardware readers and keyboard hooks run on their own threads. They hold an
//! [`InputSender`]; the consuming side drains the [`InputReceiver`] in order,
//! so the accumulator sees a single serialized event stream.

use crate::types::KeyEdge;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use thiserror::Error;

/// Key event by identifier. Names outside the steno vocabulary are allowed
/// and are filtered by the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub key: String,
    pub edge: KeyEdge,
}

impl InputEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            edge: KeyEdge::Down,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            edge: KeyEdge::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("input queue closed")]
pub struct QueueClosed;

#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    pub fn send(&self, event: InputEvent) -> Result<(), QueueClosed> {
        self.tx.send(event).map_err(|_| QueueClosed)
    }

    pub fn key_down(&self, key: &str) -> Result<(), QueueClosed> {
        self.send(InputEvent::down(key))
    }

    pub fn key_up(&self, key: &str) -> Result<(), QueueClosed> {
        self.send(InputEvent::up(key))
    }
}

#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<InputEvent>,
}

impl InputReceiver {
    /// Events queued so far, without blocking.
    pub fn try_iter(&self) -> impl Iterator<Item = InputEvent> + '_ {
        self.rx.try_iter()
    }

    /// Block until an event arrives. `None` once every sender is gone and
    /// the queue is empty.
    pub fn recv(&self) -> Option<InputEvent> {
        self.rx.recv().ok()
    }

    /// Like [`recv`](Self::recv) with a deadline.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<InputEvent>, QueueClosed> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(QueueClosed),
        }
    }
}

pub fn input_queue() -> (InputSender, InputReceiver) {
    let (tx, rx) = unbounded();
    (InputSender { tx }, InputReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_events_keep_order_across_threads() {
        let (tx, rx) = input_queue();
        let producer = thread::spawn(move || {
            tx.key_down("S-").unwrap();
            tx.key_down("A").unwrap();
            tx.key_up("A").unwrap();
            tx.key_up("S-").unwrap();
        });
        producer.join().unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::down("S-"),
                InputEvent::down("A"),
                InputEvent::up("A"),
                InputEvent::up("S-"),
            ]
        );
        // Sender dropped and queue drained.
        assert_eq!(rx.recv(), None);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = input_queue();
        drop(rx);
        assert_eq!(tx.key_down("S-"), Err(QueueClosed));
    }

    #[test]
    fn test_recv_timeout() {
        let (tx, rx) = input_queue();
        assert_eq!(rx.recv_timeout(Duration::from_millis(1)), Ok(None));
        tx.key_up("-T").unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(1)),
            Ok(Some(InputEvent::up("-T")))
        );
        drop(tx);
        assert_eq!(rx.recv_timeout(Duration::from_millis(1)), Err(QueueClosed));
    }
}
