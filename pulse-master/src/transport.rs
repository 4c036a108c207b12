//! Heartbeat transport
//!
//! Point-to-point message channel between the master and the workers of the
//! pool. Messages are keyed by sender identity and tag, and the master only
//! ever probes without blocking.
//!
//! [`ChannelTransport`] is the in-process implementation used when workers
//! run as tasks of the same runtime.

use pulse_core::domain::worker::WorkerId;
use std::collections::{HashMap, VecDeque};
use tokio::sync::mpsc;
use tracing::warn;

/// Tag of liveness messages
pub const HEARTBEAT_TAG: u32 = 99;

/// Payload of a heartbeat; only its presence matters
pub const HEARTBEAT_PAYLOAD: i32 = 1;

/// A message in flight from a worker to the master
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub sender: WorkerId,
    pub tag: u32,
    pub payload: i32,
}

impl Envelope {
    pub fn heartbeat(sender: WorkerId) -> Self {
        Self {
            sender,
            tag: HEARTBEAT_TAG,
            payload: HEARTBEAT_PAYLOAD,
        }
    }
}

/// Receiving end of the transport, as seen by the master
pub trait Transport: Send {
    /// Consumes the oldest pending message from `sender` on `tag`, if any
    ///
    /// Must return immediately whether or not a message is pending.
    fn try_receive(&mut self, sender: WorkerId, tag: u32) -> Option<i32>;
}

/// Error returned when the master side of the transport is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("transport closed")]
pub struct TransportClosed;

/// Sending end handed to workers
#[derive(Debug, Clone)]
pub struct TransportSender {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl TransportSender {
    pub fn send(&self, envelope: Envelope) -> Result<(), TransportClosed> {
        self.tx.send(envelope).map_err(|_| TransportClosed)
    }
}

/// In-process transport backed by an unbounded tokio channel
///
/// Incoming messages are sorted into per-(sender, tag) queues on every
/// probe. Messages from identities outside the pool are dropped.
pub struct ChannelTransport {
    rx: mpsc::UnboundedReceiver<Envelope>,
    pending: HashMap<(WorkerId, u32), VecDeque<i32>>,
    pool_size: u32,
}

impl ChannelTransport {
    /// Creates a transport for a pool of `pool_size` workers
    pub fn channel(pool_size: u32) -> (Self, TransportSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            rx,
            pending: HashMap::new(),
            pool_size,
        };
        (transport, TransportSender { tx })
    }

    /// Moves everything that arrived since the last probe into the queues
    fn drain_incoming(&mut self) {
        while let Ok(envelope) = self.rx.try_recv() {
            if !envelope.sender.is_in_pool(self.pool_size) {
                warn!(
                    "Dropping message from unknown sender {} (pool size {})",
                    envelope.sender, self.pool_size
                );
                continue;
            }

            self.pending
                .entry((envelope.sender, envelope.tag))
                .or_default()
                .push_back(envelope.payload);
        }
    }
}

impl Transport for ChannelTransport {
    fn try_receive(&mut self, sender: WorkerId, tag: u32) -> Option<i32> {
        self.drain_incoming();
        self.pending.get_mut(&(sender, tag))?.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_is_keyed_by_sender_and_tag() {
        let (mut transport, sender) = ChannelTransport::channel(3);

        sender.send(Envelope::heartbeat(WorkerId::new(2))).unwrap();
        sender
            .send(Envelope {
                sender: WorkerId::new(1),
                tag: 7,
                payload: 5,
            })
            .unwrap();

        assert_eq!(transport.try_receive(WorkerId::new(1), HEARTBEAT_TAG), None);
        assert_eq!(
            transport.try_receive(WorkerId::new(2), HEARTBEAT_TAG),
            Some(HEARTBEAT_PAYLOAD)
        );
        // Consumed
        assert_eq!(transport.try_receive(WorkerId::new(2), HEARTBEAT_TAG), None);
        // Other tags stay pending
        assert_eq!(transport.try_receive(WorkerId::new(1), 7), Some(5));
    }

    #[test]
    fn test_out_of_pool_senders_are_dropped() {
        let (mut transport, sender) = ChannelTransport::channel(2);

        sender.send(Envelope::heartbeat(WorkerId::new(0))).unwrap();
        sender.send(Envelope::heartbeat(WorkerId::new(9))).unwrap();

        assert_eq!(transport.try_receive(WorkerId::new(9), HEARTBEAT_TAG), None);
        assert_eq!(transport.try_receive(WorkerId::new(0), HEARTBEAT_TAG), None);
        assert!(transport.pending.is_empty());
    }

    #[test]
    fn test_send_after_transport_dropped() {
        let (transport, sender) = ChannelTransport::channel(1);
        drop(transport);
        assert_eq!(
            sender.send(Envelope::heartbeat(WorkerId::new(1))),
            Err(TransportClosed)
        );
    }
}
