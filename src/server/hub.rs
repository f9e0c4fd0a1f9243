// Connection registry for the persistent WebSocket channel
//
// Each open socket gets a random id and an unbounded queue. The progress
// relay addresses events by id; nothing else is kept per connection.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::downloader::ProgressEvent;

/// Addressing key of one open channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frames pushed from server to browser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ServerEvent {
    /// First frame on every socket; tells the browser its own id
    Connect { sid: ConnectionId },
    Progress(ProgressEvent),
}

#[derive(Clone, Default)]
pub struct ConnectionHub {
    channels: Arc<RwLock<HashMap<ConnectionId, UnboundedSender<ServerEvent>>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and hand back its id and outbound queue
    pub fn register(&self) -> (ConnectionId, UnboundedReceiver<ServerEvent>) {
        let id = ConnectionId::new();
        let (tx, rx) = unbounded_channel();
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        (id, rx)
    }

    pub fn unregister(&self, id: ConnectionId) {
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    /// Best-effort delivery; returns false when the connection is gone
    pub fn send(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        match channels.get(&id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_reaches_only_the_addressed_connection() {
        let hub = ConnectionHub::new();
        let (a, mut rx_a) = hub.register();
        let (_b, mut rx_b) = hub.register();

        let event = ServerEvent::Progress(ProgressEvent::new(1, Some(2)));
        assert!(hub.send(a, event.clone()));

        assert_eq!(rx_a.try_recv().unwrap(), event);
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_send_after_unregister_is_dropped() {
        let hub = ConnectionHub::new();
        let (id, _rx) = hub.register();
        assert_eq!(hub.len(), 1);

        hub.unregister(id);
        assert!(hub.is_empty());
        assert!(!hub.send(id, ServerEvent::Progress(ProgressEvent::new(0, None))));
    }

    #[test]
    fn test_send_to_closed_receiver_is_dropped() {
        let hub = ConnectionHub::new();
        let (id, rx) = hub.register();
        drop(rx);
        assert!(!hub.send(id, ServerEvent::Progress(ProgressEvent::new(0, None))));
    }

    #[test]
    fn test_wire_format() {
        let id = ConnectionId::parse("6f1c2c8e-7c55-4d1e-9a43-0a5b7f0e2d11").unwrap();
        let connect = serde_json::to_value(ServerEvent::Connect { sid: id }).unwrap();
        assert_eq!(
            connect,
            serde_json::json!({"event": "connect", "data": {"sid": "6f1c2c8e-7c55-4d1e-9a43-0a5b7f0e2d11"}})
        );

        let progress =
            serde_json::to_value(ServerEvent::Progress(ProgressEvent::new(25, Some(100)))).unwrap();
        assert_eq!(
            progress,
            serde_json::json!({"event": "progress", "data": {"downloaded": 25, "total": 100, "percent": 25.0}})
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ConnectionId::parse("not-an-id"), None);
    }
}
