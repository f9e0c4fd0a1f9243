// Progress relay: download callbacks -> owning WebSocket connection

use tracing::trace;

use super::hub::{ConnectionHub, ConnectionId, ServerEvent};
use crate::downloader::{ProgressEvent, ProgressSink};

/// Forwards every progress callback of one download to one connection.
///
/// No buffering or throttling: each callback becomes exactly one event.
/// When the request named no connection, or the socket has closed, events
/// are dropped.
pub struct ProgressRelay {
    hub: ConnectionHub,
    connection: Option<ConnectionId>,
}

impl ProgressRelay {
    pub fn new(hub: ConnectionHub, connection: Option<ConnectionId>) -> Self {
        Self { hub, connection }
    }
}

impl ProgressSink for ProgressRelay {
    fn on_progress(&self, downloaded: u64, total: Option<u64>) {
        let Some(connection) = self.connection else {
            return;
        };

        let event = ProgressEvent::new(downloaded, total);
        if !self.hub.send(connection, ServerEvent::Progress(event)) {
            trace!(%connection, "progress dropped, connection closed");
        }
    }
}
