//! Snapshot broadcasting and the tap-path rate limit
//!
//! Low-frequency events (join, start, reset, cheat) always broadcast. The tap
//! path instead goes through [`BroadcastGate`], a fixed-interval gate with a
//! single shared timestamp: at most one state broadcast per interval, dropped
//! requests are simply superseded by the next qualifying one.

use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Fixed-interval broadcast gate
#[derive(Debug)]
pub struct BroadcastGate {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl BroadcastGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Returns true if a broadcast may go out now, claiming the slot.
    /// Subsequent calls within the interval return false.
    pub async fn allow(&self, now: Instant) -> bool {
        let mut last = self.last.lock().await;
        match *last {
            Some(prev) if now.duration_since(prev) <= self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl AppState {
    /// Fan a message out to every connected client. A send error just means
    /// nobody is listening, which is fine.
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        let _ = self.broadcast.send(msg);
    }

    /// Unconditional state broadcast for low-frequency events
    pub async fn broadcast_state(&self) {
        let snapshot = self.session.read().await.snapshot();
        self.broadcast_to_all(ServerMessage::State(snapshot));
    }

    /// Rate-limited state broadcast for the tap path. Bounds outbound
    /// bandwidth under rapid tapping; a dropped request is carried by the
    /// next qualifying broadcast instead.
    pub async fn broadcast_state_throttled(&self, now: Instant) {
        if self.gate.allow(now).await {
            self.broadcast_state().await;
        }
    }
}
