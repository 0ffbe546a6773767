//! WebSocket message dispatch
//!
//! Routes one inbound event to the session operation that owns it. The only
//! unicast reply is the capacity rejection; everything else the sender needs
//! to know arrives through the room broadcast.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::ConnectionId;
use std::sync::Arc;
use tokio::time::Instant;

pub async fn handle_message(
    msg: ClientMessage,
    conn_id: &ConnectionId,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Join { name } => match state.handle_join(conn_id, &name).await {
            Ok(()) => None,
            Err(e) => Some(ServerMessage::Reject {
                reason: e.to_string(),
            }),
        },

        ClientMessage::Start => {
            state.handle_start().await;
            None
        }

        ClientMessage::Tap => {
            state.handle_tap(conn_id, Instant::now()).await;
            None
        }

        ClientMessage::HoldStart => {
            state.handle_hold_start(conn_id, Instant::now()).await;
            None
        }

        ClientMessage::HoldEnd => {
            state.handle_hold_end(conn_id, Instant::now()).await;
            None
        }

        ClientMessage::CheatDetected => {
            state.handle_cheat_reported(conn_id).await;
            None
        }

        ClientMessage::Reset => {
            state.handle_reset().await;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_replies_nothing_on_success() {
        let state = Arc::new(AppState::default());
        let reply = handle_message(
            ClientMessage::Join {
                name: "Ann".to_string(),
            },
            &"c1".to_string(),
            &state,
        )
        .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn join_on_a_full_room_is_rejected_unicast() {
        let state = Arc::new(AppState::default());
        for i in 0..10 {
            state
                .handle_join(&format!("c{i}"), &format!("P{i}"))
                .await
                .unwrap();
        }

        let reply = handle_message(
            ClientMessage::Join {
                name: "Late".to_string(),
            },
            &"c10".to_string(),
            &state,
        )
        .await;

        match reply {
            Some(ServerMessage::Reject { reason }) => {
                assert_eq!(reason, "Lobby full (10 players max).");
            }
            other => panic!("expected Reject, got {:?}", other),
        }
        assert_eq!(state.session.read().await.players.len(), 10);
    }

    #[tokio::test]
    async fn silent_events_never_reply() {
        let state = Arc::new(AppState::default());
        let conn = "c1".to_string();

        for msg in [
            ClientMessage::Start,
            ClientMessage::Tap,
            ClientMessage::HoldStart,
            ClientMessage::HoldEnd,
            ClientMessage::CheatDetected,
            ClientMessage::Reset,
        ] {
            assert!(handle_message(msg, &conn, &state).await.is_none());
        }
    }
}
