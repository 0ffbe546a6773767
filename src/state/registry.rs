//! Player registry: who is in the room
//!
//! Name sanitization happens here exactly once; nothing downstream re-trims
//! or re-validates display names.

use super::{AppState, Session};
use crate::types::*;
use std::collections::hash_map::Entry;
use thiserror::Error;

/// Display names are trimmed and capped to this many characters
const MAX_NAME_LEN: usize = 20;
const DEFAULT_NAME: &str = "Player";

#[derive(Debug, Error, PartialEq)]
pub enum JoinError {
    #[error("Lobby full ({max} players max).")]
    LobbyFull { max: usize },
}

fn sanitize_name(raw: &str) -> String {
    let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name
    }
}

impl Session {
    /// Add (or re-register) a player. A connection that already holds a seat
    /// may rename itself without counting against capacity.
    pub fn add_player(&mut self, id: &ConnectionId, name: &str) -> Result<&Player, JoinError> {
        if !self.players.contains_key(id) && self.players.len() >= self.config.max_players {
            return Err(JoinError::LobbyFull {
                max: self.config.max_players,
            });
        }

        let player = Player::new(sanitize_name(name));
        match self.players.entry(id.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(player);
                Ok(occupied.into_mut())
            }
            Entry::Vacant(vacant) => Ok(vacant.insert(player)),
        }
    }

    /// Remove a player and prune their finish entry. Removing an unknown id
    /// is a no-op.
    pub fn remove_player(&mut self, id: &ConnectionId) -> Option<Player> {
        let player = self.players.remove(id)?;
        self.finished_order.retain(|entry| entry.id != *id);
        Some(player)
    }

    pub fn player(&self, id: &ConnectionId) -> Option<&Player> {
        self.players.get(id)
    }
}

impl AppState {
    /// Handle a join request. On success the new roster is broadcast; on a
    /// full room only the requesting connection is told.
    pub async fn handle_join(&self, id: &ConnectionId, name: &str) -> Result<(), JoinError> {
        {
            let mut session = self.session.write().await;
            let player = session.add_player(id, name)?;
            tracing::info!("{} joined the lobby", player.name);
        }
        self.broadcast_state().await;
        Ok(())
    }

    /// Transport-driven deregistration
    pub async fn handle_disconnect(&self, id: &ConnectionId) {
        let removed = {
            let mut session = self.session.write().await;
            session.remove_player(id)
        };
        if let Some(player) = removed {
            tracing::info!("{} disconnected", player.name);
            self.broadcast_state().await;
        }
    }
}
