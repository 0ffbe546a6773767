//! Penalty handling: freeze a caught player, tell the room, thaw later
//!
//! The un-freeze is a spawned timer. It looks the player up by id when it
//! fires, so a player who left in the meantime is skipped and a race that was
//! reset only gets a harmless repeat of `frozen = false`.

use super::AppState;
use crate::protocol::ServerMessage;
use crate::types::ConnectionId;

impl AppState {
    /// Freeze a player, announce the penalty to the whole room, and schedule
    /// the un-freeze. A player who is already frozen is left alone; the input
    /// handlers gate on `frozen` too, so one penalty cannot cascade.
    pub async fn penalize(&self, id: &ConnectionId) {
        let (name, freeze_duration) = {
            let mut session = self.session.write().await;
            let freeze_duration = session.config.freeze_duration;
            let Some(player) = session.players.get_mut(id) else {
                return;
            };
            if player.frozen {
                return;
            }
            player.frozen = true;
            (player.name.clone(), freeze_duration)
        };

        tracing::warn!("Cheat detected: {} held their input too long", name);
        let message = format!("Come on {}, stop cheating - it's only a game!", name);
        self.broadcast_to_all(ServerMessage::CheatAlert { name, message });
        self.broadcast_state().await;

        let state = self.clone();
        let id = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(freeze_duration).await;
            {
                let mut session = state.session.write().await;
                match session.players.get_mut(&id) {
                    Some(player) => player.frozen = false,
                    None => return,
                }
            }
            state.broadcast_state().await;
        });
    }
}
