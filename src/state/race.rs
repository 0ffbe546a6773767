//! Race lifecycle: lobby, countdown, running, finished
//!
//! The countdown timer is a spawned task. It re-checks the phase when it
//! fires, so a reset that lands mid-countdown wins and the stale timer does
//! nothing.

use super::{AppState, Session};
use crate::protocol::ServerMessage;
use crate::types::RacePhase;

impl Session {
    /// Put every race field back to its pre-race value and return to the
    /// lobby. Valid from any phase.
    pub fn reset_race(&mut self) {
        for player in self.players.values_mut() {
            player.reset_race_fields();
        }
        self.phase = RacePhase::Lobby;
        self.started_at = None;
        self.finished_order.clear();
    }

    fn can_start(&self) -> bool {
        matches!(self.phase, RacePhase::Lobby | RacePhase::Finished) && !self.players.is_empty()
    }
}

impl AppState {
    /// Begin the countdown. Ignored unless the room is idle (lobby or a
    /// finished race) with at least one player, so repeated start requests
    /// during an in-flight countdown or race change nothing.
    pub async fn handle_start(&self) {
        let countdown = {
            let mut session = self.session.write().await;
            if !session.can_start() {
                return;
            }
            session.reset_race();
            session.phase = RacePhase::Countdown;
            session.config.countdown
        };

        tracing::info!("Race starting in {}ms", countdown.as_millis());
        self.broadcast_state().await;
        self.broadcast_to_all(ServerMessage::Countdown {
            ms: countdown.as_millis() as u64,
        });

        let state = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(countdown).await;
            {
                let mut session = state.session.write().await;
                // A reset may have landed while we slept; the state at
                // execution time decides, not the state at scheduling time.
                if session.phase != RacePhase::Countdown {
                    return;
                }
                session.phase = RacePhase::Running;
                session.started_at = Some(chrono::Utc::now());
            }
            tracing::info!("Race started");
            state.broadcast_to_all(ServerMessage::RaceStarted);
            state.broadcast_state().await;
        });
    }

    /// Return to the lobby from any phase
    pub async fn handle_reset(&self) {
        self.session.write().await.reset_race();
        tracing::info!("Race reset");
        self.broadcast_state().await;
    }
}
