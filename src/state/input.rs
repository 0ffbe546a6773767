//! Movement input: taps, hold tracking, and client cheat reports
//!
//! Distance is always derived server-side from accepted taps; nothing here
//! trusts a client-supplied position. Invalid input is dropped silently.

use super::AppState;
use crate::types::*;
use tokio::time::Instant;

impl AppState {
    /// Apply one tap. Drops the input without comment if the player is
    /// unknown, the race is not underway, the player already finished or is
    /// frozen, or the tap lands inside the per-player cooldown.
    pub async fn handle_tap(&self, id: &ConnectionId, now: Instant) {
        {
            let mut session = self.session.write().await;
            if !session.accepting_input() {
                return;
            }
            let step = session.config.tap_step;
            let finish = session.config.finish_distance;
            let cooldown = session.config.tap_cooldown;

            let Some(player) = session.players.get_mut(id) else {
                return;
            };
            if player.finished || player.frozen {
                return;
            }
            if player
                .last_tap
                .is_some_and(|last| now.duration_since(last) < cooldown)
            {
                return;
            }
            player.last_tap = Some(now);
            player.distance += step;

            let crossed = player.distance >= finish;
            let name = player.name.clone();
            if crossed {
                player.finished = true;
                session.finished_order.push(FinishEntry {
                    id: id.clone(),
                    name: name.clone(),
                });
                let rank = session.finished_order.len() as u32;
                if let Some(player) = session.players.get_mut(id) {
                    player.rank = Some(rank);
                }
                if rank == 1 {
                    // First across the line ends the competitive phase;
                    // everyone else keeps tapping for the remaining ranks.
                    session.phase = RacePhase::Finished;
                    tracing::info!("{} won the race", name);
                }
            }
        }
        self.broadcast_state_throttled(now).await;
    }

    /// Record the start of a held input, the server-side half of hold-based
    /// cheat detection.
    pub async fn handle_hold_start(&self, id: &ConnectionId, now: Instant) {
        let mut session = self.session.write().await;
        if !session.accepting_input() {
            return;
        }
        if let Some(player) = session.players.get_mut(id) {
            if !player.frozen {
                player.hold_started = Some(now);
            }
        }
    }

    /// Measure a released hold against the threshold. A release with no
    /// recorded start (including after a reset cleared it) is a no-op.
    pub async fn handle_hold_end(&self, id: &ConnectionId, now: Instant) {
        let held_too_long = {
            let mut session = self.session.write().await;
            let threshold = session.config.hold_threshold;
            let Some(player) = session.players.get_mut(id) else {
                return;
            };
            let Some(started) = player.hold_started.take() else {
                return;
            };
            now.duration_since(started) >= threshold
        };
        if held_too_long {
            self.penalize(id).await;
        }
    }

    /// Client-side self-report. Advisory only: a dishonest client can simply
    /// never send this, so the measured hold path above stays authoritative.
    pub async fn handle_cheat_reported(&self, id: &ConnectionId) {
        let eligible = {
            let session = self.session.read().await;
            session.accepting_input()
                && session.player(id).map(|p| !p.frozen).unwrap_or(false)
        };
        if !eligible {
            tracing::debug!("cheat report from {} ignored", id);
            return;
        }
        self.penalize(id).await;
    }
}
