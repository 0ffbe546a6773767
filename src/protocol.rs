use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter the lobby with a display name
    Join { name: String },
    /// Begin the countdown (any connection may start the race)
    Start,
    /// One discrete movement input
    Tap,
    /// The client began holding its input key
    HoldStart,
    /// The client released its input key
    HoldEnd,
    /// Client-side cheat self-report. Advisory only; the server-measured hold
    /// duration is the authoritative detector, since a dishonest client can
    /// simply never send this.
    CheatDetected,
    /// Return the room to the lobby from any phase
    Reset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Consolidated room state, broadcast on every state-changing event
    /// (rate-limited on the tap path)
    State(RaceSnapshot),
    /// Countdown begun; the race goes live in `ms` milliseconds
    Countdown { ms: u64 },
    /// Countdown expired, taps are now accepted
    RaceStarted,
    /// A penalty was applied; shown (and heard) on every client
    CheatAlert { name: String, message: String },
    /// Unicast to a connection whose join was refused
    Reject { reason: String },
}

/// Point-in-time view of the session sent to clients. Built fresh for every
/// broadcast; internal timestamps never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSnapshot {
    pub phase: RacePhase,
    pub in_progress: bool,
    pub started_at: Option<String>,
    pub players: Vec<PlayerInfo>,
    pub finished_order: Vec<FinishEntry>,
    pub finish_distance: u32,
}

/// Public view of one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: ConnectionId,
    pub name: String,
    pub distance: u32,
    pub finished: bool,
    pub rank: Option<u32>,
    pub frozen: bool,
}

impl From<(&ConnectionId, &Player)> for PlayerInfo {
    fn from((id, p): (&ConnectionId, &Player)) -> Self {
        Self {
            id: id.clone(),
            name: p.name.clone(),
            distance: p.distance,
            finished: p.finished,
            rank: p.rank,
            frozen: p.frozen,
        }
    }
}
