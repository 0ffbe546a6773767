mod cheat;
mod input;
mod race;
mod registry;

pub use registry::JoinError;

use crate::protocol::{RaceSnapshot, ServerMessage};
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// The race session. Exclusively owned by the server; every mutation goes
/// through a validated `AppState` operation.
#[derive(Debug)]
pub struct Session {
    pub config: RaceConfig,
    pub phase: RacePhase,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub players: HashMap<ConnectionId, Player>,
    pub finished_order: Vec<FinishEntry>,
}

impl Session {
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            phase: RacePhase::Lobby,
            started_at: None,
            players: HashMap::new(),
            finished_order: Vec::new(),
        }
    }

    /// Whether the room still accepts movement input. The competitive phase
    /// ends with the first finisher, but stragglers keep tapping for ranks.
    pub fn accepting_input(&self) -> bool {
        matches!(self.phase, RacePhase::Running | RacePhase::Finished)
    }

    /// Pure snapshot of the current state for broadcasting
    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            phase: self.phase,
            in_progress: self.phase == RacePhase::Running,
            started_at: self.started_at.map(|t| t.to_rfc3339()),
            players: self.players.iter().map(Into::into).collect(),
            finished_order: self.finished_order.clone(),
            finish_distance: self.config.finish_distance,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    /// Broadcast channel fanning out to every connected client
    pub broadcast: broadcast::Sender<ServerMessage>,
    pub gate: Arc<crate::broadcast::BroadcastGate>,
}

impl AppState {
    pub fn new(config: RaceConfig) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        let gate = crate::broadcast::BroadcastGate::new(config.broadcast_interval);
        Self {
            session: Arc::new(RwLock::new(Session::new(config))),
            broadcast: tx,
            gate: Arc::new(gate),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RaceConfig::default())
    }
}
