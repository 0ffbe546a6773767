use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Opaque, transport-assigned connection identity. Stable for the lifetime of
/// one WebSocket connection.
pub type ConnectionId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RacePhase {
    Lobby,
    Countdown,
    Running,
    Finished,
}

/// One connected participant. Race fields are reset between races; the
/// monotonic timestamps are server-internal and never leave the process.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub distance: u32,
    pub finished: bool,
    pub rank: Option<u32>,
    pub frozen: bool,
    pub last_tap: Option<Instant>,
    pub hold_started: Option<Instant>,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            name,
            distance: 0,
            finished: false,
            rank: None,
            frozen: false,
            last_tap: None,
            hold_started: None,
        }
    }

    /// Clear everything a new race starts from. The tap throttle timestamp is
    /// deliberately kept so the cooldown spans a reset.
    pub fn reset_race_fields(&mut self) {
        self.distance = 0;
        self.finished = false;
        self.rank = None;
        self.frozen = false;
        self.hold_started = None;
    }
}

/// Entry in the finish order, in the order players crossed the line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinishEntry {
    pub id: ConnectionId,
    pub name: String,
}

/// Static race configuration
#[derive(Debug, Clone)]
pub struct RaceConfig {
    pub max_players: usize,
    pub finish_distance: u32,
    /// Distance gained per accepted tap
    pub tap_step: u32,
    pub countdown: Duration,
    /// Minimum interval between accepted taps from one player
    pub tap_cooldown: Duration,
    /// Hold duration at or above which a released input counts as cheating
    pub hold_threshold: Duration,
    pub freeze_duration: Duration,
    /// Minimum interval between tap-path state broadcasts
    pub broadcast_interval: Duration,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            max_players: 10,
            finish_distance: 1000,
            tap_step: 2,
            countdown: Duration::from_millis(3000),
            tap_cooldown: Duration::from_millis(80),
            hold_threshold: Duration::from_millis(1200),
            freeze_duration: Duration::from_millis(2000),
            broadcast_interval: Duration::from_millis(100),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl RaceConfig {
    /// Load race config from environment variables, falling back to the
    /// defaults above for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_players: env_u64("MAX_PLAYERS", defaults.max_players as u64) as usize,
            finish_distance: env_u64("FINISH_DISTANCE", defaults.finish_distance as u64) as u32,
            tap_step: env_u64("TAP_STEP", defaults.tap_step as u64) as u32,
            countdown: Duration::from_millis(env_u64(
                "COUNTDOWN_MS",
                defaults.countdown.as_millis() as u64,
            )),
            tap_cooldown: Duration::from_millis(env_u64(
                "TAP_COOLDOWN_MS",
                defaults.tap_cooldown.as_millis() as u64,
            )),
            hold_threshold: Duration::from_millis(env_u64(
                "HOLD_THRESHOLD_MS",
                defaults.hold_threshold.as_millis() as u64,
            )),
            freeze_duration: Duration::from_millis(env_u64(
                "FREEZE_DURATION_MS",
                defaults.freeze_duration.as_millis() as u64,
            )),
            broadcast_interval: Duration::from_millis(env_u64(
                "BROADCAST_INTERVAL_MS",
                defaults.broadcast_interval.as_millis() as u64,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn config_defaults() {
        let config = RaceConfig::default();
        assert_eq!(config.max_players, 10);
        assert_eq!(config.finish_distance, 1000);
        assert_eq!(config.tap_step, 2);
        assert_eq!(config.countdown, Duration::from_millis(3000));
        assert_eq!(config.tap_cooldown, Duration::from_millis(80));
        assert_eq!(config.hold_threshold, Duration::from_millis(1200));
        assert_eq!(config.freeze_duration, Duration::from_millis(2000));
        assert_eq!(config.broadcast_interval, Duration::from_millis(100));
    }

    #[test]
    #[serial]
    fn config_from_env_overrides() {
        std::env::set_var("MAX_PLAYERS", "4");
        std::env::set_var("FINISH_DISTANCE", "100");
        std::env::set_var("TAP_COOLDOWN_MS", "50");

        let config = RaceConfig::from_env();
        assert_eq!(config.max_players, 4);
        assert_eq!(config.finish_distance, 100);
        assert_eq!(config.tap_cooldown, Duration::from_millis(50));
        // Untouched vars keep their defaults
        assert_eq!(config.countdown, Duration::from_millis(3000));

        std::env::remove_var("MAX_PLAYERS");
        std::env::remove_var("FINISH_DISTANCE");
        std::env::remove_var("TAP_COOLDOWN_MS");
    }

    #[test]
    #[serial]
    fn config_from_env_ignores_garbage() {
        std::env::set_var("MAX_PLAYERS", "not a number");
        let config = RaceConfig::from_env();
        assert_eq!(config.max_players, 10);
        std::env::remove_var("MAX_PLAYERS");
    }

    #[test]
    fn player_reset_keeps_tap_throttle() {
        let mut player = Player::new("Ann".to_string());
        player.distance = 40;
        player.finished = true;
        player.rank = Some(1);
        player.frozen = true;
        player.last_tap = Some(Instant::now());
        player.hold_started = Some(Instant::now());

        player.reset_race_fields();

        assert_eq!(player.distance, 0);
        assert!(!player.finished);
        assert!(player.rank.is_none());
        assert!(!player.frozen);
        assert!(player.hold_started.is_none());
        assert!(player.last_tap.is_some());
    }
}
