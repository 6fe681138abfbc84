//! Session-wide tunables.

use std::time::Duration;

/// Timing and policy settings for one chat session.
///
/// `Default` gives the production values; tests shorten the countdown tick
/// and disable slow mode where it would get in the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Inactivity after which a participant is marked idle.
    pub idle_threshold: Duration,
    /// How often the idle monitor sweeps the registry.
    pub idle_sweep_interval: Duration,
    /// Whether slow mode is on when the process starts.
    pub slow_mode_enabled: bool,
    /// Minimum spacing between two chat messages from one connection.
    pub slow_mode_interval: Duration,
    /// Window in which the escalation token must be repeated.
    pub escalation_window: Duration,
    /// Spacing between countdown ticks (kick, purge, restart).
    pub countdown_tick: Duration,
    /// Delay between the suspend announcement and the actual flip.
    pub suspend_delay: Duration,
    pub kick_countdown: u32,
    pub purge_countdown: u32,
    pub restart_countdown: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_threshold: Duration::from_secs(5 * 60),
            idle_sweep_interval: Duration::from_secs(5),
            slow_mode_enabled: true,
            slow_mode_interval: Duration::from_millis(2_000),
            escalation_window: Duration::from_secs(10),
            countdown_tick: Duration::from_secs(1),
            suspend_delay: Duration::from_secs(2),
            kick_countdown: 5,
            purge_countdown: 10,
            restart_countdown: 5,
        }
    }
}

pub(crate) fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
