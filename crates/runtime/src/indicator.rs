use std::time::{Duration, Instant};

/// How long a success/error flash stays visible.
pub const DEFAULT_CLEAR_AFTER: Duration = Duration::from_millis(2000);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndicatorState {
    Idle,
    Success,
    Error,
}

/// Transient success/error flag on the save control.
///
/// Time is passed in explicitly so the auto-clear is deterministic.
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    state: IndicatorState,
    shown_at: Option<Instant>,
    clear_after: Duration,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_CLEAR_AFTER)
    }
}

impl StatusIndicator {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            state: IndicatorState::Idle,
            shown_at: None,
            clear_after,
        }
    }

    pub fn clear_after(&self) -> Duration {
        self.clear_after
    }

    /// Shows `state`, replacing whatever was shown before and restarting the timer.
    pub fn show(&mut self, state: IndicatorState, now: Instant) {
        self.state = state;
        self.shown_at = match state {
            IndicatorState::Idle => None,
            _ => Some(now),
        };
    }

    pub fn state_at(&self, now: Instant) -> IndicatorState {
        match self.shown_at {
            Some(at) if now.saturating_duration_since(at) < self.clear_after => self.state,
            _ => IndicatorState::Idle,
        }
    }

    pub fn reset(&mut self) {
        self.state = IndicatorState::Idle;
        self.shown_at = None;
    }
}
