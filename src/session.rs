use crate::engagement::EngagementState;
use crate::error::ConfigError;

pub const DEFAULT_GOAL_WORDS: u32 = 150;
pub const DEFAULT_WARNING_SECS: f64 = 2.0;
pub const DEFAULT_FAILURE_SECS: f64 = 5.0;
pub const DEFAULT_TICK_SECS: f64 = 0.1;

/// Immutable thresholds the engagement machine runs against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementConfig {
    pub goal_words: u32,
    pub warning_threshold_seconds: f64,
    pub failure_threshold_seconds: f64,
    pub tick_period_seconds: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            goal_words: DEFAULT_GOAL_WORDS,
            warning_threshold_seconds: DEFAULT_WARNING_SECS,
            failure_threshold_seconds: DEFAULT_FAILURE_SECS,
            tick_period_seconds: DEFAULT_TICK_SECS,
        }
    }
}

fn positive_finite(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("must be a positive number of seconds (got {value})"),
        ))
    }
}

impl EngagementConfig {
    /// Rejects settings that would make the Warning state unreachable or the
    /// fade undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal_words == 0 {
            return Err(ConfigError::invalid("goal_words", "must be at least 1"));
        }
        positive_finite("warning_threshold_seconds", self.warning_threshold_seconds)?;
        positive_finite("failure_threshold_seconds", self.failure_threshold_seconds)?;
        positive_finite("tick_period_seconds", self.tick_period_seconds)?;
        if self.failure_threshold_seconds <= self.warning_threshold_seconds {
            return Err(ConfigError::invalid(
                "failure_threshold_seconds",
                format!(
                    "must be greater than warning_threshold_seconds ({} <= {})",
                    self.failure_threshold_seconds, self.warning_threshold_seconds
                ),
            ));
        }
        Ok(())
    }
}

/// Whole ticks that fit in `seconds`; the idle time exceeds `seconds` once
/// the tick count exceeds this.
///
/// Ratios within rounding noise of an integer count as that integer, so
/// 0.3 / 0.1 is 3 ticks rather than 2.
fn ticks_within(seconds: f64, period: f64) -> u64 {
    const SNAP: f64 = 1e-9;
    let ratio = seconds / period;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= SNAP * nearest.max(1.0) {
        nearest as u64
    } else {
        ratio.floor() as u64
    }
}

/// Mutable state of one engagement session, owned by the machine.
///
/// Idle time and both thresholds are kept as tick counts, so threshold
/// comparisons are integer comparisons.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: EngagementState,
    idle_ticks: u64,
    warning_ticks: u64,
    failure_ticks: u64,
    config: EngagementConfig,
}

impl Session {
    pub fn new(config: EngagementConfig) -> Self {
        let period = config.tick_period_seconds;
        Self {
            state: EngagementState::Idle,
            idle_ticks: 0,
            warning_ticks: ticks_within(config.warning_threshold_seconds, period),
            failure_ticks: ticks_within(config.failure_threshold_seconds, period),
            config,
        }
    }

    pub fn past_warning(&self) -> bool {
        self.idle_ticks > self.warning_ticks
    }

    pub fn past_failure(&self) -> bool {
        self.idle_ticks > self.failure_ticks
    }

    pub fn config(&self) -> &EngagementConfig {
        &self.config
    }

    pub fn idle_seconds(&self) -> f64 {
        self.idle_ticks as f64 * self.config.tick_period_seconds
    }

    pub fn reset_idle(&mut self) {
        self.idle_ticks = 0;
    }

    /// Adds one clock period and returns the new idle time.
    pub fn accumulate_tick(&mut self) -> f64 {
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        self.idle_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngagementConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_goal_rejected() {
        let cfg = EngagementConfig {
            goal_words: 0,
            ..EngagementConfig::default()
        };
        assert_matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "goal_words"
        );
    }

    #[test]
    fn test_failure_must_exceed_warning() {
        let cfg = EngagementConfig {
            warning_threshold_seconds: 5.0,
            failure_threshold_seconds: 5.0,
            ..EngagementConfig::default()
        };
        assert_matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "failure_threshold_seconds"
        );
    }

    #[test]
    fn test_non_positive_or_nan_seconds_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = EngagementConfig {
                tick_period_seconds: bad,
                ..EngagementConfig::default()
            };
            assert!(cfg.validate().is_err(), "tick period {bad} should be rejected");
        }
    }

    #[test]
    fn test_tick_accumulation_is_exact() {
        let mut session = Session::new(EngagementConfig::default());
        for _ in 0..20 {
            session.accumulate_tick();
        }
        assert_eq!(session.idle_seconds(), 2.0);
        assert!(session.accumulate_tick() > 2.0);
        session.reset_idle();
        assert_eq!(session.idle_seconds(), 0.0);
    }

    #[test]
    fn test_thresholds_snap_to_whole_ticks() {
        assert_eq!(ticks_within(0.3, 0.1), 3);
        assert_eq!(ticks_within(0.7, 0.1), 7);
        assert_eq!(ticks_within(2.0, 0.1), 20);
        assert_eq!(ticks_within(0.25, 0.1), 2);
        assert_eq!(ticks_within(0.05, 0.1), 0);
    }

    #[test]
    fn test_thresholds_crossed_only_after_exceeding() {
        let mut session = Session::new(EngagementConfig {
            warning_threshold_seconds: 0.3,
            failure_threshold_seconds: 0.7,
            tick_period_seconds: 0.1,
            ..EngagementConfig::default()
        });
        for _ in 0..3 {
            session.accumulate_tick();
        }
        assert!(!session.past_warning());
        session.accumulate_tick();
        assert!(session.past_warning());

        for _ in 4..7 {
            session.accumulate_tick();
        }
        assert!(!session.past_failure());
        session.accumulate_tick();
        assert!(session.past_failure());
    }
}
