// Drives the engagement machine through the public API with a host-provided
// surface, the way an embedding editor would.

use assert_matches::assert_matches;

use inkdash::engagement::FAILURE_NOTICE;
use inkdash::{
    Clock, ConfigError, EditorSurface, EngagementConfig, EngagementState,
    EngagementStateMachine, Signal,
};

/// Surface that records every command the machine issues.
#[derive(Default)]
struct RecordingSurface {
    text: String,
    clipboard: Option<String>,
    intensities: Vec<u8>,
    notifications: usize,
}

impl RecordingSurface {
    fn type_text(&mut self, s: &str) {
        self.text.push_str(s);
        self.notifications += 1;
    }
}

impl EditorSurface for RecordingSurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn clear(&mut self) {
        if !self.text.is_empty() {
            self.text.clear();
            self.notifications += 1;
        }
    }

    fn select_all_and_cut(&mut self) -> String {
        let cut = std::mem::take(&mut self.text);
        if !cut.is_empty() {
            self.clipboard = Some(cut.clone());
            self.notifications += 1;
        }
        cut
    }

    fn append_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.text.push_str(text);
            self.notifications += 1;
        }
    }

    fn set_visual_intensity(&mut self, intensity: u8) {
        self.intensities.push(intensity);
    }
}

#[derive(Default)]
struct CountingClock {
    running: bool,
    starts: usize,
    stops: usize,
}

impl Clock for CountingClock {
    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
        self.stops += 1;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

fn deliver(
    m: &mut EngagementStateMachine,
    surface: &mut RecordingSurface,
    clock: &mut CountingClock,
) -> Vec<Signal> {
    let mut signals = Vec::new();
    while surface.notifications > 0 {
        surface.notifications -= 1;
        signals.extend(m.on_text_changed(surface, clock));
    }
    signals
}

fn config(goal: u32, warn: f64, fail: f64, period: f64) -> EngagementConfig {
    EngagementConfig {
        goal_words: goal,
        warning_threshold_seconds: warn,
        failure_threshold_seconds: fail,
        tick_period_seconds: period,
    }
}

#[test]
fn rejects_malformed_config() {
    assert_matches!(
        EngagementStateMachine::new(config(0, 2.0, 5.0, 0.1)),
        Err(ConfigError::InvalidValue { .. })
    );
    assert_matches!(
        EngagementStateMachine::new(config(10, 5.0, 5.0, 0.1)),
        Err(ConfigError::InvalidValue { .. })
    );
    assert_matches!(
        EngagementStateMachine::new(config(10, 2.0, 5.0, 0.0)),
        Err(ConfigError::InvalidValue { .. })
    );
}

#[test]
fn full_cycle_with_custom_surface() {
    let mut m = EngagementStateMachine::new(config(150, 2.0, 5.0, 0.1)).unwrap();
    let mut surface = RecordingSurface::default();
    let mut clock = CountingClock::default();

    surface.type_text("the quick brown fox");
    deliver(&mut m, &mut surface, &mut clock);
    assert_eq!(m.current_state(), EngagementState::Typing);
    assert_eq!(clock.starts, 1);

    let mut failed = None;
    for tick in 1..=60 {
        if let Some(signal) = m.on_tick(&mut surface, &mut clock) {
            failed = Some((tick, signal));
            break;
        }
        if tick == 21 {
            assert_eq!(m.current_state(), EngagementState::Warning);
        }
    }
    assert_eq!(failed, Some((51, Signal::Failed)));
    assert_eq!(surface.clipboard.as_deref(), Some("the quick brown fox"));
    assert_eq!(surface.text, FAILURE_NOTICE);
    assert!(!clock.is_running());

    // Fade rose during the warning window and was reset on failure
    let peak = surface.intensities.iter().copied().max().unwrap();
    assert!(peak >= 250);
    assert_eq!(surface.intensities.last(), Some(&0));

    // The cut and the notice are the machine's own edits
    assert_eq!(deliver(&mut m, &mut surface, &mut clock), vec![]);
    assert_eq!(m.current_state(), EngagementState::Failed);

    surface.type_text("x");
    deliver(&mut m, &mut surface, &mut clock);
    assert_eq!(m.current_state(), EngagementState::Idle);
    assert_eq!(surface.text, "");
    assert_eq!(m.current_progress(), 0.0);
}

#[test]
fn idle_ignores_ticks_until_first_keystroke() {
    let mut m = EngagementStateMachine::new(config(5, 2.0, 5.0, 1.0)).unwrap();
    let mut surface = RecordingSurface::default();
    let mut clock = CountingClock::default();

    for _ in 0..10 {
        assert_eq!(m.on_tick(&mut surface, &mut clock), None);
    }
    assert_eq!(m.current_state(), EngagementState::Idle);
    assert_eq!(m.idle_seconds(), 0.0);
    assert_eq!(clock.starts, 0);
}

#[test]
fn progress_tracks_words_with_cjk() {
    let mut m = EngagementStateMachine::new(config(10, 2.0, 5.0, 0.1)).unwrap();
    let mut surface = RecordingSurface::default();
    let mut clock = CountingClock::default();

    surface.type_text("写");
    deliver(&mut m, &mut surface, &mut clock);
    surface.type_text("作 and more");
    deliver(&mut m, &mut surface, &mut clock);
    assert_eq!(m.current_progress(), 0.4);
}
