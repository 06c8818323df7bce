//! The engagement state machine: keep typing toward the goal, or the text
//! fades and is eventually cut away.
//!
//! The machine borrows its collaborators per call. It never owns the editor
//! surface or the clock; it only reads the text and issues commands back.

use strum_macros::Display;
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::error::ConfigError;
use crate::progress::{self, BarColor};
use crate::session::{EngagementConfig, Session};
use crate::surface::EditorSurface;
use crate::word_counter;

/// Text left in the editor after a failed session.
pub const FAILURE_NOTICE: &str = "Sorry, you haven't typed for a while by now.\n\
The written texts are saved into clipboard.\n\
You can type anything to restart the challenge.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EngagementState {
    Idle,
    Typing,
    Warning,
    Failed,
    Succeeded,
}

/// Input the machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    TextChanged,
    Tick,
}

/// Terminal outcome of a writing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Signal {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct EngagementStateMachine {
    session: Session,
    progress: f64,
    intensity: u8,
    bar_color: BarColor,
    /// Notifications still owed for content changes the machine made itself.
    expected_echoes: usize,
}

impl EngagementStateMachine {
    pub fn new(config: EngagementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            session: Session::new(config),
            progress: 0.0,
            intensity: 0,
            bar_color: BarColor::Normal,
            expected_echoes: 0,
        })
    }

    pub fn current_state(&self) -> EngagementState {
        self.session.state
    }

    pub fn current_progress(&self) -> f64 {
        self.progress
    }

    pub fn current_intensity(&self) -> u8 {
        self.intensity
    }

    pub fn idle_seconds(&self) -> f64 {
        self.session.idle_seconds()
    }

    pub fn bar_color(&self) -> BarColor {
        self.bar_color
    }

    pub fn config(&self) -> &EngagementConfig {
        self.session.config()
    }

    pub fn pending_echoes(&self) -> usize {
        self.expected_echoes
    }

    /// Call whenever the surface content changes, for any reason.
    pub fn on_text_changed<S, C>(&mut self, surface: &mut S, clock: &mut C) -> Option<Signal>
    where
        S: EditorSurface + ?Sized,
        C: Clock + ?Sized,
    {
        self.handle(Event::TextChanged, surface, clock)
    }

    /// Call once per clock period while the clock runs.
    pub fn on_tick<S, C>(&mut self, surface: &mut S, clock: &mut C) -> Option<Signal>
    where
        S: EditorSurface + ?Sized,
        C: Clock + ?Sized,
    {
        self.handle(Event::Tick, surface, clock)
    }

    /// Single transition function over the current state and the event.
    pub fn handle<S, C>(&mut self, event: Event, surface: &mut S, clock: &mut C) -> Option<Signal>
    where
        S: EditorSurface + ?Sized,
        C: Clock + ?Sized,
    {
        use EngagementState::*;

        if event == Event::TextChanged && self.expected_echoes > 0 {
            self.expected_echoes -= 1;
            trace!(target: "engagement", remaining = self.expected_echoes, "echo_suppressed");
            return None;
        }

        let from = self.session.state;
        let signal = match (from, event) {
            (Idle, Event::TextChanged) => {
                self.begin_typing(surface, clock);
                None
            }
            (Typing, Event::TextChanged) => self.keep_typing(surface, clock),
            (Typing, Event::Tick) => {
                self.session.accumulate_tick();
                if self.session.past_warning() {
                    self.session.state = Warning;
                }
                None
            }
            (Warning, Event::TextChanged) => {
                self.recover(surface);
                None
            }
            (Warning, Event::Tick) => self.fade(surface, clock),
            (Failed, Event::TextChanged) => {
                self.restart_after_failure(surface);
                None
            }
            (Succeeded, Event::TextChanged) => {
                if word_counter::count(&surface.text()) == 0 {
                    self.bar_color = BarColor::Normal;
                    self.progress = 0.0;
                    self.session.state = Idle;
                }
                None
            }
            (Idle | Failed | Succeeded, Event::Tick) => None,
        };

        let to = self.session.state;
        if to != from {
            debug!(target: "engagement", %from, %to, ?event, idle_secs = self.idle_seconds(), "transition");
        }
        signal
    }

    fn recompute_progress<S: EditorSurface + ?Sized>(&mut self, surface: &S) -> usize {
        let words = word_counter::count(&surface.text());
        self.progress = progress::progress(words, self.config().goal_words);
        words
    }

    fn set_intensity<S: EditorSurface + ?Sized>(&mut self, surface: &mut S, intensity: u8) {
        self.intensity = intensity;
        surface.set_visual_intensity(intensity);
    }

    fn begin_typing<S, C>(&mut self, surface: &mut S, clock: &mut C)
    where
        S: EditorSurface + ?Sized,
        C: Clock + ?Sized,
    {
        self.session.reset_idle();
        clock.start();
        self.set_intensity(surface, 0);
        self.bar_color = BarColor::Normal;
        self.recompute_progress(surface);
        self.session.state = EngagementState::Typing;
    }

    fn keep_typing<S, C>(&mut self, surface: &mut S, clock: &mut C) -> Option<Signal>
    where
        S: EditorSurface + ?Sized,
        C: Clock + ?Sized,
    {
        self.session.reset_idle();
        self.set_intensity(surface, 0);
        let words = self.recompute_progress(surface);

        if words == 0 {
            clock.stop();
            self.session.state = EngagementState::Idle;
            None
        } else if self.progress >= 1.0 {
            clock.stop();
            self.bar_color = BarColor::Complete;
            self.session.state = EngagementState::Succeeded;
            info!(target: "engagement", words, goal = self.config().goal_words, "goal_reached");
            Some(Signal::Succeeded)
        } else {
            None
        }
    }

    fn recover<S: EditorSurface + ?Sized>(&mut self, surface: &mut S) {
        self.session.reset_idle();
        self.set_intensity(surface, 0);
        self.recompute_progress(surface);
        self.session.state = EngagementState::Typing;
    }

    fn fade<S, C>(&mut self, surface: &mut S, clock: &mut C) -> Option<Signal>
    where
        S: EditorSurface + ?Sized,
        C: Clock + ?Sized,
    {
        let idle = self.session.accumulate_tick();
        let cfg = *self.config();
        let faded = progress::intensity(
            idle,
            cfg.warning_threshold_seconds,
            cfg.failure_threshold_seconds,
        );
        self.set_intensity(surface, faded);

        if !self.session.past_failure() {
            return None;
        }

        clock.stop();
        self.set_intensity(surface, 0);
        let cut = surface.select_all_and_cut();
        if !cut.is_empty() {
            self.expected_echoes += 1;
        }
        surface.append_text(FAILURE_NOTICE);
        self.expected_echoes += 1;
        self.session.state = EngagementState::Failed;
        info!(
            target: "engagement",
            words = word_counter::count(&cut),
            idle_secs = idle,
            "went_idle_text_cut"
        );
        Some(Signal::Failed)
    }

    fn restart_after_failure<S: EditorSurface + ?Sized>(&mut self, surface: &mut S) {
        if !surface.text().is_empty() {
            self.expected_echoes += 1;
        }
        surface.clear();
        self.progress = 0.0;
        self.session.state = EngagementState::Idle;
    }
}
