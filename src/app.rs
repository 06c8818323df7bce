use std::time::Duration;

use tracing::{debug, info};

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::clock::TickClock;
use crate::config::Config;
use crate::edit_policy::{apply_key, apply_paste, KeyOutcome};
use crate::engagement::{EngagementStateMachine, Signal};
use crate::error::ConfigError;
use crate::runtime::AppEvent;
use crate::session::EngagementConfig;
use crate::surface::TextBuffer;
use crate::word_counter;

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Redraw,
    Unchanged,
    Quit,
}

/// Binds the engagement machine to its editor buffer and clock.
#[derive(Debug)]
pub struct App<C: Clipboard = MemoryClipboard> {
    pub machine: EngagementStateMachine,
    pub buffer: TextBuffer<C>,
    pub clock: TickClock,
    pub max_row_characters: u16,
    pub last_signal: Option<Signal>,
}

impl App<MemoryClipboard> {
    pub fn headless(config: &Config) -> Result<Self, ConfigError> {
        Self::new(config, MemoryClipboard::new())
    }
}

impl<C: Clipboard> App<C> {
    pub fn new(config: &Config, clipboard: C) -> Result<Self, ConfigError> {
        let engagement = EngagementConfig::try_from(config)?;
        Ok(Self {
            machine: EngagementStateMachine::new(engagement)?,
            buffer: TextBuffer::with_clipboard(clipboard),
            clock: TickClock::new(Duration::from_millis(config.tick_ms)),
            max_row_characters: config.max_row_characters,
            last_signal: None,
        })
    }

    pub fn word_count(&self) -> usize {
        word_counter::count(self.buffer.as_str())
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Key(key) => match apply_key(&mut self.buffer, &key) {
                KeyOutcome::Quit => Flow::Quit,
                KeyOutcome::Edited => {
                    self.deliver_changes();
                    Flow::Redraw
                }
                KeyOutcome::Moved => Flow::Redraw,
                KeyOutcome::Ignored => Flow::Unchanged,
            },
            AppEvent::Paste(text) => {
                apply_paste(&mut self.buffer, &text);
                self.deliver_changes();
                Flow::Redraw
            }
            AppEvent::Tick => {
                if !self.clock.should_tick() {
                    return Flow::Unchanged;
                }
                let signal = self.machine.on_tick(&mut self.buffer, &mut self.clock);
                self.record(signal);
                self.deliver_changes();
                Flow::Redraw
            }
            AppEvent::FocusLost => {
                self.clock.pause();
                debug!(target: "app", idle_secs = self.machine.idle_seconds(), "focus_lost_clock_paused");
                Flow::Redraw
            }
            AppEvent::FocusGained => {
                self.clock.resume();
                debug!(target: "app", "focus_gained_clock_resumed");
                Flow::Redraw
            }
            AppEvent::Resize => Flow::Redraw,
        }
    }

    /// Feeds queued text-changed notifications to the machine, one at a time.
    fn deliver_changes(&mut self) {
        while self.buffer.take_change() {
            let signal = self
                .machine
                .on_text_changed(&mut self.buffer, &mut self.clock);
            self.record(signal);
        }
    }

    fn record(&mut self, signal: Option<Signal>) {
        if let Some(signal) = signal {
            info!(target: "app", %signal, words = self.word_count(), "cycle_finished");
            self.last_signal = Some(signal);
        }
    }
}
