// Library surface for headless/integration tests and reuse.
// The engagement core (word_counter, progress, session, engagement, surface,
// clock) has no terminal dependencies; the rest is the terminal host.
pub mod app;
pub mod app_dirs;
pub mod clipboard;
pub mod clock;
pub mod config;
pub mod edit_policy;
pub mod engagement;
pub mod error;
pub mod logging;
pub mod progress;
pub mod runtime;
pub mod session;
pub mod surface;
pub mod ui;
pub mod word_counter;

pub use clock::{Clock, TickClock};
pub use engagement::{EngagementState, EngagementStateMachine, Event, Signal};
pub use error::{ClipboardError, ConfigError};
pub use session::EngagementConfig;
pub use surface::{EditorSurface, TextBuffer};
