use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::Once,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use inkdash::{
    app::{App, Flow},
    app_dirs::AppDirs,
    clipboard::{Clipboard, Osc52Clipboard},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    EngagementConfig,
};

/// keep typing toward your word goal, or lose the text
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A distraction-free writing sprint: reach the word goal before you stop typing. \
                  Pause too long and the text fades; pause longer and it is cut to the clipboard."
)]
pub struct Cli {
    /// number of qualifying words that completes the sprint
    #[clap(short = 'g', long)]
    goal_words: Option<u32>,

    /// seconds without typing before the text starts fading
    #[clap(short = 'w', long)]
    warn_secs: Option<f64>,

    /// seconds without typing before the text is cut to the clipboard
    #[clap(short = 'f', long)]
    fail_secs: Option<f64>,

    /// clock period in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// editor width in characters
    #[clap(long)]
    width: Option<u16>,

    /// config file to load (defaults to the platform config dir)
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line flags on top of the loaded config
    fn apply(&self, base: Config) -> Config {
        Config {
            goal_words: self.goal_words.unwrap_or(base.goal_words),
            warning_secs: self.warn_secs.unwrap_or(base.warning_secs),
            failure_secs: self.fail_secs.unwrap_or(base.failure_secs),
            tick_ms: self.tick_ms.unwrap_or(base.tick_ms),
            max_row_characters: self.width.unwrap_or(base.max_row_characters),
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        DisableFocusChange,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            tracing::error!(target: "runtime.panic", %info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _log_guard = logging::init_file_logging(&AppDirs::log_dir())
        .ok()
        .flatten();

    let store = cli.config_store();
    let config = cli.apply(store.load());
    if let Err(err) = EngagementConfig::try_from(&config) {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, err).exit();
    }

    if cli.save_config {
        store.save(&config)?;
        info!(target: "config", path = %store.path().display(), "config_saved");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(&config, Osc52Clipboard::new(io::stdout()))?;
    info!(
        target: "runtime",
        goal_words = config.goal_words,
        warning_secs = config.warning_secs,
        failure_secs = config.failure_secs,
        tick_ms = config.tick_ms,
        "startup"
    );

    install_panic_hook();
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(
        &mut terminal,
        &mut app,
        Duration::from_millis(config.tick_ms),
    );

    restore_terminal()?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, C: Clipboard>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match app.handle_event(runner.step()) {
            Flow::Quit => break,
            Flow::Redraw => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            Flow::Unchanged => {}
        }
    }

    info!(
        target: "runtime",
        state = %app.machine.current_state(),
        words = app.word_count(),
        "shutdown"
    );
    Ok(())
}
