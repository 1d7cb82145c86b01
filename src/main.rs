mod app;
mod clock;
mod pump;
mod shutdown;
mod storage;
mod ui;

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::{cursor, execute, terminal};
use directories::ProjectDirs;

use crate::app::StopwatchApp;
use crate::clock::SystemClock;
use crate::shutdown::ShutdownFlag;
use crate::storage::StopwatchStorage;

const APP_NAME: &str = "stopwatch";
/// Longest the loop blocks on input before checking for a shutdown request.
const SHUTDOWN_CHECK: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about = "Stopwatch with laps that keeps counting while closed")]
struct Args {
    /// Where the stopwatch state is kept between runs
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Log file; verbosity is taken from RUST_LOG
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Display refresh interval in milliseconds while running.
    ///
    /// The default of 10 matches the centisecond resolution of the display
    /// and keeps the terminal from being redrawn in a busy loop. Pass 0 for
    /// no minimum delay between ticks, refreshing as fast as possible.
    #[arg(long, default_value_t = 10)]
    refresh_ms: u64,

    /// Discard any saved state and start from zero
    #[arg(long)]
    fresh: bool,
}

fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .context("could not determine a data directory, pass --state-file and --log-file")
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Puts the terminal back the way it was, however the loop exits.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableFocusChange
        )
        .context("preparing terminal")?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        execute!(
            self.stdout,
            DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )
        .ok();
        terminal::disable_raw_mode().ok();
    }
}

fn key_char(key: KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some('\u{3}'),
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some('\r'),
        KeyCode::Esc => Some('\u{1b}'),
        _ => None,
    }
}

fn run(
    app: &mut StopwatchApp<SystemClock>,
    term: &mut TerminalGuard,
    shutdown: &ShutdownFlag,
) -> Result<()> {
    app.on_foreground();
    loop {
        if shutdown.is_requested() {
            app.terminate();
            return Ok(());
        }
        if app.take_redraw() {
            let size = terminal::size().context("reading terminal size")?;
            ui::draw_stopwatch(&mut term.stdout, size, &app.stopwatch, app.now_ms())
                .context("drawing")?;
        }

        // Wait no longer than the next tick, and never so long that a
        // shutdown request goes unnoticed.
        let wait = app
            .poll_timeout()
            .map_or(SHUTDOWN_CHECK, |timeout| timeout.min(SHUTDOWN_CHECK));
        let ready = match event::poll(wait) {
            Ok(ready) => ready,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => false,
            Err(e) => return Err(e).context("polling input"),
        };
        if !ready {
            if app.is_ticking() {
                app.handle_pump();
            }
            continue;
        }

        match event::read().context("reading input")? {
            Event::Key(key) => {
                if let Some(c) = key_char(key) {
                    app.handle_key(c);
                }
            }
            Event::FocusLost => {
                log::debug!("Focus lost");
                app.on_background();
            }
            Event::FocusGained => {
                log::debug!("Focus gained");
                app.on_foreground();
            }
            Event::Resize(..) => app.request_redraw(),
            _ => {}
        }
        if app.should_quit() {
            return Ok(());
        }
        app.handle_pump();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (state_file, log_file) = match (args.state_file, args.log_file) {
        (Some(state), Some(log)) => (state, log),
        (state, log) => {
            let dir = data_dir()?;
            (
                state.unwrap_or_else(|| dir.join("state.json")),
                log.unwrap_or_else(|| dir.join("stopwatch.log")),
            )
        }
    };
    init_logging(&log_file)?;
    log::info!("Stopwatch PID is {}", std::process::id());

    let storage = StopwatchStorage::new(state_file);
    log::info!("State file: {}", storage.path().display());
    if args.fresh {
        storage.clear();
    }

    let shutdown = ShutdownFlag::install().context("installing signal handlers")?;
    let mut app = StopwatchApp::new(SystemClock::new(), storage, args.refresh_ms);
    let mut term = TerminalGuard::enter()?;
    let result = run(&mut app, &mut term, &shutdown);
    drop(term);

    if result.is_err() {
        // Keep whatever was measured even if the terminal failed us.
        app.on_background();
    }
    log::info!("Exiting");
    result
}
