use stopwatch_core::stopwatch::Primary;
use stopwatch_core::{Stopwatch, TimerState};

use crate::clock::Clock;
use crate::pump::Pump;
use crate::storage::StopwatchStorage;

const KEY_ENTER: char = '\r';
const KEY_ESC: char = '\u{1b}';
const KEY_CTRL_C: char = '\u{3}';

/// Owns the stopwatch for the lifetime of the screen and turns user input,
/// ticks and focus changes into state changes.
pub struct StopwatchApp<C: Clock> {
    clock: C,
    storage: StopwatchStorage,
    pub stopwatch: Stopwatch,
    pump: Pump,
    foreground: bool,
    needs_redraw: bool,
    quit: bool,
}

impl<C: Clock> StopwatchApp<C> {
    pub fn new(clock: C, storage: StopwatchStorage, refresh_ms: u64) -> Self {
        let stopwatch = match storage.load_snapshot() {
            Some(snapshot) => {
                let sw = Stopwatch::restore(snapshot, clock.now_ms(), clock.wall_clock_ms());
                log::info!(
                    "Restored stopwatch: {:?} at {}, {} laps",
                    sw.state(),
                    sw.display(clock.now_ms()),
                    sw.laps().len()
                );
                sw
            }
            None => Stopwatch::new(),
        };

        Self {
            clock,
            storage,
            stopwatch,
            pump: Pump::new(refresh_ms),
            foreground: false,
            needs_redraw: true,
            quit: false,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn is_ticking(&self) -> bool {
        self.pump.is_running()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self) -> Option<std::time::Duration> {
        self.pump.timeout(self.now_ms())
    }

    /// Returns whether the screen needs repainting, and clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        let redraw = self.needs_redraw && self.foreground;
        if redraw {
            self.needs_redraw = false;
        }
        redraw
    }

    pub fn primary(&mut self) {
        let now = self.now_ms();
        match self.stopwatch.primary(now) {
            Primary::Started => {
                log::info!("Started at {}", self.stopwatch.display(now));
                self.pump.start(now);
            }
            Primary::Lapped(entry) => log::info!("{}", entry.display),
        }
        self.needs_redraw = true;
    }

    pub fn lap(&mut self) {
        let now = self.now_ms();
        if let Some(entry) = self.stopwatch.lap(now) {
            log::info!("{}", entry.display);
            self.needs_redraw = true;
        }
    }

    pub fn pause(&mut self) {
        if self.stopwatch.state() != TimerState::Running {
            return;
        }
        let now = self.now_ms();
        self.stopwatch.pause(now);
        self.pump.cancel();
        log::info!("Paused at {}", self.stopwatch.display(now));
        self.needs_redraw = true;
    }

    /// Only acts when the reset button is enabled, i.e. when paused.
    pub fn reset(&mut self) {
        if !self.stopwatch.controls().reset.enabled || !self.stopwatch.reset() {
            log::debug!("Reset ignored in {:?}", self.stopwatch.state());
            return;
        }
        self.pump.cancel();
        self.storage.clear();
        log::info!("Reset");
        self.needs_redraw = true;
    }

    pub fn handle_pump(&mut self) {
        if self.pump.fire(self.now_ms()) {
            self.needs_redraw = true;
        }
    }

    /// The screen went away: persist and stop ticking.
    pub fn on_background(&mut self) {
        let snapshot = self
            .stopwatch
            .snapshot(self.clock.now_ms(), self.clock.wall_clock_ms());
        self.storage.save_snapshot(&snapshot);
        self.pump.cancel();
        self.foreground = false;
    }

    /// The screen is visible again: resume ticking if the stopwatch runs.
    pub fn on_foreground(&mut self) {
        self.foreground = true;
        if self.stopwatch.state() == TimerState::Running {
            self.pump.start(self.now_ms());
        }
        self.needs_redraw = true;
    }

    pub fn handle_key(&mut self, key: char) {
        match key {
            ' ' | KEY_ENTER | '\n' => self.primary(),
            'l' => self.lap(),
            'p' => self.pause(),
            'r' => self.reset(),
            'q' | KEY_ESC | KEY_CTRL_C => self.request_quit(),
            _ => {}
        }
    }

    /// The process is being told to stop: save like any backgrounding.
    pub fn terminate(&mut self) {
        log::info!(
            "Termination requested, saving at {}",
            self.stopwatch.display(self.now_ms())
        );
        self.request_quit();
    }

    fn request_quit(&mut self) {
        self.on_background();
        self.quit = true;
    }
}
