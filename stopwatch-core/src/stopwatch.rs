use crate::{format_elapsed, TimerCore, TimerState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LapEntry {
    pub index: u32,
    pub display: String,
}

impl LapEntry {
    fn record(index: u32, elapsed_ms: u64) -> Self {
        Self {
            index,
            display: format!("Lap {}: {}", index, format_elapsed(elapsed_ms)),
        }
    }
}

/// Everything needed to bring a stopwatch back after the process is gone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Elapsed time displayed at the moment of saving.
    pub accumulated_ms: u64,
    pub running: bool,
    pub lap_counter: u32,
    pub laps: Vec<String>,
    /// Wall-clock milliseconds since the Unix epoch; 0 means unknown.
    pub saved_at_ms: i64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            accumulated_ms: 0,
            running: false,
            lap_counter: 1,
            laps: Vec::new(),
            saved_at_ms: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub enabled: bool,
}

/// Label and enablement of the three buttons for a given timer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub primary: Button,
    pub pause: Button,
    pub reset: Button,
}

impl Controls {
    pub fn for_state(state: TimerState) -> Self {
        let (primary, pause, reset) = match state {
            TimerState::Idle => ("Start", false, false),
            TimerState::Running => ("Lap", true, false),
            TimerState::Paused => ("Resume", false, true),
        };
        Self {
            primary: Button { label: primary, enabled: true },
            pause: Button { label: "Pause", enabled: pause },
            reset: Button { label: "Reset", enabled: reset },
        }
    }
}

/// What the primary button did when pressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Primary {
    Started,
    Lapped(LapEntry),
}

pub struct Stopwatch {
    pub timer: TimerCore,
    laps: Vec<LapEntry>,
    lap_counter: u32,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            timer: TimerCore::new(),
            laps: Vec::new(),
            lap_counter: 1,
        }
    }

    pub fn state(&self) -> TimerState {
        self.timer.state
    }

    pub fn start(&mut self, now_ms: u64) {
        self.timer.start(now_ms);
    }

    pub fn pause(&mut self, now_ms: u64) {
        if !self.timer.is_running() {
            return;
        }
        self.timer.pause(now_ms);
        if stopped_state(self.timer.elapsed_ms(now_ms), &self.laps) == TimerState::Idle {
            self.timer.reset();
        }
    }

    /// Record a lap at the current elapsed time. Only valid while running.
    pub fn lap(&mut self, now_ms: u64) -> Option<LapEntry> {
        if !self.timer.is_running() {
            return None;
        }
        let entry = LapEntry::record(self.lap_counter, self.timer.elapsed_ms(now_ms));
        self.lap_counter += 1;
        self.laps.push(entry.clone());
        Some(entry)
    }

    /// Start when stopped, lap when running.
    pub fn primary(&mut self, now_ms: u64) -> Primary {
        match self.lap(now_ms) {
            Some(entry) => Primary::Lapped(entry),
            None => {
                self.start(now_ms);
                Primary::Started
            }
        }
    }

    /// Returns false, leaving everything untouched, while running.
    pub fn reset(&mut self) -> bool {
        if self.timer.is_running() {
            return false;
        }
        self.timer.reset();
        self.laps.clear();
        self.lap_counter = 1;
        true
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        self.timer.elapsed_ms(now_ms)
    }

    pub fn display(&self, now_ms: u64) -> String {
        format_elapsed(self.elapsed_ms(now_ms))
    }

    pub fn laps(&self) -> &[LapEntry] {
        &self.laps
    }

    pub fn lap_counter(&self) -> u32 {
        self.lap_counter
    }

    pub fn controls(&self) -> Controls {
        Controls::for_state(self.timer.state)
    }

    pub fn snapshot(&self, now_ms: u64, wall_now_ms: i64) -> Snapshot {
        Snapshot {
            accumulated_ms: self.elapsed_ms(now_ms),
            running: self.timer.is_running(),
            lap_counter: self.lap_counter,
            laps: self.laps.iter().map(|lap| lap.display.clone()).collect(),
            saved_at_ms: wall_now_ms,
        }
    }

    /// Rebuild from a snapshot. A stopwatch that was running keeps counting
    /// through the time the process was away, measured on the wall clock.
    pub fn restore(snapshot: Snapshot, now_ms: u64, wall_now_ms: i64) -> Self {
        let mut elapsed = snapshot.accumulated_ms;
        if snapshot.running && snapshot.saved_at_ms > 0 {
            let away = wall_now_ms.saturating_sub(snapshot.saved_at_ms).max(0) as u64;
            elapsed = elapsed.saturating_add(away);
        }
        let laps = snapshot
            .laps
            .into_iter()
            .enumerate()
            .map(|(i, display)| LapEntry { index: i as u32 + 1, display })
            .collect::<Vec<_>>();
        let state = if snapshot.running {
            TimerState::Running
        } else {
            stopped_state(elapsed, &laps)
        };
        Self {
            timer: TimerCore::resume_from(elapsed, state, now_ms),
            laps,
            lap_counter: snapshot.lap_counter.max(1),
        }
    }
}

/// A stopwatch that is not running is Idle only when it has nothing to show:
/// no measured time and no laps. Otherwise it is Paused and can be resumed
/// or reset.
fn stopped_state(elapsed_ms: u64, laps: &[LapEntry]) -> TimerState {
    if elapsed_ms == 0 && laps.is_empty() {
        TimerState::Idle
    } else {
        TimerState::Paused
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displays(sw: &Stopwatch) -> Vec<&str> {
        sw.laps().iter().map(|l| l.display.as_str()).collect()
    }

    #[test]
    fn test_tick_display() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        assert_eq!(sw.display(1500), "00:01:50");
    }

    #[test]
    fn test_laps_in_order() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.lap(2000);
        sw.lap(5000);
        assert_eq!(displays(&sw), vec!["Lap 1: 00:02:00", "Lap 2: 00:05:00"]);
        assert_eq!(sw.laps()[1].index, 2);
        assert_eq!(sw.lap_counter(), 3);
        assert!(sw.timer.is_running());
    }

    #[test]
    fn test_lap_ignored_unless_running() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.lap(100), None);
        sw.start(0);
        sw.pause(800);
        assert_eq!(sw.lap(900), None);
        assert!(sw.laps().is_empty());
        assert_eq!(sw.lap_counter(), 1);
    }

    #[test]
    fn test_primary_cycles_start_then_lap() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.primary(0), Primary::Started);
        match sw.primary(61_230) {
            Primary::Lapped(entry) => assert_eq!(entry.display, "Lap 1: 01:01:23"),
            other => panic!("expected a lap, got {:?}", other),
        }
        sw.pause(62_000);
        assert_eq!(sw.primary(70_000), Primary::Started);
        assert_eq!(sw.elapsed_ms(71_000), 63_000);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut sw = Stopwatch::new();
        sw.pause(10);
        assert_eq!(sw.state(), TimerState::Idle);
        sw.start(0);
        sw.pause(3000);
        sw.pause(4000);
        assert_eq!(sw.state(), TimerState::Paused);
        assert_eq!(sw.elapsed_ms(9000), 3000);
    }

    #[test]
    fn test_reset_rejected_while_running() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.lap(1000);
        assert!(!sw.reset());
        assert_eq!(sw.laps().len(), 1);
        assert!(sw.timer.is_running());
    }

    #[test]
    fn test_reset_after_pause() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.lap(1000);
        sw.lap(2000);
        sw.pause(2500);
        assert!(sw.reset());
        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(sw.elapsed_ms(5000), 0);
        assert_eq!(sw.lap_counter(), 1);
        assert!(sw.laps().is_empty());
        assert!(sw.reset());
    }

    #[test]
    fn test_controls() {
        let idle = Controls::for_state(TimerState::Idle);
        assert_eq!(idle.primary.label, "Start");
        assert!(!idle.pause.enabled);
        assert!(!idle.reset.enabled);

        let running = Controls::for_state(TimerState::Running);
        assert_eq!(running.primary.label, "Lap");
        assert!(running.pause.enabled);
        assert!(!running.reset.enabled);

        let paused = Controls::for_state(TimerState::Paused);
        assert_eq!(paused.primary.label, "Resume");
        assert!(paused.primary.enabled);
        assert!(!paused.pause.enabled);
        assert!(paused.reset.enabled);
    }

    #[test]
    fn test_snapshot_takes_displayed_time() {
        let mut sw = Stopwatch::new();
        sw.start(1000);
        sw.lap(3000);
        let snap = sw.snapshot(4000, 1_700_000_000_000);
        assert_eq!(snap.accumulated_ms, 3000);
        assert!(snap.running);
        assert_eq!(snap.lap_counter, 2);
        assert_eq!(snap.laps, vec!["Lap 1: 00:02:00".to_string()]);
        assert_eq!(snap.saved_at_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_restore_paused_has_no_compensation() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.lap(1000);
        sw.pause(3000);
        let snap = sw.snapshot(3000, 50_000);

        let restored = Stopwatch::restore(snap, 0, 60_000);
        assert_eq!(restored.state(), TimerState::Paused);
        assert_eq!(restored.elapsed_ms(0), 3000);
        assert_eq!(displays(&restored), displays(&sw));
        assert_eq!(restored.lap_counter(), 2);
    }

    #[test]
    fn test_restore_running_adds_wall_clock_gap() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        let snap = sw.snapshot(3000, 50_000);

        let restored = Stopwatch::restore(snap, 200, 60_000);
        assert_eq!(restored.state(), TimerState::Running);
        assert_eq!(restored.elapsed_ms(200), 13_000);
        assert_eq!(restored.elapsed_ms(700), 13_500);
    }

    #[test]
    fn test_restore_running_immediately_never_goes_back() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        let snap = sw.snapshot(3000, 50_000);
        // Wall clock stepped backwards between save and restore.
        let restored = Stopwatch::restore(snap, 0, 40_000);
        assert_eq!(restored.elapsed_ms(0), 3000);
    }

    #[test]
    fn test_restore_running_without_timestamp() {
        let snap = Snapshot {
            accumulated_ms: 4000,
            running: true,
            saved_at_ms: 0,
            ..Snapshot::default()
        };
        let restored = Stopwatch::restore(snap, 0, 1_000_000);
        assert_eq!(restored.elapsed_ms(0), 4000);
    }

    #[test]
    fn test_restore_default_is_idle() {
        let restored = Stopwatch::restore(Snapshot::default(), 123, 456);
        assert_eq!(restored.state(), TimerState::Idle);
        assert_eq!(restored.lap_counter(), 1);
        assert!(restored.laps().is_empty());
    }

    #[test]
    fn test_pause_with_nothing_measured_is_idle() {
        let mut sw = Stopwatch::new();
        sw.start(700);
        sw.pause(700);
        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(sw.controls().primary.label, "Start");

        let restored = Stopwatch::restore(sw.snapshot(700, 1), 0, 2);
        assert_eq!(restored.state(), TimerState::Idle);
    }

    #[test]
    fn test_zero_elapsed_with_laps_stays_paused_across_restore() {
        let mut sw = Stopwatch::new();
        sw.start(700);
        sw.lap(700);
        sw.pause(700);
        assert_eq!(sw.state(), TimerState::Paused);
        assert!(sw.controls().reset.enabled);

        let restored = Stopwatch::restore(sw.snapshot(700, 1), 0, 2);
        assert_eq!(restored.state(), TimerState::Paused);
        assert_eq!(restored.controls(), sw.controls());
        assert_eq!(restored.laps(), sw.laps());
    }

    #[test]
    fn test_restore_clamps_lap_counter() {
        let snap = Snapshot { lap_counter: 0, ..Snapshot::default() };
        assert_eq!(Stopwatch::restore(snap, 0, 0).lap_counter(), 1);
    }
}
