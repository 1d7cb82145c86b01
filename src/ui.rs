use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use stopwatch_core::dial::{self, Dial};
use stopwatch_core::stopwatch::Button;
use stopwatch_core::Stopwatch;

const DIAL_COLS: usize = 31;
const DIAL_ROWS: usize = 15;
// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Character grid of the dial: tick marks around the rim, the part of the
/// current minute already swept, and the hand.
pub fn dial_rows(elapsed_ms: u64) -> Vec<String> {
    let mut grid = vec![vec![' '; DIAL_COLS]; DIAL_ROWS];
    let dial = Dial::fit(
        (DIAL_COLS - 1) as f32,
        (DIAL_ROWS - 1) as f32 * CELL_ASPECT,
        0.0,
    );
    let swept = if elapsed_ms > 0 {
        Some(dial::marker_index(elapsed_ms))
    } else {
        None
    };

    let mut plot = |x: f32, y: f32, ch: char| {
        let col = (x.round().max(0.0) as usize).min(DIAL_COLS - 1);
        let row = ((y / CELL_ASPECT).round().max(0.0) as usize).min(DIAL_ROWS - 1);
        grid[row][col] = ch;
    };

    for (i, marker) in dial.markers().enumerate() {
        let ch = match swept {
            Some(last) if i as u32 <= last => '#',
            _ if marker.major => 'o',
            _ => '.',
        };
        plot(marker.outer.x, marker.outer.y, ch);
    }
    let hand = dial.hand(elapsed_ms);
    plot(hand.x, hand.y, '@');

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn button_label(button: &Button, key: &str) -> String {
    if button.enabled {
        format!("[{} {}]", key, button.label)
    } else {
        format!(" {} {} ", key.chars().map(|_| '-').collect::<String>(), button.label)
    }
}

pub fn draw_stopwatch<W: Write>(
    out: &mut W,
    size: (u16, u16),
    state: &Stopwatch,
    now_ms: u64,
) -> io::Result<()> {
    let (_, height) = size;
    let elapsed = state.elapsed_ms(now_ms);
    queue!(out, Clear(ClearType::All), MoveTo(2, 0))?;
    queue!(
        out,
        SetAttribute(Attribute::Bold),
        Print("STOPWATCH"),
        SetAttribute(Attribute::Reset)
    )?;

    let mut row: u16 = 2;
    for line in dial_rows(elapsed) {
        queue!(out, MoveTo(2, row), Print(line))?;
        row += 1;
    }
    queue!(
        out,
        MoveTo(2 + DIAL_COLS as u16 / 2 - 4, 2 + DIAL_ROWS as u16 / 2),
        SetAttribute(Attribute::Bold),
        Print(state.display(now_ms)),
        SetAttribute(Attribute::Reset)
    )?;
    row += 1;

    let controls = state.controls();
    queue!(
        out,
        MoveTo(2, row),
        Print(format!(
            "{}  {}  {}",
            button_label(&controls.primary, "SPC"),
            button_label(&controls.pause, "p"),
            button_label(&controls.reset, "r"),
        ))
    )?;
    row += 2;

    // Keep the most recent laps in view.
    let footer_row = height.saturating_sub(1);
    let room = footer_row.saturating_sub(row + 1) as usize;
    let laps = state.laps();
    let first = laps.len().saturating_sub(room);
    for lap in &laps[first..] {
        queue!(out, MoveTo(4, row), Print(&lap.display))?;
        row += 1;
    }

    queue!(
        out,
        MoveTo(2, footer_row),
        Print("SPC/ENTER=start/lap  l=lap  p=pause  r=reset  q=quit")
    )?;
    out.flush()
}
