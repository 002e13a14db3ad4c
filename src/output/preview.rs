//! On-screen stand-in for the globe: the row/column grid drawn in the terminal

use super::{FrameSink, SinkStatus};
use crate::pixels::{slot_index, COLUMN_COUNT, ROW_COUNT};
use crate::render::RenderFrame;
use crate::terminal::{rgb, Terminal};
use crossterm::event::KeyCode;
use crossterm::style::Color;
use std::io;
use tracing::warn;

/// Terminal cells per pixel, horizontally
const CELL_WIDTH: i32 = 2;

pub struct PreviewSink {
    term: Terminal,
    slots: Vec<bool>,
    frames: u64,
}

impl PreviewSink {
    /// `enabled` gives, in wire order, which slots carry an LED
    pub fn new(enabled: Vec<bool>) -> io::Result<Self> {
        Ok(Self { term: Terminal::new()?, slots: enabled, frames: 0 })
    }

    fn draw(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let (width, height) = crossterm::terminal::size().unwrap_or(self.term.size());
        if (width, height) != self.term.size() {
            self.term.resize(width, height)?;
        }
        self.term.clear();

        for row in 0..ROW_COUNT {
            for column in 0..COLUMN_COUNT {
                let slot = slot_index(row, column);
                let x = column as i32 * CELL_WIDTH;
                let y = row as i32;
                if !self.slots.get(slot).copied().unwrap_or(false) {
                    self.term.set(x, y, '·', Some(Color::DarkGrey));
                    continue;
                }
                let color = frame.colors.get(slot).copied().unwrap_or_default();
                let (r, g, b) = color.scaled(frame.brightness).to_rgb8();
                for dx in 0..CELL_WIDTH {
                    self.term.set(x + dx, y, '█', Some(rgb(r, g, b)));
                }
            }
        }

        let status = format!(
            "frame {}  brightness {:.2}  [q] quit",
            self.frames, frame.brightness
        );
        self.term.set_str(0, ROW_COUNT as i32 + 1, &status, Some(Color::Grey));
        self.term.render()
    }
}

/// Keys that end the preview
pub fn is_quit(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc)
}

impl FrameSink for PreviewSink {
    fn submit(&mut self, frame: &RenderFrame) -> SinkStatus {
        match self.term.check_key() {
            Ok(Some(code)) if is_quit(code) => return SinkStatus::Closed,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "preview input failed");
                return SinkStatus::Closed;
            }
        }
        self.frames += 1;
        if let Err(e) = self.draw(frame) {
            warn!(error = %e, "preview draw failed");
            return SinkStatus::Closed;
        }
        SinkStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_keys() {
        assert!(is_quit(KeyCode::Char('q')));
        assert!(is_quit(KeyCode::Esc));
        assert!(!is_quit(KeyCode::Char(' ')));
    }
}
