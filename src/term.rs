use crate::color::Rgba;
use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, KeyEventKind, read, poll};

const PANEL_FG: style::Color = style::Color::White;
const PANEL_BG: style::Color = style::Color::Rgb { r: 20, g: 20, b: 20 };

/// Owns the terminal while the game runs. The board is drawn as coloured
/// blocks, and an overlay panel can be laid on top of it.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    area: Coords,
    stdout: Stdout,
    // What is on screen under any overlay. `None` forces a repaint.
    screen: Vec<Option<Rgba>>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![None; width as usize * height as usize];
        Ok(TermManager { width, height, area: (width, height), stdout, screen, current_msg: None })
    }

    /// Enters the alternate screen. `board` is the size of the drawing, in
    /// terminal cells, and overlays are centred on it.
    pub fn setup(&mut self, board: Coords) -> Result<()> {
        self.area = (board.0.min(self.width), board.1.min(self.height));

        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
            .context("Error setting up cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error resetting raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    /// Waits up to `wait` for input, then drains every pending key press.
    pub fn read_key_events_queue(&self, wait: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut timeout = wait;

        while poll(timeout)? {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    events.push(ev);
                }
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    /// Paints one cell of the board as two terminal columns. Only cells whose
    /// colour changed are written.
    pub fn print_block(&mut self, pos: Coords, color: Rgba) -> Result<()> {
        if pos.0 + 1 >= self.width || pos.1 >= self.height {
            return Ok(());
        }

        for x in [pos.0, pos.0 + 1] {
            let i = self.width as usize * pos.1 as usize + x as usize;
            if self.screen[i] == Some(color) {
                continue;
            }
            self.screen[i] = Some(color);

            if !self.under_message((x, pos.1)) {
                let bg = style::Color::Rgb { r: color.r, g: color.g, b: color.b };
                queue!(self.stdout, cursor::MoveTo(x, pos.1), style::SetBackgroundColor(bg), style::Print(' '))?;
            }
        }

        Ok(())
    }

    pub fn show_message(&mut self, lines: &[String]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as TermInt;
        let center = (self.area.0 / 2, self.area.1 / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.stdout, style::SetForegroundColor(PANEL_FG), style::SetBackgroundColor(PANEL_BG))?;

        let blank = String::new();
        let rows = std::iter::once(&blank).chain(lines).chain(std::iter::once(&blank));
        for (i, line) in rows.enumerate() {
            let y = top_left.1 + i as TermInt;
            if y >= self.height {
                break;
            }
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        queue!(self.stdout, style::ResetColor)?;
        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore what the overlay covered from the screen buffer
        for y in top_left.1..(top_left.1 + msg.height()).min(self.height) {
            for x in top_left.0..(top_left.0 + msg.width()).min(self.width) {
                let i = self.width as usize * y as usize + x as usize;
                let bg = match self.screen[i] {
                    Some(c) => style::Color::Rgb { r: c.r, g: c.g, b: c.b },
                    None => style::Color::Reset,
                };
                queue!(self.stdout, cursor::MoveTo(x, y), style::SetBackgroundColor(bg), style::Print(' '))?;
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    pub fn bell(&mut self) -> Result<()> {
        execute!(self.stdout, style::Print('\x07')).context("Error ringing bell")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn under_message(&self, pos: Coords) -> bool {
        self.current_msg.as_ref().map_or(false, |msg| msg.contains(pos))
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }

    fn contains(&self, pos: Coords) -> bool {
        let (x0, y0) = self.top_left;
        x0 <= pos.0 && pos.0 < x0 + self.width && y0 <= pos.1 && pos.1 < y0 + self.height
    }
}
