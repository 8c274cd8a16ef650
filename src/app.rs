use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error};

use crate::config::GameConfig;
use crate::game::{GameLoop, Panel};
use crate::scheduler::Scheduler;
use crate::snake::Direction::{self, *};
use crate::sound::Chime;
use crate::surface::Canvas;
use crate::vector::Vector;
use crate::TermInt;
use crate::term::TermManager;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Start,
    Quit,
}

/// Runs the tick, render and burst loops cooperatively on one thread, with
/// the terminal as screen, keyboard and speaker.
pub struct App {
    term: TermManager,
    canvas: Canvas,
    scheduler: Scheduler,
    game: GameLoop<Chime, StdRng>,
    started: Instant,
    next_paint: Duration,
    shown_panel: Option<Panel>,
}

impl App {
    pub fn new(config: GameConfig, muted: bool) -> Result<Self> {
        let term = TermManager::new()?;
        let canvas = Canvas::new(config.canvas_side());
        let mut scheduler = Scheduler::new();
        let game = GameLoop::new(config, Chime::new(muted), StdRng::from_entropy(), &mut scheduler);

        Ok(App {
            term,
            canvas,
            scheduler,
            game,
            started: Instant::now(),
            next_paint: Duration::ZERO,
            shown_panel: None,
        })
    }

    /// Takes over the terminal, runs until the player quits and hands the
    /// terminal back, also when setup or the loop fails.
    pub fn play(&mut self) -> Result<()> {
        restoring(
            self,
            |app| {
                app.initialize()?;
                app.run()
            },
            |app| app.restore(),
        )
    }

    pub fn initialize(&mut self) -> Result<()> {
        let cells = self.game.config().cells as TermInt;
        self.term.setup((cells * 2, cells))
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let now = self.started.elapsed();
            let next_deadline = self.scheduler.next_deadline();
            let wake = next_deadline.map_or(self.next_paint, |at| at.min(self.next_paint));

            for key_ev in self.term.read_key_events_queue(wake.saturating_sub(now))? {
                match command_for(&key_ev) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Turn(direction)) => self.game.turn(direction),
                    // The start control lives on the panel
                    Some(Command::Start) if self.game.panel().visible => self.game.start_game(),
                    _ => {}
                }
            }

            let now = self.started.elapsed();
            // Sync the sound clock first so cues played by these tasks are
            // delayed from now
            let mut ring = self.game.sound_mut().pump(now);

            for task in self.scheduler.due_timers(now) {
                self.game.run(task, &mut self.canvas, &mut self.scheduler);
            }

            if now >= self.next_paint {
                for task in self.scheduler.take_frame() {
                    self.game.run(task, &mut self.canvas, &mut self.scheduler);
                }
                self.paint()?;
                self.next_paint = now + FRAME_INTERVAL;
            }

            ring |= self.game.sound_mut().pump(now);
            if ring {
                self.term.bell()?;
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn paint(&mut self) -> Result<()> {
        let config = self.game.config();
        let pitch = config.cell_size + config.gap;

        // One grid cell and the gap after it make up one terminal block
        for y in 0..config.cells {
            for x in 0..config.cells {
                let origin = config.position(Vector::new(x, y));
                let color = self.canvas.sample(origin.x, origin.y, pitch);
                self.term.print_block(((x * 2) as TermInt, y as TermInt), color)?;
            }
        }
        self.term.flush()?;

        let panel = self.game.panel();
        if self.shown_panel != Some(panel) {
            debug!(?panel, "panel changed");
            if panel.visible {
                self.term.show_message(&panel_lines(&panel))?;
            } else {
                self.term.hide_message()?;
            }
            self.shown_panel = Some(panel);
        }

        Ok(())
    }
}

/// Runs `body` on `state`, then `restore` whatever the outcome. An error
/// from `body` takes precedence over one from `restore`.
pub fn restoring<S, T>(
    state: &mut S,
    body: impl FnOnce(&mut S) -> Result<T>,
    restore: impl FnOnce(&mut S) -> Result<()>,
) -> Result<T> {
    let res = body(state);
    let restored = restore(state);

    match res {
        Ok(value) => restored.map(|_| value),
        Err(err) => {
            if let Err(restore_err) = restored {
                error!(%restore_err, "restore failed after an error");
            }
            Err(err)
        }
    }
}

fn panel_lines(panel: &Panel) -> Vec<String> {
    let mut lines = vec!["S N A K E".to_string(), String::new()];
    if let Some(score) = panel.score {
        lines.push(format!("Score: {}", score));
        lines.push(String::new());
    }
    lines.push("Enter or Space to start".to_string());
    lines.push("Arrow keys or WASD to move".to_string());
    lines.push("Esc or CTRL+C to quit".to_string());
    lines
}

pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Turn(Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Start),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn maps_keys_to_commands() {
        assert_eq!(command_for(&key(KeyCode::Up, KeyModifiers::NONE)), Some(Command::Turn(Up)));
        assert_eq!(command_for(&key(KeyCode::Char('a'), KeyModifiers::NONE)), Some(Command::Turn(Left)));
        assert_eq!(command_for(&key(KeyCode::Enter, KeyModifiers::NONE)), Some(Command::Start));
        assert_eq!(command_for(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Command::Quit));
        assert_eq!(command_for(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(command_for(&key(KeyCode::Tab, KeyModifiers::NONE)), None);
    }

    #[derive(Default)]
    struct Session {
        entered: bool,
        restored: bool,
    }

    #[test]
    fn restore_runs_when_setup_fails() {
        let mut session = Session::default();
        let res: Result<()> = restoring(
            &mut session,
            |s| {
                s.entered = true;
                Err(anyhow::anyhow!("cursor hide failed"))
            },
            |s| {
                s.restored = true;
                Ok(())
            },
        );

        assert!(session.entered && session.restored);
        assert_eq!(res.unwrap_err().to_string(), "cursor hide failed");
    }

    #[test]
    fn body_error_wins_over_restore_error() {
        let mut session = Session::default();
        let res: Result<()> = restoring(
            &mut session,
            |_| Err(anyhow::anyhow!("loop failed")),
            |_| Err(anyhow::anyhow!("restore failed")),
        );
        assert_eq!(res.unwrap_err().to_string(), "loop failed");
    }

    #[test]
    fn restore_error_surfaces_after_a_clean_run() {
        let mut session = Session::default();
        let res = restoring(&mut session, |_| Ok(7), |_| Err(anyhow::anyhow!("restore failed")));
        assert_eq!(res.unwrap_err().to_string(), "restore failed");

        let res = restoring(&mut session, |_| Ok(7), |s| {
            s.restored = true;
            Ok(())
        });
        assert_eq!(res.unwrap(), 7);
        assert!(session.restored);
    }

    #[test]
    fn panel_shows_score_after_a_game() {
        let fresh = panel_lines(&Panel { visible: true, score: None });
        assert!(!fresh.iter().any(|l| l.starts_with("Score")));

        let over = panel_lines(&Panel { visible: true, score: Some(30) });
        assert!(over.contains(&"Score: 30".to_string()));
    }
}
