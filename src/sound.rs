use std::time::Duration;

use tracing::{trace, warn};

use crate::note::Note;

pub const DEFAULT_VOLUME_DB: f32 = -12.0;

/// Fire-and-forget note output. Notes are named in scientific pitch
/// notation, e.g. `C#5`.
pub trait SoundEmitter {
    fn play(&mut self, note: &str, volume_db: f32, delay: Duration);
}

/// One sounding note. Every call to `play` makes its own.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Voice {
    pub note: Note,
    pub volume_db: f32,
}

/// Terminal sound: voices are logged when they come due, and loud ones ring
/// the terminal bell.
pub struct Chime {
    clock: Duration,
    pending: Vec<(Duration, Voice)>,
    muted: bool,
}

impl Chime {
    pub fn new(muted: bool) -> Self {
        Chime { clock: Duration::ZERO, pending: vec![], muted }
    }

    /// Emits every voice due by `now`. Returns whether the bell should ring.
    pub fn pump(&mut self, now: Duration) -> bool {
        self.clock = self.clock.max(now);

        let clock = self.clock;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= clock);
        self.pending = pending;

        let mut ring = false;
        for (_, voice) in due {
            trace!(note = %voice.note, hz = voice.note.frequency(), db = voice.volume_db, "voice");
            ring |= voice.volume_db >= DEFAULT_VOLUME_DB;
        }

        ring && !self.muted
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl SoundEmitter for Chime {
    fn play(&mut self, note: &str, volume_db: f32, delay: Duration) {
        match note.parse::<Note>() {
            Ok(note) => self.pending.push((self.clock + delay, Voice { note, volume_db })),
            Err(err) => warn!(note, %err, "dropping unplayable note"),
        }
    }
}
