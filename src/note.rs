use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PitchClass {
    C, Cs, D, Ds, E, F, Fs, G, Gs, A, As, B,
}

impl PitchClass {
    const ALL: [PitchClass; 12] = [
        PitchClass::C, PitchClass::Cs, PitchClass::D, PitchClass::Ds,
        PitchClass::E, PitchClass::F, PitchClass::Fs, PitchClass::G,
        PitchClass::Gs, PitchClass::A, PitchClass::As, PitchClass::B,
    ];

    fn semitone(self) -> i32 {
        self as i32
    }

    fn name(self) -> &'static str {
        ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"][self as usize]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("empty note name")]
    Empty,
    #[error("unknown pitch letter `{0}`")]
    UnknownLetter(char),
    #[error("invalid octave in `{0}`")]
    InvalidOctave(String),
}

/// A note in scientific pitch notation, e.g. `C#5`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub pitch: PitchClass,
    pub octave: i8,
}

impl Note {
    pub const fn new(pitch: PitchClass, octave: i8) -> Self {
        Note { pitch, octave }
    }

    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch.semitone()
    }

    /// Equal temperament, A4 = 440 Hz.
    pub fn frequency(&self) -> f64 {
        440.0 * 2f64.powf((self.midi() - 69) as f64 / 12.0)
    }
}

impl FromStr for Note {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NoteError::Empty)?;

        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            other => return Err(NoteError::UnknownLetter(other)),
        };

        let rest = chars.as_str();
        let (accidental, octave) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let mut octave: i8 = octave.parse().map_err(|_| NoteError::InvalidOctave(s.to_string()))?;

        // Cb and B# cross into the neighbouring octave
        let mut semitone = base + accidental;
        if semitone < 0 {
            semitone += 12;
            octave = octave.checked_sub(1).ok_or_else(|| NoteError::InvalidOctave(s.to_string()))?;
        } else if semitone > 11 {
            semitone -= 12;
            octave = octave.checked_add(1).ok_or_else(|| NoteError::InvalidOctave(s.to_string()))?;
        }

        Ok(Note::new(PitchClass::ALL[semitone as usize], octave))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch.name(), self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scientific_pitch() {
        assert_eq!("C#5".parse::<Note>(), Ok(Note::new(PitchClass::Cs, 5)));
        assert_eq!("A2".parse::<Note>(), Ok(Note::new(PitchClass::A, 2)));
        assert_eq!("Eb3".parse::<Note>(), Ok(Note::new(PitchClass::Ds, 3)));
        assert_eq!("C-1".parse::<Note>(), Ok(Note::new(PitchClass::C, -1)));
        assert_eq!("Cb4".parse::<Note>(), Ok(Note::new(PitchClass::B, 3)));
        assert_eq!("B#4".parse::<Note>(), Ok(Note::new(PitchClass::C, 5)));
    }

    #[test]
    fn rejects_malformed_names() {
        assert_eq!("".parse::<Note>(), Err(NoteError::Empty));
        assert_eq!("H2".parse::<Note>(), Err(NoteError::UnknownLetter('H')));
        assert_eq!("C#".parse::<Note>(), Err(NoteError::InvalidOctave("C#".into())));
        assert_eq!("Ax".parse::<Note>(), Err(NoteError::InvalidOctave("Ax".into())));
    }

    #[test]
    fn displays_with_sharps() {
        assert_eq!(Note::new(PitchClass::Cs, 5).to_string(), "C#5");
        assert_eq!("Db5".parse::<Note>().unwrap().to_string(), "C#5");
    }

    #[test]
    fn frequencies() {
        let a4: Note = "A4".parse().unwrap();
        assert_eq!(a4.midi(), 69);
        assert_eq!(a4.frequency(), 440.0);
        assert!(("A2".parse::<Note>().unwrap().frequency() - 110.0).abs() < 1e-9);
        assert!(("C4".parse::<Note>().unwrap().frequency() - 261.6256).abs() < 1e-3);
    }
}
