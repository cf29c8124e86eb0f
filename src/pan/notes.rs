/*
Note Labels
===========

Pads are named the way players name them: a letter, an optional accidental
and an octave number.

    C4    natural
    F#3   sharp  ('#' or 's')
    Eb5   flat   ('b')

Octaves run 0 to 8 with C4 = MIDI 60. Sharps and flats are aliases for the same
pitch, so "C#4" and "Db4" sound identically.

Frequencies are twelve-tone equal temperament around A4 = 440 Hz:

    f = 440 * 2^((midi - 69) / 12)
*/

use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};

pub const A4_FREQUENCY: f32 = 440.0;
pub const A4_MIDI: u8 = 69;

pub const MIN_OCTAVE: u8 = 0;
pub const MAX_OCTAVE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// A parsed note label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    letter: char,
    accidental: Accidental,
    octave: u8,
}

impl Note {
    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// MIDI note number. Cb0 is the one label that falls below MIDI 12.
    pub fn midi(&self) -> u8 {
        let natural: i16 = match self.letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            _ => 11,
        };
        let offset = match self.accidental {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        };
        (12 * (self.octave as i16 + 1) + natural + offset) as u8
    }

    pub fn frequency(&self) -> f32 {
        midi_to_frequency(self.midi())
    }
}

impl FromStr for Note {
    type Err = EngineError;

    fn from_str(label: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidNote(label.to_string());
        let mut chars = label.trim().chars();

        let letter = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| ('A'..='G').contains(c))
            .ok_or_else(invalid)?;

        let rest = chars.as_str();
        let (accidental, digits) = match rest.as_bytes().first() {
            Some(b'#') | Some(b's') => (Accidental::Sharp, &rest[1..]),
            Some(b'b') => (Accidental::Flat, &rest[1..]),
            _ => (Accidental::Natural, rest),
        };

        if digits.len() != 1 {
            return Err(invalid());
        }
        let octave = digits
            .parse::<u8>()
            .ok()
            .filter(|o| (MIN_OCTAVE..=MAX_OCTAVE).contains(o))
            .ok_or_else(invalid)?;

        Ok(Note {
            letter,
            accidental,
            octave,
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.accidental {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        };
        write!(f, "{}{}{}", self.letter, accidental, self.octave)
    }
}

pub fn midi_to_frequency(note: u8) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf((note as f32 - A4_MIDI as f32) / 12.0)
}

/// Parse a label straight to its frequency in Hz.
pub fn frequency(label: &str) -> Result<f32> {
    label.parse::<Note>().map(|note| note.frequency())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn a4_is_exactly_440() {
        assert_eq!(frequency("A4").expect("A4"), 440.0);
    }

    #[test]
    fn middle_c_is_60() {
        let c4: Note = "C4".parse().expect("C4");
        assert_eq!(c4.midi(), 60);
        assert!(close(c4.frequency(), 261.63));
    }

    #[test]
    fn sharps_and_flats_are_equal() {
        assert_eq!(frequency("C#4").ok(), frequency("Db4").ok());
        assert_eq!(frequency("F#3").ok(), frequency("Gb3").ok());
        assert_eq!(frequency("A#3").ok(), frequency("Bb3").ok());
        assert_eq!(frequency("Cs4").ok(), frequency("C#4").ok());
    }

    #[test]
    fn pan_range_matches_reference_pitches() {
        let table = [
            ("C1", 32.70),
            ("E3", 164.81),
            ("G#3", 207.65),
            ("D#4", 311.13),
            ("F#4", 369.99),
            ("G5", 783.99),
        ];
        for (label, expected) in table {
            let actual = frequency(label).expect(label);
            assert!(close(actual, expected), "{label}: {actual} != {expected}");
        }
    }

    #[test]
    fn octaves_double() {
        let a3 = frequency("A3").expect("A3");
        let a5 = frequency("A5").expect("A5");
        assert_eq!(a3, 220.0);
        assert_eq!(a5, 880.0);
    }

    #[test]
    fn rejects_malformed_labels() {
        for label in ["", "H4", "C", "C9", "C#", "C##4", "C-1", "C10", "4C", "Cx4"] {
            assert!(
                matches!(frequency(label), Err(EngineError::InvalidNote(_))),
                "{label:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips_label() {
        for label in ["C4", "F#3", "Eb5", "B0"] {
            let note: Note = label.parse().expect(label);
            assert_eq!(note.to_string(), label);
        }
    }

    #[test]
    fn accepts_lowercase_letter() {
        assert_eq!(frequency("a4").ok(), Some(440.0));
    }
}
