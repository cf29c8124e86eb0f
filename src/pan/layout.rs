//! Where the notes sit on the instrument.
//!
//! A double tenor is played as two drums side by side. Each drum has an outer
//! ring of seven pads and a smaller inner ring of higher pads. Positions are
//! relative to the drum's centre in units of the drum radius, with `y`
//! growing downwards.

use crate::error::{EngineError, Result};
use crate::pan::notes::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ring {
    Outer,
    Inner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub note: Note,
    pub drum: usize,
    pub ring: Ring,
    pub x: f32,
    pub y: f32,
}

impl Pad {
    pub fn frequency(&self) -> f32 {
        self.note.frequency()
    }

    pub fn label(&self) -> String {
        self.note.to_string()
    }

    /// Relative pad size: 1.0 for octave 1 and below, shrinking linearly to
    /// 20/45 at octave 5 and above.
    pub fn scale(&self) -> f32 {
        const MIN: f32 = 20.0;
        const MAX: f32 = 45.0;
        let octave = self.note.octave().clamp(1, 5) as f32;
        let t = (5.0 - octave) / 4.0;
        (MIN + (MAX - MIN) * t) / MAX
    }

    /// Hit radius in drum radii.
    pub fn radius(&self) -> f32 {
        PAD_RADIUS * self.scale()
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        (x - self.x).hypot(y - self.y) <= self.radius()
    }
}

/// Pad radius at scale 1.0, in drum radii
pub const PAD_RADIUS: f32 = 0.22;

/// Pads closer to the centre than this belong to the inner ring
const INNER_RING_RADIUS: f32 = 0.55;

/// Whether a point relative to a drum's centre lies on the drum.
pub fn inside_drum(x: f32, y: f32) -> bool {
    x.is_finite() && y.is_finite() && x.hypot(y) < 1.0
}

fn ring_at(x: f32, y: f32) -> Ring {
    if x.hypot(y) < INNER_RING_RADIUS {
        Ring::Inner
    } else {
        Ring::Outer
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanLayout {
    drums: usize,
    pads: Vec<Pad>,
}

// Pad positions shared by both drums
const OUTER: [(f32, f32); 7] = [
    (-0.7, -0.4),
    (-0.2, -0.8),
    (0.3, -0.8),
    (0.8, -0.3),
    (0.8, 0.3),
    (0.2, 0.8),
    (-0.3, 0.8),
];
const INNER: [(f32, f32); 5] = [
    (-0.35, -0.1),
    (-0.1, -0.35),
    (0.1, -0.1),
    (0.35, 0.1),
    (0.0, 0.35),
];

const LEFT_OUTER: [&str; 7] = ["E3", "E4", "C4", "F#3", "B3", "D3", "G#3"];
const LEFT_INNER: [&str; 5] = ["G#4", "F#4", "D4", "F4", "A3"];
const RIGHT_OUTER: [&str; 7] = ["A3", "D#4", "B3", "F3", "A#3", "C#3", "G3"];
const RIGHT_INNER: [&str; 3] = ["G4", "F4", "C#4"];

impl PanLayout {
    /// The two-drum double tenor the instrument ships with.
    pub fn double_tenor() -> Self {
        let mut layout = PanLayout {
            drums: 2,
            pads: Vec::with_capacity(22),
        };

        let drums: [(&[&str], &[&str]); 2] =
            [(&LEFT_OUTER, &LEFT_INNER), (&RIGHT_OUTER, &RIGHT_INNER)];
        for (drum, (outer, inner)) in drums.iter().enumerate() {
            layout.push_ring(drum, Ring::Outer, outer, &OUTER);
            layout.push_ring(drum, Ring::Inner, inner, &INNER);
        }
        layout
    }

    fn push_ring(&mut self, drum: usize, ring: Ring, labels: &[&str], positions: &[(f32, f32)]) {
        for (label, &(x, y)) in labels.iter().zip(positions) {
            match label.parse::<Note>() {
                Ok(note) => self.pads.push(Pad {
                    note,
                    drum,
                    ring,
                    x,
                    y,
                }),
                Err(e) => log::warn!("skipping pad: {}", e),
            }
        }
    }

    pub fn drum_count(&self) -> usize {
        self.drums
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pad> {
        self.pads.iter()
    }

    pub fn notes_for_drum(&self, drum: usize) -> impl Iterator<Item = &Pad> {
        self.pads.iter().filter(move |pad| pad.drum == drum)
    }

    /// First pad tuned to `label`, searching the left drum before the right.
    /// Enharmonic spellings match: `"Db4"` finds the `C#4` pad.
    pub fn pad(&self, label: &str) -> Result<Option<&Pad>> {
        let wanted = label.parse::<Note>()?.midi();
        Ok(self.pads.iter().find(|pad| pad.note.midi() == wanted))
    }

    /// Like [`pad`](Self::pad) but a missing pad is an error.
    pub fn require_pad(&self, label: &str) -> Result<&Pad> {
        self.pad(label)?
            .ok_or_else(|| EngineError::InvalidNote(format!("{} is not on this pan", label)))
    }

    /// Index of the pad under `(x, y)` on `drum`. Later pads are drawn on top,
    /// so they win where pads overlap.
    pub fn pad_at(&self, drum: usize, x: f32, y: f32) -> Option<usize> {
        self.pads
            .iter()
            .rposition(|pad| pad.drum == drum && pad.contains(x, y))
    }

    /// Place a new pad tuned to `label` and return its index. The ring follows
    /// from the distance to the drum's centre.
    pub fn add_pad(&mut self, drum: usize, label: &str, x: f32, y: f32) -> Result<usize> {
        let note = label.parse::<Note>()?;
        self.check_position(drum, x, y)?;
        self.pads.push(Pad {
            note,
            drum,
            ring: ring_at(x, y),
            x,
            y,
        });
        log::debug!("added {} to drum {} at ({:.2}, {:.2})", note, drum, x, y);
        Ok(self.pads.len() - 1)
    }

    /// Take a pad off the pan. Indices after it shift down by one.
    pub fn remove_pad(&mut self, index: usize) -> Result<Pad> {
        self.check_index(index)?;
        let pad = self.pads.remove(index);
        log::debug!("removed {} from drum {}", pad.note, pad.drum);
        Ok(pad)
    }

    /// Change the note a pad plays, keeping its place.
    pub fn retune(&mut self, index: usize, label: &str) -> Result<()> {
        self.check_index(index)?;
        let note = label.parse::<Note>()?;
        self.pads[index].note = note;
        Ok(())
    }

    /// Move a pad, possibly onto the other drum. A target off every drum is
    /// rejected and the pad stays where it was.
    pub fn move_pad(&mut self, index: usize, drum: usize, x: f32, y: f32) -> Result<()> {
        self.check_index(index)?;
        self.check_position(drum, x, y)?;
        let pad = &mut self.pads[index];
        pad.drum = drum;
        pad.ring = ring_at(x, y);
        pad.x = x;
        pad.y = y;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.pads.len() {
            Ok(())
        } else {
            Err(EngineError::InvalidLayout(format!(
                "no pad {} (layout has {})",
                index,
                self.pads.len()
            )))
        }
    }

    fn check_position(&self, drum: usize, x: f32, y: f32) -> Result<()> {
        if drum >= self.drums {
            return Err(EngineError::InvalidLayout(format!(
                "no drum {} (pan has {})",
                drum, self.drums
            )));
        }
        if !inside_drum(x, y) {
            return Err(EngineError::InvalidLayout(format!(
                "({}, {}) is off drum {}",
                x, y, drum
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PanLayout {
    type Item = &'a Pad;
    type IntoIter = std::slice::Iter<'a, Pad>;

    fn into_iter(self) -> Self::IntoIter {
        self.pads.iter()
    }
}
