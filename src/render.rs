use crate::theory::{Cursor, Note, PitchClass, Scale};
use crate::tuning::Tuning;
use colored::Colorize;
use fnv::FnvHashSet;
use itertools::Itertools;
use std::fmt::{self, Write};

pub const FRETS: usize = 24;

pub struct Fretboard<'a> {
  tuning: &'a Tuning,
  scale: &'a Scale,
  pentatonic: Option<&'a [PitchClass]>,
  chords: &'a [String],
  color: bool,
}

impl<'a> Fretboard<'a> {
  pub fn new(tuning: &'a Tuning, scale: &'a Scale, chords: &'a [String]) -> Self {
    Self {
      tuning,
      scale,
      pentatonic: None,
      chords,
      color: true,
    }
  }
  /// Highlight only these notes on the frets instead of the whole scale.
  pub fn pentatonic(mut self, notes: Option<&'a [PitchClass]>) -> Self {
    self.pentatonic = notes;
    self
  }
  pub fn color(mut self, color: bool) -> Self {
    self.color = color;
    self
  }

  fn header(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let title = self.scale.title();
    writeln!(
      f,
      "           Tuning: {:<19} ({})",
      self.tuning.notes().iter().join(" "),
      self.tuning.title()
    )?;
    writeln!(
      f,
      "    Current scale: {:<19} ({})",
      self.scale.notes().iter().join(" "),
      title
    )?;
    if let Some(pentatonic) = self.pentatonic {
      writeln!(
        f,
        "       Pentatonic: {:<19} ({})",
        pentatonic.iter().join(" "),
        title
      )?;
    }
    if !self.chords.is_empty() {
      writeln!(f, "Chord progression: {}\n", self.chords.iter().join(" "))?;
    }
    Ok(())
  }

  fn string_row(
    &self,
    f: &mut fmt::Formatter,
    open: PitchClass,
    highlight: &FnvHashSet<PitchClass>,
  ) -> fmt::Result {
    let root = self.scale.root();
    let open_cell = if self.scale.contains(open) {
      open.name()
    } else {
      ""
    };
    write!(f, "{:<2}||", open_cell)?;
    for fret in Cursor::new(open).take(FRETS) {
      let name = if highlight.contains(&fret) {
        fret.name()
      } else {
        ""
      };
      let cell = format!("{:<3}", name);
      if self.color && fret == root {
        write!(f, "{}|", cell.red())?;
      } else {
        write!(f, "{}|", cell)?;
      }
    }
    writeln!(f, " - ")
  }

  fn footer(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("  ||")?;
    for fret in 1..=FRETS {
      write!(f, "{:<3}|", fret)?;
    }
    writeln!(f)
  }
}

impl<'a> fmt::Display for Fretboard<'a> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let highlight: FnvHashSet<PitchClass> = match self.pentatonic {
      Some(notes) => notes.iter().copied().collect(),
      None => self.scale.notes().iter().copied().collect(),
    };
    self.header(f)?;
    for &open in self.tuning.notes() {
      self.string_row(f, open, &highlight)?;
    }
    self.footer(f)
  }
}

/// One chromatic octave upward from `root`, ending on the root an octave up.
pub fn frequency_table(root: Note) -> impl Iterator<Item = (Note, f64)> {
  (0..=12).map(move |i| {
    let note = root.offset(i);
    (note, note.frequency())
  })
}

pub fn render_frequencies<W: Write>(out: &mut W, root: Note) -> fmt::Result {
  for (note, frequency) in frequency_table(root) {
    writeln!(out, "{:>3}: {:7.2} Hz", note.to_string(), frequency)?;
  }
  Ok(())
}

#[cfg(test)]
fn c_major_on_standard() -> (Tuning, Scale, Vec<String>) {
  use crate::theory::ScaleMode;
  use PitchClass::*;
  let tuning = crate::tuning::resolve_tuning(6, 0, false, &[E, A, D, G, B, E]).unwrap();
  let scale = Scale::generate(C, ScaleMode::Major);
  let chords = crate::derived::chord_labels(&scale);
  (tuning, scale, chords)
}

#[test]
fn test_fretboard_layout() {
  use pretty_assertions::assert_eq;
  let (tuning, scale, chords) = c_major_on_standard();
  let output = Fretboard::new(&tuning, &scale, &chords)
    .color(false)
    .to_string();
  let lines: Vec<_> = output.lines().collect();
  // Header (3 lines + blank), 6 strings, footer.
  assert_eq!(lines.len(), 4 + 6 + 1);
  assert_eq!(
    lines[0],
    "           Tuning: E A D G B E         (standard)"
  );
  assert_eq!(
    lines[1],
    "    Current scale: C D E F G A B C     (C Major)"
  );
  assert_eq!(lines[2], "Chord progression: C Dm Em F G Am Bdim");
  assert_eq!(lines[3], "");
  assert!(lines[4].starts_with("E ||F  |   |G  |   |A  |   |B  |C  |"));
  assert!(lines[4].ends_with("E  | - "));
  assert!(lines[9].starts_with("E ||"));
  assert!(lines[10].starts_with("  ||1  |2  |3  |"));
  assert!(lines[10].ends_with("24 |"));
  for row in &lines[4..10] {
    assert_eq!(row.len(), 4 + FRETS * 4 + 3);
  }
}

#[test]
fn test_fretboard_pentatonic() {
  let (tuning, scale, chords) = c_major_on_standard();
  let pentatonic = crate::derived::to_pentatonic(&scale);
  let output = Fretboard::new(&tuning, &scale, &chords)
    .pentatonic(Some(pentatonic.as_slice()))
    .color(false)
    .to_string();
  let lines: Vec<_> = output.lines().collect();
  assert_eq!(lines.len(), 5 + 6 + 1);
  assert_eq!(
    lines[2],
    "       Pentatonic: C D E G A           (C Major)"
  );
  // F and B drop out of the highlighted frets.
  assert!(lines[5].starts_with("E ||   |   |G  |   |A  |   |   |C  |"));
  assert!(!lines[5..11]
    .iter()
    .any(|row| row[4..].contains("F ") || row[4..].contains("B ")));
}

#[test]
fn test_fretboard_color() {
  let (tuning, scale, chords) = c_major_on_standard();
  colored::control::set_override(true);
  let colored_output = Fretboard::new(&tuning, &scale, &chords).to_string();
  let plain = Fretboard::new(&tuning, &scale, &chords)
    .color(false)
    .to_string();
  assert!(colored_output.contains("\u{1b}[31mC  \u{1b}[0m|"));
  assert!(!plain.contains('\u{1b}'));
}

#[test]
fn test_frequency_table() {
  use PitchClass::*;
  let rows: Vec<_> = frequency_table(Note::new(A, 4)).collect();
  assert_eq!(rows.len(), 13);
  assert_eq!(rows[0], (Note::new(A, 4), 440.0));
  assert_eq!(rows[12], (Note::new(A, 5), 880.0));
  assert_eq!(rows[3].0, Note::new(C, 5));

  let mut out = String::new();
  render_frequencies(&mut out, Note::new(A, 4)).unwrap();
  let lines: Vec<_> = out.lines().collect();
  assert_eq!(lines[0], " A4:  440.00 Hz");
  assert_eq!(lines[12], " A5:  880.00 Hz");
}
