use crate::theory::{PitchClass, Scale, ScaleMode};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PentatonicMode {
  Major,
  Minor,
}

impl PentatonicMode {
  pub fn find_by_scale_mode(mode: ScaleMode) -> Self {
    match mode {
      ScaleMode::Major => Self::Major,
      ScaleMode::Minor => Self::Minor,
    }
  }
  /// 1-indexed scale degrees left out of the five-note subset.
  pub fn excluded_degrees(self) -> [usize; 2] {
    match self {
      Self::Major => [4, 7],
      Self::Minor => [2, 6],
    }
  }
}

pub fn to_pentatonic(scale: &Scale) -> Vec<PitchClass> {
  let excluded = PentatonicMode::find_by_scale_mode(scale.mode()).excluded_degrees();
  scale
    .degrees()
    .iter()
    .enumerate()
    .filter(|(i, _)| !excluded.contains(&(i + 1)))
    .map(|(_, &pc)| pc)
    .collect()
}

#[test]
fn test_pentatonic() {
  use pretty_assertions::assert_eq;
  use PitchClass::*;
  assert_eq!(
    to_pentatonic(&Scale::generate(C, ScaleMode::Major)),
    vec![C, D, E, G, A]
  );
  assert_eq!(
    to_pentatonic(&Scale::generate(A, ScaleMode::Minor)),
    vec![A, C, D, E, G]
  );
  assert_eq!(
    to_pentatonic(&Scale::generate(E, ScaleMode::Minor)),
    vec![E, G, A, B, D]
  );
  for root in PitchClass::ALL.iter().copied() {
    assert_eq!(to_pentatonic(&Scale::generate(root, ScaleMode::Major)).len(), 5);
    assert_eq!(to_pentatonic(&Scale::generate(root, ScaleMode::Minor))[0], root);
  }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChordQuality {
  Major,
  Minor,
  Diminished,
}

impl std::fmt::Display for ChordQuality {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str(match self {
      Self::Major => "",
      Self::Minor => "m",
      Self::Diminished => "dim",
    })
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChordMask {
  Major,
  Minor,
}

impl ChordMask {
  pub fn find_by_scale_mode(mode: ScaleMode) -> Self {
    match mode {
      ScaleMode::Major => Self::Major,
      ScaleMode::Minor => Self::Minor,
    }
  }
  pub fn qualities(self) -> &'static [ChordQuality; 7] {
    use ChordQuality::*;
    match self {
      Self::Major => &[Major, Minor, Minor, Major, Major, Minor, Diminished],
      Self::Minor => &[Minor, Major, Major, Minor, Minor, Diminished, Major],
    }
  }
}

/// Triad built on a scale degree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Chord {
  pub root: PitchClass,
  pub quality: ChordQuality,
}

impl std::fmt::Display for Chord {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}{}", self.root, self.quality)
  }
}

pub fn to_chords<'a>(scale: &'a Scale) -> impl Iterator<Item = Chord> + 'a {
  let mask = ChordMask::find_by_scale_mode(scale.mode());
  scale
    .degrees()
    .iter()
    .zip(mask.qualities().iter())
    .map(|(&root, &quality)| Chord { root, quality })
}

pub fn chord_labels(scale: &Scale) -> Vec<String> {
  to_chords(scale).map(|chord| chord.to_string()).collect()
}

#[test]
fn test_chords() {
  use pretty_assertions::assert_eq;
  use PitchClass::*;
  assert_eq!(
    chord_labels(&Scale::generate(C, ScaleMode::Major)),
    vec!["C", "Dm", "Em", "F", "G", "Am", "Bdim"]
  );
  assert_eq!(
    chord_labels(&Scale::generate(A, ScaleMode::Minor)),
    vec!["Am", "B", "C", "Dm", "Em", "Fdim", "G"]
  );
  assert_eq!(
    chord_labels(&Scale::generate(FSharp, ScaleMode::Minor)),
    vec!["F#m", "G#", "A", "Bm", "C#m", "Ddim", "E"]
  );

  let scale = Scale::generate(G, ScaleMode::Major);
  let chords = to_chords(&scale).collect::<Vec<_>>();
  assert_eq!(chords.len(), 7);
  assert_eq!(
    chords[6],
    Chord {
      root: FSharp,
      quality: ChordQuality::Diminished
    }
  );
}
