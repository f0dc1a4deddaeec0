use crate::error::{Error, Result};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PitchClass {
  C,
  CSharp,
  D,
  DSharp,
  E,
  F,
  FSharp,
  G,
  GSharp,
  A,
  ASharp,
  B,
}

impl PitchClass {
  pub const ALL: [PitchClass; 12] = [
    Self::C,
    Self::CSharp,
    Self::D,
    Self::DSharp,
    Self::E,
    Self::F,
    Self::FSharp,
    Self::G,
    Self::GSharp,
    Self::A,
    Self::ASharp,
    Self::B,
  ];

  fn ordinal(self) -> i64 {
    match self {
      Self::C => 0,
      Self::CSharp => 1,
      Self::D => 2,
      Self::DSharp => 3,
      Self::E => 4,
      Self::F => 5,
      Self::FSharp => 6,
      Self::G => 7,
      Self::GSharp => 8,
      Self::A => 9,
      Self::ASharp => 10,
      Self::B => 11,
    }
  }
  fn from_ordinal(ordinal: i64) -> Self {
    Self::ALL[ordinal.rem_euclid(12) as usize]
  }
  pub fn name(self) -> &'static str {
    match self {
      Self::C => "C",
      Self::CSharp => "C#",
      Self::D => "D",
      Self::DSharp => "D#",
      Self::E => "E",
      Self::F => "F",
      Self::FSharp => "F#",
      Self::G => "G",
      Self::GSharp => "G#",
      Self::A => "A",
      Self::ASharp => "A#",
      Self::B => "B",
    }
  }
  pub fn next(self, semitones: i64) -> Self {
    step(self, semitones)
  }
  pub fn previous(self, semitones: i64) -> Self {
    step(self, -semitones.rem_euclid(12))
  }
}

impl std::fmt::Display for PitchClass {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    // Padding flags ({:<3}) apply to the name.
    f.pad(self.name())
  }
}

impl FromStr for PitchClass {
  type Err = Error;
  fn from_str(s: &str) -> Result<Self> {
    let name = s.trim();
    Self::ALL
      .iter()
      .copied()
      .find(|pc| pc.name() == name)
      .ok_or_else(|| Error::InvalidPitchClass(s.to_string()))
  }
}

/// Moves `semitones` around the 12-tone ring, in either direction.
pub fn step(pitch_class: PitchClass, semitones: i64) -> PitchClass {
  // Reduce first so any i64 is accepted without overflow.
  PitchClass::from_ordinal(pitch_class.ordinal() + semitones.rem_euclid(12))
}

pub fn step_name(name: &str, semitones: i64) -> Result<PitchClass> {
  Ok(step(name.parse()?, semitones))
}

#[test]
fn test_pitch_class() {
  use PitchClass::*;
  assert_eq!(step(C, 0), C);
  assert_eq!(step(C, 1), CSharp);
  assert_eq!(step(C, 12), C);
  assert_eq!(step(C, 14), D);
  assert_eq!(step(C, -1), B);
  assert_eq!(step(D, -26), C);
  assert_eq!(E.previous(2), D);
  assert_eq!(B.next(1), C);

  assert_eq!("F#".parse::<PitchClass>(), Ok(FSharp));
  assert_eq!(" A ".parse::<PitchClass>(), Ok(A));
  assert_eq!(
    "H".parse::<PitchClass>(),
    Err(Error::InvalidPitchClass("H".into()))
  );
  assert_eq!(
    "c".parse::<PitchClass>(),
    Err(Error::InvalidPitchClass("c".into()))
  );
  assert_eq!(
    "Db".parse::<PitchClass>(),
    Err(Error::InvalidPitchClass("Db".into()))
  );
  assert_eq!(step_name("A#", 3), Ok(CSharp));
  assert_eq!(step_name("X", 3), Err(Error::InvalidPitchClass("X".into())));

  for pc in PitchClass::ALL.iter() {
    assert_eq!(pc.to_string().parse::<PitchClass>(), Ok(*pc));
  }
  assert_eq!(format!("[{:<3}]", CSharp), "[C# ]");
}

#[test]
fn test_step_extreme_offsets() {
  use PitchClass::*;
  assert_eq!(step(B, i64::MAX), FSharp);
  assert_eq!(step(C, i64::MIN), E);
  assert_eq!(C.previous(i64::MIN), GSharp);
  assert_eq!(step(step(A, i64::MAX), -i64::MAX), A);
  let mut cursor = Cursor::new(C);
  assert_eq!(cursor.advance(i64::MIN), E);
  assert_eq!(cursor.retreat(i64::MIN), C);
}

#[test]
fn test_step_is_invertible() {
  use rand::rngs::SmallRng;
  use rand::{Rng, SeedableRng};
  let mut rng = SmallRng::seed_from_u64(0x5eed);
  for _ in 0..1000 {
    let pc = PitchClass::ALL[rng.gen_range(0..12)];
    let n = rng.gen_range(-100i64..100);
    assert_eq!(step(step(pc, n), -n), pc);
    assert_eq!(step(pc, n + 12), step(pc, n));
  }
  for pc in PitchClass::ALL.iter().copied() {
    assert_eq!(step(pc, 12), pc);
    assert_eq!(step(pc, 0), pc);
  }
}

/// Caller-owned position on the ring. Iterating yields successive semitones,
/// starting one above the initial pitch class.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cursor {
  current: PitchClass,
}

impl Cursor {
  pub fn new(start: PitchClass) -> Self {
    Self { current: start }
  }
  pub fn current(&self) -> PitchClass {
    self.current
  }
  pub fn advance(&mut self, semitones: i64) -> PitchClass {
    self.current = step(self.current, semitones);
    self.current
  }
  pub fn retreat(&mut self, semitones: i64) -> PitchClass {
    self.current = self.current.previous(semitones);
    self.current
  }
  /// All 12 pitch classes, starting at `root` and stopping before it recurs.
  pub fn octave(root: PitchClass) -> impl Iterator<Item = PitchClass> {
    std::iter::once(root).chain(Self::new(root).take_while(move |&pc| pc != root))
  }
}

impl Iterator for Cursor {
  type Item = PitchClass;
  fn next(&mut self) -> Option<PitchClass> {
    Some(self.advance(1))
  }
}

#[test]
fn test_cursor() {
  use PitchClass::*;
  let mut cursor = Cursor::new(A);
  assert_eq!(cursor.current(), A);
  assert_eq!(cursor.advance(2), B);
  assert_eq!(cursor.advance(1), C);
  assert_eq!(cursor.retreat(3), A);
  assert_eq!(cursor.advance(0), A);
  assert_eq!(
    cursor.take(4).collect::<Vec<_>>(),
    vec![ASharp, B, C, CSharp]
  );

  let octave = Cursor::octave(E).collect::<Vec<_>>();
  assert_eq!(octave.len(), 12);
  assert_eq!(octave[0], E);
  assert_eq!(octave[11], DSharp);
  let distinct: fnv::FnvHashSet<_> = octave.iter().copied().collect();
  assert_eq!(distinct.len(), 12);
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Note {
  // Relative to middle C (C4, below A4 = 440 Hz).
  semitones: i64,
}
impl Note {
  const CONCERT_PITCH: f64 = 440.0;

  pub fn new(pitch_class: PitchClass, octave: i64) -> Self {
    Note {
      semitones: pitch_class.ordinal() + (octave - 4) * 12,
    }
  }
  pub fn pitch_class(self) -> PitchClass {
    PitchClass::from_ordinal(self.semitones)
  }
  pub fn octave(self) -> i64 {
    self.semitones.div_euclid(12) + 4
  }
  pub fn offset(self, semitones: i64) -> Self {
    Note {
      semitones: self.semitones + semitones,
    }
  }
  /// Equal-tempered frequency in Hz, with A4 at concert pitch.
  pub fn frequency(self) -> f64 {
    let from_a4 = self.semitones - Note::new(PitchClass::A, 4).semitones;
    Self::CONCERT_PITCH * 2f64.powf(from_a4 as f64 / 12.0)
  }
}

impl std::fmt::Display for Note {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}{}", self.pitch_class(), self.octave())
  }
}

#[test]
fn test_note() {
  use PitchClass::*;
  assert_eq!(Note::new(C, 4).semitones, 0);
  assert_eq!(Note::new(C, 5).semitones, 12);
  assert_eq!(Note::new(C, 3).semitones, -12);
  assert_eq!(Note::new(B, 3).semitones, -1);

  assert_eq!(Note::new(D, 4).offset(10), Note::new(C, 5));
  assert_eq!(Note::new(D, 4).offset(-3), Note::new(B, 3));
  assert_eq!(Note::new(D, 4).offset(-12), Note::new(D, 3));
  assert_eq!(Note::new(GSharp, 2).to_string(), "G#2");

  assert_eq!(Note::new(A, 4).frequency(), 440.0);
  assert_eq!(Note::new(A, 5).frequency(), 880.0);
  assert_eq!(Note::new(A, 3).frequency(), 220.0);
  assert!((Note::new(C, 4).frequency() - 261.63).abs() < 0.01);
  assert!((Note::new(E, 2).frequency() - 82.41).abs() < 0.01);
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScaleMode {
  Major,
  Minor,
}

impl ScaleMode {
  /// Semitone distances between successive degrees, one octave's worth.
  pub fn steps(self) -> &'static [i64] {
    match self {
      Self::Major => &[2, 2, 1, 2, 2, 2, 1],
      Self::Minor => &[2, 1, 2, 2, 1, 2, 2],
    }
  }
}

impl std::fmt::Display for ScaleMode {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str(match self {
      Self::Major => "Major",
      Self::Minor => "Minor",
    })
  }
}

impl FromStr for ScaleMode {
  type Err = Error;
  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "major" => Ok(Self::Major),
      "minor" => Ok(Self::Minor),
      _ => Err(Error::UnsupportedMode(s.to_string())),
    }
  }
}

#[test]
fn test_scale_mode() {
  assert_eq!("major".parse::<ScaleMode>(), Ok(ScaleMode::Major));
  assert_eq!("MINOR".parse::<ScaleMode>(), Ok(ScaleMode::Minor));
  assert_eq!("Minor".parse::<ScaleMode>(), Ok(ScaleMode::Minor));
  assert_eq!(
    "dorian".parse::<ScaleMode>(),
    Err(Error::UnsupportedMode("dorian".into()))
  );
  for mode in [ScaleMode::Major, ScaleMode::Minor].iter() {
    assert_eq!(mode.steps().iter().sum::<i64>(), 12);
    assert_eq!(mode.to_string().parse::<ScaleMode>(), Ok(*mode));
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scale {
  mode: ScaleMode,
  notes: Vec<PitchClass>,
}

impl Scale {
  pub fn generate(root: PitchClass, mode: ScaleMode) -> Self {
    let mut cursor = Cursor::new(root);
    let notes: Vec<_> = std::iter::once(root)
      .chain(mode.steps().iter().map(|&step| cursor.advance(step)))
      .collect();
    tracing::debug!(%root, %mode, len = notes.len(), "generated scale");
    Self { mode, notes }
  }
  pub fn parse(root: &str, mode: &str) -> Result<Self> {
    Ok(Self::generate(root.parse()?, mode.parse()?))
  }
  pub fn root(&self) -> PitchClass {
    self.notes[0]
  }
  pub fn mode(&self) -> ScaleMode {
    self.mode
  }
  /// Root followed by every generated degree; the last entry is the root an
  /// octave up.
  pub fn notes(&self) -> &[PitchClass] {
    &self.notes
  }
  /// The seven diatonic degrees, without the octave.
  pub fn degrees(&self) -> &[PitchClass] {
    &self.notes[..self.mode.steps().len()]
  }
  pub fn contains(&self, pitch_class: PitchClass) -> bool {
    self.notes.contains(&pitch_class)
  }
  pub fn title(&self) -> String {
    format!("{} {}", self.root(), self.mode)
  }
}

#[test]
fn test_scale() {
  use pretty_assertions::assert_eq;
  use PitchClass::*;
  assert_eq!(
    Scale::generate(C, ScaleMode::Major).notes(),
    &[C, D, E, F, G, A, B, C]
  );
  assert_eq!(
    Scale::generate(A, ScaleMode::Minor).notes(),
    &[A, B, C, D, E, F, G, A]
  );
  assert_eq!(
    Scale::generate(GSharp, ScaleMode::Minor).notes(),
    &[GSharp, ASharp, B, CSharp, DSharp, E, FSharp, GSharp]
  );
  assert_eq!(
    Scale::generate(FSharp, ScaleMode::Major).notes(),
    &[FSharp, GSharp, ASharp, B, CSharp, DSharp, F, FSharp]
  );

  let scale = Scale::parse("D", "minor").unwrap();
  assert_eq!(scale.root(), D);
  assert_eq!(scale.mode(), ScaleMode::Minor);
  assert_eq!(scale.degrees().len(), 7);
  assert_eq!(scale.title(), "D Minor");
  assert!(scale.contains(ASharp));
  assert!(!scale.contains(B));

  assert_eq!(
    Scale::parse("H", "major"),
    Err(Error::InvalidPitchClass("H".into()))
  );
  assert_eq!(
    Scale::parse("C", "lydian"),
    Err(Error::UnsupportedMode("lydian".into()))
  );
}

#[test]
fn test_scale_is_deterministic() {
  for root in PitchClass::ALL.iter().copied() {
    for mode in [ScaleMode::Major, ScaleMode::Minor].iter().copied() {
      let scale = Scale::generate(root, mode);
      assert_eq!(scale, Scale::generate(root, mode));
      assert_eq!(scale.notes().len(), mode.steps().len() + 1);
      assert_eq!(scale.notes().first(), scale.notes().last());
    }
  }
}
