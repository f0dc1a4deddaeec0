use crate::error::{Error, Result};
use crate::theory::PitchClass;
use std::collections::BTreeMap;
use std::path::Path;

/// Named open-string layouts read from the tunings file. The `standard` list
/// is mandatory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TuningTable {
  tunings: BTreeMap<String, Vec<PitchClass>>,
}

impl TuningTable {
  pub const STANDARD: &'static str = "standard";

  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|err| {
      Error::InvalidConfiguration(format!("cannot read {}: {}", path.display(), err))
    })?;
    let table = Self::from_json(&json)?;
    tracing::info!(path = %path.display(), tunings = table.tunings.len(), "loaded tuning table");
    Ok(table)
  }

  pub fn from_json(json: &str) -> Result<Self> {
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
      .map_err(|err| Error::InvalidConfiguration(format!("malformed tuning table: {}", err)))?;
    let mut tunings = BTreeMap::new();
    for (name, notes) in raw {
      let notes = notes
        .iter()
        .map(|note| note.parse::<PitchClass>())
        .collect::<Result<Vec<_>>>()
        .map_err(|err| Error::InvalidConfiguration(format!("tuning '{}': {}", name, err)))?;
      tracing::debug!(%name, strings = notes.len(), "parsed tuning");
      tunings.insert(name, notes);
    }
    match tunings.get(Self::STANDARD) {
      None => Err(Error::InvalidConfiguration(format!(
        "missing \"{}\" tuning",
        Self::STANDARD
      ))),
      Some(notes) if notes.is_empty() => Err(Error::InvalidConfiguration(format!(
        "\"{}\" tuning has no strings",
        Self::STANDARD
      ))),
      Some(_) => Ok(Self { tunings }),
    }
  }

  pub fn standard(&self) -> &[PitchClass] {
    self.get(Self::STANDARD).unwrap_or(&[])
  }

  pub fn get(&self, name: &str) -> Option<&[PitchClass]> {
    self.tunings.get(name).map(Vec::as_slice)
  }
}

#[cfg(test)]
const STANDARD_JSON: &str = r#"{"standard": ["E", "A", "D", "G", "B", "E"]}"#;

#[test]
fn test_tuning_table() {
  use PitchClass::*;
  let table = TuningTable::from_json(STANDARD_JSON).unwrap();
  assert_eq!(table.standard(), &[E, A, D, G, B, E]);
  assert_eq!(table.get("open g"), None);

  let table =
    TuningTable::from_json(r#"{"standard": ["E"], "open g": ["D", "G", "D", "G", "B", "D"]}"#)
      .unwrap();
  assert_eq!(table.get("open g"), Some(&[D, G, D, G, B, D][..]));

  let invalid = |json: &str| match TuningTable::from_json(json) {
    Err(Error::InvalidConfiguration(_)) => true,
    _ => false,
  };
  assert!(invalid(r#"{"standard": []}"#));
  assert!(invalid(r#"{"drop": ["D"]}"#));
  assert!(invalid(r#"{"standard": ["E", "H"]}"#));
  assert!(invalid(r#"{"standard": ["E", "A""#));
  assert!(invalid(r#"["E", "A"]"#));
}

#[test]
fn test_tuning_table_load() {
  use std::io::Write;
  let mut file = tempfile::NamedTempFile::new().unwrap();
  file.write_all(STANDARD_JSON.as_bytes()).unwrap();
  let table = TuningTable::load(file.path()).unwrap();
  assert_eq!(table.standard().len(), 6);

  let dir = tempfile::tempdir().unwrap();
  match TuningTable::load(dir.path().join("missing.json")) {
    Err(Error::InvalidConfiguration(msg)) => assert!(msg.contains("missing.json")),
    other => panic!("unexpected {:?}", other),
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tuning {
  strings: usize,
  drop: bool,
  bias: i64,
  notes: Vec<PitchClass>,
  title: String,
}

impl Tuning {
  pub fn builder(base: &[PitchClass]) -> TuningBuilder {
    TuningBuilder {
      base,
      strings: 6,
      bias: 0,
      drop: false,
    }
  }
  pub fn strings(&self) -> usize {
    self.strings
  }
  pub fn is_drop(&self) -> bool {
    self.drop
  }
  pub fn bias(&self) -> i64 {
    self.bias
  }
  pub fn notes(&self) -> &[PitchClass] {
    &self.notes
  }
  pub fn title(&self) -> &str {
    &self.title
  }
}

#[derive(Clone, Debug)]
pub struct TuningBuilder<'a> {
  base: &'a [PitchClass],
  strings: usize,
  bias: i64,
  drop: bool,
}

impl<'a> TuningBuilder<'a> {
  pub fn strings(mut self, strings: usize) -> Self {
    self.strings = strings;
    self
  }
  /// Whole tones added to every open string.
  pub fn bias(mut self, bias: i64) -> Self {
    self.bias = bias;
    self
  }
  /// Lower the last string by one more whole tone.
  pub fn drop(mut self, drop: bool) -> Self {
    self.drop = drop;
    self
  }
  pub fn build(self) -> Result<Tuning> {
    if self.base.is_empty() {
      return Err(Error::InvalidConfiguration("base tuning is empty".into()));
    }
    if self.strings == 0 {
      return Err(Error::InvalidConfiguration(
        "instrument needs at least one string".into(),
      ));
    }
    let last = self.strings - 1;
    let notes: Vec<_> = self
      .base
      .iter()
      .copied()
      .cycle()
      .take(self.strings)
      .enumerate()
      .map(|(i, note)| {
        // Six whole tones make an octave; reduce before doubling.
        let note = note.next(self.bias.rem_euclid(6) * 2);
        if self.drop && i == last {
          note.previous(2)
        } else {
          note
        }
      })
      .collect();
    let title = title(self.strings, self.bias, self.drop, notes[last]);
    tracing::debug!(strings = self.strings, bias = self.bias, drop = self.drop, %title, "resolved tuning");
    Ok(Tuning {
      strings: self.strings,
      drop: self.drop,
      bias: self.bias,
      notes,
      title,
    })
  }
}

pub fn resolve_tuning(strings: usize, bias: i64, drop: bool, base: &[PitchClass]) -> Result<Tuning> {
  Tuning::builder(base)
    .strings(strings)
    .bias(bias)
    .drop(drop)
    .build()
}

// The count prefix applies to "standard" as well, e.g. "7 standard".
fn title(strings: usize, bias: i64, drop: bool, last: PitchClass) -> String {
  let base_title = if drop || bias != 0 {
    format!("{}{}", if drop { "drop " } else { "" }, last.name().to_uppercase())
  } else {
    "standard".to_string()
  };
  let count = if strings > 6 {
    strings.to_string()
  } else {
    String::new()
  };
  format!("{} {}", count, base_title).trim().to_string()
}

#[test]
fn test_resolve_tuning() {
  use pretty_assertions::assert_eq;
  use PitchClass::*;
  let base = [E, A, D, G, B, E];

  let standard = resolve_tuning(6, 0, false, &base).unwrap();
  assert_eq!(standard.notes(), &base);
  assert_eq!(standard.title(), "standard");

  let drop = resolve_tuning(6, 0, true, &base).unwrap();
  assert_eq!(drop.notes(), &[E, A, D, G, B, D]);
  assert_eq!(drop.title(), "drop D");
  assert!(drop.is_drop());

  let seven = resolve_tuning(7, 0, false, &base).unwrap();
  assert_eq!(seven.notes(), &[E, A, D, G, B, E, E]);
  assert_eq!(seven.title(), "7 standard");

  let eight = resolve_tuning(8, 0, true, &base).unwrap();
  assert_eq!(eight.notes(), &[E, A, D, G, B, E, E, G]);
  assert_eq!(eight.title(), "8 drop G");

  let up = resolve_tuning(6, 1, false, &base).unwrap();
  assert_eq!(up.notes(), &[FSharp, B, E, A, CSharp, FSharp]);
  assert_eq!(up.title(), "F#");
  assert_eq!(up.bias(), 1);

  let down = resolve_tuning(6, -1, true, &base).unwrap();
  assert_eq!(down.notes(), &[D, G, C, F, A, C]);
  assert_eq!(down.title(), "drop C");

  let huge = resolve_tuning(6, i64::MAX, false, &base).unwrap();
  assert_eq!(huge.notes(), up.notes());
  assert_eq!(huge.title(), "F#");
  let huge_down = resolve_tuning(6, i64::MIN, true, &base).unwrap();
  assert_eq!(huge_down.notes(), &[C, F, ASharp, DSharp, G, ASharp]);
  assert_eq!(huge_down.title(), "drop A#");
  assert!(resolve_tuning(6, i64::MAX / 2 + 1, false, &base).is_ok());

  let four = resolve_tuning(4, 0, false, &base).unwrap();
  assert_eq!(four.notes(), &[E, A, D, G]);
  assert_eq!(four.strings(), 4);

  assert_eq!(
    resolve_tuning(6, 0, false, &[]),
    Err(Error::InvalidConfiguration("base tuning is empty".into()))
  );
  assert!(resolve_tuning(0, 0, false, &base).is_err());

  assert_eq!(resolve_tuning(7, 2, true, &base), resolve_tuning(7, 2, true, &base));
}

#[test]
fn test_builder_defaults() {
  use PitchClass::*;
  let base = [E, A, D, G, B, E];
  assert_eq!(
    Tuning::builder(&base).build(),
    resolve_tuning(6, 0, false, &base)
  );
  let tuning = Tuning::builder(&base).drop(true).bias(6).build().unwrap();
  assert_eq!(tuning.notes(), &[E, A, D, G, B, D]);
  assert_eq!(tuning.title(), "drop D");
}
