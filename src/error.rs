use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
  #[error("unable to find note '{0}'")]
  InvalidPitchClass(String),
  #[error("unknown scale mode: {0}")]
  UnsupportedMode(String),
  #[error("invalid tuning configuration: {0}")]
  InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn test_messages() {
  assert_eq!(
    Error::InvalidPitchClass("H".into()).to_string(),
    "unable to find note 'H'"
  );
  assert_eq!(
    Error::UnsupportedMode("dorian".into()).to_string(),
    "unknown scale mode: dorian"
  );
  assert_eq!(
    Error::InvalidConfiguration("empty \"standard\" list".into()).to_string(),
    "invalid tuning configuration: empty \"standard\" list"
  );
}
