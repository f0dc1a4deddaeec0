//! Scales, pentatonic subsets and chord progressions over the 12-tone ring,
//! laid out on the fretboard of a stringed instrument.

pub mod derived;
pub mod error;
pub mod render;
pub mod theory;
pub mod tuning;

pub use self::error::{Error, Result};
