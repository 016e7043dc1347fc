//! Character guesses, Unicode code-point tables and the glyph classifier
//! cascade: turns a segmented [`ocrad_region::Blob`] group into ranked
//! code-point guesses.

pub mod character;
pub mod leaf;
pub mod ucs;

pub use character::{Character, Guess};
pub use ocrad_profile::Features;
