//! Track/line/block/page layout analysis and the contextual post-pass
//! that turns classified characters into assembled text.

pub mod track;
pub mod textline;
pub mod textblock;
pub mod textpage;

pub use track::{Track, Vrhomboid};
pub use textline::Textline;
pub use textblock::Textblock;
pub use textpage::Textpage;
