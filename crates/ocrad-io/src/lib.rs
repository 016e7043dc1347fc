//! PNM pixmap reading and ORF/plain-text result export.
//!
//! The ambient I/O concern of the workspace: everything upstream works on
//! in-memory [`ocrad_core::PageImage`]/[`ocrad_layout::Textpage`] values,
//! and this crate is the only one that touches a byte stream.

pub mod error;
pub mod orf;
pub mod pnm;
pub mod text;

pub use error::{Error, Result};
pub use pnm::read_pnm;
pub use orf::write_orf;
pub use text::write_text;
