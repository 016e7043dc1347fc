//! Error types shared by every crate in the workspace.
//!
//! C Ocrad reports most of these conditions through a process-wide
//! `internal_error()` that prints to stderr and calls `exit(3)`, or through
//! the library's `OCRAD_Errno` enum. This module replaces both with a single
//! `Result<T, Error>` that every crate downstream re-exports instead of
//! defining its own error type.

use thiserror::Error;

/// Workspace-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A rectangle, bitmap region or blob geometry violated its own
    /// invariants (e.g. `right < left`, zero height).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A PNM/pixmap payload failed to parse: bad magic, a dimension below
    /// 3x3, a sample value above `maxval`, or `width * height` overflowing.
    #[error("malformed pnm input: {0}")]
    BadPnm(String),

    /// `width * height` would overflow `i32`, or exceeds the configured
    /// safety ceiling.
    #[error("image too large: {width}x{height}")]
    ImageTooBig { width: i32, height: i32 },

    /// An allocation failed. Mirrors `OCRAD_mem_error` / `std::bad_alloc`
    /// catches in the original library facade.
    #[error("out of memory")]
    OutOfMemory,

    /// An argument was out of its documented range (threshold, scale
    /// factor, charset/filter/transformation name, block/line index).
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// A façade call was made out of order, e.g. `recognize()` before
    /// `set_image()`, or a query before `recognize()`. Mirrors
    /// `OCRAD_sequence_error`.
    #[error("operation called out of sequence: {0}")]
    SequenceError(String),

    /// A condition the algorithm assumes can never happen did happen.
    /// Mirrors `Ocrad::internal_error`.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
