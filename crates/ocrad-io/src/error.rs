//! Error type for this crate, layering a file-I/O variant under the core
//! error kinds the way `leptonica-io::error` layers `Io` under `leptonica_core::Error`.

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] ocrad_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
