//! Recognition configuration: enabled character sets, the output filter,
//! an optional input transformation, and the byte/utf8 output format.
//!
//! Grounded on `common.h`/`common.cc`'s `Charset`/`Filter`/`Transformation`/
//! `Control`. The original represents "unset" with boolean-returning
//! `set()`/`enable()` calls fed string names parsed from CLI flags; here
//! each is a typed enum/bitflags value constructed directly, and invalid
//! names are rejected with [`Error::BadArgument`] instead of a printed
//! usage message.

use crate::error::{Error, Result};

/// A bitset of enabled 8-bit character sets. Ocrad recognizes characters
/// against whichever repertoires are enabled; with none enabled, ISO 8859-15
/// is used (`enabled()`'s documented default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Charset(u32);

impl Charset {
    pub const ASCII: Charset = Charset(1);
    pub const ISO_8859_9: Charset = Charset(2);
    pub const ISO_8859_15: Charset = Charset(4);

    pub const fn empty() -> Self { Self(0) }

    /// # Errors
    /// Returns [`Error::BadArgument`] for any name other than `ascii`,
    /// `iso-8859-9`, or `iso-8859-15`.
    pub fn enable(&mut self, name: &str) -> Result<()> {
        let value = match name {
            "ascii" => Self::ASCII,
            "iso-8859-9" => Self::ISO_8859_9,
            "iso-8859-15" => Self::ISO_8859_15,
            other => return Err(Error::BadArgument(format!("bad charset '{other}'"))),
        };
        self.0 |= value.0;
        Ok(())
    }

    pub fn enabled(&self, cset: Charset) -> bool {
        if self.0 == 0 { cset == Self::ISO_8859_15 } else { (self.0 & cset.0) != 0 }
    }

    pub fn only(&self, cset: Charset) -> bool {
        if self.0 == 0 { cset == Self::ISO_8859_15 } else { self.0 == cset.0 }
    }
}

/// What categories of glyph guesses survive the contextual post-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    None,
    Letters,
    LettersOnly,
    Numbers,
    NumbersOnly,
}

impl Filter {
    /// # Errors
    /// Returns [`Error::BadArgument`] for any unrecognized filter name.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "none" => Ok(Filter::None),
            "letters" => Ok(Filter::Letters),
            "letters_only" => Ok(Filter::LettersOnly),
            "numbers" => Ok(Filter::Numbers),
            "numbers_only" => Ok(Filter::NumbersOnly),
            other => Err(Error::BadArgument(format!("bad filter '{other}'"))),
        }
    }
}

/// A whole-page geometric transform applied to the source bitmap before
/// segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transformation {
    #[default]
    None,
    Rotate90,
    Rotate180,
    Rotate270,
    MirrorLr,
    MirrorTb,
    MirrorD1,
    MirrorD2,
}

impl Transformation {
    /// # Errors
    /// Returns [`Error::BadArgument`] for any unrecognized transformation
    /// name. Rotations are counter-clockwise, matching the original.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "none" => Ok(Transformation::None),
            "rotate90" => Ok(Transformation::Rotate90),
            "rotate180" => Ok(Transformation::Rotate180),
            "rotate270" => Ok(Transformation::Rotate270),
            "mirror_lr" => Ok(Transformation::MirrorLr),
            "mirror_tb" => Ok(Transformation::MirrorTb),
            "mirror_d1" => Ok(Transformation::MirrorD1),
            "mirror_d2" => Ok(Transformation::MirrorD2),
            other => Err(Error::BadArgument(format!("bad transformation '{other}'"))),
        }
    }
}

/// Recognition-wide knobs threaded through the whole pipeline. Carries no
/// file handles (the original's `outfile`/`exportfile` are an I/O-layer
/// concern, see `ocrad-io`); `debug_level` gates the `log` crate calls
/// emitted during blob merge/zone join/line assembly.
#[derive(Debug, Clone, Default)]
pub struct Control {
    pub charset: Charset,
    pub filter: Filter,
    pub debug_level: u8,
    pub utf8: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_charset_is_iso_8859_15() {
        let cs = Charset::empty();
        assert!(cs.enabled(Charset::ISO_8859_15));
        assert!(!cs.enabled(Charset::ASCII));
    }

    #[test]
    fn enable_rejects_unknown_name() {
        let mut cs = Charset::empty();
        assert!(cs.enable("klingon").is_err());
        assert!(cs.enable("ascii").is_ok());
        assert!(cs.enabled(Charset::ASCII));
    }

    #[test]
    fn filter_roundtrip() {
        assert_eq!(Filter::parse("numbers_only").unwrap(), Filter::NumbersOnly);
        assert!(Filter::parse("bogus").is_err());
    }
}
