//! The OCR engine's public library facade: bitmap in, recognized text out.
//!
//! Grounded on `ocradlib.h`/`ocradlib.cc`'s `OCRAD_Descriptor` and its
//! `OCRAD_*` functions. The original is a C ABI wrapping a raw pointer and
//! an `OCRAD_Errno` the caller polls after every call; [`Descriptor`]
//! instead reports failure through `Result<_, ocrad_core::Error>` and
//! enforces the call-order invariant `OCRAD_sequence_error` guarded against
//! (`recognize`/queries before an image is set, queries before
//! `recognize`) with an explicit [`State`] enum rather than the original's
//! `page_image`/`textpage` null checks, so illegal transitions are a
//! compile-reachable match arm instead of an ad hoc pointer test.

use std::io::Read;

use ocrad_layout::Textpage;

// Re-exported so a caller only needs this crate to build an image, read
// its configuration knobs, and handle errors, the way `leptonica`'s own
// root crate re-exports `leptonica_core::*` for its downstream callers.
pub use ocrad_core::{Charset, Control, Error, Filter, PageImage, PixmapMode, Rational, Result, Transformation};

/// Mirrors the two null checks `verify_descriptor` performs: every call
/// needs `page_image`, and every *result* query additionally needs
/// `textpage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Uninitialized,
    ImageSet,
    Recognized,
}

/// The crate's own version, reported by [`Descriptor::version`] the way
/// `OCRAD_version()` reports `OCRAD_version_string`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single recognition session: one bound image, one set of control
/// knobs, and (after [`Descriptor::recognize`]) one recognized [`Textpage`].
#[derive(Debug, Default)]
pub struct Descriptor {
    state: State,
    page_image: Option<PageImage>,
    textpage: Option<Textpage>,
    control: Control,
    name: String,
}

impl Descriptor {
    pub fn new() -> Self { Self::default() }

    pub fn version() -> &'static str { VERSION }

    fn require_image(&self) -> Result<()> {
        if self.state == State::Uninitialized {
            return Err(Error::SequenceError("no image set".into()));
        }
        Ok(())
    }

    fn require_recognized(&self) -> Result<&Textpage> {
        self.require_image()?;
        self.textpage.as_ref().ok_or_else(|| Error::SequenceError("recognize() not called".into()))
    }

    /// Binds an already-decoded image, discarding any previous recognition
    /// result the way `OCRAD_set_image` drops `ocrdes->textpage` before
    /// replacing `ocrdes->page_image`.
    pub fn set_image(&mut self, image: PageImage) {
        self.page_image = Some(image);
        self.textpage = None;
        self.name.clear();
        self.state = State::ImageSet;
    }

    /// Reads a PBM/PGM/PPM stream and binds it, mirroring
    /// `OCRAD_set_image_from_file`'s call to the `Page_image(FILE*, bool)`
    /// constructor (here, [`ocrad_io::pnm::read_pnm`]).
    ///
    /// # Errors
    /// Propagates [`ocrad_io::Error`] for a short read or malformed PNM.
    pub fn set_image_from_pnm<R: Read>(&mut self, r: &mut R, name: &str, invert: bool) -> ocrad_io::Result<()> {
        let image = ocrad_io::read_pnm(r, invert)?;
        self.page_image = Some(image);
        self.textpage = None;
        self.name = name.to_string();
        self.state = State::ImageSet;
        Ok(())
    }

    pub fn set_utf8_format(&mut self, utf8: bool) -> Result<()> {
        self.require_image()?;
        self.control.utf8 = utf8;
        Ok(())
    }

    pub fn set_charset(&mut self, name: &str) -> Result<()> {
        self.control.charset.enable(name)
    }

    pub fn set_filter(&mut self, name: &str) -> Result<()> {
        self.control.filter = Filter::parse(name)?;
        Ok(())
    }

    pub fn charset(&self) -> Charset { self.control.charset }
    pub fn filter(&self) -> Filter { self.control.filter }

    /// Applies a whole-page rotation/mirror before segmentation. Unlike
    /// the other setters this mutates the bound image directly (the
    /// original applies `input_control.transformation` to the `Page_image`
    /// right after construction, before any recognition runs).
    ///
    /// # Errors
    /// Returns [`Error::SequenceError`] if no image is bound yet.
    pub fn transform(&mut self, t: Transformation) -> Result<()> {
        self.require_image()?;
        self.page_image.as_mut().expect("checked by require_image").transform(t);
        self.textpage = None;
        self.state = State::ImageSet;
        Ok(())
    }

    /// `-1..=255`: `-1` requests Otsu auto-thresholding, matching
    /// `OCRAD_set_threshold`'s own range check and its call into
    /// `Page_image::threshold(int)`.
    ///
    /// # Errors
    /// Returns [`Error::BadArgument`] outside `-1..=255`, or
    /// [`Error::SequenceError`] if no image is bound yet.
    pub fn set_threshold(&mut self, threshold: i32) -> Result<()> {
        self.require_image()?;
        if !(-1..=255).contains(&threshold) {
            return Err(Error::BadArgument(format!("threshold {threshold} out of range -1..=255")));
        }
        self.page_image.as_mut().expect("checked by require_image").set_threshold(threshold);
        Ok(())
    }

    /// A fractional threshold in `0..=1`; anything outside that range
    /// falls back to auto-thresholding, matching
    /// [`PageImage::set_threshold_rational`].
    ///
    /// # Errors
    /// Returns [`Error::SequenceError`] if no image is bound yet.
    pub fn set_threshold_rational(&mut self, threshold: Rational) -> Result<()> {
        self.require_image()?;
        self.page_image.as_mut().expect("checked by require_image").set_threshold_rational(threshold);
        Ok(())
    }

    /// `n <= -2` reduces by `-n`, `n >= 2` enlarges by `n`; any other value
    /// is rejected, matching `Page_image::scale`'s `-1/0/1` no-op returning
    /// `false` from `OCRAD_scale`.
    ///
    /// # Errors
    /// Returns [`Error::BadArgument`] for `n` in `-1..=1`, or
    /// [`Error::SequenceError`] if no image is bound yet.
    pub fn scale(&mut self, n: i32) -> Result<()> {
        self.require_image()?;
        if n <= -2 {
            let reduced = self.page_image.as_ref().expect("checked by require_image").reduce(-n)?;
            self.page_image = Some(reduced);
        } else if n >= 2 {
            self.page_image.as_mut().expect("checked by require_image").enlarge(n);
        } else {
            return Err(Error::BadArgument(format!("bad scale factor {n}")));
        }
        Ok(())
    }

    /// Runs layout analysis and character recognition over the bound
    /// image, mirroring `OCRAD_recognize`'s construction of a fresh
    /// `Textpage` (any earlier result is dropped first).
    ///
    /// # Errors
    /// Returns [`Error::SequenceError`] if no image is bound yet.
    pub fn recognize(&mut self, layout: bool) -> Result<()> {
        self.require_image()?;
        let image = self.page_image.as_ref().expect("checked by require_image");
        log::debug!("recognizing {}x{} image, layout={layout}", image.width(), image.height());
        let mut textpage = Textpage::new(image, &self.name, layout);
        textpage.recognize(&self.control.charset, &self.control.filter);
        log::debug!("recognized {} block(s), {} character(s)", textpage.textblocks(), textpage.characters());
        self.textpage = Some(textpage);
        self.state = State::Recognized;
        Ok(())
    }

    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run.
    pub fn result_blocks(&self) -> Result<usize> {
        Ok(self.require_recognized()?.textblocks())
    }

    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run,
    /// or [`Error::BadArgument`] for `block` out of range.
    pub fn result_lines(&self, block: usize) -> Result<usize> {
        let tp = self.require_recognized()?;
        if block >= tp.textblocks() {
            return Err(Error::BadArgument(format!("block {block} out of range")));
        }
        Ok(tp.textblock(block).textlines())
    }

    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run.
    pub fn result_chars_total(&self) -> Result<usize> {
        Ok(self.require_recognized()?.characters())
    }

    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run,
    /// or [`Error::BadArgument`] for `block` out of range.
    pub fn result_chars_block(&self, block: usize) -> Result<usize> {
        let tp = self.require_recognized()?;
        if block >= tp.textblocks() {
            return Err(Error::BadArgument(format!("block {block} out of range")));
        }
        Ok(tp.textblock(block).characters())
    }

    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run,
    /// or [`Error::BadArgument`] for `block`/`line` out of range.
    pub fn result_chars_line(&self, block: usize, line: usize) -> Result<usize> {
        let tp = self.require_recognized()?;
        if block >= tp.textblocks() { return Err(Error::BadArgument(format!("block {block} out of range"))); }
        let tb = tp.textblock(block);
        if line >= tb.textlines() { return Err(Error::BadArgument(format!("line {line} out of range"))); }
        Ok(tb.textline(line).characters())
    }

    /// The recognized text of one line, byte-encoded or UTF-8 per
    /// [`Self::set_utf8_format`], with a trailing `'\n'` — matching
    /// `OCRAD_result_line`'s own `text += '\n'`.
    ///
    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run,
    /// or [`Error::BadArgument`] for `block`/`line` out of range.
    pub fn result_line(&self, block: usize, line: usize) -> Result<String> {
        let tp = self.require_recognized()?;
        if block >= tp.textblocks() { return Err(Error::BadArgument(format!("block {block} out of range"))); }
        let tb = tp.textblock(block);
        if line >= tb.textlines() { return Err(Error::BadArgument(format!("line {line} out of range"))); }
        let tl = tb.textline(line);
        let mut text = String::new();
        for i in 0..tl.characters() {
            let c = tl.character(i);
            if self.control.utf8 {
                text.push_str(&c.utf8_result());
            } else {
                text.push(c.byte_result() as char);
            }
        }
        text.push('\n');
        Ok(text)
    }

    /// The first guess's code point of the page's very first character
    /// (byte-mapped unless [`Self::set_utf8_format`] is set), or `0` if
    /// the page has no characters at all — matching
    /// `OCRAD_result_first_character`'s "no error, just zero" behavior.
    ///
    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run.
    pub fn result_first_character(&self) -> Result<i32> {
        let tp = self.require_recognized()?;
        if tp.textblocks() == 0 { return Ok(0); }
        let tb = tp.textblock(0);
        if tb.textlines() == 0 { return Ok(0); }
        let c = tb.textline(0).character(0);
        if c.guesses() == 0 { return Ok(0); }
        let g = c.guess(0);
        Ok(if self.control.utf8 { g.code } else { i32::from(ocrad_classify::ucs::map_to_byte(g.code)) })
    }

    /// Writes the Ocr Results File export for the current recognition
    /// result, mirroring `OCRAD_recognize`'s own `textpage->xprint(...)`
    /// call when an export file is configured.
    ///
    /// # Errors
    /// Returns [`Error::SequenceError`] if [`Self::recognize`] hasn't run.
    pub fn write_orf<W: std::io::Write>(&self, w: &mut W) -> Result<()> {
        let tp = self.require_recognized()?;
        ocrad_io::write_orf(w, tp, self.control.utf8).map_err(|e| Error::InternalInvariant(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrad_core::PixmapMode;

    fn blank_image() -> PageImage {
        PageImage::from_pixmap(10, 10, PixmapMode::Greymap, &[255u8; 100], false).unwrap()
    }

    #[test]
    fn sequence_error_before_image_is_set() {
        let d = Descriptor::new();
        assert!(matches!(d.result_blocks(), Err(Error::SequenceError(_))));
    }

    #[test]
    fn sequence_error_before_recognize() {
        let mut d = Descriptor::new();
        d.set_image(blank_image());
        assert!(matches!(d.result_blocks(), Err(Error::SequenceError(_))));
    }

    #[test]
    fn recognize_then_query_blank_page() {
        let mut d = Descriptor::new();
        d.set_image(blank_image());
        d.recognize(false).unwrap();
        assert_eq!(d.result_blocks().unwrap(), 0);
        assert_eq!(d.result_chars_total().unwrap(), 0);
        assert_eq!(d.result_first_character().unwrap(), 0);
    }

    #[test]
    fn rejects_bad_threshold() {
        let mut d = Descriptor::new();
        d.set_image(blank_image());
        assert!(d.set_threshold(300).is_err());
        assert!(d.set_threshold(-1).is_ok());
    }

    #[test]
    fn rejects_noop_scale_factor() {
        let mut d = Descriptor::new();
        d.set_image(blank_image());
        assert!(d.scale(1).is_err());
        assert!(d.scale(0).is_err());
        assert!(d.scale(2).is_ok());
    }

    #[test]
    fn setting_image_again_clears_recognition() {
        let mut d = Descriptor::new();
        d.set_image(blank_image());
        d.recognize(false).unwrap();
        d.set_image(blank_image());
        assert!(matches!(d.result_blocks(), Err(Error::SequenceError(_))));
    }
}
