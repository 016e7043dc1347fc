//! Plain-text export: the human-readable counterpart to [`crate::orf`],
//! grounded on the `print` chain (`Textpage`/`Textblock`/`Textline`/
//! `Character::print`) rather than the `xprint` one.
//!
//! Mirrors `Character::print` with [`Character::byte_result`]/
//! [`Character::utf8_result`] (both already fall back to `'_'` for a
//! character with no guesses), `Textline::print`'s trailing newline after
//! each line, and `Textblock::print`'s trailing blank line after each block.

use std::io::{self, Write};

use ocrad_layout::Textpage;

/// Writes every text block's lines, byte-encoded (single-byte charset) when
/// `utf8` is false or UTF-8 when it's true, one line per [`Textline`] and a
/// blank line between blocks.
pub fn write_text<W: Write>(w: &mut W, page: &Textpage, utf8: bool) -> io::Result<()> {
    for bi in 0..page.textblocks() {
        let block = page.textblock(bi);
        for li in 0..block.textlines() {
            let line = block.textline(li);
            for ci in 0..line.characters() {
                let c = line.character(ci);
                if utf8 {
                    write!(w, "{}", c.utf8_result())?;
                } else {
                    w.write_all(&[c.byte_result()])?;
                }
            }
            writeln!(w)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrad_core::{Charset, Filter, PageImage, PixmapMode};

    fn page_from_rows(rows: &[&str]) -> PageImage {
        let h = rows.len();
        let w = rows[0].len();
        let mut pixels = Vec::with_capacity(w * h);
        for row in rows {
            for ch in row.chars() {
                pixels.push(if ch == '#' { 0u8 } else { 255u8 });
            }
        }
        PageImage::from_pixmap(w as i32, h as i32, PixmapMode::Greymap, &pixels, false).unwrap()
    }

    #[test]
    fn empty_page_writes_nothing() {
        let page = page_from_rows(&["....", "....", "....", "...."]);
        let mut tp = Textpage::new(&page, "blank.pbm", false);
        tp.recognize(&Charset::default(), &Filter::default());
        let mut buf = Vec::new();
        write_text(&mut buf, &tp, false).unwrap();
        assert!(buf.is_empty());
    }
}
