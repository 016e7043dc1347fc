//! Ocr Results File (ORF) export: the machine-readable per-character dump
//! the original calls through `Textpage::xprint`/`Textblock::xprint`/
//! `Textline::xprint`/`Character::xprint`. Plain-text output lives in
//! [`crate::text`] instead, grounded on the parallel `print` chain.

use std::io::{self, Write};

use ocrad_classify::ucs;
use ocrad_classify::Character;
use ocrad_layout::{Textblock, Textline, Textpage};

/// Writes the `"# Ocr Results File..."` header line, mirroring `main.cc`'s
/// own `std::fprintf` just before it calls `Textpage::xprint`.
pub fn write_header<W: Write>(w: &mut W, program: &str, version: &str) -> io::Result<()> {
    writeln!(w, "# Ocr Results File. Created by {program} version {version}")
}

/// Writes one ORF per-character line: `left top width height; guesses`,
/// one `, '<ch>'<value>` per guess. Mirrors `Character::xprint` exactly,
/// including its `'_'` fallback for a guess whose code maps to no byte.
fn write_character<W: Write>(w: &mut W, c: &Character, utf8: bool) -> io::Result<()> {
    write!(
        w,
        "{:3} {:3} {:2} {:2}; {}",
        c.left(),
        c.top(),
        c.width(),
        c.height(),
        c.guesses()
    )?;
    for i in 0..c.guesses() {
        let g = c.guess(i);
        if utf8 {
            write!(w, ", '{}'{}", ucs::ucs_to_utf8(g.code), g.value)?;
        } else {
            let mut ch = ucs::map_to_byte(g.code);
            if ch == 0 { ch = b'_'; }
            write!(w, ", '{}'{}", ch as char, g.value)?;
        }
    }
    writeln!(w)
}

/// Mirrors `Textline::xprint`: no line-level header, just each character's
/// ORF line in order.
fn write_textline<W: Write>(w: &mut W, line: &Textline, utf8: bool) -> io::Result<()> {
    for i in 0..line.characters() {
        write_character(w, line.character(i), utf8)?;
    }
    Ok(())
}

/// Mirrors `Textblock::xprint`: `"lines %d\n"` then, per line,
/// `"line %d chars %d height %d\n"` followed by that line's characters.
fn write_textblock<W: Write>(w: &mut W, block: &Textblock, utf8: bool) -> io::Result<()> {
    writeln!(w, "lines {}", block.textlines())?;
    for i in 0..block.textlines() {
        let line = block.textline(i);
        writeln!(w, "line {} chars {} height {}", i + 1, line.characters(), line.mean_height())?;
        write_textline(w, line, utf8)?;
    }
    Ok(())
}

/// Mirrors `Textpage::xprint`: `"source file %s\n"`, `"total text blocks
/// %d\n"`, then per block `"text block %d %d %d %d %d\n"` (1-indexed index,
/// left, top, width, height) followed by that block's `Textblock::xprint`.
pub fn write_orf<W: Write>(w: &mut W, page: &Textpage, utf8: bool) -> io::Result<()> {
    writeln!(w, "source file {}", page.name())?;
    writeln!(w, "total text blocks {}", page.textblocks())?;
    for i in 0..page.textblocks() {
        let block = page.textblock(i);
        let r = block.rect();
        writeln!(w, "text block {} {} {} {} {}", i + 1, r.left(), r.top(), r.width(), r.height())?;
        write_textblock(w, block, utf8)?;
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
    fn writes_header_with_program_and_version() {
        let mut buf = Vec::new();
        write_header(&mut buf, "ocrad", "0.1.0").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "# Ocr Results File. Created by ocrad version 0.1.0\n");
    }

    #[test]
    fn empty_page_still_writes_the_two_header_lines() {
        let page = page_from_rows(&["....", "....", "....", "...."]);
        let mut tp = Textpage::new(&page, "blank.pbm", false);
        tp.recognize(&Charset::default(), &Filter::default());
        let mut buf = Vec::new();
        write_orf(&mut buf, &tp, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("source file blank.pbm\n"));
        assert!(text.contains("total text blocks 0\n"));
    }
}
