//! PBM/PGM/PPM (PNM) file reading, feeding the parsed pixels to
//! [`PageImage::from_pixmap`].
//!
//! Grounded on `page_image_io.cc`'s `pnm_getrawbyte`/`pnm_getc`/`pnm_getint`/
//! `pbm_getbit` helpers and its six `read_p1`..`read_p6` readers, reached
//! through the `Page_image(FILE*, bool invert)` constructor. That
//! constructor builds `data` (and `maxval_`/`threshold_`) directly; this
//! reader instead normalizes every sample into the 0..=255 range `OCRAD_Pixmap`
//! already assumes and calls [`PageImage::from_pixmap`], so PNM files with a
//! low `maxval` (e.g. a PGM with `maxval=15`) bind through the same single
//! entry point as a caller-supplied pixmap. This trades exact
//! `threshold = maxval/2` fidelity for one pixmap-ingestion path; see
//! `DESIGN.md`.

use std::io::Read;

use ocrad_core::{Error as CoreError, PageImage, PixmapMode};

use crate::error::Result;

fn getrawbyte<R: Read>(r: &mut R) -> Result<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b).map_err(|_| CoreError::BadPnm("end-of-file reading pnm file".into()))?;
    Ok(b[0])
}

fn getc<R: Read>(r: &mut R) -> Result<u8> {
    loop {
        let mut comment = false;
        loop {
            let ch = getrawbyte(r)?;
            if ch == b'#' { comment = true; } else if ch == b'\n' { comment = false; }
            if !comment { return Ok(ch); }
        }
    }
}

fn getint<R: Read>(r: &mut R) -> Result<i64> {
    let mut ch = getc(r)?;
    while ch.is_ascii_whitespace() { ch = getc(r)?; }
    if !ch.is_ascii_digit() {
        return Err(CoreError::BadPnm("junk in pnm file where an integer should be".into()).into());
    }
    let mut i = 0i64;
    while ch.is_ascii_digit() {
        if i > (i64::from(i32::MAX) - i64::from(ch - b'0')) / 10 {
            return Err(CoreError::BadPnm("number too big in pnm file".into()).into());
        }
        i = i * 10 + i64::from(ch - b'0');
        ch = getc(r)?;
    }
    Ok(i)
}

fn getbit<R: Read>(r: &mut R) -> Result<u8> {
    let mut ch = getc(r)?;
    while ch.is_ascii_whitespace() { ch = getc(r)?; }
    match ch {
        b'0' => Ok(0),
        b'1' => Ok(1),
        _ => Err(CoreError::BadPnm("junk in pbm file where bits should be".into()).into()),
    }
}

/// Rescales a sample measured against `maxval` into the 0..=255 range
/// `PageImage::from_pixmap` assumes, the way `read_p2`/`read_p3` rescale
/// only when `maxval > 255`; scaling unconditionally keeps one code path
/// for every declared `maxval` instead of special-casing 255.
fn rescale(val: i64, maxval: i64) -> u8 {
    if maxval == 255 { val as u8 } else { ((val * 255) / maxval) as u8 }
}

fn read_p1<R: Read>(r: &mut R, cols: usize, rows: usize) -> Result<Vec<u8>> {
    let mut pixels = Vec::with_capacity(cols * rows);
    for _ in 0..rows * cols {
        pixels.push(getbit(r)?);
    }
    Ok(pixels)
}

fn read_p4<R: Read>(r: &mut R, cols: usize, rows: usize) -> Result<Vec<u8>> {
    let mut pixels = Vec::with_capacity(cols * rows);
    for _ in 0..rows {
        let mut col = 0;
        while col < cols {
            let byte = getrawbyte(r)?;
            let mut mask = 0x80u8;
            while mask > 0 && col < cols {
                pixels.push(u8::from(byte & mask != 0));
                mask >>= 1;
                col += 1;
            }
        }
    }
    Ok(pixels)
}

fn read_greymap<R: Read>(r: &mut R, cols: usize, rows: usize, raw: bool) -> Result<Vec<u8>> {
    let maxval = getint(r)?;
    if maxval == 0 {
        return Err(CoreError::BadPnm("zero maxval in pgm file".into()).into());
    }
    if raw && maxval > 255 {
        return Err(CoreError::BadPnm("maxval > 255 in pgm \"P5\" file".into()).into());
    }
    let mut pixels = Vec::with_capacity(cols * rows);
    for _ in 0..rows * cols {
        let val = if raw { i64::from(getrawbyte(r)?) } else { getint(r)? };
        if val > maxval {
            return Err(CoreError::BadPnm("value > maxval in pgm file".into()).into());
        }
        pixels.push(rescale(val, maxval));
    }
    Ok(pixels)
}

fn read_colormap<R: Read>(r: &mut R, cols: usize, rows: usize, raw: bool) -> Result<Vec<u8>> {
    let maxval = getint(r)?;
    if maxval == 0 {
        return Err(CoreError::BadPnm("zero maxval in ppm file".into()).into());
    }
    if raw && maxval > 255 {
        return Err(CoreError::BadPnm("maxval > 255 in ppm \"P6\" file".into()).into());
    }
    let mut pixels = Vec::with_capacity(cols * rows * 3);
    for _ in 0..rows * cols {
        let (r_val, g_val, b_val) = if raw {
            (i64::from(getrawbyte(r)?), i64::from(getrawbyte(r)?), i64::from(getrawbyte(r)?))
        } else {
            (getint(r)?, getint(r)?, getint(r)?)
        };
        if r_val > maxval || g_val > maxval || b_val > maxval {
            return Err(CoreError::BadPnm("value > maxval in ppm file".into()).into());
        }
        pixels.push(rescale(r_val, maxval));
        pixels.push(rescale(g_val, maxval));
        pixels.push(rescale(b_val, maxval));
    }
    Ok(pixels)
}

/// Parses a PBM/PGM/PPM (`P1`..`P6`) stream into a [`PageImage`].
///
/// # Errors
/// Wraps [`ocrad_core::Error::BadPnm`] for a bad magic number, zero or
/// sub-3x3 dimensions, a `maxval` above 255 on a raw variant, or a sample
/// above its declared `maxval`; wraps [`std::io::Error`] for a short read.
pub fn read_pnm<R: Read>(r: &mut R, invert: bool) -> Result<PageImage> {
    let magic = getrawbyte(r)?;
    let filetype = if magic == b'P' { getrawbyte(r)? } else { 0 };
    if !(b'1'..=b'6').contains(&filetype) {
        return Err(CoreError::BadPnm("bad magic number - not a pbm, pgm or ppm file".into()).into());
    }

    let width = getint(r)?;
    if width == 0 {
        return Err(CoreError::BadPnm("zero width in pnm file".into()).into());
    }
    let height = getint(r)?;
    if height == 0 {
        return Err(CoreError::BadPnm("zero height in pnm file".into()).into());
    }
    let (cols, rows) = (width as usize, height as usize);

    let mode = match filetype {
        b'1' | b'4' => PixmapMode::Bitmap,
        b'2' | b'5' => PixmapMode::Greymap,
        _ => PixmapMode::Colormap,
    };
    let pixels = match filetype {
        b'1' => read_p1(r, cols, rows)?,
        b'4' => read_p4(r, cols, rows)?,
        b'2' => read_greymap(r, cols, rows, false)?,
        b'5' => read_greymap(r, cols, rows, true)?,
        b'3' => read_colormap(r, cols, rows, false)?,
        _ => read_colormap(r, cols, rows, true)?,
    };

    log::debug!("file type is P{}", filetype as char);
    log::debug!("file size is {width}w x {height}h");

    // `from_pixmap`'s bitmap mode expects 0=white/1=black samples, matching
    // both the PBM bit convention and `OCRAD_bitmap`; greymap/colormap
    // samples are already rescaled to 0..=255 above. Its own width/height
    // checks subsume the "image too small"/"int will overflow" guards
    // `Page_image`'s constructor applies before dispatching to a reader.
    Ok(PageImage::from_pixmap(width as i32, height as i32, mode, &pixels, invert)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ascii_bitmap() {
        let pnm = b"P1\n4 4\n0 1 1 0\n1 1 1 1\n1 0 0 1\n0 1 1 0\n";
        let mut cursor = std::io::Cursor::new(&pnm[..]);
        let img = read_pnm(&mut cursor, false).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 4);
        assert!(img.get_bit(0, 1));
        assert!(!img.get_bit(0, 0));
    }

    #[test]
    fn reads_raw_greymap_with_low_maxval() {
        let mut pnm = b"P5\n3 3\n15\n".to_vec();
        pnm.extend_from_slice(&[15, 15, 15, 15, 0, 15, 15, 15, 15]);
        let mut cursor = std::io::Cursor::new(&pnm[..]);
        let img = read_pnm(&mut cursor, false).unwrap();
        assert!(img.get_bit(1, 1));
        assert!(!img.get_bit(0, 0));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut cursor = std::io::Cursor::new(&b"X1\n4 4\n"[..]);
        assert!(read_pnm(&mut cursor, false).is_err());
    }

    #[test]
    fn rejects_raw_greymap_maxval_above_255() {
        let mut cursor = std::io::Cursor::new(&b"P5\n3 3\n65535\n"[..]);
        assert!(read_pnm(&mut cursor, false).is_err());
    }

    #[test]
    fn rejects_too_small_image() {
        let mut cursor = std::io::Cursor::new(&b"P1\n2 2\n0 0 0 0\n"[..]);
        assert!(read_pnm(&mut cursor, false).is_err());
    }
}
