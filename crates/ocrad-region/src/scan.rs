//! Connected-component scan: turns a thresholded [`PageImage`] into the
//! list of 4-connected black-pixel blobs it contains, then prunes the
//! blobs that are plainly noise, frame artefacts or embedded pictures
//! rather than glyphs.
//!
//! Grounded on `textpage.cc`'s anonymous-namespace `scan_page` and its
//! `join_blobs`/`ignore_*`/`remove_*_noise` helpers. Multi-zone layout
//! splitting (`analyse_layout`, `Zone`) is a text-block concern and lives
//! alongside `Textpage`, not here; this module always produces one flat
//! list of blobs for its caller to partition.

use crate::blob::Blob;
use ocrad_core::PageImage;

/// Raster-scans `page` for 4-connected runs of black pixels (pixels at or
/// above the page's binarization threshold) and returns one [`Blob`] per
/// component, merging components that turn out to be connected through a
/// pixel visited later in the same row.
pub fn scan_page(page: &PageImage) -> Vec<Blob> {
    let re = *page.rect();
    let width = re.width() as usize;
    let mut blobs: Vec<Option<Blob>> = Vec::new();
    let mut old_data: Vec<Option<usize>> = vec![None; width];
    let mut new_data: Vec<Option<usize>> = vec![None; width];

    for row in re.top()..=re.bottom() {
        std::mem::swap(&mut old_data, &mut new_data);
        for col in re.left()..=re.right() {
            let dcol = (col - re.left()) as usize;
            if !page.get_bit(row, col) {
                new_data[dcol] = None;
                continue;
            }
            let lp = if dcol > 0 { new_data[dcol - 1] } else { None };
            let ltp = if dcol > 0 { old_data[dcol - 1] } else { None };
            let tp = old_data[dcol];
            let rtp = if col < re.right() { old_data[dcol + 1] } else { None };

            let p = if let Some(i) = lp.or(ltp).or(tp).or(rtp) {
                blobs[i].as_mut().unwrap().add_point(row, col);
                i
            } else {
                let mut b = Blob::blank(col, row, col, row).unwrap();
                b.set_bit(row, col, true);
                blobs.push(Some(b));
                blobs.len() - 1
            };
            new_data[dcol] = Some(p);

            if let Some(r) = rtp {
                if r != p {
                    join_blobs(&mut blobs, &mut old_data, &mut new_data, p, r, dcol);
                }
            }
        }
    }

    blobs.into_iter().flatten().collect()
}

/// Merges blob `p2` into `p1` (or vice versa, whichever started higher up
/// the page), rewriting every live reference to the loser in the scan's
/// column-ownership arrays.
fn join_blobs(
    blobs: &mut [Option<Blob>],
    old_data: &mut [Option<usize>],
    new_data: &mut [Option<usize>],
    mut p1: usize,
    mut p2: usize,
    i: usize,
) {
    if blobs[p1].as_ref().unwrap().top() > blobs[p2].as_ref().unwrap().top() {
        std::mem::swap(&mut p1, &mut p2);
        for c in new_data[..=i].iter_mut() {
            if *c == Some(p2) { *c = Some(p1); }
        }
    } else {
        for c in old_data[i..].iter_mut() {
            if *c == Some(p2) { *c = Some(p1); }
        }
    }
    let loser = blobs[p2].take().unwrap();
    blobs[p1].as_mut().unwrap().add_bitmap(loser.bitmap());
}

/// Drops blobs whose aspect ratio is absurd for a glyph (very tall hairline
/// strokes, or very wide rules) before noise/layout filtering runs.
pub fn ignore_abnormal_blobs(blobs: &mut Vec<Blob>) {
    blobs.retain(|b| b.height() <= 35 * b.width() && b.width() <= 25 * b.height());
}

/// Drops blobs too small to be anything but scan noise.
pub fn ignore_small_blobs(blobs: &mut Vec<Blob>) {
    blobs.retain(|b| {
        b.height() > 4
            || b.width() > 4
            || ((b.height() > 2 || b.width() > 2) && b.area() > 5)
    });
}

/// Shaves a single-pixel noise row off the top/bottom edge of tall blobs
/// when that edge is touched by at most one black pixel.
pub fn remove_top_bottom_noise(blobs: &mut [Blob]) {
    for b in blobs.iter_mut() {
        if b.height() < 11 { continue; }
        let top_count = (b.left()..=b.right()).filter(|&col| b.get_bit(b.top(), col)).count();
        if top_count <= 1 { b.set_top(b.top() + 1); }
        let bottom_count = (b.left()..=b.right()).filter(|&col| b.get_bit(b.bottom(), col)).count();
        if bottom_count <= 1 { b.set_bottom(b.bottom() - 1); }
    }
}

/// Mirror of [`remove_top_bottom_noise`] for the left/right edges of wide
/// blobs.
pub fn remove_left_right_noise(blobs: &mut [Blob]) {
    for b in blobs.iter_mut() {
        if b.width() < 6 { continue; }
        let left_count = (b.top()..=b.bottom()).filter(|&row| b.get_bit(row, b.left())).count();
        if left_count <= 1 { b.set_left(b.left() + 1); }
        let right_count = (b.top()..=b.bottom()).filter(|&row| b.get_bit(row, b.right())).count();
        if right_count <= 1 { b.set_right(b.right() - 1); }
    }
}

/// Runs the full noise-pruning sequence used after a page-wide scan, in the
/// order the original applies them: wide-component frames/pictures are the
/// caller's concern (layout-dependent), the rest is blob-local.
pub fn prune_noise(blobs: &mut Vec<Blob>) {
    ignore_small_blobs(blobs);
    ignore_abnormal_blobs(blobs);
    remove_top_bottom_noise(blobs);
    remove_left_right_noise(blobs);
}

/// Drops picture/frame-like blobs that span most of `page_rect`'s width:
/// a thin grid or frame is discarded outright, a photograph absorbs (and
/// discards) every blob it contains, and a full-page picture clears the
/// whole list.
pub fn ignore_wide_blobs(page_rect: &ocrad_core::Rectangle, blobs: &mut Vec<Blob>) {
    let mut i = 0;
    while i < blobs.len() {
        if 2 * blobs[i].width() < page_rect.width() {
            i += 1;
            continue;
        }
        let mut b = blobs.remove(i);
        if 4 * b.area() <= 3 * b.size() {
            let mut heavy = 0;
            for other in blobs.iter().skip(i) {
                if other.rect().top() > b.bottom() { break; }
                if other.size() >= 16 { heavy += 1; }
            }
            if heavy <= b.size() / 400 {
                if 4 * b.area() <= b.size() { continue; }
                b.find_holes();
                let frame = b.holes() < b.height().min(b.width()) as usize
                    && (0..b.holes()).any(|j| {
                        let h = b.hole(j).unwrap();
                        4 * h.size() >= b.size() && 4 * h.area() >= b.size()
                    });
                if frame { continue; }
            }
        }
        if 5 * b.width() > 4 * page_rect.width() && 5 * b.height() > 4 * page_rect.height() {
            blobs.clear();
            break;
        }
        let mut tail = blobs.split_off(i);
        tail.retain(|b2| !b.includes(b2));
        blobs.extend(tail);
    }
}

/// Runs the connected-component scan plus the full noise/frame pruning
/// pipeline, followed by per-blob hole finding, mirroring `scan_page`'s
/// single-zone path (no multi-zone layout split).
pub fn scan_and_filter(page: &PageImage) -> Vec<Blob> {
    let mut blobs = scan_page(page);
    if blobs.len() > 3 {
        ignore_wide_blobs(page.rect(), &mut blobs);
        prune_noise(&mut blobs);
    }
    for b in blobs.iter_mut() { b.find_holes(); }
    blobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrad_core::PixmapMode;

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
    fn scans_two_separate_blobs() {
        let page = page_from_rows(&[
            "##...##",
            "##...##",
            ".......",
            "##...##",
            "##...##",
        ]);
        let blobs = scan_page(&page);
        assert_eq!(blobs.len(), 4);
    }

    #[test]
    fn merges_blob_connected_through_later_column() {
        let page = page_from_rows(&[
            "#.#",
            "###",
            "#.#",
        ]);
        let blobs = scan_page(&page);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area(), 7);
    }

    #[test]
    fn ignore_small_blobs_drops_specks() {
        let mut blobs = vec![Blob::blank(0, 0, 0, 0).unwrap()];
        blobs[0].add_point(0, 0);
        ignore_small_blobs(&mut blobs);
        assert!(blobs.is_empty());
    }
}
