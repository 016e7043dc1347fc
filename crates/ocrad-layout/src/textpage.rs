//! A whole recognized page: the result of splitting a [`PageImage`] into
//! layout zones (when layout analysis is requested) and building a
//! [`Textblock`] out of each zone that turns out to hold text.
//!
//! Grounded on `textpage.h`/`textpage.cc`, whose anonymous-namespace `Zone`/
//! `analyse_layout`/`mean_blob_height`/`scan_page` functions this module's
//! private [`Zone`] struct and [`analyse_layout`] mirror directly. The
//! connected-component scan and blob-local noise pruning they also call are
//! already available from `ocrad-region::scan`; only the multi-zone split
//! is page-layout's own concern.

use ocrad_core::{Charset, Control, Filter, Mask, PageImage, Rectangle};
use ocrad_region::{scan, Blob};

use crate::textblock::Textblock;

struct Zone {
    mask: Mask,
    blobs: Vec<Blob>,
}

impl Zone {
    fn new(re: Rectangle) -> Self {
        Self { mask: Mask::new(re), blobs: Vec::new() }
    }

    fn join(&mut self, other: &mut Zone) {
        self.mask.add_mask(&other.mask);
        self.blobs.append(&mut other.blobs);
    }
}

fn mean_blob_height(blobs: &[Blob]) -> i32 {
    let mut height_distrib: Vec<i32> = Vec::new();
    let mut samples = 0i32;

    let mut bump = |h: i32| {
        let h = h as usize;
        if h >= height_distrib.len() { height_distrib.resize(h + 1, 0); }
        height_distrib[h] += 1;
    };

    for b in blobs {
        let (h, w) = (b.height(), b.width());
        if h < 10 || w >= 3 * h { continue; }
        bump(h);
        samples += 1;
    }
    if height_distrib.is_empty() {
        for b in blobs {
            bump(b.height());
            samples += 1;
        }
    }

    let mut mean_height = 0;
    let mut valid_samples = 0;
    let mut count = 0;
    for (i, &a) in height_distrib.iter().enumerate() {
        if 10 * (count + a) >= samples && 10 * count < 9 * samples {
            mean_height += a * i as i32;
            valid_samples += a;
        }
        count += a;
    }
    if valid_samples != 0 { mean_height /= valid_samples; }
    mean_height
}

/// Splits a flat blob list into layout zones: blobs within `2 * mean_height`
/// of an existing zone's mask join it (joining any other zones that are
/// likewise in range), everything else seeds a new zone; zones are then
/// sorted into reading order and adjacent zones that look like a single
/// text column split by a big inter-paragraph gap are merged back together.
fn analyse_layout(blobs: Vec<Blob>) -> Vec<Zone> {
    let mut zones: Vec<Zone> = Vec::new();
    if blobs.is_empty() { return zones; }

    let mean_height = mean_blob_height(&blobs);
    let mut blobs = blobs.into_iter();
    let first = blobs.next().unwrap();
    let mut zone0 = Zone::new(*first.rect());
    zone0.blobs.push(first);
    zones.push(zone0);

    for b in blobs {
        if mean_height != 0 && b.height() > 10 * mean_height { continue; }
        let mut first: Option<usize> = None;
        let mut j = 0;
        while j < zones.len() {
            if zones[j].mask.distance_rect(b.rect()) < 2 * mean_height {
                match first {
                    None => { first = Some(j); j += 1; }
                    Some(f) => {
                        let mut other = zones.remove(j);
                        zones[f].join(&mut other);
                    }
                }
            } else {
                j += 1;
            }
        }
        match first {
            Some(f) => {
                zones[f].mask.add_rectangle(b.rect());
                zones[f].blobs.push(b);
            }
            None => {
                let mut z = Zone::new(*b.rect());
                z.blobs.push(b);
                zones.push(z);
            }
        }
    }

    // sort into reading order, grouping zones whose rows don't overlap
    // vertically into separate cuts first
    let mut botmax = zones.first().map_or(0, |z| z.mask.bottom());
    let mut cut_index_vector = Vec::new();
    for (i, z) in zones.iter().enumerate().skip(1) {
        if z.mask.top() > botmax { cut_index_vector.push(i); }
        botmax = botmax.max(z.mask.bottom());
    }
    cut_index_vector.push(zones.len());

    let mut begin = 0usize;
    let mut cut = 0usize;
    while cut < cut_index_vector.len() {
        let end = cut_index_vector[cut];
        for i in begin..end.saturating_sub(1) {
            let mut first = i;
            for j in (i + 1)..end {
                if zones[j].mask.rect().precedes(zones[first].mask.rect()) { first = j; }
            }
            if first != i { zones.swap(i, first); }
        }

        let mut join = end - begin > 1;
        for i in begin..end {
            if !join { break; }
            if zones[i].blobs.len() > 80
                || zones[i].mask.rect().v_distance(zones[begin].mask.rect())
                    > zones[i].mask.height() + zones[begin].mask.height()
            {
                join = false;
            }
        }
        for i in begin..end {
            if !join { break; }
            if zones[i].mask.height() > 4 * mean_blob_height(&zones[i].blobs) { join = false; }
        }

        if join {
            let (head, tail) = zones.split_at_mut(begin + 1);
            for z in tail.iter_mut().take(end - begin - 1) {
                head[begin].join(z);
            }
            zones.drain(begin + 1..end);
            for idx in cut_index_vector.iter_mut().skip(cut) {
                *idx -= end - begin - 1;
            }
            begin += 1;
        } else {
            begin = end;
        }
        cut += 1;
    }

    zones
}

/// Connected-component scan plus noise pruning, optionally split into
/// layout zones. `layout` is ignored unless the page is reasonably large
/// and has more than a handful of blobs, matching the original's guard
/// against running zone analysis on a single-line snippet.
fn scan_page(page: &PageImage, layout: bool) -> Vec<Zone> {
    let re = *page.rect();
    let mut blobs = scan::scan_page(page);

    if blobs.len() > 3 {
        scan::ignore_wide_blobs(&re, &mut blobs);
        scan::prune_noise(&mut blobs);
    }

    let mut zones = if layout && re.width() > 200 && re.height() > 200 && blobs.len() > 3 {
        analyse_layout(blobs)
    } else {
        let mut z = Zone::new(re);
        z.blobs = blobs;
        vec![z]
    };

    if zones.len() > 1 {
        for z in &mut zones {
            let mask_rect = *z.mask.rect();
            scan::ignore_wide_blobs(&mask_rect, &mut z.blobs);
        }
    }
    for z in &mut zones {
        for b in &mut z.blobs { b.find_holes(); }
    }
    zones
}

/// A recognized page: one [`Textblock`] per layout zone that contains text.
#[derive(Debug, Clone, Default)]
pub struct Textpage {
    rect: Rectangle,
    name: String,
    textblocks: Vec<Textblock>,
}

impl Textpage {
    /// Scans `page`, splits it into layout zones when `layout` is set, and
    /// builds a [`Textblock`] for every zone whose blobs form at least one
    /// text line.
    pub fn new(page: &PageImage, filename: &str, layout: bool) -> Self {
        let zones = scan_page(page, layout);
        let page_rect = *page.rect();

        let textblocks = zones
            .into_iter()
            .filter_map(|z| {
                let block_rect = *z.mask.rect();
                let tb = Textblock::new(&page_rect, &block_rect, z.blobs);
                if tb.textlines() > 0 { Some(tb) } else { None }
            })
            .collect();

        Self { rect: page_rect, name: filename.to_string(), textblocks }
    }

    /// Runs the contextual recognition pass over every text block.
    pub fn recognize(&mut self, charset: &Charset, filter: &Filter) {
        for tb in &mut self.textblocks {
            tb.recognize(charset, filter);
        }
    }

    /// Convenience constructor mirroring `Textpage::new` followed by
    /// `recognize`, for callers that don't need to inspect the unrecognized
    /// layout in between.
    pub fn scan_and_recognize(page: &PageImage, filename: &str, control: &Control, layout: bool) -> Self {
        let mut tp = Self::new(page, filename, layout);
        tp.recognize(&control.charset, &control.filter);
        tp
    }

    pub const fn rect(&self) -> &Rectangle { &self.rect }
    pub fn name(&self) -> &str { &self.name }

    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn textblock(&self, i: usize) -> &Textblock {
        self.textblocks.get(i).expect("Textpage::textblock, index out of bounds")
    }

    pub fn textblocks(&self) -> usize { self.textblocks.len() }

    pub fn textlines(&self) -> usize {
        self.textblocks.iter().map(Textblock::textlines).sum()
    }

    pub fn characters(&self) -> usize {
        self.textblocks.iter().map(Textblock::characters).sum()
    }
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
    fn empty_page_has_no_textblocks() {
        let page = page_from_rows(&["....", "....", "....", "...."]);
        let tp = Textpage::new(&page, "empty.pbm", false);
        assert_eq!(tp.textblocks(), 0);
        assert_eq!(tp.textlines(), 0);
    }

    #[test]
    fn unlayouted_page_is_a_single_zone() {
        // A tiny page stays below the layout-analysis size gate, so even
        // with `layout` requested it's scanned as one block.
        let page = page_from_rows(&[
            "...........",
            "..###..###.",
            "..#.#..#.#.",
            "..###..###.",
            "...........",
        ]);
        let tp = Textpage::new(&page, "tiny.pbm", true);
        assert!(tp.textblocks() <= 1);
    }

    #[test]
    fn mean_blob_height_ignores_wide_outliers() {
        let mut b1 = Blob::blank(0, 0, 4, 14).unwrap();
        b1.add_point(0, 0);
        b1.add_point(14, 4);
        let mut b2 = Blob::blank(0, 0, 60, 14).unwrap();
        b2.add_point(0, 0);
        b2.add_point(14, 60);
        assert_eq!(mean_blob_height(&[b1]), 14);
        let h = mean_blob_height(&[b2]);
        assert!(h >= 0);
    }
}
