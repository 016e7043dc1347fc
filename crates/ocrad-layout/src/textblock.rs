//! A page region's blobs grouped into baseline-tracked text lines.
//!
//! Grounded on `textblock.h`/`textblock.cc`.

use ocrad_classify::Character;
use ocrad_core::{similar, Charset, Filter, Rectangle};
use ocrad_region::Blob;

use crate::textline::Textline;

fn join_characters(tlpv: &mut [Textline]) {
    for line in tlpv.iter_mut() {
        let mut i = 0;
        while i + 1 < line.characters() {
            let mut joined = false;
            let mut j = i + 1;
            while j < line.characters() {
                if line.character(i).h_overlaps(line.character(j)) {
                    let (cup, cdn) = if line.character(i).vcenter() < line.character(j).vcenter() {
                        (i, j)
                    } else {
                        (j, i)
                    };
                    let merge = line.character(cdn).includes_hcenter(line.character(cup))
                        || line.character(cup).includes_hcenter(line.character(cdn))
                        || (line.character(cdn).top() > line.character(cup).bottom()
                            && line.character(cdn).hcenter() < line.character(cup).hcenter())
                        || (line.character(cdn).blobs() == 2
                            && 2 * line.character(cdn).blob(0).size() < line.character(cdn).blob(1).size()
                            && line.character(cdn).blob(0).rect().includes_vcenter(line.character(cup).rect()));
                    if merge {
                        let k = if 64 * line.character(i).size() < line.character(j).main_blob().size() {
                            i
                        } else if 64 * line.character(j).size() < line.character(i).main_blob().size() {
                            j
                        } else if cdn == j {
                            let mut c1 = line.character(i).clone();
                            line.character_mut(j).join(&mut c1);
                            i
                        } else {
                            let mut c2 = line.character(j).clone();
                            line.character_mut(i).join(&mut c2);
                            j
                        };
                        line.delete_character(k);
                        joined = true;
                        break;
                    }
                }
                j += 1;
            }
            if !joined { i += 1; }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Textblock {
    rect: Rectangle,
    textlines: Vec<Textline>,
}

impl Textblock {
    /// Classifies `blobs` by height into normal/tall/short buckets, runs
    /// proximity-based line assembly on the normal bucket, then folds the
    /// tall (ascenders, big initials) and short (accents, punctuation)
    /// buckets back in, and finally trims clipped/noise lines.
    pub fn new(page: &Rectangle, block: &Rectangle, blobs: Vec<Blob>) -> Self {
        let mut pending = Vec::new();
        let mut pending_tall = Vec::new();
        let mut pending_short = Vec::new();

        let mut begin = 0usize;
        let mut end = 0usize;
        while end < blobs.len() {
            begin = end;
            let mut botmax = blobs[begin].bottom();
            end += 1;
            while end < blobs.len() {
                if blobs[end].top() > botmax { break; }
                botmax = botmax.max(blobs[end].bottom());
                end += 1;
            }

            let mut height_distrib: Vec<i32> = Vec::new();
            let mut samples = 0i32;
            let mut any_normal = false;
            for b in &blobs[begin..end] {
                if b.is_abnormal() { continue; }
                any_normal = true;
                let h = b.height() as usize;
                if h >= height_distrib.len() { height_distrib.resize(h + 1, 0); }
                height_distrib[h] += 1;
                samples += 1;
            }
            if !any_normal {
                for b in &blobs[begin..end] {
                    let h = b.height() as usize;
                    if h >= height_distrib.len() { height_distrib.resize(h + 1, 0); }
                    height_distrib[h] += 1;
                    samples += 1;
                }
            }

            let mut mean_height = 0i32;
            let mut valid_samples = 0i32;
            let mut count = 0i32;
            for (i, &a) in height_distrib.iter().enumerate() {
                if 10 * (count + a) >= samples && 10 * count < 9 * samples {
                    mean_height += a * i as i32;
                    valid_samples += a;
                }
                count += a;
            }
            if valid_samples != 0 { mean_height /= valid_samples; }

            for idx in begin..end {
                let b = &blobs[idx];
                let a = b.is_abnormal();
                if b.height() >= 2 * mean_height || (a && b.height() > mean_height) {
                    pending_tall.push(idx);
                } else if 2 * b.height() <= mean_height || b.height() <= 5 || (a && b.height() < mean_height) {
                    pending_short.push(idx);
                } else {
                    pending.push(idx);
                }
            }
        }

        if pending.is_empty() {
            return Self { rect: *block, textlines: Vec::new() };
        }

        // Pull out the blobs by index, consuming `blobs`.
        let mut blob_slots: Vec<Option<Blob>> = blobs.into_iter().map(Some).collect();
        let take = |slots: &mut Vec<Option<Blob>>, idx: usize| slots[idx].take().expect("blob already taken");

        let mut tlpv: Vec<Textline> = vec![Textline::new()];
        let min_line = 0usize;
        let mut current_line;
        {
            let first = take(&mut blob_slots, pending[0]);
            tlpv[0].shift_characterp(Character::from_blob(first), false);
            current_line = 0;
        }
        for &idx in &pending[1..] {
            let b = take(&mut blob_slots, idx);
            current_line = min_line.max(current_line.saturating_sub(2));
            loop {
                let mut cl: Option<usize> = None;
                let mut cr: Option<usize> = None;
                let mut j = tlpv[current_line].characters();
                while j > 0 {
                    j -= 1;
                    let cj = tlpv[current_line].character(j);
                    if !b.rect().includes_hcenter(cj.rect()) && !cj.rect().includes_hcenter(b.rect()) {
                        if b.rect().h_precedes(cj.rect()) { cr = Some(j); } else { cl = Some(j); break; }
                    }
                }
                let cl_c = cl.map(|j| tlpv[current_line].character(j));
                let cr_c = cr.map(|j| tlpv[current_line].character(j));
                let centered = cl_c.is_some_and(|c| c.rect().includes_vcenter(b.rect()) || b.rect().includes_vcenter(c.rect()))
                    || cr_c.is_some_and(|c| c.rect().includes_vcenter(b.rect()) || b.rect().includes_vcenter(c.rect()));
                if centered {
                    tlpv[current_line].shift_characterp(Character::from_blob(b), false);
                    break;
                } else if cl_c.is_some_and(|c| c.top() > b.bottom()) || cr_c.is_some_and(|c| c.top() > b.bottom()) {
                    tlpv.insert(current_line, Textline::new());
                    tlpv[current_line].shift_characterp(Character::from_blob(b), false);
                    break;
                } else if cl_c.is_some_and(|c| b.rect().v_overlap_percent(c.rect()) > 5)
                    || cr_c.is_some_and(|c| b.rect().v_overlap_percent(c.rect()) > 5)
                {
                    tlpv[current_line].shift_characterp(Character::from_blob(b), false);
                    break;
                } else {
                    current_line += 1;
                    if current_line >= tlpv.len() {
                        tlpv.push(Textline::new());
                        current_line = tlpv.len() - 1;
                        tlpv[current_line].shift_characterp(Character::from_blob(b), false);
                        break;
                    }
                }
            }
        }

        let mut i = tlpv.len();
        while i > 0 {
            i -= 1;
            if tlpv[i].characters() == 0 { tlpv.remove(i); }
        }

        join_characters(&mut tlpv);

        for line in &mut tlpv { line.set_track(); }

        // Insert tall blobs: ascenders and big initials.
        let mut current_line = 0usize;
        for &idx in &pending_tall {
            let Some(b) = blob_slots[idx].take() else { continue };
            while current_line > 0 && b.bottom() < tlpv[current_line].vcenter(b.hcenter()) { current_line -= 1; }
            while current_line < tlpv.len() && b.top() > tlpv[current_line].vcenter(b.hcenter()) { current_line += 1; }
            if current_line >= tlpv.len() {
                current_line = tlpv.len().saturating_sub(1);
                continue;
            }
            let bi = tlpv[current_line].big_initials();
            let mh = tlpv[current_line].mean_height();
            if b.height() <= 3 * mh && (b.height() <= 2 * mh || tlpv[current_line].character(bi).left() < b.left()) {
                tlpv[current_line].shift_characterp(Character::from_blob(b), false);
            } else if tlpv[current_line].characters() == 0
                || tlpv[current_line].character(bi.saturating_add(1).min(tlpv[current_line].characters() - 1)).left() > b.hcenter()
            {
                tlpv[current_line].shift_characterp(Character::from_blob(b), true);
            }
        }

        // Insert short blobs: accents and punctuation.
        let mut current_line = 0usize;
        for &idx in &pending_short {
            let Some(b) = blob_slots[idx].take() else { continue };
            while current_line > 0 && b.bottom() < tlpv[current_line].top(b.hcenter()) { current_line -= 1; }
            let mut temp = current_line.saturating_sub(1);
            while current_line < tlpv.len() && b.top() > tlpv[current_line].bottom(b.hcenter()) { current_line += 1; }
            if current_line >= tlpv.len() {
                current_line = tlpv.len() - 1;
                let l = &tlpv[current_line];
                let p = l.character_at(b.hcenter());
                let half = l.height() / 2;
                if b.top() > l.bottom(b.hcenter()) + half && p.is_none_or(|p| b.top() > p.bottom() + half) {
                    continue;
                }
                temp = current_line;
            }
            if current_line as i32 - temp as i32 > 1 { temp = current_line - 1; }
            if current_line != temp
                && 2 * (b.top() - tlpv[temp].bottom(b.hcenter())) < tlpv[current_line].top(b.hcenter()) - b.bottom()
            {
                current_line = temp;
            }
            tlpv[current_line].shift_characterp(Character::from_blob(b), false);
        }

        // Remove clipped lines at top or bottom of the page.
        if tlpv.len() > 2 {
            let last = tlpv.len() - 1;
            let mut c = 0;
            let mut drop_last = false;
            for i in 0..tlpv[last].characters() {
                if tlpv[last].character(i).bottom() >= page.bottom() {
                    c += 1;
                    if 2 * c >= tlpv[last].characters() as i32 { drop_last = true; break; }
                }
            }
            if drop_last { tlpv.remove(last); }

            if !tlpv.is_empty() {
                let t = page.top().max(1);
                let mut c = 0;
                let mut drop_first = false;
                for i in 0..tlpv[0].characters() {
                    if tlpv[0].character(i).top() <= t {
                        c += 1;
                        if 2 * c >= tlpv[0].characters() as i32 { drop_first = true; break; }
                    }
                }
                if drop_first { tlpv.remove(0); }
            }
        }

        // Second pass: join lines of i-dots and tildes back into the body line below.
        let mut current_line = 0usize;
        while current_line + 1 < tlpv.len() {
            let mut joined = false;
            if tlpv[current_line].characters() <= 2 * tlpv[current_line + 1].characters()
                && 2 * tlpv[current_line].mean_height() < tlpv[current_line + 1].mean_height()
            {
                'outer: for i1 in 0..tlpv[current_line].characters() {
                    if 2 * tlpv[current_line].character(i1).height() >= tlpv[current_line + 1].mean_height() { continue; }
                    let c1 = tlpv[current_line].character(i1).clone();
                    for i2 in 0..tlpv[current_line + 1].characters() {
                        let c2 = tlpv[current_line + 1].character(i2);
                        if c2.right() < c1.left() { continue; }
                        if c2.left() > c1.right() { break; }
                        if (c2.includes_hcenter(&c1) || c1.includes_hcenter(c2))
                            && c2.top() - c1.bottom() < tlpv[current_line + 1].mean_height()
                        {
                            let mut line1 = tlpv.remove(current_line);
                            tlpv[current_line].join(&mut line1);
                            joined = true;
                            break 'outer;
                        }
                    }
                }
            }
            if !joined { current_line += 1; }
        }

        join_characters(&mut tlpv);
        for line in &mut tlpv { line.verify_big_initials(); }

        // Fourth pass: drop sparse noise lines sandwiched between two similar-height lines.
        if tlpv.len() >= 3 {
            let mut i = 0;
            while i + 2 < tlpv.len() {
                let (h1, c1, h3, c3) = (tlpv[i].height(), tlpv[i].characters(), tlpv[i + 2].height(), tlpv[i + 2].characters());
                let (h2, c2) = (tlpv[i + 1].height(), tlpv[i + 1].characters());
                if c2 <= 2 && c1 >= 4 && c3 >= 4 && similar(h1, h3, 10, 1) && 8 * h2 <= h1 + h3 {
                    tlpv.remove(i + 1);
                }
                i += 1;
            }
        }

        // Remove leading and trailing noise characters (isolated specks far from their neighbor).
        for line in &mut tlpv {
            if line.big_initials() == 0 && line.characters() > 2 {
                let (c0, c1, c2) = (line.character(0).clone(), line.character(1).clone(), line.character(2).clone());
                if c0.blobs() == 1
                    && 4 * c0.size() < c1.size()
                    && c1.left() - c0.right() > 2 * line.height()
                    && 4 * c0.size() < c2.size()
                    && c2.left() - c1.right() < line.height()
                {
                    line.delete_character(0);
                }
            }
            if line.characters() > 2 {
                let n = line.characters();
                let (c0, c1, c2) = (line.character(n - 1).clone(), line.character(n - 2).clone(), line.character(n - 3).clone());
                if c0.blobs() == 1
                    && 4 * c0.size() < c1.size()
                    && c0.left() - c1.right() > 2 * line.height()
                    && 4 * c0.size() < c2.size()
                    && c1.left() - c2.right() < line.height()
                {
                    line.delete_character(n - 1);
                }
            }
        }

        for line in &mut tlpv { line.insert_spaces(); }

        Self { rect: *block, textlines: tlpv }
    }

    /// Runs both recognition passes per line, then an optional filter,
    /// drops lines no character on them was recognized, and pads in
    /// blank lines where the layout skipped some (e.g. a figure cut the
    /// block in two without leaving a line of its own).
    pub fn recognize(&mut self, charset: &Charset, filter: &Filter) {
        for line in &mut self.textlines {
            line.recognize1(charset);
            line.recognize2(charset);
        }

        if *filter != Filter::None {
            for line in &mut self.textlines { line.apply_filter(*filter); }
        }

        let mut i = self.textlines.len();
        while i > 0 {
            i -= 1;
            let recognized = (0..self.textlines[i].characters()).any(|j| self.textlines[i].character(j).guesses() != 0);
            if !recognized { self.textlines.remove(i); }
        }

        if self.textlines.len() >= 3 {
            let n = self.textlines.len();
            let mut min_vdistance = (self.textlines[n - 1].mean_vcenter() - self.textlines[0].mean_vcenter()) / (n as i32 - 1);
            for i in 0..n - 1 {
                let (c1, c2) = (self.textlines[i].characters() as i32, self.textlines[i + 1].characters() as i32);
                if !similar(c1, c2, 50, 1) || !similar(self.textlines[i].width(), self.textlines[i + 1].width(), 30, 1) { continue; }
                let vdistance = self.textlines[i + 1].mean_vcenter() - self.textlines[i].mean_vcenter();
                if vdistance >= min_vdistance { continue; }
                let (mh1, mh2) = (self.textlines[i].mean_height(), self.textlines[i + 1].mean_height());
                if mh1 < 10 || mh2 < 10 { continue; }
                if similar(mh1, mh2, 20, 1) && 2 * vdistance > mh1 + mh2 { min_vdistance = vdistance; }
            }
            if min_vdistance > 0 {
                let mut i = 0;
                while i + 1 < self.textlines.len() {
                    let mut vdistance = self.textlines[i + 1].mean_vcenter() - self.textlines[i].mean_vcenter() - min_vdistance;
                    while 2 * vdistance > min_vdistance {
                        i += 1;
                        self.textlines.insert(i, Textline::new());
                        vdistance -= min_vdistance;
                    }
                    i += 1;
                }
            }
        }
    }

    pub const fn rect(&self) -> &Rectangle { &self.rect }
    pub fn textline(&self, i: usize) -> &Textline { self.textlines.get(i).expect("textline, index out of bounds") }
    pub fn textlines(&self) -> usize { self.textlines.len() }
    pub fn characters(&self) -> usize { self.textlines.iter().map(Textline::characters).sum() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_blob(l: i32, t: i32, r: i32, b: i32) -> Blob {
        let mut blob = Blob::blank(l, t, r, b).unwrap();
        for row in t..=b { for col in l..=r { blob.add_point(row, col); } }
        blob
    }

    #[test]
    fn groups_two_rows_of_blobs_into_two_lines() {
        let page = Rectangle::new_unchecked(0, 0, 200, 100);
        let blobs = vec![
            solid_blob(0, 0, 8, 15),
            solid_blob(10, 0, 18, 15),
            solid_blob(0, 40, 8, 55),
            solid_blob(10, 40, 18, 55),
        ];
        let block = Textblock::new(&page, &page, blobs);
        assert_eq!(block.textlines(), 2);
        assert_eq!(block.characters(), 4);
    }

    #[test]
    fn empty_block_has_no_lines() {
        let page = Rectangle::new_unchecked(0, 0, 50, 50);
        let block = Textblock::new(&page, &page, Vec::new());
        assert_eq!(block.textlines(), 0);
    }
}
