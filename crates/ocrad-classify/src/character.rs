//! A character under construction: the blob(s) a segmentation pass grouped
//! together, and the ranked code-point guesses the classifier cascade has
//! produced for them so far.
//!
//! Grounded on `character.h`/`character.cc` and the cascade dispatch in
//! `character_r11.cc`/`character_r12.cc`/`character_r13.cc`. `print`/
//! `dprint`/`xprint` stay out of this crate; nothing here touches a file
//! handle.

use ocrad_core::{similar, Charset, Filter, Rectangle};
use ocrad_profile::{Features, Kind, Profile};
use ocrad_region::Blob;

use crate::leaf::{
    test_235esz, test_49aregpq, test_4adqao, test_6abd, test_cefijllt, test_easy, test_line, test_s_cedilla,
    test_solid,
};
use crate::ucs;

/// One candidate code point and its confidence. `code < 0` in the first
/// slot means the blob still needs splitting (a merge the cascade
/// tentatively resolved into two sub-guesses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guess {
    pub code: i32,
    pub value: i32,
}

#[derive(Debug, Clone)]
pub struct Character {
    rect: Rectangle,
    blobs: Vec<Blob>,
    guesses: Vec<Guess>,
}

impl Character {
    pub fn from_blob(b: Blob) -> Self {
        let rect = *b.rect();
        Self { rect, blobs: vec![b], guesses: Vec::new() }
    }

    pub fn from_guess(re: Rectangle, code: i32, value: i32) -> Self {
        Self { rect: re, blobs: Vec::new(), guesses: vec![Guess { code, value }] }
    }

    pub const fn rect(&self) -> &Rectangle { &self.rect }
    pub fn left(&self) -> i32 { self.rect.left() }
    pub fn top(&self) -> i32 { self.rect.top() }
    pub fn right(&self) -> i32 { self.rect.right() }
    pub fn bottom(&self) -> i32 { self.rect.bottom() }
    pub fn height(&self) -> i32 { self.rect.height() }
    pub fn width(&self) -> i32 { self.rect.width() }
    pub fn size(&self) -> i32 { self.rect.size() }
    pub fn hcenter(&self) -> i32 { self.rect.hcenter() }
    pub fn vcenter(&self) -> i32 { self.rect.vcenter() }
    pub fn h_includes(&self, col: i32) -> bool { self.rect.h_includes_col(col) }
    pub fn h_precedes(&self, other: &Character) -> bool { self.rect.h_precedes(&other.rect) }
    pub fn h_overlaps(&self, other: &Character) -> bool { self.rect.h_overlaps(&other.rect) }
    pub fn includes_hcenter(&self, other: &Character) -> bool { self.rect.includes_hcenter(&other.rect) }
    pub fn includes_vcenter(&self, other: &Character) -> bool { self.rect.includes_vcenter(&other.rect) }
    pub fn v_overlap_percent(&self, other: &Character) -> i32 { self.rect.v_overlap_percent(&other.rect) }

    /// The filled area of the character's own blobs, not counting any
    /// nested recursive structure.
    pub fn area(&self) -> i32 { self.blobs.iter().map(Blob::area).sum() }

    pub fn blob(&self, i: usize) -> &Blob {
        self.blobs.get(i).expect("blob, index out of bounds")
    }

    pub fn blobs(&self) -> usize { self.blobs.len() }

    pub fn main_blob(&self) -> &Blob {
        self.blobs.iter().max_by_key(|b| b.size()).expect("main_blob, character has no blobs")
    }

    /// Inserts `b` keeping `blobs()` ordered by reading order (top to
    /// bottom, then left to right).
    pub fn shift_blobp(&mut self, b: Blob) {
        self.rect.add_rectangle(b.rect());
        let mut i = self.blobs.len() as i32 - 1;
        while i >= 0 {
            let bi = &self.blobs[i as usize];
            if b.vcenter() > bi.vcenter() { break; }
            if b.vcenter() == bi.vcenter() && b.hcenter() >= bi.hcenter() { break; }
            i -= 1;
        }
        self.blobs.insert((i + 1) as usize, b);
    }

    pub fn add_guess(&mut self, code: i32, value: i32) { self.guesses.push(Guess { code, value }); }
    pub fn clear_guesses(&mut self) { self.guesses.clear(); }

    pub fn insert_guess(&mut self, i: usize, code: i32, value: i32) {
        assert!(i <= self.guesses.len(), "insert_guess, index out of bounds");
        self.guesses.insert(i, Guess { code, value });
    }

    pub fn delete_guess(&mut self, i: usize) {
        assert!(i < self.guesses.len(), "delete_guess, index out of bounds");
        self.guesses.remove(i);
    }

    pub fn only_guess(&mut self, code: i32, value: i32) {
        self.guesses.clear();
        self.guesses.push(Guess { code, value });
    }

    /// Splits this character's guess in two: the part of the blob up to
    /// `right1` becomes `code1`, the rest becomes `code2`. Fails if
    /// `right1` doesn't actually fall inside `blob(blob_index)`.
    pub fn set_merged_guess(&mut self, code1: i32, right1: i32, code2: i32, blob_index: usize) -> bool {
        if blob_index >= self.blobs.len() { return false; }
        let b = &self.blobs[blob_index];
        if b.left() <= right1 && right1 < b.right() {
            let left = self.left();
            let right = self.right();
            self.only_guess(-((blob_index as i32) + 1), left);
            self.add_guess(code1, right1);
            self.add_guess(code2, right);
            true
        } else {
            false
        }
    }

    /// Swaps the `code` of two guesses, leaving their confidence values
    /// in place.
    pub fn swap_guesses(&mut self, i: usize, j: usize) {
        assert!(i < self.guesses.len() && j < self.guesses.len(), "swap_guesses, index out of bounds");
        let code_i = self.guesses[i].code;
        self.guesses[i].code = self.guesses[j].code;
        self.guesses[j].code = code_i;
    }

    pub fn guess(&self, i: usize) -> &Guess {
        self.guesses.get(i).expect("guess, index out of bounds")
    }

    pub fn guesses(&self) -> usize { self.guesses.len() }

    pub fn maybe(&self, code: i32) -> bool { self.guesses.iter().any(|g| g.code == code) }

    /// Absorbs `other`'s blobs into `self`, in reading order. `other` is
    /// left with no blobs of its own.
    pub fn join(&mut self, other: &mut Character) {
        for b in std::mem::take(&mut other.blobs) { self.shift_blobp(b); }
    }

    pub fn byte_result(&self) -> u8 {
        if let Some(g) = self.guesses.first() {
            let ch = ucs::map_to_byte(g.code);
            if ch != 0 { return ch; }
        }
        b'_'
    }

    pub fn utf8_result(&self) -> String {
        if let Some(g) = self.guesses.first() {
            let s = ucs::ucs_to_utf8(g.code);
            if !s.is_empty() { return s; }
        }
        "_".to_string()
    }

    /// Keeps only letter or only digit guesses (`Filter::LettersOnly`/
    /// `NumbersOnly`), or merely reorders guesses to prefer them
    /// (`Filter::Letters`/`Numbers`).
    pub fn apply_filter(&mut self, filter: Filter) {
        if filter == Filter::None { return; }
        let code = self.guesses.first().map_or(0, |g| g.code);
        let remove = matches!(filter, Filter::LettersOnly | Filter::NumbersOnly);

        if matches!(filter, Filter::Letters | Filter::LettersOnly) {
            if !ucs::isalpha(code) && !ucs::isspace(code) {
                for i in 1..self.guesses() {
                    if ucs::isalpha(self.guesses[i].code) { self.swap_guesses(0, i); break; }
                }
                if self.guesses() != 0 && !ucs::isalpha(self.guesses[0].code) {
                    self.guesses[0].code = ucs::to_nearest_letter(self.guesses[0].code);
                }
                if remove && (self.guesses() == 0 || !ucs::isalpha(self.guesses[0].code)) {
                    self.only_guess(0, 0);
                }
            }
        } else if matches!(filter, Filter::Numbers | Filter::NumbersOnly)
            && !ucs::isdigit(code)
            && !ucs::isspace(code)
        {
            for i in 1..self.guesses() {
                if ucs::isdigit(self.guesses[i].code) { self.swap_guesses(0, i); break; }
            }
            if self.guesses() != 0 && !ucs::isdigit(self.guesses[0].code) {
                self.guesses[0].code = ucs::to_nearest_digit(self.guesses[0].code);
            }
            if remove && (self.guesses() == 0 || !ucs::isdigit(self.guesses[0].code)) {
                self.only_guess(0, 0);
            }
        }
    }

    /// First, context-free recognition attempt, dispatching on how many
    /// blobs make up this character.
    pub fn recognize1(&mut self, charset: &Charset, charbox: &Rectangle) {
        match self.blobs.len() {
            1 => self.recognize11(charset, charbox),
            2 => self.recognize12(charset, charbox),
            3 => self.recognize13(charset, charbox),
            _ => {}
        }
    }

    fn recognize11(&mut self, charset: &Charset, charbox: &Rectangle) {
        let holes = self.blob(0).holes();
        match holes {
            0 => self.recognize110(charset, charbox),
            1 => self.recognize111(charset, charbox),
            2 => self.recognize112(charbox),
            _ => {}
        }
    }

    fn recognize110(&mut self, charset: &Charset, charbox: &Rectangle) {
        let b = self.blob(0).clone();
        let mut f = Features::new(b.bitmap());
        let code = test_easy(&b, &mut f, charbox);
        if code != 0 {
            if code == '.' as i32 && b.width() > b.height() && b.v_includes(charbox.vcenter()) {
                self.add_guess(code, 1);
                self.add_guess('-' as i32, 0);
            } else {
                self.add_guess(code, 0);
            }
            return;
        }
        if b.height() < 5
            || (b.height() < 8 && b.width() < 6)
            || b.height() > 10 * b.width()
            || 5 * b.height() < b.width()
        {
            return;
        }

        let code = test_cefijllt(&mut f, charset);
        if code != 0 { self.add_guess(code, 0); return; }
        let code = f.test_frst(charbox);
        if code != 0 { self.add_guess(code, 0); return; }
        let code = f.test_g();
        if code != 0 { self.add_guess(code, 0); return; }
        let code = f.test_c();
        if code != 0 { self.add_guess(code, 0); return; }
        if charset.enabled(Charset::ISO_8859_9) {
            let code = test_s_cedilla(&mut f);
            if code != 0 { self.add_guess(code, 0); return; }
        }
        let code = test_235esz(&mut f, charset);
        if code != 0 { self.add_guess(code, 0); return; }

        let mut code = f.test_hkmnuuvwyy(charbox);
        if code == 'u' as i32 && f.lp.istpit() {
            // Looks for merged 'tr'.
            let mut col = b.seek_left(b.vcenter(), b.right(), true);
            if col < b.hpos(90) && !b.escape_top(b.vcenter(), col) {
                col = b.seek_left(b.vcenter(), col - 1, false);
                col -= 1;
                while col > b.hpos(40)
                    && (b.seek_top(b.vcenter(), col, true) > b.top()
                        || f.hp.at(col - b.left()) > b.height() / 10)
                {
                    col -= 1;
                }
                if col > b.hpos(40) && col < b.right() && self.set_merged_guess('t' as i32, col, 'r' as i32, 0) {
                    return;
                }
            }
        }
        if code == 'N' as i32
            && b.width() > b.height()
            && b.top() >= charbox.top()
            && 4 * f.tp.at_pos(50) < b.height()
        {
            // Looks for merged 'rv'.
            let col = f.hp.iminimum(0, -1);
            if col >= f.hp.pos(40) && col < f.hp.pos(50) && self.set_merged_guess('r' as i32, b.left() + col, 'v' as i32, 0)
            {
                return;
            }
        }
        if code != 0 { self.add_guess(code, 0); return; }

        let noise = (b.height().min(b.width()) / 30) + 1;
        if f.bp.minima(-1) <= 2
            && (f.bp.minima(b.height() / 8 + noise) == 2 || (b.height() >= 16 && f.bp.minima(b.height() / 8) == 2))
        {
            code = f.test_hknwx(charbox);
            if code == 'n' as i32 {
                // Looks for '"' or merged 'rt' or 'fl'.
                if b.bottom() <= charbox.vcenter() { self.add_guess('"' as i32, 0); return; }
                if b.width() > b.height()
                    && 10 * f.lp.at_pos(10) < b.width()
                    && !f.rp.increasing_pos(75, 2)
                {
                    let rgap = f.rp.at_pos(50);
                    if 10 * rgap > b.width() && !b.escape_top(b.vcenter(), b.right()) {
                        return;
                    }
                }
                if 2 * f.lp.at_pos(10) > b.width() && !f.rp.increasing_pos(75, 2) {
                    let col = b.seek_left(b.vcenter(), b.right(), true);
                    if col <= b.hpos(95) && !b.escape_top(b.vcenter(), col) && self.set_merged_guess('r' as i32, b.hcenter(), 't' as i32, 0)
                    {
                        return;
                    }
                }
                if f.rp.minima(-1) == 1 && !f.rp.increasing_pos(75, 2) {
                    let mut dmax = 0;
                    let mut bar = false;
                    let mut row = b.vpos(60);
                    while row > b.vpos(25) {
                        let d = b.hcenter() - b.seek_left(row, b.hcenter(), true);
                        if d > dmax { dmax = d; } else if 2 * d < dmax && dmax > 2 { bar = true; }
                        if bar && similar(d, dmax, 25, 0) {
                            let limit = b.seek_right(b.vcenter(), b.hcenter(), true);
                            let mut col = b.hcenter();
                            while col <= limit {
                                if b.seek_bottom(row, col, true) < b.bottom() { break; }
                                col += 1;
                            }
                            if col > b.left() && col < b.right() && self.set_merged_guess('f' as i32, col - 1, 'l' as i32, 0)
                            {
                                return;
                            }
                        }
                        row -= 1;
                    }
                }
            } else if code == 'h' as i32 {
                // Looks for merged 'rf' or 'fi'.
                if 2 * f.lp.at_pos(10) > b.width() {
                    if f.rp.at_pos(70) >= 2 && b.seek_top(b.vpos(70), b.right(), true) > b.top() {
                        let mut col = 0;
                        let mut hmin = f.hp.range() + 1;
                        for i in b.hpos(40)..=b.hpos(60) {
                            if f.hp.at(i - b.left()) < hmin { hmin = f.hp.at(i - b.left()); col = i; }
                        }
                        if col > b.left() && col < b.right() {
                            self.set_merged_guess('r' as i32, col - 1, 'f' as i32, 0);
                        }
                    }
                    return;
                }
                if f.rp.isctip(30) { self.set_merged_guess('f' as i32, b.hcenter(), 'i' as i32, 0); return; }
            } else if code == 'k' as i32
                && 2 * f.lp.at_pos(10) > b.width()
                && !f.rp.increasing_pos(75, 2)
                && self.set_merged_guess('r' as i32, b.hcenter(), 't' as i32, 0)
            {
                // Looks for merged 'rt'.
                return;
            }
            if code != 0 { self.add_guess(code, 0); return; }
        }

        if f.bp.minima(-1) == 3 {
            if f.bp.minima(b.height() / 2) == 1 && f.tp.minima(-1) == 3 && f.lp.minima(-1) == 2 && f.rp.minima(-1) == 2
            {
                self.add_guess('*' as i32, 0);
                return;
            }
            if b.id(b.vcenter(), b.hcenter()) == 0
                && b.id(b.vcenter() - 1, b.hcenter()) == 0
                && b.id(b.vcenter() + 1, b.hcenter()) == 0
                && b.seek_left(b.vcenter(), b.hcenter(), true) <= b.hpos(25)
            {
                // Found merged 'rn'.
                let row = b.vpos(95);
                let mut col = b.seek_right(row, b.left(), true);
                col = b.seek_right(row, col + 1, false);
                col = b.seek_right(row, col + 1, true);
                if col > b.left() && col < b.right() && self.set_merged_guess('r' as i32, col, 'n' as i32, 0) {
                    return;
                }
            }
            if f.tp.minima(b.height() / 3) == 1 { self.add_guess('m' as i32, 0); }
            return;
        }
        if f.bp.minima(-1) == 4 && f.tp.minima(b.height() / 3) == 1 {
            // Found merged 'rm'.
            let row = b.vpos(95);
            let mut col = b.seek_right(row, b.left(), true);
            col = b.seek_right(row, col + 1, false);
            col = b.seek_right(row, col + 1, true);
            if col > b.left() && col < b.right() && self.set_merged_guess('r' as i32, col, 'm' as i32, 0) {
                return;
            }
        }

        if f.tp.minima(b.height() / 4) == 3 {
            if b.bottom_hook().is_none()
                && (f.segments_in_row(b.vcenter()) < 4 || !b.escape_top(b.vcenter(), b.hcenter()))
            {
                self.add_guess('w' as i32, 0);
            }
            return;
        }

        let code = test_line(&b, &mut f, charbox);
        if code != 0 {
            self.add_guess(code, 0);
            return;
        }

        if let Some(c) = f.test_misc(charbox) { self.add_guess(c as i32, 0); }
    }

    fn recognize111(&mut self, charset: &Charset, charbox: &Rectangle) {
        let b = self.blob(0).clone();
        let h = b.hole(0).expect("recognize111 dispatches only when holes() == 1").clone();
        if !h.is_hcentred_in(b.bitmap()) { return; }
        let mut f = Features::new(b.bitmap());
        let top_delta = h.top() - b.top();
        let bottom_delta = b.bottom() - h.bottom();

        if (top_delta - bottom_delta).abs() <= 2.max(h.height() / 4) || similar(top_delta, bottom_delta, 40, 2) {
            let code = test_4adqao(&b, &mut f, charset, charbox);
            if code != 0 {
                if code == 'Q' as i32 && similar(top_delta, bottom_delta, 40, 2) {
                    self.add_guess('a' as i32, 1);
                }
                self.add_guess(code, 0);
            }
            return;
        }

        if top_delta < bottom_delta {
            let code = test_49aregpq(&b, &mut f, charbox);
            if code != 0 { self.add_guess(code, 0); }
            return;
        }

        if top_delta > bottom_delta {
            let code = test_6abd(&b, &mut f, charset);
            if code != 0 {
                self.add_guess(code, 0);
                if code == ucs::code::SOACUTE {
                    let row = h.top() - (b.bottom() - h.bottom()) - 1;
                    if row > b.top() && row + 1 < h.top() {
                        let mut b2 = self.blobs[0].clone();
                        self.blobs[0].set_bottom(row);
                        b2.set_top(row + 1);
                        self.blobs.push(b2);
                    }
                }
            }
        }
    }

    fn recognize112(&mut self, charbox: &Rectangle) {
        let b = self.blob(0).clone();
        let h1 = b.hole(0).expect("recognize112 dispatches only when holes() == 2").clone();
        let h2 = b.hole(1).expect("recognize112 dispatches only when holes() == 2").clone();
        let mut lp = Profile::new(b.bitmap(), Kind::Left);
        let mut tp = Profile::new(b.bitmap(), Kind::Top);
        let mut rp = Profile::new(b.bitmap(), Kind::Right);
        let mut bp = Profile::new(b.bitmap(), Kind::Bottom);

        if 10 * (h2.vcenter() - h1.vcenter()).abs() <= b.height()
            && h1.is_vcentred_in(b.bitmap())
            && h2.is_vcentred_in(b.bitmap())
        {
            if b.bottom() - h1.bottom() <= h1.top() - b.top()
                && b.bottom() - h2.bottom() <= h2.top() - b.top()
                && bp.isflats()
            {
                self.add_guess('m' as i32, 0);
                return;
            }
            if 5 * (h1.bottom() - b.vcenter()).abs() <= b.height()
                && 5 * (h2.bottom() - b.vcenter()).abs() <= b.height()
                && tp.isflats()
                && bp.minima(-1) == 2
            {
                self.add_guess('w' as i32, 0);
            }
            return;
        }
        if !h1.is_hcentred_in(b.bitmap()) { return; }
        if !h2.is_hcentred_in(b.bitmap()) { return; }
        if h1.left() > b.hcenter() && h2.left() > b.hcenter() { return; }
        if h1.right() < b.hpos(40) && h2.right() < b.hpos(40) { return; }
        if h1.top() > b.vcenter() || h2.bottom() < b.vcenter() { return; }
        let a1 = h1.area();
        let a2 = h2.area();

        {
            let w = b.right() - b.hcenter().min(h1.hcenter().min(h2.hcenter()));
            for i in (h1.bottom() - b.top() + 1)..(h2.top() - b.top()) {
                if rp.at(i) > w {
                    self.add_guess('g' as i32, 2);
                    return;
                }
            }
        }

        if similar(a1, a2, 50, 1) {
            if h1.bottom() > b.vcenter() && h2.top() < b.vcenter() && h1.h_overlaps(&h2) && !h1.h_includes(&h2) {
                self.add_guess('0' as i32, 0);
                return;
            }
            if h1.bottom() <= h2.top() {
                if let Some(bhdiff) = b.bottom_hook() {
                    if bhdiff > b.height() / 2 {
                        if let Some(thdiff) = b.top_hook() {
                            if thdiff > b.height() / 2 {
                                self.add_guess('s' as i32, 0);
                                return;
                            }
                        }
                    }
                }

                if lp.isflats() && (lp.istip() || (lp.isflat() && b.test_bd())) {
                    self.add_guess('B' as i32, 0);
                    return;
                }

                let col1 = h1.seek_left(h1.bottom(), h1.right() + 1, true) - 1;
                let col2 = h2.seek_right(h2.top(), h2.left() - 1, true) + 1;
                if col1 <= col2 {
                    if lp.isconvex() || lp.ispit() {
                        self.add_guess('e' as i32, 1);
                    } else if !rp.isctip(50) && tp.minima(-1) == 1 {
                        self.add_guess('a' as i32, 1);
                    }
                    if bp.istpit() {
                        self.add_guess('$' as i32, 0);
                        return;
                    }
                }

                if b.hcenter() > h1.hcenter()
                    && b.hcenter() > h2.hcenter()
                    && (b.hcenter() >= h1.right() || b.hcenter() >= h2.right())
                {
                    self.add_guess('&' as i32, 0);
                    return;
                }

                for row in (h1.bottom() + 1)..h2.top() {
                    if !b.get_bit(row, self.hcenter()) {
                        self.add_guess('g' as i32, 0);
                        return;
                    }
                }

                if charbox.bottom() > h2.vcenter() && (bp.isconvex() || (bp.ispit() && tp.ispit())) {
                    if b.top() >= charbox.top() && b.height() <= charbox.height() {
                        if (lp.ispit() || lp.isconvex()) && (!rp.ispit() || h2.right() > h1.right()) {
                            self.add_guess('e' as i32, 1);
                        } else if b.right() - rp.at_pos(50) > h1.right() && !rp.isctip(50) {
                            self.add_guess('a' as i32, 1);
                        }
                    }
                    if h1.bottom() > b.vcenter() && h1.top() > b.vpos(30) {
                        self.add_guess(ucs::code::SEACUTE, 0);
                    } else {
                        self.add_guess('8' as i32, 0);
                    }
                    return;
                }

                if lp.minima(-1) == 2 && rp.minima(-1) == 1 {
                    if charbox.vcenter() < h1.bottom() && charbox.bottom() < h2.bottom() {
                        self.add_guess('g' as i32, 0);
                    } else {
                        self.add_guess('a' as i32, 0);
                    }
                    return;
                }

                if charbox.vcenter() > h1.top() && (charbox.vcenter() < h1.bottom() || charbox.bottom() < h2.vcenter())
                {
                    self.add_guess('g' as i32, 2);
                }
                self.add_guess('B' as i32, 1);
                self.add_guess('a' as i32, 0);
                return;
            }
        }

        if a1 > a2 && h1.h_overlaps(&h2) {
            if !h1.v_overlaps(&h2) {
                if h2.left() > b.hcenter() && h2.bottom() < b.bottom() - h1.height() {
                    self.add_guess('9' as i32, 0);
                } else {
                    self.add_guess('g' as i32, 0);
                }
                return;
            }
            if h1.h_includes(&h2) { self.add_guess('Q' as i32, 0); }
            return;
        }

        if a1 < a2 && tp.minima(-1) == 1 {
            if h1.h_overlaps(&h2) {
                if rp.minima(-1) == 1 {
                    if 2 * h1.height() > h2.height()
                        && 2 * h1.width() > h2.width()
                        && 3 * h2.width() >= b.width()
                        && !lp.isctip(50)
                    {
                        if lp.ispit() && lp.isconvex() {
                            self.add_guess('6' as i32, 0);
                        } else {
                            self.add_guess('B' as i32, 0);
                        }
                    } else if h2.right() < b.hcenter() {
                        self.add_guess('&' as i32, 0);
                    } else {
                        self.add_guess('a' as i32, 0);
                    }
                    return;
                }
                if !h1.v_overlaps(&h2) && h1.right() < b.hcenter() && h1.top() > b.top() + h1.height() {
                    self.add_guess('6' as i32, 0);
                    return;
                }
            }
            if h1.bottom() < h2.top() { self.add_guess('&' as i32, 0); }
        }
    }

    /// Recognizes two-blob characters: accent-plus-base-letter composites,
    /// punctuation pairs (`!`, `?`, `:`, `;`, `=`), and a handful of merged
    /// digraphs (`fi`, `ri`).
    fn recognize12(&mut self, charset: &Charset, charbox: &Rectangle) {
        let b1 = self.blob(0).clone();
        let b2 = self.blob(1).clone();
        let a1 = b1.area();
        let a2 = b2.area();
        let mut f1 = Features::new(b1.bitmap());
        let mut f2 = Features::new(b2.bitmap());

        if similar(a1, a2, 10, 1) {
            if b1.holes() == 0 && b2.holes() == 0 && 2 * a1 > b1.size() && 2 * a2 > b2.size() {
                if self.width() > self.height() || similar(self.width(), self.height(), 40, 1) {
                    self.add_guess('=' as i32, 0);
                    return;
                }
                if similar(b1.width(), b1.height(), 20, 2) && similar(b2.width(), b2.height(), 20, 2) {
                    self.add_guess(':' as i32, 0);
                }
                return;
            }
            return;
        }

        if similar(a1, a2, 60, 1) {
            if test_solid(&b1, &mut f1, charbox) == '.' as i32 {
                if test_solid(&b2, &mut f2, charbox) == '.' as i32 {
                    self.add_guess(':' as i32, 0);
                    return;
                }
                if b2.height() > b1.height() && b2.top() > charbox.vcenter() {
                    self.add_guess(';' as i32, 0);
                    return;
                }
            }
            if charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9) {
                let code = test_solid(&b2, &mut f2, charbox);
                if code == '-' as i32 || code == '_' as i32 {
                    self.add_guess(ucs::code::PLUSMIN, 0);
                    return;
                }
            }
            if b1.includes_hcenter(&b2) && b2.includes_hcenter(&b1) && b1.holes() != 0 && b2.holes() != 0 {
                self.add_guess('g' as i32, 0);
                return;
            }
            if b1.hcenter() < b2.hcenter()
                && b2.height() > b2.width()
                && b1.hcenter() < b2.left()
                && b1.includes_hcenter(&b2)
                && 4 * b1.height() > 5 * b2.height()
                && similar(b1.bottom() - b1.top(), b2.bottom() - b1.top(), 10, 1)
            {
                let mut c2 = Character::from_blob(b2.clone());
                c2.recognize1(charset, charbox);
                if (c2.maybe('l' as i32) || c2.maybe('|' as i32)) && self.set_merged_guess('f' as i32, b2.left() - 1, 'i' as i32, 0)
                {
                    return;
                }
            }
        }

        if a1 > a2
            && b1.hcenter() < b2.hcenter()
            && 2 * b1.height() > 3 * b2.height()
            && b1.holes() == 1
            && b2.holes() == 1
            && similar(b2.width(), b2.height(), 50, 1)
        {
            self.add_guess('%' as i32, 0);
            return;
        }

        if a1 < a2 {
            {
                let mut code = test_solid(&b1, &mut f1, charbox);
                if code == '-' as i32 && 2 * b1.height() > b1.width() {
                    code = '.' as i32;
                } else if code == '\'' as i32 || code == '|' as i32 {
                    code = '.' as i32;
                }
                if code == 0 && b1.holes() == 0 && 2 * b1.height() < b2.height() && b1.width() <= b2.width() {
                    code = if 10 * a1 >= 7 * b1.height() * b1.width() { '.' as i32 } else { '\'' as i32 };
                }
                if b2.holes() == 0 && (code == '.' as i32 || code == '\'' as i32) {
                    if f2.bp.minima(b2.height() / 4) == 2 && b2.top() > b1.bottom() && b2.hcenter() < b1.left() {
                        let mut c2 = Character::from_blob(b2.clone());
                        c2.recognize1(charset, charbox);
                        if c2.maybe('n' as i32) {
                            if code == '.' as i32 && (b1.left() < b2.hcenter() || b1.right() > b2.right()) {
                                self.add_guess('n' as i32, 0);
                                return;
                            }
                            let mut col = b2.hcenter();
                            let limit = b2.seek_right(b2.vcenter(), b2.hcenter(), true);
                            while col <= limit {
                                if b2.seek_bottom(b2.vcenter(), col, true) < b2.bottom() { break; }
                                col += 1;
                            }
                            if b2.left() < col && col < b2.right() {
                                if charset.enabled(Charset::ISO_8859_9) && f2.rp.istip() {
                                    self.set_merged_guess('T' as i32, col - 1, ucs::code::CIDOT, 1);
                                } else {
                                    let code2 = if code == '.' as i32 { 'i' as i32 } else { ucs::code::SIACUTE };
                                    self.set_merged_guess('r' as i32, col - 1, code2, 1);
                                }
                                return;
                            }
                        }
                    }

                    if code == '.' as i32
                        && f2.bp.minima(b2.height() / 4) == 1
                        && b1.bottom() <= b2.top()
                        && f2.rp.minima(b2.width() / 2) <= 2
                    {
                        if let Some(hdiff) = b2.bottom_hook() {
                            if hdiff.abs() >= b2.height() / 2 {
                                if hdiff > 0 && f2.rp.increasing_pos(80, 2) {
                                    self.add_guess('j' as i32, 0);
                                    return;
                                }
                                if hdiff < 0 {
                                    if (charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9))
                                        && -4 * hdiff <= 3 * b2.height()
                                        && f2.wp.max() > 2 * f1.wp.max()
                                        && f2.lp.minima(-1) == 1
                                        && 2 * f2.bp.at(0) < b2.height()
                                    {
                                        self.add_guess(ucs::code::IQUEST, 0);
                                        return;
                                    }
                                    self.add_guess('i' as i32, 0);
                                    return;
                                }
                            }
                        }
                        if f2.tp.minima(-1) == 1 {
                            let maybe_j = b2.height() > charbox.height() && b2.vpos(80) > charbox.bottom();
                            if similar(f1.wp.max(), f2.wp.max(), 20, 1) {
                                if (charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9))
                                    && !f2.lp.isctip(50)
                                    && f2.wp.max() >= f1.wp.max()
                                    && (3 * f2.wp.at_pos(10) < 2 * f1.wp.max()
                                        || (b1.left() <= b2.left() && b2.vpos(80) > charbox.bottom()))
                                {
                                    self.add_guess(ucs::code::IEXCLAM, 0);
                                    return;
                                }
                                self.add_guess(if maybe_j { 'j' as i32 } else { 'i' as i32 }, 0);
                                return;
                            }
                            if 3 * f2.wp.max() > 4 * f1.wp.max()
                                && b2.seek_bottom(b2.vcenter(), b2.hpos(10), true) < b2.bottom()
                                && f2.rp.increasing_pos(75, 2)
                                && (b1.left() >= b2.hcenter() || b2.seek_top(b2.vcenter(), b2.hpos(10), true) <= b2.top())
                            {
                                self.add_guess('j' as i32, 0);
                                return;
                            }
                            if charset.enabled(Charset::ISO_8859_9) && f2.rp.istip() {
                                self.add_guess(ucs::code::CIDOT, 0);
                                return;
                            }
                            self.add_guess(if maybe_j { 'j' as i32 } else { 'i' as i32 }, 0);
                            return;
                        }
                    }
                }
            }

            if (b1.holes() == 0 && (b1.bottom() < b2.vcenter() || 2 * a1 < a2))
                || (b1.holes() == 1 && b1.bottom() < b2.top() && b2.top() - b1.bottom() < b1.height())
            {
                let mut c = Character::from_blob(b2.clone());
                c.recognize1(charset, charbox);
                if c.guesses() != 0 {
                    let mut code = c.guess(0).code;
                    if b1.holes() == 1 {
                        code = if code == 'a' as i32 {
                            ucs::code::SARING
                        } else if code == 'A' as i32 {
                            ucs::code::CARING
                        } else {
                            0
                        };
                    } else if code == 'u' as i32 && 5 * b1.width() <= b2.width() && 5 * b1.height() <= b2.width() {
                        return;
                    } else if b1.bottom() < b2.vcenter() {
                        let atype = if ucs::isvowel(code)
                            && 2 * b1.width() > 3 * b1.height()
                            && !f1.tp.iscpit(50)
                            && f1.hp.iscpit(50)
                        {
                            ':' as i32
                        } else if f1.bp.minima(-1) == 2 || f1.bp.istip() {
                            '^' as i32
                        } else if b1.height().min(b1.width()) >= 5
                            && (f1.rp.decreasing(1) || f1.tp.increasing(0, 2))
                            && (f1.bp.decreasing(1) || f1.lp.increasing(0, 2))
                        {
                            '`' as i32
                        } else {
                            '\'' as i32
                        };
                        code = ucs::compose(code, atype);
                    }
                    if code != c.guess(0).code && charset.only(Charset::ASCII) {
                        code = if ucs::base_letter(code) == 'i' as i32 { 'i' as i32 } else { c.guess(0).code };
                    }
                    if code != 0 { self.add_guess(code, 0); }
                }
            }
            return;
        }

        if b1.bottom() <= b2.top() {
            let code = test_solid(&b2, &mut f2, charbox);
            if b1.holes() == 0 && (code == '.' as i32 || (code != 0 && similar(b2.height(), b2.width(), 50, 1))) {
                if similar(b1.width(), b2.width(), 50, 1) && !f1.lp.isctip(50) {
                    self.add_guess('!' as i32, 0);
                    return;
                }
                if f1.bp.minima(-1) == 1 { self.add_guess('?' as i32, 0); }
                return;
            }
            if (code == '-' as i32 || code == '_' as i32)
                && (charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9))
                && b1.holes() == 1
            {
                let h = b1.hole(0).expect("b1.holes() == 1 checked above");
                if b2.width() >= h.width() && b2.top() - b1.bottom() < h.height() {
                    if similar(h.left() - b1.left(), b1.right() - h.right(), 40, 1) {
                        self.add_guess(ucs::code::MASCORD, 0);
                    } else {
                        self.add_guess(ucs::code::FEMIORD, 0);
                    }
                }
            }
        }
    }

    /// Recognizes three-blob characters: a base letter plus two stacked
    /// marks (diaeresis, `%`, `÷`).
    fn recognize13(&mut self, charset: &Charset, charbox: &Rectangle) {
        let b1 = self.blob(0).clone();
        let b2 = self.blob(1).clone();
        let b3 = self.blob(2).clone();
        let mut c = Character::from_blob(b3.clone());
        let mut code = 0;

        c.recognize1(charset, charbox);
        if c.guesses() != 0 {
            if c.maybe('.' as i32) || (c.height() < 2 * c.width() && c.maybe(',' as i32) && 2 * b3.area() >= b3.size())
            {
                if b1.bottom() <= b2.top() && b2.bottom() <= b3.top() {
                    if b2.width() >= 2 * b2.height() { code = ucs::code::DIV; }
                } else if b1.top() < b3.top() && b2.top() < b3.top() {
                    code = '%' as i32;
                }
            } else if b1.width().max(b2.width()) < b3.width()
                && similar(b1.height(), b2.height(), 20, 2)
                && 2 * b1.height().max(b2.height()) < b3.height()
            {
                code = ucs::compose(c.guess(0).code, ':' as i32);
            } else if c.maybe('o' as i32)
                && ((b1.hcenter() < b2.hcenter() && b1.holes() == 1 && b2.holes() == 0)
                    || (b2.hcenter() < b1.hcenter() && b2.holes() == 1 && b1.holes() == 0))
            {
                code = '%' as i32;
            }
        }
        if charset.only(Charset::ASCII) {
            code = if code == ucs::code::DIV { '%' as i32 } else { ucs::base_letter(code) };
        }
        if code != 0 { self.add_guess(code, 0); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_blob(l: i32, t: i32, r: i32, btm: i32) -> Blob {
        let mut b = Blob::blank(l, t, r, btm).unwrap();
        for row in t..=btm { for col in l..=r { b.add_point(row, col); } }
        b
    }

    #[test]
    fn only_guess_replaces_all_guesses() {
        let mut c = Character::from_guess(Rectangle::new(0, 0, 5, 5).unwrap(), 'a' as i32, 0);
        c.add_guess('b' as i32, 1);
        c.only_guess('z' as i32, 9);
        assert_eq!(c.guesses(), 1);
        assert_eq!(c.guess(0).code, 'z' as i32);
    }

    #[test]
    fn apply_filter_letters_only_blanks_non_letter_guess() {
        let mut c = Character::from_guess(Rectangle::new(0, 0, 5, 5).unwrap(), '5' as i32, 0);
        c.apply_filter(Filter::LettersOnly);
        assert_eq!(c.guess(0).code, 0);
    }

    #[test]
    fn byte_result_falls_back_to_underscore_with_no_guesses() {
        let c = Character::from_blob(square_blob(0, 0, 3, 3));
        assert_eq!(c.byte_result(), b'_');
    }

    #[test]
    fn recognize1_solid_square_guesses_period() {
        let mut c = Character::from_blob(square_blob(0, 0, 8, 8));
        let charset = Charset::default();
        let charbox = Rectangle::new(0, 0, 8, 20).unwrap();
        c.recognize1(&charset, &charbox);
        assert!(c.guesses() > 0);
        assert_eq!(c.guess(0).code, '.' as i32);
    }

    #[test]
    fn shift_blobp_keeps_reading_order() {
        let mut c = Character::from_blob(square_blob(10, 0, 12, 2));
        c.shift_blobp(square_blob(0, 0, 2, 2));
        assert_eq!(c.blob(0).left(), 0);
        assert_eq!(c.blob(1).left(), 10);
    }
}
