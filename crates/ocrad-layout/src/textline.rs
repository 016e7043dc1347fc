//! A line of characters tied to a [`Track`], with the blank/tab insertion
//! and two-pass classification (`recognize1`/`recognize2`) that turn a
//! row of segmented glyphs into readable text.
//!
//! Grounded on `textline.h`/`textline.cc` (structure, track, space
//! insertion) and `textline_r2.cc` (contextual corrections — see the
//! scope note on [`Textline::recognize2`]).

use ocrad_core::{similar, Charset, Filter, Rational, Rectangle};
use ocrad_classify::{ucs, Character};

use crate::track::Track;

#[derive(Debug, Clone, Default)]
pub struct Textline {
    track: Track,
    big_initials: usize,
    characters: Vec<Character>,
}

fn find_big_gap(characters: &[Character], first: usize, space_width_limit: i32) -> usize {
    let mut i = first;
    while i + 1 < characters.len() {
        let gap = characters[i + 1].left() - characters[i].right() - 1;
        if gap > space_width_limit { break; }
        i += 1;
    }
    i
}

impl Textline {
    pub fn new() -> Self { Self::default() }

    pub const fn big_initials(&self) -> usize { self.big_initials }

    pub fn left(&self) -> i32 { self.track.left() }
    pub fn right(&self) -> i32 { self.track.right() }
    pub fn height(&self) -> i32 { self.track.height() }
    pub fn top(&self, col: i32) -> i32 { self.track.top(col) }
    pub fn bottom(&self, col: i32) -> i32 { self.track.bottom(col) }
    pub fn vcenter(&self, col: i32) -> i32 { self.track.vcenter(col) }

    /// Rebuilds the baseline track from every non-space character past
    /// the big-initials prefix.
    pub fn set_track(&mut self) {
        let rv: Vec<Rectangle> = self.characters[self.big_initials..]
            .iter()
            .filter(|c| !c.maybe(' ' as i32))
            .map(|c| *c.rect())
            .collect();
        self.track.set_track(&rv);
    }

    /// Shrinks the big-initials prefix while it's no taller than twice
    /// the line's mean character height.
    pub fn verify_big_initials(&mut self) {
        while self.big_initials > 0 && self.characters[self.big_initials - 1].height() <= 2 * self.mean_height() {
            self.big_initials -= 1;
        }
    }

    pub fn character(&self, i: usize) -> &Character {
        self.characters.get(i).expect("character, index out of bounds")
    }

    pub fn character_mut(&mut self, i: usize) -> &mut Character {
        self.characters.get_mut(i).expect("character, index out of bounds")
    }

    pub fn character_at(&self, col: i32) -> Option<&Character> {
        self.characters.iter().find(|c| c.h_includes(col))
    }

    pub fn characters(&self) -> usize { self.characters.len() }

    /// The reading box a character should be classified against: its own
    /// left/right edges, but top/bottom taken from the track at its
    /// horizontal center (so the classifier sees where the baseline
    /// actually runs under skew).
    pub fn charbox(&self, c: &Character) -> Rectangle {
        Rectangle::new_unchecked(c.left(), self.track.top(c.hcenter()), c.right(), self.track.bottom(c.hcenter()))
    }

    pub fn width(&self) -> i32 {
        match (self.characters.first(), self.characters.last()) {
            (Some(first), Some(last)) => last.right() - first.left(),
            _ => 0,
        }
    }

    pub fn delete_character(&mut self, i: usize) {
        assert!(i < self.characters.len(), "delete_character, index out of bounds");
        if i < self.big_initials { self.big_initials -= 1; }
        self.characters.remove(i);
    }

    /// Inserts `c` in reading order (by horizontal center), returning the
    /// index it landed at. `big` marks it as part of the big-initials
    /// prefix.
    pub fn shift_characterp(&mut self, c: Character, big: bool) -> usize {
        let mut i = self.characters.len();
        while i > 0 && c.h_precedes(&self.characters[i - 1]) { i -= 1; }
        self.characters.insert(i, c);
        if i < self.big_initials {
            self.big_initials += 1;
        } else if big {
            self.big_initials = i + 1;
        }
        i
    }

    /// Inserts a blank (or, if `tab`, a tab-marked blank) between
    /// characters `i-1` and `i`, sized to fill the gap between them.
    pub fn insert_space(&mut self, i: usize, tab: bool) -> bool {
        assert!(i > 0 && i < self.characters.len(), "insert_space, index out of bounds");
        assert!(self.track.height() != 0, "insert_space, track not set yet");
        let l = self.characters[i - 1].right() + 1;
        let r = self.characters[i].left() - 1;
        if l > r { return false; }
        let t = self.track.top((l + r) / 2);
        let b = self.track.bottom((l + r) / 2);
        let re = Rectangle::new_unchecked(l, t, r, b);
        let mut c = Character::from_guess(re, ' ' as i32, i32::from(tab));
        if tab { c.add_guess('\t' as i32, 0); }
        self.characters.insert(i, c);
        true
    }

    /// Decides where run-together characters need a space (or a tab,
    /// at an unusually wide trailing gap) between them.
    pub fn insert_spaces(&mut self) {
        let mw = self.mean_width();
        if mw < 2 { return; }
        let mwt = mw.trunc() as i32;
        let space_width_limit = (mw * Rational::from(3)).trunc() as i32;
        let mut first = self.big_initials;

        while first + 1 < self.characters() {
            let mut last = find_big_gap(&self.characters, first, space_width_limit);
            let mg = self.mean_gap_width(first, Some(last));
            if first < last && mg >= 0 {
                let mut spaces = 0i32;
                let mut nospaces = 0i32;
                let mut spsum = 0i32;
                let mut nospsum = 0i32;
                let mut i = first;
                while i < last {
                    let c1w = self.character(i).width();
                    let c2w = self.character(i + 1).width();
                    let gap = self.character(i + 1).left() - self.character(i).right() - 1;
                    let wide = gap >= mwt
                        || Rational::from(i64::from(gap)) > mg * Rational::from(3)
                        || (5 * gap > 2 * mwt && Rational::from(i64::from(gap)) > mg * Rational::from(2))
                        || (3 * c1w > 2 * mwt && 3 * c2w > 2 * mwt && 2 * gap > mwt && Rational::from(i64::from(5 * gap)) > mg * Rational::from(8));
                    if wide {
                        spaces += 1;
                        spsum += gap;
                        if self.insert_space(i + 1, false) { i += 1; last += 1; }
                    } else {
                        nospaces += 1;
                        nospsum += gap;
                    }
                    i += 1;
                }
                if spaces != 0 && nospaces != 0 {
                    let th = (Rational::new(i64::from(3 * spsum), i64::from(spaces)) + Rational::new(i64::from(nospsum), i64::from(nospaces))) / Rational::new(4, 1);
                    let mut i = first;
                    while i < last {
                        let gap = self.character(i + 1).left() - self.character(i).right() - 1;
                        if Rational::from(i64::from(gap)) > th && self.insert_space(i + 1, false) { i += 1; last += 1; }
                        i += 1;
                    }
                }
            }
            last += 1;
            if last < self.characters() && self.insert_space(last, true) { last += 1; }
            first = last;
        }
    }

    /// Absorbs `other`'s characters into `self`, in reading order.
    pub fn join(&mut self, other: &mut Textline) {
        let big_initials = other.big_initials;
        for (i, c) in std::mem::take(&mut other.characters).into_iter().enumerate() {
            self.shift_characterp(c, i < big_initials);
        }
        other.big_initials = 0;
    }

    pub fn mean_height(&self) -> i32 {
        let mut c = 0;
        let mut sum = 0;
        for ch in &self.characters[self.big_initials..] {
            if !ch.maybe(' ' as i32) { c += 1; sum += ch.height(); }
        }
        if c != 0 { sum /= c; }
        sum
    }

    pub fn mean_width(&self) -> Rational {
        let mut c: i64 = 0;
        let mut sum: i64 = 0;
        for ch in &self.characters[self.big_initials..] {
            if !ch.maybe(' ' as i32) { c += 1; sum += i64::from(ch.width()); }
        }
        if c != 0 { Rational::new(sum, c) } else { Rational::from(0) }
    }

    pub fn mean_gap_width(&self, first: usize, last: Option<usize>) -> Rational {
        let last = last.unwrap_or(self.characters().saturating_sub(1));
        let mut sum: i64 = 0;
        for i in first..last {
            sum += i64::from(0.max(self.characters[i + 1].left() - self.characters[i].right() - 1));
        }
        if last > first { Rational::new(sum, (last - first) as i64) } else { Rational::from(0) }
    }

    pub fn mean_hcenter(&self) -> i32 {
        let slice = &self.characters[self.big_initials..];
        if slice.is_empty() { return 0; }
        slice.iter().map(Character::hcenter).sum::<i32>() / slice.len() as i32
    }

    pub fn mean_vcenter(&self) -> i32 {
        let slice = &self.characters[self.big_initials..];
        if slice.is_empty() { return 0; }
        slice.iter().map(Character::vcenter).sum::<i32>() / slice.len() as i32
    }

    /// First, context-free recognition pass. Big-initial characters are
    /// classified against their own bounding box (not the track) and
    /// forced upper-case if the guess lands on an ambiguous lowercase
    /// letter.
    pub fn recognize1(&mut self, charset: &Charset) {
        for i in 0..self.characters.len() {
            if i < self.big_initials {
                let rect = *self.characters[i].rect();
                self.characters[i].recognize1(charset, &rect);
                if self.characters[i].guesses() != 0 {
                    let code = self.characters[i].guess(0).code;
                    if ucs::islower_ambiguous(code) { self.characters[i].only_guess(ucs::toupper(code), 0); }
                }
            } else {
                let charbox = self.charbox(&self.characters[i]);
                self.characters[i].recognize1(charset, &charbox);
            }
        }
    }

    /// Transforms a lowercase letter the cascade couldn't size-distinguish
    /// (`c`/`C`, `o`/`O`, ...) into its capital when every other letter on
    /// the line says it should be one.
    fn check_lower_ambiguous(&mut self) {
        let mean_height = self.mean_height();
        let mut begin = self.big_initials;
        let mut isolated = false;
        let mut i = self.big_initials;
        while i < self.characters() {
            if self.character(i).maybe(' ' as i32) {
                if i + 2 < self.characters() && self.character(i + 2).maybe(' ' as i32) {
                    begin = self.big_initials;
                    isolated = true;
                } else {
                    begin = i + 1;
                    isolated = false;
                }
                i += 1;
                continue;
            }
            if self.character(i).guesses() == 1 {
                let code = self.character(i).guess(0).code;
                if ucs::islower_small_ambiguous(code) && 5 * self.character(i).height() >= 4 * mean_height {
                    let c1_height = self.character(i).height();
                    let mut capital = 4 * c1_height > 5 * mean_height;
                    let mut small = false;
                    for j in begin..self.characters() {
                        if j == i { continue; }
                        let c2 = self.character(j);
                        if c2.guesses() == 0 { continue; }
                        if c2.maybe(' ' as i32) {
                            if isolated { continue; } else { break; }
                        }
                        let code2 = c2.guess(0).code;
                        if code2 >= 128 || !ucs::isalpha(code2) { continue; }
                        let c2_height = c2.height();
                        if !capital {
                            if 4 * c1_height > 5 * c2_height {
                                capital = true;
                            } else if ucs::isupper(code2)
                                && code2 != 'B' as i32
                                && code2 != 'Q' as i32
                                && (c1_height >= c2_height || similar(c1_height, c2_height, 10, 1))
                            {
                                capital = true;
                            } else if code2 == 't' as i32 && c1_height >= c2_height {
                                capital = true;
                            }
                        }
                        if !small && ucs::islower(code2) && code2 != 'l' as i32 && code2 != 'j' as i32 {
                            if 5 * c1_height < 4 * c2_height {
                                small = true;
                            } else if ucs::islower_small(code2)
                                && code2 != 'r' as i32
                                && !c2.maybe('Q' as i32)
                                && (j < i || !ucs::islower_small_ambiguous(code2))
                                && similar(c1_height, c2_height, 10, 1)
                            {
                                small = true;
                            }
                        }
                    }
                    if capital && !small {
                        self.character_mut(i).insert_guess(0, ucs::toupper(code), 1);
                    }
                }
            }
            i += 1;
        }
    }

    /// Index of the first character at or after `i` that might be a space
    /// or hyphen, i.e. the end of the current word.
    fn find_space_or_hyphen(&self, mut i: usize) -> usize {
        while i < self.characters() && !self.character(i).maybe(' ' as i32) && !self.character(i).maybe('-' as i32) {
            i += 1;
        }
        i
    }

    /// Contextual second pass. The original's own sources call this file
    /// "provisional and will be rewritten someday"; this port keeps the
    /// self-contained corrections (case disambiguation, `O`/`l`/`|` ->
    /// `0`/`1`/`I`, `a`/`Q` and `SSCEDI`/`CSCEDI` disambiguation, `n`+`I`/
    /// `l` -> `m`, `°/o `-> `%`) and skips the blob-resplitting heuristics
    /// (3-blob and 2-blob overlap recovery, speckle removal, light-merge
    /// column search, hole-noise removal) that reach back into
    /// `Blob`/`Bitmap` internals rather than just re-ranking guesses
    /// already on the line.
    pub fn recognize2(&mut self, charset: &Charset) {
        if self.big_initials >= self.characters() { return; }

        // choose between 'B' and 'a'
        let mut begin = self.big_initials;
        for i in self.big_initials..self.characters() {
            if self.character(i).maybe(' ' as i32) { begin = i + 1; continue; }
            if self.character(i).guesses() != 2 { continue; }
            let code = self.character(i).guess(0).code;
            if code != 'B' as i32 || self.character(i).guess(1).code != 'a' as i32 { continue; }
            let c1_height = self.character(i).height();
            if 4 * c1_height > 5 * self.mean_height() { continue; }
            for j in begin..self.characters() {
                if j == i { continue; }
                let c2 = self.character(j);
                if c2.maybe(' ' as i32) { break; }
                if c2.guesses() == 0 { continue; }
                let code2 = c2.guess(0).code;
                if code2 >= 128 { continue; }
                let c2_height = c2.height();
                let swap = (ucs::isupper(code2) && code2 != 'B' as i32 && code2 != 'Q' as i32 && 5 * c1_height < 4 * c2_height)
                    || (ucs::islower_small(code2)
                        && code2 != 'r' as i32
                        && !ucs::islower_small_ambiguous(code2)
                        && (c1_height <= c2_height || similar(c1_height, c2_height, 10, 1)));
                if swap { self.character_mut(i).swap_guesses(0, 1); break; }
            }
        }

        // choose between '8' and 'a' or 'e'
        let mut begin = self.big_initials;
        for i in self.big_initials..self.characters() {
            if self.character(i).maybe(' ' as i32) { begin = i + 1; continue; }
            if self.character(i).guesses() != 2 || self.character(i).guess(1).code != '8' as i32 { continue; }
            let code = self.character(i).guess(0).code;
            let c1_height = self.character(i).height();
            if (code != 'a' as i32 && code != 'e' as i32) || 5 * c1_height < 4 * self.mean_height() { continue; }
            for j in begin..self.characters() {
                if j == i { continue; }
                let c2 = self.character(j);
                if c2.maybe(' ' as i32) { break; }
                if c2.guesses() == 0 { continue; }
                let code2 = c2.guess(0).code;
                if code2 >= 128 { continue; }
                let c2_height = c2.height();
                let swap = ((ucs::isalpha(code2) || code2 == ':' as i32) && 4 * c1_height > 5 * c2_height)
                    || ((ucs::isdigit(code2) || ucs::isupper(code2) || code2 == 'l' as i32)
                        && (c1_height >= c2_height || similar(c1_height, c2_height, 10, 1)));
                if swap { self.character_mut(i).swap_guesses(0, 1); break; }
            }
        }

        self.check_lower_ambiguous();

        // transform 'i' into 'j' when a vowel neighbor sits noticeably
        // higher, the tell for a dieresis mistaken for the dot of an 'i'
        for i in self.big_initials..self.characters() {
            if self.character(i).guesses() != 1 || self.character(i).guess(0).code != 'i' as i32 { continue; }
            let mut j = i as i32 + 1;
            if j as usize >= self.characters() || self.character(j as usize).guesses() == 0 {
                j = i as i32 - 1;
                if j < self.big_initials as i32 || self.character(j as usize).guesses() == 0 { continue; }
            }
            let c2 = self.character(j as usize);
            let code2 = c2.guess(0).code;
            if ucs::isvowel(code2) && self.character(i).bottom() >= c2.bottom() + c2.height() / 4 {
                self.character_mut(i).insert_guess(0, 'j' as i32, 1);
            }
        }

        // transform 'O' or 'l' into '0' or '1' next to a digit
        let mut begin = self.big_initials;
        for i in self.big_initials..self.characters() {
            if self.character(i).maybe(' ' as i32) { begin = i + 1; continue; }
            if self.character(i).guesses() == 0 { continue; }
            let code = self.character(i).guess(0).code;
            if code != 'o' as i32 && code != 'O' as i32 && code != 'l' as i32 { continue; }
            for j in begin..self.characters() {
                if j == i { continue; }
                let c2 = self.character(j);
                if c2.maybe(' ' as i32) { break; }
                if c2.guesses() == 0 { continue; }
                let code2 = c2.guess(0).code;
                if ucs::isdigit(code2) {
                    if similar(self.character(i).height(), c2.height(), 10, 1) {
                        let value = self.character(i).guess(0).value;
                        let digit = if code == 'l' as i32 { '1' } else { '0' };
                        self.character_mut(i).insert_guess(0, digit as i32, value + 1);
                    }
                    break;
                }
                if ucs::isalpha(code2) && code2 != 'o' as i32 && code2 != 'O' as i32 && code2 != 'l' as i32 {
                    break;
                }
            }
        }

        // transform words like 'lO.OOO' into numbers like '10.000'
        let mut begin = self.big_initials;
        while begin < self.characters() {
            let end = self.find_space_or_hyphen(begin);
            if end - begin >= 2 && self.character(begin).guesses() != 0 {
                let height = self.character(begin).height();
                let code = self.character(begin).guess(0).code;
                if ucs::isdigit(code) || code == 'l' as i32 || code == 'O' as i32 || code == 'o' as i32 {
                    let mut digits = 1;
                    let mut i = begin + 1;
                    while i < end {
                        let c = self.character(i);
                        if c.guesses() == 0 { break; }
                        let code = c.guess(0).code;
                        let mut valid = false;
                        if (ucs::isdigit(code) || code == 'l' as i32 || code == 'O' as i32 || code == 'o' as i32)
                            && similar(c.height(), height, 10, 1)
                        {
                            valid = true;
                            digits += 1;
                        }
                        if code == '.' as i32 || code == ',' as i32 || code == ':' as i32 || code == '+' as i32 || code == '-' as i32 {
                            valid = true;
                        }
                        if !valid { break; }
                        i += 1;
                    }
                    if i >= end && digits >= 2 {
                        for k in begin..end {
                            let code = self.character(k).guess(0).code;
                            let digit = if code == 'l' as i32 {
                                '1' as i32
                            } else if code == 'O' as i32 || code == 'o' as i32 {
                                '0' as i32
                            } else {
                                0
                            };
                            if digit != 0 {
                                let value = self.character(k).guess(0).value;
                                self.character_mut(k).insert_guess(0, digit, value + 1);
                            }
                        }
                    }
                }
            }
            begin = end + 1;
        }

        // choose between 'a' and 'Q'
        for i in self.big_initials..self.characters() {
            if self.character(i).guesses() != 2 { continue; }
            if self.character(i).guess(0).code != 'a' as i32 || self.character(i).guess(1).code != 'Q' as i32 {
                continue;
            }
            if 4 * self.character(i).height() > 5 * self.mean_height() {
                self.character_mut(i).swap_guesses(0, 1);
                self.check_lower_ambiguous();
                continue;
            }
            if i + 1 < self.characters() && self.character(i + 1).guesses() != 0 {
                let code = self.character(i + 1).guess(0).code;
                if ucs::ishigh(code) && 10 * self.character(i).height() > 9 * self.character(i + 1).height() {
                    self.character_mut(i).swap_guesses(0, 1);
                    self.check_lower_ambiguous();
                    continue;
                }
            }
            if i > self.big_initials && self.character(i - 1).guesses() != 0 {
                let code = self.character(i - 1).guess(0).code;
                if ucs::ishigh(code) && 10 * self.character(i).height() > 9 * self.character(i - 1).height() {
                    self.character_mut(i).swap_guesses(0, 1);
                    self.check_lower_ambiguous();
                }
            }
        }

        // transform a vertical bar into 'l' or 'I' (or a 'l' into an 'I')
        for i in self.big_initials..self.characters() {
            if self.character(i).guesses() != 1 { continue; }
            let code = self.character(i).guess(0).code;
            if code != '|' as i32 && code != 'l' as i32 { continue; }
            let lcode = if i > 0 && self.character(i - 1).guesses() != 0 { self.character(i - 1).guess(0).code } else { 0 };
            let rcode = if i + 1 < self.characters() && self.character(i + 1).guesses() != 0 {
                self.character(i + 1).guess(0).code
            } else {
                0
            };
            if (ucs::isupper(rcode) || ucs::isdigit(rcode)) && (lcode == 0 || ucs::isupper(lcode) || !ucs::isalnum(lcode))
            {
                self.character_mut(i).insert_guess(0, 'I' as i32, 1);
                continue;
            }
            if code == 'l' as i32 { continue; }
            if ucs::isalpha(lcode) || ucs::isalpha(rcode) {
                self.character_mut(i).insert_guess(0, 'l' as i32, 1);
                continue;
            }
            if rcode == '|' as i32 && (lcode == 0 || !ucs::isalnum(lcode)) {
                if i + 2 < self.characters()
                    && self.character(i + 2).guesses() != 0
                    && ucs::isalpha(self.character(i + 2).guess(0).code)
                {
                    self.character_mut(i).insert_guess(0, 'l' as i32, 1);
                    continue;
                }
                if i >= 2 && self.character(i - 2).guesses() != 0 && ucs::isalpha(self.character(i - 2).guess(0).code) {
                    self.character_mut(i).insert_guess(0, 'l' as i32, 1);
                    continue;
                }
            }
        }

        // transform a vertical bar into 'I' at end of word
        let mut begin = self.big_initials;
        while begin < self.characters() {
            let end = self.find_space_or_hyphen(begin);
            if end - begin >= 3 {
                let ce_idx = end - 1;
                if self.character(ce_idx).maybe('|' as i32) && !self.character(ce_idx).maybe('I' as i32) {
                    let height = self.character(ce_idx).height();
                    let mut i = begin;
                    while i < end - 1 {
                        let c = self.character(i);
                        if c.guesses() == 0 { break; }
                        let code = c.guess(0).code;
                        if (!ucs::isupper(code) && !ucs::isdigit(code)) || !similar(c.height(), height, 10, 1) {
                            break;
                        }
                        i += 1;
                    }
                    if i >= end - 1 {
                        let value = self.character(ce_idx).guess(0).value;
                        self.character_mut(ce_idx).insert_guess(0, 'I' as i32, value + 1);
                    }
                }
            }
            begin = end + 1;
        }

        // transform a SSCEDI to a CSCEDI
        if charset.enabled(Charset::ISO_8859_9) {
            for i in self.big_initials..self.characters() {
                if self.character(i).guesses() != 1 || self.character(i).guess(0).code != ucs::code::SSCEDI {
                    continue;
                }
                let top = self.character(i).top();
                let mut promoted = false;
                if i > self.big_initials && self.character(i - 1).guesses() != 0 {
                    let code = self.character(i - 1).guess(0).code;
                    let top1 = self.character(i - 1).top();
                    if (ucs::islower(code) && top < top1 - 2)
                        || (ucs::base_letter(code) != 0 && code != ucs::code::SINODOT && similar(top, top1, 10, 1))
                    {
                        self.character_mut(i).insert_guess(0, ucs::code::CSCEDI, 1);
                        promoted = true;
                    }
                }
                if !promoted && i + 1 < self.characters() && self.character(i + 1).guesses() != 0 {
                    let code = self.character(i + 1).guess(0).code;
                    let top1 = self.character(i + 1).top();
                    if (ucs::islower(code) && top < top1 - 2)
                        || (ucs::base_letter(code) != 0 && code != ucs::code::SINODOT && similar(top, top1, 10, 1))
                    {
                        self.character_mut(i).insert_guess(0, ucs::code::CSCEDI, 1);
                    }
                }
            }
        }

        // join a 'n' followed by a 'I' into a 'm'
        let mut i = self.big_initials;
        while i + 1 < self.characters() {
            if self.character(i).guesses() == 1 && self.character(i + 1).guesses() == 1 {
                let code1 = self.character(i).guess(0).code;
                let code2 = self.character(i + 1).guess(0).code;
                if code1 == 'n' as i32
                    && (code2 == 'I' as i32 || code2 == 'l' as i32)
                    && similar(self.character(i).height(), self.character(i + 1).height(), 10, 1)
                    && self.character(i + 1).left() - self.character(i).right() < self.character(i + 1).width()
                {
                    let mut next = self.characters[i + 1].clone();
                    self.characters[i].join(&mut next);
                    self.characters[i].only_guess('m' as i32, 0);
                    self.delete_character(i + 1);
                    continue;
                }
            }
            i += 1;
        }

        // join the sequence deg/'/o ' into a '%'
        let mut i = self.big_initials;
        while i + 2 < self.characters() {
            if self.character(i).guesses() == 1 && self.character(i).guess(0).code == ucs::code::DEG {
                let next_slash = self.character(i + 1).maybe('/' as i32);
                let next_o = self.character(i + 2).maybe('o' as i32);
                let trailing_space = i + 3 >= self.characters() || self.character(i + 3).maybe(' ' as i32);
                if next_slash && next_o && trailing_space {
                    let mut c2 = self.characters[i + 1].clone();
                    let mut c3 = self.characters[i + 2].clone();
                    self.characters[i].join(&mut c2);
                    self.characters[i].join(&mut c3);
                    self.delete_character(i + 2);
                    self.delete_character(i + 1);
                    self.characters[i].only_guess('%' as i32, 0);
                }
            }
            i += 1;
        }
    }

    /// Keeps/narrows guesses per `filter`, dropping blank lines a filter
    /// emptied and the stray spaces left on either side of a deletion.
    pub fn apply_filter(&mut self, filter: Filter) {
        let mut flag = false;
        let mut i = 0;
        while i < self.characters() {
            let had_guesses = self.character(i).guesses() != 0;
            self.character_mut(i).apply_filter(filter);
            if had_guesses && self.character(i).guesses() == 0 {
                self.delete_character(i);
                flag = true;
            } else {
                i += 1;
            }
        }
        if flag {
            let mut i = self.characters() as i32 - 1;
            while i >= 0 {
                let idx = i as usize;
                let is_space = self.character(idx).maybe(' ' as i32);
                let edge = idx >= self.characters() - 1 || (idx > 0 && self.character(idx - 1).maybe(' ' as i32));
                if is_space && edge { self.delete_character(idx); }
                i -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrad_region::Blob;

    fn char_at(l: i32, t: i32, r: i32, b: i32) -> Character {
        let mut blob = Blob::blank(l, t, r, b).unwrap();
        for row in t..=b { for col in l..=r { blob.add_point(row, col); } }
        Character::from_blob(blob)
    }

    #[test]
    fn shift_characterp_orders_by_hcenter() {
        let mut line = Textline::new();
        line.shift_characterp(char_at(20, 0, 25, 10), false);
        line.shift_characterp(char_at(0, 0, 5, 10), false);
        assert_eq!(line.character(0).left(), 0);
        assert_eq!(line.character(1).left(), 20);
    }

    #[test]
    fn insert_spaces_splits_a_widely_gapped_line() {
        let mut line = Textline::new();
        line.shift_characterp(char_at(0, 0, 8, 10), false);
        line.shift_characterp(char_at(9, 0, 17, 10), false);
        line.shift_characterp(char_at(60, 0, 68, 10), false);
        line.shift_characterp(char_at(69, 0, 77, 10), false);
        line.set_track();
        line.insert_spaces();
        assert!(line.characters() > 4);
    }

    #[test]
    fn mean_height_skips_space_guesses() {
        let mut line = Textline::new();
        line.shift_characterp(char_at(0, 0, 8, 10), false);
        line.shift_characterp(char_at(20, 0, 28, 20), false);
        assert_eq!(line.mean_height(), 15);
    }
}
