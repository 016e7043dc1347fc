//! A resizable 2-D bit grid anchored to a [`Rectangle`], plus the probe
//! routines the classifier cascade uses to walk a glyph's silhouette
//! (`seek_*`, `escape_*`, `follow_*`, `top_hook`/`bottom_hook`).
//!
//! Grounded on `bitmap.h`/`bitmap.cc`. The original stores `uint8_t` rows
//! "because it's faster than `vector<bool>`" on their target compilers;
//! here `Vec<Vec<bool>>` is kept for directness since `vector<bool>`'s
//! historical bit-packing slowness doesn't carry over to `Vec<bool>`.

use crate::error::Result;
use crate::rectangle::Rectangle;

#[derive(Debug, Clone)]
pub struct Bitmap {
    rect: Rectangle,
    data: Vec<Vec<bool>>,
}

impl Bitmap {
    /// Creates a blank bitmap covering `rect`.
    ///
    /// # Errors
    /// Propagates [`Rectangle::new`]'s geometry error.
    pub fn blank(l: i32, t: i32, r: i32, b: i32) -> Result<Self> {
        let rect = Rectangle::new(l, t, r, b)?;
        let data = vec![vec![false; rect.width() as usize]; rect.height() as usize];
        Ok(Self { rect, data })
    }

    /// Crops a sub-bitmap out of `source`. `re` must lie entirely within
    /// `source`'s bounds.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidGeometry`] if `re` is not
    /// included in `source`.
    pub fn crop(source: &Bitmap, re: Rectangle) -> Result<Self> {
        if !source.rect.includes(&re) {
            return Err(crate::error::Error::InvalidGeometry(
                "crop rectangle exceeds source bitmap".into(),
            ));
        }
        let ldiff = (re.left() - source.left()) as usize;
        let tdiff = (re.top() - source.top()) as usize;
        let w = re.width() as usize;
        let data = (0..re.height() as usize)
            .map(|row| source.data[row + tdiff][ldiff..ldiff + w].to_vec())
            .collect();
        Ok(Self { rect: re, data })
    }

    pub const fn rect(&self) -> &Rectangle { &self.rect }
    pub fn left(&self) -> i32 { self.rect.left() }
    pub fn top(&self) -> i32 { self.rect.top() }
    pub fn right(&self) -> i32 { self.rect.right() }
    pub fn bottom(&self) -> i32 { self.rect.bottom() }
    pub fn height(&self) -> i32 { self.rect.height() }
    pub fn width(&self) -> i32 { self.rect.width() }
    pub fn size(&self) -> i32 { self.rect.size() }
    pub fn vcenter(&self) -> i32 { self.rect.vcenter() }
    pub fn hcenter(&self) -> i32 { self.rect.hcenter() }
    pub fn vpos(&self, p: i32) -> i32 { self.rect.vpos(p) }
    pub fn hpos(&self, p: i32) -> i32 { self.rect.hpos(p) }
    pub fn h_overlaps(&self, other: &Bitmap) -> bool { self.rect.h_overlaps(&other.rect) }
    pub fn v_overlaps(&self, other: &Bitmap) -> bool { self.rect.v_overlaps(&other.rect) }
    pub fn h_includes(&self, other: &Bitmap) -> bool { self.rect.h_includes(&other.rect) }
    pub fn v_includes(&self, row: i32) -> bool { self.rect.v_includes_row(row) }
    pub fn includes_hcenter(&self, other: &Bitmap) -> bool { self.rect.includes_hcenter(&other.rect) }
    pub fn includes_vcenter(&self, other: &Bitmap) -> bool { self.rect.includes_vcenter(&other.rect) }
    pub fn v_overlap_percent(&self, other: &Bitmap) -> i32 { self.rect.v_overlap_percent(&other.rect) }
    pub fn h_precedes(&self, other: &Bitmap) -> bool { self.rect.h_precedes(&other.rect) }
    pub fn is_hcentred_in(&self, other: &Bitmap) -> bool { self.rect.is_hcentred_in(&other.rect) }
    pub fn is_vcentred_in(&self, other: &Bitmap) -> bool { self.rect.is_vcentred_in(&other.rect) }

    pub fn set_left(&mut self, l: i32) {
        if l == self.left() { return; }
        if l < self.left() {
            let n = (self.left() - l) as usize;
            for row in self.data.iter_mut() {
                row.splice(0..0, std::iter::repeat(false).take(n));
            }
        } else {
            let n = (l - self.left()) as usize;
            for row in self.data.iter_mut() {
                row.drain(0..n);
            }
        }
        let _ = self.rect.set_left(l);
    }

    pub fn set_top(&mut self, t: i32) {
        if t == self.top() { return; }
        if t < self.top() {
            let n = (self.top() - t) as usize;
            let w = self.width() as usize;
            self.data.splice(0..0, std::iter::repeat_with(|| vec![false; w]).take(n));
        } else {
            let n = (t - self.top()) as usize;
            self.data.drain(0..n);
        }
        let _ = self.rect.set_top(t);
    }

    pub fn set_right(&mut self, r: i32) {
        if r == self.right() { return; }
        let _ = self.rect.set_right(r);
        let w = self.width() as usize;
        for row in self.data.iter_mut() {
            row.resize(w, false);
        }
    }

    pub fn set_bottom(&mut self, b: i32) {
        if b == self.bottom() { return; }
        let old_height = self.data.len();
        let _ = self.rect.set_bottom(b);
        let w = self.width() as usize;
        self.data.resize(self.height() as usize, Vec::new());
        for row in self.data.iter_mut().skip(old_height) {
            row.resize(w, false);
        }
    }

    pub fn get_bit(&self, row: i32, col: i32) -> bool {
        self.data[(row - self.top()) as usize][(col - self.left()) as usize]
    }

    pub fn set_bit(&mut self, row: i32, col: i32, bit: bool) {
        let r = (row - self.top()) as usize;
        let c = (col - self.left()) as usize;
        self.data[r][c] = bit;
    }

    pub fn add_bitmap(&mut self, bm: &Bitmap) {
        self.add_rectangle(bm.rect);
        for row in bm.top()..=bm.bottom() {
            for col in bm.left()..=bm.right() {
                if bm.get_bit(row, col) { self.set_bit(row, col, true); }
            }
        }
    }

    pub fn add_point(&mut self, row: i32, col: i32) {
        if col > self.right() { self.set_right(col); } else if col < self.left() { self.set_left(col); }
        if row > self.bottom() { self.set_bottom(row); } else if row < self.top() { self.set_top(row); }
        self.set_bit(row, col, true);
    }

    pub fn add_rectangle(&mut self, re: Rectangle) {
        if re.left() < self.left() { self.set_left(re.left()); }
        if re.top() < self.top() { self.set_top(re.top()); }
        if re.right() > self.right() { self.set_right(re.right()); }
        if re.bottom() > self.bottom() { self.set_bottom(re.bottom()); }
    }

    /// Shrinks the top/bottom edges to the first/last non-empty row.
    /// Returns `false` if the bitmap has no set bits.
    pub fn adjust_height(&mut self) -> bool {
        let Some(row1) = (self.top()..=self.bottom())
            .find(|&row| (self.left()..=self.right()).any(|col| self.get_bit(row, col)))
        else {
            return false;
        };
        let row2 = (row1..=self.bottom())
            .rev()
            .find(|&row| (self.left()..=self.right()).any(|col| self.get_bit(row, col)))
            .unwrap_or(row1);
        if row1 > self.top() { self.set_top(row1); }
        if row2 < self.bottom() { self.set_bottom(row2); }
        true
    }

    /// Shrinks the left/right edges to the first/last non-empty column.
    /// Returns `false` if the bitmap has no set bits.
    pub fn adjust_width(&mut self) -> bool {
        let Some(col1) = (self.left()..=self.right())
            .find(|&col| (self.top()..=self.bottom()).any(|row| self.get_bit(row, col)))
        else {
            return false;
        };
        let col2 = (col1..=self.right())
            .rev()
            .find(|&col| (self.top()..=self.bottom()).any(|row| self.get_bit(row, col)))
            .unwrap_or(col1);
        if col1 >= col2 { return false; }
        if col1 > self.left() { self.set_left(col1); }
        if col2 < self.right() { self.set_right(col2); }
        true
    }

    /// Total number of set bits.
    pub fn area(&self) -> i32 {
        let mut a = 0;
        for row in self.top()..=self.bottom() {
            for col in self.left()..=self.right() {
                if self.get_bit(row, col) { a += 1; }
            }
        }
        a
    }

    /// Set bits inside the central octagon obtained by beveling the four
    /// corners by `bevel = 29% * min(height, width)`. Used by the classifier
    /// to score "solidity" while ignoring rounded corners.
    pub fn area_octagon(&self) -> i32 {
        let bevel = (29 * self.height().min(self.width())) / 100;
        let l = self.left() + bevel;
        let r = self.right() - bevel;
        let mut a = 0;
        for i in 0..bevel {
            let row = self.top() + i;
            for col in (l - i)..=(r + i) {
                if self.get_bit(row, col) { a += 1; }
            }
        }
        for row in (self.top() + bevel)..=(self.bottom() - bevel) {
            for col in self.left()..=self.right() {
                if self.get_bit(row, col) { a += 1; }
            }
        }
        for i in (0..bevel).rev() {
            let row = self.bottom() - i;
            for col in (l - i)..=(r + i) {
                if self.get_bit(row, col) { a += 1; }
            }
        }
        a
    }

    pub fn size_octagon(&self) -> i32 {
        let bevel = (29 * self.height().min(self.width())) / 100;
        self.size() - 2 * bevel * (bevel + 1)
    }

    pub fn seek_left(&self, row: i32, col: i32, black: bool) -> i32 {
        let mut c = col;
        while c > self.left() && self.get_bit(row, c - 1) != black { c -= 1; }
        c
    }

    pub fn seek_top(&self, row: i32, col: i32, black: bool) -> i32 {
        let mut r = row;
        while r > self.top() && self.get_bit(r - 1, col) != black { r -= 1; }
        r
    }

    pub fn seek_right(&self, row: i32, col: i32, black: bool) -> i32 {
        let mut c = col;
        while c < self.right() && self.get_bit(row, c + 1) != black { c += 1; }
        c
    }

    pub fn seek_bottom(&self, row: i32, col: i32, black: bool) -> i32 {
        let mut r = row;
        while r < self.bottom() && self.get_bit(r + 1, col) != black { r += 1; }
        r
    }

    pub fn escape_left(&self, row: i32, mut col: i32) -> bool {
        if self.get_bit(row, col) { return false; }
        let (mut u, mut d) = (row, row);
        while u > self.top() + 1 { if self.get_bit(u - 1, col) { break; } u -= 1; }
        while d < self.bottom() - 1 { if self.get_bit(d + 1, col) { break; } d += 1; }
        loop {
            col -= 1;
            if u > d || col < self.left() { break; }
            if u > self.top() + 1 && !self.get_bit(u, col) { u -= 1; }
            if d < self.bottom() - 1 && !self.get_bit(d, col) { d += 1; }
            while u <= d && self.get_bit(u, col) { u += 1; }
            while u <= d && self.get_bit(d, col) { d -= 1; }
        }
        col < self.left()
    }

    pub fn escape_top(&self, row: i32, col: i32) -> bool {
        if self.get_bit(row, col) { return false; }
        let (mut l, mut r) = (col, col);
        while l > self.left() + 1 { if self.get_bit(row, l - 1) { break; } l -= 1; }
        while r < self.right() - 1 { if self.get_bit(row, r + 1) { break; } r += 1; }
        let mut row = row;
        loop {
            row -= 1;
            if l > r || row < self.top() { break; }
            if l > self.left() + 1 && !self.get_bit(row, l) { l -= 1; }
            if r < self.right() - 1 && !self.get_bit(row, r) { r += 1; }
            while l <= r && self.get_bit(row, l) { l += 1; }
            while l <= r && self.get_bit(row, r) { r -= 1; }
        }
        row < self.top()
    }

    pub fn escape_right(&self, row: i32, mut col: i32) -> bool {
        if self.get_bit(row, col) { return false; }
        let (mut u, mut d) = (row, row);
        while u > self.top() + 1 { if self.get_bit(u - 1, col) { break; } u -= 1; }
        while d < self.bottom() - 1 { if self.get_bit(d + 1, col) { break; } d += 1; }
        loop {
            col += 1;
            if u > d || col > self.right() { break; }
            if u > self.top() + 1 && !self.get_bit(u, col) { u -= 1; }
            if d < self.bottom() - 1 && !self.get_bit(d, col) { d += 1; }
            while u <= d && self.get_bit(u, col) { u += 1; }
            while u <= d && self.get_bit(d, col) { d -= 1; }
        }
        col > self.right()
    }

    pub fn escape_bottom(&self, row: i32, col: i32) -> bool {
        if self.get_bit(row, col) { return false; }
        let (mut l, mut r) = (col, col);
        while l > self.left() + 1 { if self.get_bit(row, l - 1) { break; } l -= 1; }
        while r < self.right() - 1 { if self.get_bit(row, r + 1) { break; } r += 1; }
        let mut row = row;
        loop {
            row += 1;
            if l > r || row > self.bottom() { break; }
            if l > self.left() + 1 && !self.get_bit(row, l) { l -= 1; }
            if r < self.right() - 1 && !self.get_bit(row, r) { r += 1; }
            while l <= r && self.get_bit(row, l) { l += 1; }
            while l <= r && self.get_bit(row, r) { r -= 1; }
        }
        row > self.bottom()
    }

    /// Starting from the black run containing `(row, col)`, propagate the
    /// run's horizontal extent upward while any part of it stays black.
    /// Returns the topmost row the run is still alive at (plus one, past
    /// where it died).
    pub fn follow_top(&self, row: i32, col: i32) -> i32 {
        if !self.get_bit(row, col) { return row; }
        let width = self.width() as usize;
        let mut array = vec![false; width];
        let mut c = col;
        while c > self.left() && self.get_bit(row, c - 1) { c -= 1; }
        let run_start = c;
        c = col;
        while c < self.right() && self.get_bit(row, c + 1) { c += 1; }
        let run_end = c;
        for i in (run_start - self.left())..=(run_end - self.left()) {
            array[i as usize] = true;
        }

        let mut r = row;
        loop {
            r -= 1;
            if r < self.top() { break; }
            let mut alive = false;
            for i in 0..width {
                if array[i] {
                    if !self.get_bit(r, self.left() + i as i32) { array[i] = false; }
                    else { alive = true; }
                }
            }
            if !alive { break; }
            for i in 1..width {
                if array[i - 1] && !array[i] && self.get_bit(r, self.left() + i as i32) { array[i] = true; }
            }
            for i in (0..width.saturating_sub(1)).rev() {
                if array[i + 1] && !array[i] && self.get_bit(r, self.left() + i as i32) { array[i] = true; }
            }
        }
        r + 1
    }

    /// Mirror of [`Self::follow_top`], propagating downward.
    pub fn follow_bottom(&self, row: i32, col: i32) -> i32 {
        if !self.get_bit(row, col) { return row; }
        let width = self.width() as usize;
        let mut array = vec![false; width];
        let mut c = col;
        while c > self.left() && self.get_bit(row, c - 1) { c -= 1; }
        let run_start = c;
        c = col;
        while c < self.right() && self.get_bit(row, c + 1) { c += 1; }
        let run_end = c;
        for i in (run_start - self.left())..=(run_end - self.left()) {
            array[i as usize] = true;
        }

        let mut r = row;
        loop {
            r += 1;
            if r > self.bottom() { break; }
            let mut alive = false;
            for i in 0..width {
                if array[i] {
                    if !self.get_bit(r, self.left() + i as i32) { array[i] = false; }
                    else { alive = true; }
                }
            }
            if !alive { break; }
            for i in 1..width {
                if array[i - 1] && !array[i] && self.get_bit(r, self.left() + i as i32) { array[i] = true; }
            }
            for i in (0..width.saturating_sub(1)).rev() {
                if array[i + 1] && !array[i] && self.get_bit(r, self.left() + i as i32) { array[i] = true; }
            }
        }
        r - 1
    }

    /// Detects an inverted-U ("hook") near the top of the glyph, as seen in
    /// cursive capitals like a hooked `B`/`R` stem. `hdiff` reports which of
    /// the hook's two legs runs deeper.
    pub fn top_hook(&self) -> Option<i32> {
        let (mut lcol, mut rcol) = (0, 0);
        let mut black_section;
        let mut wmax = 0;
        let mut row = self.top() + 1;
        loop {
            if row >= self.vcenter() { return None; }
            let (mut l, mut r): (i32, i32) = (-1, -2);
            let mut prev_black = false;
            black_section = 0;
            for col in self.left()..=self.right() {
                let black = self.get_bit(row, col);
                if black {
                    if !prev_black { black_section += 1; if black_section == 2 { rcol = col; } }
                    r = col;
                    if l < 0 { l = col; }
                } else if prev_black && black_section == 1 {
                    lcol = col - 1;
                }
                prev_black = black;
            }
            let width = r - l + 1;
            if 10 * width <= 9 * wmax { return None; }
            if width > wmax { wmax = width; }
            if black_section >= 2 { break; }
            row += 1;
        }

        if black_section != 2 { return None; }
        if self.escape_top(row, lcol + 1) { return None; }
        let lrow = self.follow_bottom(row, lcol);
        let rrow = self.follow_bottom(row, rcol);
        if lrow <= row || rrow <= row { return None; }
        Some(lrow - rrow)
    }

    /// Mirror of [`Self::top_hook`], searching the bottom 20% of the glyph.
    pub fn bottom_hook(&self) -> Option<i32> {
        let mut wmax = 0;
        let mut row = self.bottom();
        while row > self.vpos(80) {
            let mut l = self.left();
            while l <= self.right() && !self.get_bit(row, l) { l += 1; }
            let mut r = self.right();
            while r > l && !self.get_bit(row, r) { r -= 1; }
            let w = r - l + 1;
            if w > wmax { wmax = w; }
            if 4 * w >= self.width() {
                let mut i = l + 1;
                while i < r && self.get_bit(row, i) { i += 1; }
                if i >= r { break; }
            }
            row -= 1;
        }

        if row <= self.vpos(80) { return None; }
        let (mut lcol, mut rcol) = (0, 0);
        while { row -= 1; row > self.vcenter() } {
            let (mut l, mut r): (i32, i32) = (-1, -2);
            let mut prev_black = false;
            let mut black_section = 0;
            for col in self.left()..=self.right() {
                let black = self.get_bit(row, col);
                if black {
                    if !prev_black { black_section += 1; if black_section == 2 { rcol = col; } }
                    r = col;
                    if l < 0 { l = col; }
                } else if prev_black && black_section == 1 {
                    lcol = col - 1;
                }
                prev_black = black;
            }
            let w = r - l + 1;
            if black_section > 2 || 10 * w <= 8 * wmax { break; }
            if w > wmax { wmax = w; }
            if black_section == 2 && rcol - lcol >= 2 {
                if self.escape_bottom(row, lcol + 1) { break; }
                return Some(self.follow_top(row, lcol) - self.follow_top(row, rcol));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&str]) -> Bitmap {
        let h = rows.len() as i32;
        let w = rows[0].len() as i32;
        let mut bm = Bitmap::blank(0, 0, w - 1, h - 1).unwrap();
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == '#' { bm.set_bit(row as i32, col as i32, true); }
            }
        }
        bm
    }

    #[test]
    fn area_counts_set_bits() {
        let bm = from_rows(&["##.", ".#.", "..."]);
        assert_eq!(bm.area(), 3);
    }

    #[test]
    fn seek_left_stops_on_color_change() {
        let bm = from_rows(&["..##"]);
        assert_eq!(bm.seek_left(0, 3, true), 2);
    }

    #[test]
    fn adjust_height_shrinks_to_content() {
        let mut bm = Bitmap::blank(0, 0, 4, 4).unwrap();
        bm.set_bit(2, 2, true);
        assert!(bm.adjust_height());
        assert_eq!(bm.top(), 2);
        assert_eq!(bm.bottom(), 2);
    }

    #[test]
    fn adjust_height_false_when_empty() {
        let mut bm = Bitmap::blank(0, 0, 2, 2).unwrap();
        assert!(!bm.adjust_height());
    }

    #[test]
    fn follow_top_propagates_through_slanted_run() {
        let bm = from_rows(&[
            ".#.",
            "##.",
            ".#.",
        ]);
        assert_eq!(bm.follow_top(2, 1), 0);
    }
}
