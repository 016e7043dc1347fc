//! Derived shape features layered on top of a blob's six profiles:
//! horizontal/vertical bar detection, per-row/per-column vertical-trace
//! counts, and the no-hole-letter test leaves that need nothing but those
//! profiles and the bitmap (`test_misc` plus the `test_c`/`test_frst`/
//! `test_G`/`test_HKMNUuvwYy`/`test_hknwx` family).
//!
//! The 1-hole leaves (`test_49ARegpq`/`test_4ADQao`/`test_6abd`), the
//! 0-hole "easy" leaves (`test_solid`/`test_comma`/`test_easy`/
//! `test_line`), and the two leaves that return a `UCS` code point
//! (`test_235Esz`/`test_CEFIJLlT`/`test_s_cedilla`) all live in
//! `ocrad-classify::leaf` instead: the first two need the owning `Blob`
//! for its holes, which this crate can't see, and the last needs the
//! `UCS` table, which lives in the crate one layer up (this crate can't
//! depend on it without a cycle).
//!
//! Grounded on `feats.h`/`feats.cc`/`feats_test0.cc`.

use ocrad_core::{similar, Bitmap, Charset, Csegment, Rectangle};

use crate::profile::{Kind, Profile};

pub struct Features<'a> {
    bm: &'a Bitmap,
    hbars: Option<Vec<Rectangle>>,
    vbars: Option<Vec<Rectangle>>,
    row_scan: Vec<Vec<Csegment>>,
    col_scan: Vec<Vec<Csegment>>,
    pub lp: Profile<'a>,
    pub tp: Profile<'a>,
    pub rp: Profile<'a>,
    pub bp: Profile<'a>,
    pub hp: Profile<'a>,
    pub wp: Profile<'a>,
}

impl<'a> Features<'a> {
    pub fn new(bm: &'a Bitmap) -> Self {
        Self {
            bm,
            hbars: None,
            vbars: None,
            row_scan: Vec::new(),
            col_scan: Vec::new(),
            lp: Profile::new(bm, Kind::Left),
            tp: Profile::new(bm, Kind::Top),
            rp: Profile::new(bm, Kind::Right),
            bp: Profile::new(bm, Kind::Bottom),
            hp: Profile::new(bm, Kind::Height),
            wp: Profile::new(bm, Kind::Width),
        }
    }

    pub const fn bitmap(&self) -> &'a Bitmap { self.bm }

    pub fn hbar(&self, i: usize) -> Rectangle { self.hbars.as_ref().unwrap()[i] }
    pub fn vbar(&self, i: usize) -> Rectangle { self.vbars.as_ref().unwrap()[i] }

    /// Finds maximal runs of rows whose widest black segment spans at
    /// least half the glyph's width and whose aspect is bar-like (wider
    /// than 1.5x its own height).
    pub fn hbars(&mut self) -> i32 {
        if self.hbars.is_some() { return self.hbars.as_ref().unwrap().len() as i32; }
        let b = self.bm;
        let limit = self.wp.max() / 2;
        let mut bars = Vec::new();
        let mut state = 0;
        let (mut begin, mut l, mut r) = (0, 0, 0);
        let mut count = vec![0i32; b.height() as usize];

        for row in b.top()..=b.bottom() {
            let (mut c, mut lt, mut rt, mut x) = (0, 0, 0, 0);
            let mut maxcount = 0;
            for col in b.left()..=b.right() {
                if b.get_bit(row, col) {
                    c += 1;
                    x = col;
                    if col < b.right() { continue; }
                }
                if c > maxcount { maxcount = c; rt = x; lt = rt - c + 1; }
                c = 0;
            }
            count[(row - b.top()) as usize] = maxcount;

            // Mirrors the original's fallthrough switch: entering state 1
            // from state 0 on this same row immediately runs state 1's body
            // too, so a bar ending on its very first row still gets closed.
            if state == 0 {
                if maxcount > limit { state = 1; begin = row; l = lt; r = rt; } else { continue; }
            }
            if maxcount > limit {
                if lt < l { l = lt; }
                if rt > r { r = rt; }
                if row < b.bottom() { continue; }
            }
            state = 0;
            let end = if maxcount <= limit { row - 1 } else { row };
            let width = r - l + 1;
            let mut begin = begin;
            let mut end = end;
            while begin <= end && 3 * count[(begin - b.top()) as usize] < 2 * width { begin += 1; }
            while begin <= end && 3 * count[(end - b.top()) as usize] < 2 * width { end -= 1; }
            let height = end - begin + 1;
            if height < 1 || 2 * height > 3 * width { continue; }
            bars.push(Rectangle::new_unchecked(l, begin, r, end));
        }
        self.hbars = Some(bars);
        self.hbars.as_ref().unwrap().len() as i32
    }

    /// Finds maximal runs of columns that stay (almost) entirely black
    /// across the glyph's height, tolerating a brief gap bridged by a
    /// black neighbor column.
    pub fn vbars(&mut self) -> i32 {
        if self.vbars.is_some() { return self.vbars.as_ref().unwrap().len() as i32; }
        let b = self.bm;
        let mut state = 0;
        let mut begin = 0;
        let mut limit = b.height();
        limit -= if b.height() < 40 { 3 } else { b.height() / 10 };
        let mut bars = Vec::new();

        for col in b.left()..=b.right() {
            let (mut c, mut c2, mut count) = (0, 0, 0);
            for row in (b.top() + 1)..b.bottom() {
                if b.get_bit(row, col) {
                    c += 1;
                    if row < b.bottom() - 1 { continue; }
                } else if (col > b.left() && b.get_bit(row, col - 1))
                    || (col < b.right() && b.get_bit(row, col + 1))
                {
                    c += 1;
                    c2 += 1;
                    if row < b.bottom() - 1 { continue; }
                }
                if c > count { count = c; }
                c = 0;
            }
            let count = if (count - c2) * 3 < limit * 2 { 0 } else { count };

            match state {
                0 => {
                    if count >= limit { state = 3; begin = col; }
                    else if count * 4 >= limit * 3 { state = 2; begin = col; }
                    else if count * 3 >= limit * 2 { state = 1; begin = col; }
                }
                1 => {
                    if count >= limit { state = 3; }
                    else if count * 4 >= limit * 3 { state = 2; }
                    else if count * 3 < limit * 2 { state = 0; }
                    else { begin = col; }
                }
                2 => {
                    if count >= limit { state = 3; }
                    else if count * 3 < limit * 2 { state = 0; }
                    else if count * 4 < limit * 3 { state = 1; }
                }
                _ => {
                    if count * 3 < limit * 2 || col == b.right() {
                        let end = if count * 3 < limit * 2 { col - 1 } else { col };
                        bars.push(Rectangle::new_unchecked(begin, b.top(), end, b.bottom()));
                        state = 0;
                    }
                }
            }
        }
        self.vbars = Some(bars);
        self.vbars.as_ref().unwrap().len() as i32
    }

    fn ensure_row_scan(&mut self) {
        if !self.row_scan.is_empty() { return; }
        let b = self.bm;
        self.row_scan = vec![Vec::new(); b.height() as usize];
        for row in b.top()..=b.bottom() {
            let mut l = -1;
            for col in b.left()..=b.right() {
                let black = b.get_bit(row, col);
                if l < 0 && black { l = col; }
                if l >= 0 && (!black || col == b.right()) {
                    let end = col - i32::from(!black);
                    self.row_scan[(row - b.top()) as usize].push(Csegment::new(l, end));
                    l = -1;
                }
            }
        }
    }

    fn ensure_col_scan(&mut self) {
        if !self.col_scan.is_empty() { return; }
        let b = self.bm;
        self.col_scan = vec![Vec::new(); b.width() as usize];
        for col in b.left()..=b.right() {
            let mut t = -1;
            for row in b.top()..=b.bottom() {
                let black = b.get_bit(row, col);
                if t < 0 && black { t = row; }
                if t >= 0 && (!black || row == b.bottom()) {
                    let end = row - i32::from(!black);
                    self.col_scan[(col - b.left()) as usize].push(Csegment::new(t, end));
                    t = -1;
                }
            }
        }
    }

    /// Number of separate black runs crossing `row`.
    pub fn segments_in_row(&mut self, row: i32) -> i32 {
        self.ensure_row_scan();
        self.row_scan[(row - self.bm.top()) as usize].len() as i32
    }

    /// Number of separate black runs crossing `col`.
    pub fn segments_in_col(&mut self, col: i32) -> i32 {
        self.ensure_col_scan();
        self.col_scan[(col - self.bm.left()) as usize].len() as i32
    }

    /// The vertical run of `col` that contains `(row, col)`, if any.
    pub fn col_segment(&mut self, row: i32, col: i32) -> Csegment {
        let segments = self.segments_in_col(col);
        for i in 0..segments {
            let seg = self.col_scan[(col - self.bm.left()) as usize][i as usize];
            if seg.includes(row) { return seg; }
        }
        Csegment::invalid()
    }

    /// `c`/`(`/`)`: a single convex-or-pit left (or right) profile whose
    /// opposite profile is wide enough, or breaks open on the side facing
    /// the gap.
    pub fn test_c(&mut self) -> i32 {
        let b = self.bm;
        if self.lp.isconvex() || self.lp.ispit() {
            let urow = b.seek_top(b.vcenter(), b.hcenter(), true);
            let lrow = b.seek_bottom(b.vcenter(), b.hcenter(), true);

            if b.height() > 2 * b.width()
                && (3 * self.wp.max() <= 2 * b.width()
                    || (2 * self.rp.at(urow - b.top()) >= b.width() && 2 * self.rp.at(lrow - b.top()) >= b.width()))
            {
                return if self.lp.isconvex() { '(' as i32 } else { 0 };
            }

            if urow > b.top()
                && lrow < b.bottom()
                && self.rp.isctip(50)
                && (self.bp.ispit() || self.tp.ispit() || (self.bp.islpit() && self.tp.islpit()))
                && b.escape_right(b.vcenter(), b.hcenter())
            {
                return 'c' as i32;
            }
        }

        if b.height() > 2 * b.width() && self.rp.isconvex() {
            let urow = b.seek_top(b.vcenter(), b.hcenter(), true);
            let lrow = b.seek_bottom(b.vcenter(), b.hcenter(), true);

            if 3 * self.wp.max() <= 2 * b.width()
                || (2 * self.lp.at(urow - b.top()) >= b.width() && 2 * self.lp.at(lrow - b.top()) >= b.width())
            {
                return ')' as i32;
            }
        }

        0
    }

    /// `f`/`r`/`s`/`t`: whether the top hook (if any) is a dot (`f`/`t`)
    /// or the shape keeps a single vertical bar open at the bottom (`r`).
    pub fn test_frst(&mut self, charbox: &Rectangle) -> i32 {
        let b = self.bm;
        if self.bp.minima(b.height() / 4) != 1
            || self.tp.minima(b.height() / 2) != 1
            || self.bp.minima(b.height() / 2) != 1
        {
            return 0;
        }
        let noise = (b.height().min(b.width()) / 30) + 1;
        let maybe_slanted_r = self.tp.minima(b.height() / 4) != 1;
        let mut maybe_t = true;

        let mut b_hdiff = 0;
        if !maybe_slanted_r {
            if let Some(d) = b.bottom_hook() {
                b_hdiff = d;
                if -2 * b_hdiff > b.height() {
                    if b.height() >= 3 * self.wp.max() && (self.hbars() == 0 || self.hbar(0).bottom() < b.vpos(20)) {
                        return 'l' as i32;
                    }
                    if 2 * self.wp.at_pos(6) < b.width()
                        && self.hbars() >= 1
                        && self.hbars() <= 2
                        && self.hbar(0).top() >= b.vpos(15)
                        && self.hbar(0).bottom() < b.vcenter()
                        && similar(self.hbar(0).width(), self.wp.max(), 10, 0)
                    {
                        return 't' as i32;
                    }
                }
            }
            if let Some(t_hdiff) = b.top_hook() {
                if 3 * t_hdiff > 2 * b.height()
                    && b.height() > 2 * self.wp.max()
                    && self.tp.iminimum(0, -1) > self.tp.pos(50)
                    && self.bp.iminimum(0, -1) <= self.bp.pos(50)
                    && (b_hdiff == 0 || { let rp_50 = self.rp.pos(50); self.rp.increasing(rp_50, 2) })
                {
                    return 'f' as i32;
                }
                if 2 * b_hdiff > b.height() && 2 * t_hdiff > b.height() { return 0; }
                maybe_t = false;
            }
        }

        if 2 * self.rp.at_pos(50) > b.width() && 2 * self.bp.at_pos(50) > b.height() && self.tp.isctip(50)
        {
            return 'r' as i32;
        }

        if maybe_slanted_r || self.vbars() != 1 || self.vbar(0).width() < 2 { return 0; }
        let v0 = self.vbar(0);
        if v0.hcenter() <= b.hcenter() {
            let col = b.right() - self.rp.at_pos(50) + 2;
            if col < b.right() {
                let row = b.seek_bottom(b.vcenter(), col, true);
                if row >= b.bottom() || b.escape_bottom(row - 1, col) {
                    if self.rp.minima(-1) == 3 {
                        return if self.rp.minima(b.width() / 8) < 3 { 'f' as i32 } else { 0 };
                    }
                    if similar(b.height(), b.width(), 40, 0) {
                        if self.tp.minima(b.height() / 8) == 2 && self.bp.minima(b.height() / 8) == 2 {
                            return 'x' as i32;
                        }
                        let row2 = b.vpos(75);
                        let col2 = b.seek_right(row2, b.hcenter(), false) + 1;
                        if b.seek_right(row2, col2, true) >= b.right() {
                            if self.lp.isconvex() && (col > b.hpos(60) || row < b.bottom()) { return 0; }
                            if (self.hbars() == 1
                                || (self.hbars() == 2
                                    && self.hbar(1).bottom() >= b.bottom() - 1
                                    && 2 * self.hbar(0).width() > 3 * self.hbar(1).width()))
                                && self.hbar(0).top() <= b.top() + 1
                                && 4 * self.hbar(0).height() <= b.height()
                                && 4 * self.lp.at_pos(50) >= b.width()
                            {
                                return 'T' as i32;
                            }
                            return 'r' as i32;
                        }
                    }
                }
                if similar(b.height(), b.width(), 40, 0)
                    && self.segments_in_row(b.vpos(15)) == 3
                    && self.segments_in_row(b.vpos(85)) == 3
                    && b.seek_right(row - 1, col, true) < b.right()
                    && self.lp.isctip(50)
                {
                    return 'x' as i32;
                }
            }
            if 3 * b.height() > 4 * b.width() && v0.left() > b.left() && self.rp.minima(-1) <= 2 {
                let col = b.right() - (self.rp.at_pos(50) - 1).max(0);
                if !b.escape_bottom(b.vcenter(), col) {
                    if 3 * self.wp.at_pos(6) < 2 * b.width()
                        && self.tp.ispit()
                        && self.lp.iminimum(0, -1) < self.lp.pos(40)
                    {
                        return 't' as i32;
                    } else {
                        return 0;
                    }
                } else if 2 * self.wp.max() > b.width() {
                    if self.rp.iminimum(0, -1) < self.rp.pos(20) {
                        let rp_20 = self.rp.pos(20);
                        if self.rp.increasing(rp_20, 2)
                            || self.bp.increasing(1, 2)
                            || self.tp.minima(noise) == 2
                            || (self.rp.minima(-1) == 1
                                && (b.height() < charbox.height() || self.tp.iminimum(0, -1) > self.tp.pos(50)))
                        {
                            return if b.height() <= 3 * self.wp.max() { 'r' as i32 } else { 0 };
                        } else if 3 * b.height() >= 5 * b.width() {
                            return 'f' as i32;
                        }
                    } else if maybe_t && !self.rp.isconvex() && self.bp.minima(b.height() / 3) == 1 {
                        return 't' as i32;
                    } else {
                        return 0;
                    }
                }
            }
            if b.seek_bottom(b.vcenter(), b.hpos(60) + 1, true) >= b.bottom() {
                return if self.rp.minima(-1) == 2 { 'f' as i32 } else { 'r' as i32 };
            }
            if v0.right() <= b.hcenter()
                && self.hbars() == 1
                && self.hbar(0).bottom() >= b.bottom() - 1
                && self.lp.istip()
                && self.rp.istip()
                && !b.escape_top(b.vcenter(), b.hpos(75))
            {
                return 'r' as i32;
            }
        }
        0
    }

    /// `G`: a convex-or-pit left profile with a hook breaking out to the
    /// right partway down, and a wider gap below the hook than above it.
    pub fn test_g(&mut self) -> i32 {
        let b = self.bm;
        if self.lp.isconvex() || self.lp.ispit() {
            let mut col = 0;
            let mut row = 0;
            for i in self.rp.pos(30)..=self.rp.pos(60) {
                if self.rp.at(i) > col { col = self.rp.at(i); row = i; }
            }
            if col == 0 { return 0; }
            row += b.top();
            col = b.right() - col + 1;
            if col <= b.left() || col >= b.hcenter() { return 0; }

            col = (col + b.hcenter()) / 2;
            row = b.seek_bottom(row, col, true);
            if row < b.bottom() && b.escape_right(row, col) && !b.escape_bottom(row, b.hcenter()) {
                let noise = 2.max(b.height() / 20);
                let mut lrow = row - 1;
                while lrow > b.top() {
                    if b.seek_right(lrow, b.hcenter(), true) >= b.right() { break; }
                    lrow -= 1;
                }
                let mut urow = lrow - 1;
                while urow > b.top() {
                    if b.seek_right(urow, b.hcenter(), true) < b.right() { break; }
                    urow -= 1;
                }
                lrow += noise;
                urow -= noise;
                if lrow < row && urow > b.top() {
                    let uwidth = b.seek_left(urow, b.right(), true) - b.seek_right(urow, b.hcenter(), true);
                    let lwidth = b.seek_left(lrow, b.right(), true) - b.seek_right(lrow, b.hcenter(), true);
                    if lrow - noise <= b.vcenter() || lwidth > uwidth + noise {
                        return 'G' as i32;
                    }
                }
            }
        }
        0
    }

    /// `H`/`K`/`M`/`N`/`U`/`u`/`v`/`w`/`Y`/`y`: glyphs sharing a U-shaped
    /// top profile, disambiguated by how many bottom minima they have and
    /// where their vertical bars and hooks fall.
    pub fn test_hkmnuuvwyy(&mut self, charbox: &Rectangle) -> i32 {
        let b = self.bm;
        if self.tp.minima(b.height() / 5) != 2
            || self.tp.minima(b.height() / 4) != 2
            || self.tp.minima(b.height() / 2) > 3
            || !self.tp.isctip(50)
        {
            return 0;
        }

        let noise = (b.height().min(b.width()) / 30) + 1;
        let m5 = self.bp.minima(b.height() / 5);
        if 2 * b.height() >= b.width()
            && b.height() >= 10
            && (m5 == 1 || (m5 == 2 && similar(self.bp.iminimum(0, -1), self.bp.pos(50), 10, 0)))
        {
            let lp_90 = self.lp.pos(90);
            let lg = self.lp.min_range(lp_90, -1);
            if lg > 1 && self.bp.isvpit() && self.tp.minima(b.height() / 2) == 2 && self.lp.at_pos(75) <= lg {
                return 'v' as i32;
            }
            if let Some(hdiff) = b.bottom_hook() {
                if hdiff.abs() <= b.height() / 8 {
                    if self.segments_in_row(b.vpos(30)) >= 3 { return 'v' as i32; }
                    if self.bp.isconvex() {
                        return if 9 * self.wp.at_pos(30) > 10 * self.wp.at_pos(50)
                            && 9 * self.wp.at_pos(50) > 10 * self.wp.at_pos(70)
                        {
                            'v' as i32
                        } else {
                            'u' as i32
                        };
                    }
                }
                if hdiff > b.height() / 2 {
                    return if self.bp.minima(b.height() / 2) == 1 { 'y' as i32 } else { 0 };
                }
            }
            let rp_90 = self.rp.pos(90);
            let rg = self.rp.min_range(rp_90, -1);
            let lp_70 = self.lp.pos(70);
            let lp_90b = self.lp.pos(90);
            let lg2 = self.lp.max_range(lp_70, lp_90b);
            let rp_70 = self.rp.pos(70);
            let rp_90b = self.rp.pos(90);
            let rg2 = self.rp.max_range(rp_70, rp_90b);
            let lc = (lg + (2 * (self.lp.limit() - rg))) / 3;
            let lc2 = (lg2 + self.lp.limit() - rg2) / 2;
            if self.bp.ispit() && 7 * self.tp.range() < 4 * b.height() {
                let mut row2 = b.top();
                while row2 < b.bottom() && self.segments_in_row(row2) != 2 { row2 += 1; }
                let mut row1 = row2 + 1;
                while row1 < b.bottom() && self.segments_in_row(row1) != 1 { row1 += 1; }
                if row1 < b.bottom() { row1 += self.wp.at(row1 - b.top()) / 4; }
                if row1 < b.bottom() && self.wp.at(row1 - b.top()) < b.width() {
                    let w1 = self.wp.at(row1 - b.top());
                    let row0 = w1 * (row1 - row2) / (b.width() - w1) + row1;
                    if row0 < b.bottom()
                        && 2 * self.wp.at_pos(70) < b.width()
                        && (similar(lg, rg, 20, 0) || (lg > 1 && lg < rg && lc >= lc2 && !self.rp.increasing(1, 2)))
                    {
                        return 'Y' as i32;
                    }
                }
            }
            if b.escape_top(b.vpos(60), b.hcenter()) && !self.lp.istip() { return 'u' as i32; }
            let lp_50 = self.lp.pos(50);
            if lg < rg + 1
                && !self.lp.increasing(lp_50, 2)
                && (2 * lg < rg || b.vpos(90) >= charbox.bottom())
                && (self.tp.minima(b.height() / 2) == 1 || self.lp.imaximum() > b.height() / 2)
            {
                return 'y' as i32;
            }
            if lg > 1 && self.bp.ispit() && self.tp.minima(b.height() / 3) == 2 { return 'v' as i32; }
            if lg <= 1 && 2 * (b.width() - rg - lg) < b.width() && self.rp.increasing(1, 2) && self.tp.minima(b.height() / 2) == 2
            {
                return 'v' as i32;
            }
            return 0;
        }
        if 2 * b.height() >= b.width() && b.height() >= 9 && self.bp.minima(-1) == 2 && self.bp.isctip(50) {
            let th = (b.height() / 4).max(self.bp.at_pos(50) + noise);
            if self.bp.minima(th) == 3 { return 'M' as i32; }
            let lg = self.lp.at_pos(50);
            let rg = self.rp.at_pos(50);
            if similar(lg, rg, 80, 2) && 4 * lg < b.width() && 4 * rg < b.width() {
                if lg > 1
                    && rg > 1
                    && self.lp.increasing(1, 2)
                    && self.rp.increasing(1, 2)
                    && 5 * self.tp.at_pos(50) > b.height()
                {
                    return 'w' as i32;
                }
                if self.hbars() == 1
                    && 5 * (self.hbar(0).height() - 1) < b.height()
                    && self.hbar(0).top() >= b.vpos(30)
                    && self.hbar(0).bottom() <= b.vpos(60)
                    && 10 * self.hbar(0).width() > 9 * self.wp.at(self.hbar(0).vcenter() - b.top())
                    && similar(
                        self.col_segment(self.hbar(0).vcenter(), self.hbar(0).hcenter()).size(),
                        self.hbar(0).height(),
                        30,
                        2,
                    )
                {
                    return if 9 * self.hbar(0).width() < 10 * self.wp.at_pos(50) { 'H' as i32 } else { 0 };
                }
                if self.segments_in_row(b.vpos(60)) == 4 || self.segments_in_row(b.vpos(70)) == 4 {
                    return if 2 * self.tp.at_pos(50) > b.height() { 'M' as i32 } else { 'w' as i32 };
                }
                if (self.vbars() <= 2 || (self.vbars() == 3 && b.height() >= b.width()))
                    && self.tp.minima(b.height() / 2) <= 2
                    && self.tp.minima((2 * b.height()) / 5) <= 2
                    && !self.lp.istpit()
                    && 4 * (self.rp.at_pos(20) - self.rp.at_pos(80)).abs() <= b.width()
                {
                    let row = b.top() + self.tp.at_pos(50);
                    if row > b.vcenter() {
                        if let Ok(re) = Rectangle::new(b.left(), b.top(), b.hcenter(), b.bottom()) {
                            if let Ok(bm) = Bitmap::crop(b, re) {
                                if let Some(hdiff) = bm.bottom_hook() {
                                    if -2 * hdiff > bm.height() { return 'u' as i32; }
                                }
                            }
                        }
                    }
                    if row > b.vpos(10) || self.vbars() >= 2 { return 'N' as i32; }
                }
                return 0;
            }
            if 3 * lg < 2 * rg && lg < b.width() / 4 && rg > b.width() / 4 && self.rp.isctip(50) && self.tp.minima(b.height() / 8) == 2
            {
                return 'K' as i32;
            }
            return 0;
        }
        if self.bp.minima(-1) <= 2 && 2 * b.width() > 5 * b.height() { return '~' as i32; }
        if self.bp.minima(-1) == 3 && (self.hbars() == 0 || (self.hbars() == 1 && self.hbar(0).top() >= b.vpos(20))) {
            return 'M' as i32;
        }
        0
    }

    /// `^`/`h`/`k`/`n`/`w`/`x`: the frontier nearest the blob's vertical
    /// centre, tested for which side its gap opens on.
    pub fn test_hknwx(&mut self, charbox: &Rectangle) -> i32 {
        let b = self.bm;
        let m8 = self.tp.minima(b.height() / 8);

        if m8 == 2
            && self.bp.minima(b.height() / 2) == 1
            && ((self.lp.istip() && self.rp.istip()) || (self.lp.isconcave() && self.rp.isconcave()))
        {
            return 'x' as i32;
        }

        if b.width() >= b.height()
            && self.tp.ispit()
            && (b.bottom() < charbox.vcenter() || (self.lp.decreasing(1) && self.rp.decreasing(1)))
        {
            return '^' as i32;
        }

        let mut col = 0;
        let mut row = 0;
        for i in self.bp.pos(40)..=self.bp.pos(60) {
            if self.bp.at(i) > row { row = self.bp.at(i); col = i; }
        }
        row = b.bottom() - row + 1;
        col += b.left();
        if row > b.vpos(90) || row <= b.top() { return 0; }
        let c = col;
        col = b.seek_right(row, col, true);
        if col > c { col -= 1; }
        row = b.seek_top(row, col, true);

        let urow = b.seek_top(row - 1, col, false);
        if urow > b.vpos(20) || 3 * self.tp.at_pos(60) > b.height() {
            let m5 = self.tp.minima(b.height() / 5);
            if (m5 == 2 || m5 == 3)
                && self.tp.minima(-1) >= 2
                && self.rp.at_pos(25) <= b.width() / 4
                && (!self.lp.istpit() || self.rp.minima(-1) == 1)
            {
                return 'w' as i32;
            }
            let tp_40 = self.tp.pos(40);
            let tp_60 = self.tp.pos(60);
            if m5 == 1 && m8 == 1 && 4 * self.tp.max_range(tp_40, tp_60) < 3 * b.height() {
                return if self.rp.isctip(66) { 'k' as i32 } else { 'h' as i32 };
            }
            return 0;
        }
        if similar(b.height(), b.width(), 40, 0)
            && row > b.vcenter()
            && urow < b.vcenter()
            && self.tp.minima(b.height() / 5) == 2
            && self.bp.minima(urow + 1) == 3
        {
            return 'w' as i32;
        }
        if urow <= b.vpos(20)
            && self.tp.minima(b.height() / 4) == 1
            && similar(b.height(), b.width(), 40, 0)
            && (8 * (self.rp.at_pos(50) - 1) <= b.width() || self.tp.at_pos(100) > b.height() / 2)
        {
            return 'n' as i32;
        }
        0
    }

    /// Distinguishes digits/letters with a single flat-bottomed bowl
    /// (`1`, `7`, `T`, `l`, `F`, brackets, `|`) by combining bar counts
    /// with profile shape.
    pub fn test_misc(&mut self, charbox: &Rectangle) -> Option<char> {
        let b = self.bm;

        if self.bp.minima(0) == 1 {
            if self.hbars() == 1 {
                let h0 = self.hbar(0);
                if h0.top() <= b.top() + (b.height() / 10)
                    && 4 * h0.height() <= b.height()
                    && 5 * h0.width() >= 4 * b.width()
                    && self.rp.at(h0.bottom() - b.top() + 2) - self.rp.at(h0.bottom() - b.top()) < b.width() / 4
                    && self.rp.increasing(h0.vcenter() - b.top() + 1, 2)
                {
                    return Some('7');
                }
            }
            if b.height() > b.width()
                && self.rp.increasing(1, 2)
                && !self.tp.decreasing(1)
                && b.seek_left(b.vcenter(), b.rect().hcenter(), true) <= b.left()
            {
                return Some('7');
            }
        }

        if self.tp.minima(b.height() / 4) == 1 && self.bp.minima(b.height() / 4) == 1 {
            if b.height() > 2 * b.width()
                && self.rp.increasing(1, 2)
                && self.tp.decreasing(1)
                && self.lp.iscpit(25)
            {
                return Some('1');
            }

            let hbars = self.hbars();
            let bar_like = hbars == 1 || {
                hbars == 2 && {
                    let h1 = self.hbar(1);
                    h1.bottom() >= b.bottom() - 1 && 3 * self.hbar(0).width() > 4 * h1.width()
                }
            };
            if bar_like {
                let h0 = self.hbar(0);
                if 3 * h0.height() < b.height() && h0.top() <= b.top() + 1 {
                    let i = self.lp.pos(40);
                    if 3 * self.wp.at(i) < b.width()
                        && 5 * self.lp.at(i) > b.width()
                        && 5 * self.rp.at(i) > b.width()
                    {
                        return Some('T');
                    }
                }
            }

            if 3 * b.height() > 4 * b.width() && self.vbars() == 1 && self.vbar(0).width() >= 2 {
                let v0 = self.vbar(0);
                let lg = v0.left() - b.left();
                let rg = b.right() - v0.right();
                if 2 * lg < b.width()
                    && 2 * rg < b.width()
                    && similar(lg, rg, 40, 0)
                    && 4 * self.bp.at_pos(25) > 3 * b.height()
                    && 4 * self.tp.at_pos(75) > 3 * b.height()
                {
                    return Some('l');
                }
            }

            if 5 * b.height() >= 4 * charbox.height()
                && b.height() > self.wp.max()
                && 3 * self.wp.at_pos(50) < b.width()
            {
                if self.hbars() == 1 {
                    let h0 = self.hbar(0);
                    if h0.bottom() >= b.bottom() - 1
                        && h0.top() > b.vpos(75)
                        && similar(self.lp.at_pos(50), self.rp.at_pos(50), 20, 2)
                    {
                        return Some('l');
                    }
                }
                if self.hbars() == 2 {
                    let (h0, h1) = (self.hbar(0), self.hbar(1));
                    if h0.bottom() < b.vpos(25) && h1.top() > b.vpos(75) && h1.bottom() >= b.bottom() - 1 {
                        if h0.right() <= h1.hcenter() { return None; }
                        if 3 * h0.width() <= 2 * h1.width() || b.height() >= 3 * self.wp.max() {
                            return Some('l');
                        }
                        return Some('I');
                    }
                }
            }

            let hbars = self.hbars();
            if hbars == 2 || hbars == 3 {
                let h0 = self.hbar(0);
                let h1 = self.hbar(1);
                if h0.top() <= b.top() + 1
                    && h1.includes_vcenter(b.rect())
                    && 3 * h0.width() > 4 * h1.width()
                    && (hbars == 2 || {
                        let h2 = self.hbar(2);
                        h2.bottom() >= b.bottom() - 1 && 3 * h0.width() > 4 * h2.width()
                    })
                {
                    return Some('F');
                }
            }

            if b.height() > 3 * self.wp.max() {
                if self.rp.istip() && self.lp.ispit() {
                    return Some(if self.lp.istpit() { '{' } else { '(' });
                }
                if self.lp.istip() && self.rp.ispit() {
                    return Some(if self.rp.istpit() { '}' } else { ')' });
                }
                if b.width() > 2 * self.wp.max() && self.rp.isconvex() { return Some(')'); }
            }

            if b.height() > 2 * b.width()
                && 5 * b.height() >= 4 * charbox.height()
                && self.lp.max() + self.rp.max() < b.width()
            {
                return Some('|');
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap_from_rows(rows: &[&str]) -> Bitmap {
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
    fn detects_single_horizontal_bar() {
        let bm = bitmap_from_rows(&[
            "....",
            "####",
            "....",
            "....",
        ]);
        let mut feats = Features::new(&bm);
        assert_eq!(feats.hbars(), 1);
    }

    #[test]
    fn segments_in_row_counts_runs() {
        let bm = bitmap_from_rows(&["#.#.#"]);
        let mut feats = Features::new(&bm);
        assert_eq!(feats.segments_in_row(0), 3);
    }

    #[test]
    fn col_segment_finds_containing_run() {
        let bm = bitmap_from_rows(&["#", "#", ".", "#"]);
        let mut feats = Features::new(&bm);
        let seg = feats.col_segment(0, 0);
        assert_eq!(seg, Csegment::new(0, 1));
    }
}
