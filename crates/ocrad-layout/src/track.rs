//! The skew-tolerant baseline a [`crate::textline::Textline`] is measured
//! against: a chain of [`Vrhomboid`]s, each a parallelogram with vertical
//! sides whose top/bottom interpolate linearly between its two corners.
//!
//! Grounded on `track.h`/`track.cc`.

use ocrad_core::{Error, Rectangle, Result};

/// A rhomboid with vertical left/right sides: `vcenter` interpolates
/// linearly between `lvcenter` at `left` and `rvcenter` at `right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vrhomboid {
    left: i32,
    lvcenter: i32,
    right: i32,
    rvcenter: i32,
    height: i32,
}

impl Vrhomboid {
    /// # Errors
    /// Returns [`Error::InvalidGeometry`] if `right < left` or `height <= 0`.
    pub fn new(left: i32, lvcenter: i32, right: i32, rvcenter: i32, height: i32) -> Result<Self> {
        if right < left || height <= 0 {
            return Err(Error::InvalidGeometry(format!(
                "bad parameter building a Vrhomboid: l={left}, lc={lvcenter}, r={right}, rc={rvcenter}, h={height}"
            )));
        }
        Ok(Self { left, lvcenter, right, rvcenter, height })
    }

    pub const fn left(&self) -> i32 { self.left }
    pub const fn lvcenter(&self) -> i32 { self.lvcenter }
    pub const fn right(&self) -> i32 { self.right }
    pub const fn rvcenter(&self) -> i32 { self.rvcenter }
    pub const fn height(&self) -> i32 { self.height }
    pub const fn width(&self) -> i32 { self.right - self.left + 1 }
    pub const fn size(&self) -> i32 { self.height * self.width() }

    /// # Errors
    /// Returns [`Error::InvalidGeometry`] if `l > right()`.
    pub fn set_left(&mut self, l: i32) -> Result<()> {
        if l > self.right {
            return Err(Error::InvalidGeometry("left, bad parameter resizing a Vrhomboid".into()));
        }
        self.left = l;
        Ok(())
    }

    /// # Errors
    /// Returns [`Error::InvalidGeometry`] if `r < left()`.
    pub fn set_right(&mut self, r: i32) -> Result<()> {
        if r < self.left {
            return Err(Error::InvalidGeometry("right, bad parameter resizing a Vrhomboid".into()));
        }
        self.right = r;
        Ok(())
    }

    pub fn set_lvcenter(&mut self, lc: i32) { self.lvcenter = lc; }
    pub fn set_rvcenter(&mut self, rc: i32) { self.rvcenter = rc; }

    /// # Errors
    /// Returns [`Error::InvalidGeometry`] if `h <= 0`.
    pub fn set_height(&mut self, h: i32) -> Result<()> {
        if h <= 0 {
            return Err(Error::InvalidGeometry("height, bad parameter resizing a Vrhomboid".into()));
        }
        self.height = h;
        Ok(())
    }

    /// Moves the left edge to `l`, keeping `vcenter(l)` the new `lvcenter`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGeometry`] if `l > right()`.
    pub fn extend_left(&mut self, l: i32) -> Result<()> {
        if l > self.right {
            return Err(Error::InvalidGeometry("extend_left, bad parameter resizing a Vrhomboid".into()));
        }
        self.lvcenter = self.vcenter(l);
        self.left = l;
        Ok(())
    }

    /// # Errors
    /// Returns [`Error::InvalidGeometry`] if `r < left()`.
    pub fn extend_right(&mut self, r: i32) -> Result<()> {
        if r < self.left {
            return Err(Error::InvalidGeometry("extend_right, bad parameter resizing a Vrhomboid".into()));
        }
        self.rvcenter = self.vcenter(r);
        self.right = r;
        Ok(())
    }

    pub fn vcenter(&self, col: i32) -> i32 {
        let dx = self.right - self.left;
        let dy = self.rvcenter - self.lvcenter;
        let mut vc = self.lvcenter;
        if dx != 0 && dy != 0 { vc += (dy * (col - self.left)) / dx; }
        vc
    }

    pub fn bottom(&self, col: i32) -> i32 { self.vcenter(col) + (self.height / 2) }
    pub fn top(&self, col: i32) -> i32 { self.bottom(col) - self.height + 1 }

    pub fn includes_rect(&self, r: &Rectangle) -> bool {
        if r.left() < self.left || r.right() > self.right { return false; }
        let tl = self.top(r.left());
        let bl = self.bottom(r.left());
        let tr = self.top(r.right());
        let br = self.bottom(r.left());
        let t = tl.max(tr);
        let b = bl.min(br);
        t <= r.top() && b >= r.bottom()
    }

    pub fn includes(&self, row: i32, col: i32) -> bool {
        if col < self.left || col > self.right { return false; }
        let t = self.top(col);
        let b = self.bottom(col);
        t <= row && b >= row
    }
}

fn good_reference(r1: &Rectangle, r2: &Rectangle, val: &mut i32, mean_height: i32, mean_width: i32) -> i32 {
    if 4 * r1.height() >= 3 * mean_height
        && 4 * r2.height() >= 3 * mean_height
        && (r1.width() >= mean_width || r2.width() >= mean_width)
        && *val > 0
    {
        if 4 * r1.height() <= 5 * mean_height && 4 * r2.height() <= 5 * mean_height {
            if 9 * r1.height() <= 10 * mean_height
                && 9 * r2.height() <= 10 * mean_height
                && 10 * (r1.bottom() - r2.bottom()).abs() <= mean_height
            {
                *val = 0;
                return i32::from(r1.height() > r2.height());
            }
            if *val > 1 && 10 * (r1.vcenter() - r2.vcenter()).abs() <= mean_height {
                *val = 1;
                return i32::from(r1.bottom() > r2.bottom());
            }
        }
        if *val > 2 && 10 * (r1.vcenter() - r2.vcenter()).abs() <= mean_height {
            *val = 2;
            return i32::from(r1.bottom() > r2.bottom());
        }
    }
    -1
}

fn set_l(rv: &[Rectangle], mean_height: i32, mean_width: i32) -> i32 {
    let rectangles = rv.len() as i32;
    let imax = rectangles / 4;
    let mut ibest = -1;
    let mut val = 3;
    let mut i1 = 0;
    while i1 < imax && val > 0 {
        let mut i2 = i1 + 1;
        while i2 <= imax && i2 <= i1 + 2 {
            let i = good_reference(&rv[i1 as usize], &rv[i2 as usize], &mut val, mean_height, mean_width);
            if i >= 0 {
                ibest = if i == 0 { i1 } else { i2 };
                if val == 0 { break; }
            }
            i2 += 1;
        }
        i1 += 1;
    }
    ibest
}

fn set_r(rv: &[Rectangle], mean_height: i32, mean_width: i32) -> i32 {
    let rectangles = rv.len() as i32;
    let imin = rectangles - 1 - (rectangles / 4);
    let mut ibest = -1;
    let mut val = 3;
    let mut i1 = rectangles - 1;
    while i1 > imin && val > 0 {
        let mut i2 = i1 - 1;
        while i2 >= imin && i2 >= i1 - 2 {
            let i = good_reference(&rv[i1 as usize], &rv[i2 as usize], &mut val, mean_height, mean_width);
            if i >= 0 {
                ibest = if i == 0 { i1 } else { i2 };
                if val == 0 { break; }
            }
            i2 -= 1;
        }
        i1 -= 1;
    }
    ibest
}

fn set_partial_track(rv: &[Rectangle]) -> Vrhomboid {
    let rectangles = rv.len() as i32;
    let mut mean_vcenter = 0;
    let mut mean_height = 0;
    let mut mean_width = 0;
    for r in rv {
        mean_vcenter += r.vcenter();
        mean_height += r.height();
        mean_width += r.width();
    }
    if rectangles != 0 {
        mean_vcenter /= rectangles;
        mean_height /= rectangles;
        mean_width /= rectangles;
    }

    if rectangles < 8 {
        return Vrhomboid::new(rv[0].left(), mean_vcenter, rv[rv.len() - 1].right(), mean_vcenter, mean_height)
            .expect("short-line track parameters are always valid: right >= left, height > 0");
    }

    let l = set_l(rv, mean_height, mean_width);
    let r = set_r(rv, mean_height, mean_width);

    let (lcol, lvc) = if l >= 0 {
        (rv[l as usize].hcenter(), rv[l as usize].bottom() - (mean_height / 2))
    } else {
        (rv[0].hcenter(), mean_vcenter)
    };
    let (rcol, rvc) = if r >= 0 {
        (rv[r as usize].hcenter(), rv[r as usize].bottom() - (mean_height / 2))
    } else {
        (rv[rv.len() - 1].hcenter(), mean_vcenter)
    };
    let mut tmp = Vrhomboid::new(lcol, lvc, rcol, rvc, mean_height)
        .expect("reference-column track parameters are always valid");
    tmp.extend_left(rv[0].left()).expect("rv[0].left() <= rcol by construction");
    tmp.extend_right(rv[rv.len() - 1].right()).expect("rv.last().right() >= lcol by construction");
    tmp
}

/// A chain of [`Vrhomboid`]s following a textline's baseline, tolerating
/// the small, locally-linear skew real scans exhibit.
#[derive(Debug, Clone, Default)]
pub struct Track {
    data: Vec<Vrhomboid>,
}

impl Track {
    pub fn new() -> Self { Self { data: Vec::new() } }

    /// Rebuilds the track from a line's characters, already ordered by
    /// increasing `hcenter()`.
    pub fn set_track(&mut self, rectangle_vector: &[Rectangle]) {
        self.data.clear();
        if rectangle_vector.is_empty() { return; }

        let max_gap = {
            let mut s1 = rectangle_vector[0].width();
            let mut s2 = 0;
            for i in 1..rectangle_vector.len() {
                s1 += rectangle_vector[i].width();
                s2 += rectangle_vector[i].left() - rectangle_vector[i - 1].right();
            }
            (5 * s1.max(s2)) / rectangle_vector.len() as i32
        };

        let mut tmp = Vec::new();
        for i in 0..rectangle_vector.len() {
            let r1 = rectangle_vector[i];
            tmp.push(r1);
            let mut last = i + 1 >= rectangle_vector.len();
            if !last {
                let r2 = rectangle_vector[i + 1];
                if r2.left() - r1.right() >= max_gap { last = true; }
            }
            if last {
                self.data.push(set_partial_track(&tmp));
                tmp.clear();
            }
        }

        let mut i = 0;
        while i + 1 < self.data.len() {
            let v1 = self.data[i];
            let v2 = self.data[i + 1];
            if v1.right() + 1 < v2.left() {
                let v = Vrhomboid::new(
                    v1.right() + 1,
                    v1.rvcenter(),
                    v2.left() - 1,
                    v2.lvcenter(),
                    (v1.height() + v2.height()) / 2,
                )
                .expect("gap-filling Vrhomboid parameters are always valid");
                i += 1;
                self.data.insert(i, v);
            }
            i += 1;
        }
    }

    pub fn segments(&self) -> usize { self.data.len() }
    pub fn height(&self) -> i32 { self.data.first().map_or(0, Vrhomboid::height) }
    pub fn left(&self) -> i32 { self.data.first().map_or(0, Vrhomboid::left) }
    pub fn right(&self) -> i32 { self.data.last().map_or(0, Vrhomboid::right) }

    fn segment_for(&self, col: i32) -> Option<&Vrhomboid> {
        for (i, vr) in self.data.iter().enumerate() {
            if col <= vr.right() || i + 1 >= self.data.len() { return Some(vr); }
        }
        None
    }

    pub fn bottom(&self, col: i32) -> i32 { self.segment_for(col).map_or(0, |vr| vr.bottom(col)) }
    pub fn top(&self, col: i32) -> i32 { self.segment_for(col).map_or(0, |vr| vr.top(col)) }
    pub fn vcenter(&self, col: i32) -> i32 { self.segment_for(col).map_or(0, |vr| vr.vcenter(col)) }

    pub fn includes_rect(&self, r: &Rectangle) -> bool {
        if self.data.iter().any(|vr| vr.includes_rect(r)) { return true; }
        let Some(first) = self.data.first() else { return false; };
        let last = self.data.last().expect("data non-empty since first is Some");
        if r.right() > last.right() {
            let mut tmp = *last;
            tmp.extend_right(r.right()).expect("extending past the last segment's right edge always succeeds");
            return tmp.includes_rect(r);
        }
        if r.left() < first.left() {
            let mut tmp = *first;
            tmp.extend_left(r.left()).expect("extending past the first segment's left edge always succeeds");
            return tmp.includes_rect(r);
        }
        false
    }

    pub fn includes(&self, row: i32, col: i32) -> bool {
        if self.data.iter().any(|vr| vr.includes(row, col)) { return true; }
        let Some(first) = self.data.first() else { return false; };
        let last = self.data.last().expect("data non-empty since first is Some");
        if col > last.right() {
            let mut tmp = *last;
            tmp.extend_right(col).expect("extending past the last segment's right edge always succeeds");
            return tmp.includes(row, col);
        }
        if col < first.left() {
            let mut tmp = *first;
            tmp.extend_left(col).expect("extending past the first segment's left edge always succeeds");
            return tmp.includes(row, col);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vrhomboid_interpolates_vcenter_linearly() {
        let v = Vrhomboid::new(0, 10, 10, 20, 6).unwrap();
        assert_eq!(v.vcenter(0), 10);
        assert_eq!(v.vcenter(10), 20);
        assert_eq!(v.vcenter(5), 15);
    }

    #[test]
    fn vrhomboid_rejects_inverted_edges() {
        assert!(Vrhomboid::new(10, 0, 5, 0, 6).is_err());
    }

    #[test]
    fn short_track_uses_single_flat_segment() {
        let mut t = Track::new();
        let rects: Vec<Rectangle> =
            (0..4).map(|i| Rectangle::new(i * 10, 0, i * 10 + 8, 10).unwrap()).collect();
        t.set_track(&rects);
        assert_eq!(t.segments(), 1);
        assert_eq!(t.left(), 0);
        assert_eq!(t.right(), 38);
    }

    #[test]
    fn track_includes_a_character_on_its_baseline() {
        let mut t = Track::new();
        let rects: Vec<Rectangle> =
            (0..4).map(|i| Rectangle::new(i * 10, 0, i * 10 + 8, 10).unwrap()).collect();
        t.set_track(&rects);
        assert!(t.includes_rect(&rects[1]));
    }
}
