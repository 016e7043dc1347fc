//! A rectangle whose rows may be narrower than its bounding box: one
//! [`Csegment`] per row. Used to track the "silhouette" of a blob or of a
//! hole while it's still being traced during the connected-component scan.

use crate::csegment::Csegment;
use crate::rectangle::Rectangle;

#[derive(Debug, Clone)]
pub struct Mask {
    rect: Rectangle,
    data: Vec<Csegment>,
}

impl Mask {
    /// Builds a fully-filled rectangular mask: every row's segment spans
    /// the rectangle's full width.
    pub fn new(re: Rectangle) -> Self {
        let seg = Csegment::new(re.left(), re.right());
        let rows = re.height() as usize;
        Self { rect: re, data: vec![seg; rows] }
    }

    pub const fn rect(&self) -> &Rectangle { &self.rect }
    pub fn left(&self) -> i32 { self.rect.left() }
    pub fn top(&self) -> i32 { self.rect.top() }
    pub fn right(&self) -> i32 { self.rect.right() }
    pub fn bottom(&self) -> i32 { self.rect.bottom() }
    pub fn height(&self) -> i32 { self.rect.height() }

    pub fn row_left(&self, row: i32) -> Option<i32> {
        if row < self.top() || row > self.bottom() { return None; }
        let seg = self.data[(row - self.top()) as usize];
        seg.valid().then_some(seg.left)
    }

    pub fn row_right(&self, row: i32) -> Option<i32> {
        if row < self.top() || row > self.bottom() { return None; }
        let seg = self.data[(row - self.top()) as usize];
        seg.valid().then_some(seg.right)
    }

    fn set_top(&mut self, t: i32) {
        if t == self.top() { return; }
        if t < self.top() {
            let n = (self.top() - t) as usize;
            self.data.splice(0..0, std::iter::repeat(Csegment::invalid()).take(n));
        } else {
            let n = (t - self.top()) as usize;
            self.data.drain(0..n);
        }
        let _ = self.rect.set_top(t);
    }

    fn set_bottom(&mut self, b: i32) {
        if b != self.bottom() {
            let _ = self.rect.set_bottom(b);
            self.data.resize(self.height() as usize, Csegment::invalid());
        }
    }

    pub fn add_mask(&mut self, m: &Mask) {
        if m.top() < self.top() { self.set_top(m.top()); }
        if m.bottom() > self.bottom() { self.set_bottom(m.bottom()); }
        for row in m.top()..=m.bottom() {
            let other = m.data[(row - m.top()) as usize];
            let idx = (row - self.top()) as usize;
            self.data[idx].add_csegment(&other);
            let seg = self.data[idx];
            if seg.left < self.left() { let _ = self.rect.set_left(seg.left); }
            if seg.right > self.right() { let _ = self.rect.set_right(seg.right); }
        }
    }

    pub fn add_point(&mut self, row: i32, col: i32) {
        if row < self.top() { self.set_top(row); } else if row > self.bottom() { self.set_bottom(row); }
        let idx = (row - self.top()) as usize;
        self.data[idx].add_point(col);
        if col < self.left() { let _ = self.rect.set_left(col); }
        else if col > self.right() { let _ = self.rect.set_right(col); }
    }

    pub fn add_rectangle(&mut self, re: &Rectangle) {
        if re.top() < self.top() { self.set_top(re.top()); }
        if re.bottom() > self.bottom() { self.set_bottom(re.bottom()); }
        let rseg = Csegment::new(re.left(), re.right());
        for row in re.top()..=re.bottom() {
            let idx = (row - self.top()) as usize;
            self.data[idx].add_csegment(&rseg);
            let seg = self.data[idx];
            if seg.left < self.left() { let _ = self.rect.set_left(seg.left); }
            if seg.right > self.right() { let _ = self.rect.set_right(seg.right); }
        }
    }

    pub fn includes_rect(&self, re: &Rectangle) -> bool {
        if re.top() < self.top() || re.bottom() > self.bottom() { return false; }
        let seg = Csegment::new(re.left(), re.right());
        (re.top()..=re.bottom()).all(|row| self.data[(row - self.top()) as usize].includes_segment(&seg))
    }

    pub fn includes_point(&self, row: i32, col: i32) -> bool {
        row >= self.top() && row <= self.bottom()
            && self.data[(row - self.top()) as usize].includes(col)
    }

    pub fn distance_rect(&self, re: &Rectangle) -> i32 {
        let seg = Csegment::new(re.left(), re.right());
        let mut mindist = i32::MAX;
        for row in (self.top()..=self.bottom()).rev() {
            let vd = re.v_distance_row(row);
            if vd >= mindist {
                if row < re.top() { break; } else { continue; }
            }
            let hd = self.data[(row - self.top()) as usize].distance_segment(&seg);
            if hd >= mindist { continue; }
            let d = crate::rectangle::hypoti(hd, vd);
            if d < mindist { mindist = d; }
        }
        mindist
    }

    pub fn distance_point(&self, row: i32, col: i32) -> i32 {
        let mut mindist = i32::MAX;
        for r in (self.top()..=self.bottom()).rev() {
            let vd = (r - row).abs();
            if vd >= mindist {
                if r < row { break; } else { continue; }
            }
            let hd = self.data[(r - self.top()) as usize].distance(col);
            if hd >= mindist { continue; }
            let d = crate::rectangle::hypoti(hd, vd);
            if d < mindist { mindist = d; }
        }
        mindist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangular_mask_includes_itself() {
        let re = Rectangle::new(0, 0, 9, 9).unwrap();
        let m = Mask::new(re);
        assert!(m.includes_rect(&re));
        assert!(m.includes_point(5, 5));
    }

    #[test]
    fn add_point_extends_bounds() {
        let re = Rectangle::new(0, 0, 2, 2).unwrap();
        let mut m = Mask::new(re);
        m.add_point(5, 5);
        assert_eq!(m.bottom(), 5);
        assert_eq!(m.right(), 5);
    }
}
