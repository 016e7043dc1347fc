//! One-dimensional closed interval used by [`crate::mask::Mask`] rows and by
//! [`ocrad-profile`](../ocrad_profile)'s row/column scan lists.

/// `left > right` means "no segment" (an invalid/empty marker), matching
/// the default-constructed `Csegment(1, 0)` in the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Csegment {
    pub left: i32,
    pub right: i32,
}

impl Csegment {
    pub const fn new(left: i32, right: i32) -> Self { Self { left, right } }

    /// The canonical "empty" segment, `left = 1, right = 0`.
    pub const fn invalid() -> Self { Self { left: 1, right: 0 } }

    pub const fn valid(&self) -> bool { self.left <= self.right }

    pub const fn size(&self) -> i32 {
        if self.valid() { self.right - self.left + 1 } else { 0 }
    }

    pub fn includes_segment(&self, seg: &Csegment) -> bool {
        seg.valid() && self.left <= seg.left && seg.right <= self.right
    }

    pub fn includes(&self, col: i32) -> bool { self.left <= col && col <= self.right }

    pub fn add_point(&mut self, col: i32) {
        if !self.valid() { self.left = col; self.right = col; }
        else if col < self.left { self.left = col; }
        else if col > self.right { self.right = col; }
    }

    pub fn add_csegment(&mut self, seg: &Csegment) {
        if !seg.valid() { return; }
        if !self.valid() { *self = *seg; return; }
        if seg.left < self.left { self.left = seg.left; }
        if seg.right > self.right { self.right = seg.right; }
    }

    pub fn distance_segment(&self, seg: &Csegment) -> i32 {
        if !self.valid() || !seg.valid() { return i32::MAX; }
        if seg.right < self.left { return self.left - seg.right; }
        if seg.left > self.right { return seg.left - self.right; }
        0
    }

    pub fn distance(&self, col: i32) -> i32 {
        if !self.valid() { return i32::MAX; }
        if col < self.left { return self.left - col; }
        if col > self.right { return col - self.right; }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_invalid() {
        assert!(!Csegment::default().valid());
        assert_eq!(Csegment::default().size(), 0);
    }

    #[test]
    fn grows_with_points() {
        let mut s = Csegment::invalid();
        s.add_point(5);
        s.add_point(2);
        s.add_point(8);
        assert_eq!(s, Csegment::new(2, 8));
    }

    #[test]
    fn distance_outside() {
        let s = Csegment::new(5, 10);
        assert_eq!(s.distance(3), 2);
        assert_eq!(s.distance(12), 2);
        assert_eq!(s.distance(7), 0);
    }
}
