//! A 1-D projection of a glyph's silhouette (distance from one edge to the
//! first black pixel, sampled along the opposite axis) plus the family of
//! shape predicates the classifier runs against it: flatness, pits, tips,
//! concave/convex bulges, straightness.
//!
//! Grounded on `profile.h`/`profile.cc`. Every derived quantity is
//! memoized the first time it's asked for, same as the original's
//! sentinel-initialized (`-1`) fields — `ensure_init` stands in for the
//! original's `if( limit_ < 0 ) initialize();` guard repeated at the top
//! of nearly every method.

use ocrad_core::Bitmap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Left,
    Top,
    Right,
    Bottom,
    Height,
    Width,
}

pub struct Profile<'a> {
    bm: &'a Bitmap,
    kind: Kind,
    limit: i32,
    data: Vec<i32>,
    max: Option<i32>,
    min: Option<i32>,
    mean: Option<i32>,
    isconcave: Option<bool>,
    isconvex: Option<bool>,
    isflat: Option<bool>,
    isflats: Option<bool>,
    ispit: Option<bool>,
    istpit: Option<bool>,
    isupit: Option<bool>,
    isvpit: Option<bool>,
    istip: Option<bool>,
}

impl<'a> Profile<'a> {
    pub fn new(bm: &'a Bitmap, kind: Kind) -> Self {
        Self {
            bm,
            kind,
            limit: -1,
            data: Vec::new(),
            max: None,
            min: None,
            mean: None,
            isconcave: None,
            isconvex: None,
            isflat: None,
            isflats: None,
            ispit: None,
            istpit: None,
            isupit: None,
            isvpit: None,
            istip: None,
        }
    }

    fn ensure_init(&mut self) {
        if self.limit >= 0 { return; }
        let bm = self.bm;
        match self.kind {
            Kind::Left => {
                self.limit = bm.width();
                self.data = (bm.top()..=bm.bottom())
                    .map(|row| {
                        let mut j = bm.left();
                        while j <= bm.right() && !bm.get_bit(row, j) { j += 1; }
                        j - bm.left()
                    })
                    .collect();
            }
            Kind::Top => {
                self.limit = bm.height();
                self.data = (bm.left()..=bm.right())
                    .map(|col| {
                        let mut j = bm.top();
                        while j <= bm.bottom() && !bm.get_bit(j, col) { j += 1; }
                        j - bm.top()
                    })
                    .collect();
            }
            Kind::Right => {
                self.limit = bm.width();
                self.data = (bm.top()..=bm.bottom())
                    .map(|row| {
                        let mut j = bm.right();
                        while j >= bm.left() && !bm.get_bit(row, j) { j -= 1; }
                        bm.right() - j
                    })
                    .collect();
            }
            Kind::Bottom => {
                self.limit = bm.height();
                self.data = (bm.left()..=bm.right())
                    .map(|col| {
                        let mut j = bm.bottom();
                        while j >= bm.top() && !bm.get_bit(j, col) { j -= 1; }
                        bm.bottom() - j
                    })
                    .collect();
            }
            Kind::Height => {
                self.limit = bm.height();
                self.data = (bm.left()..=bm.right())
                    .map(|col| {
                        let (mut u, mut d) = (bm.top(), bm.bottom());
                        while u <= d && !bm.get_bit(u, col) { u += 1; }
                        while u <= d && !bm.get_bit(d, col) { d -= 1; }
                        d - u + 1
                    })
                    .collect();
            }
            Kind::Width => {
                self.limit = bm.width();
                self.data = (bm.top()..=bm.bottom())
                    .map(|row| {
                        let (mut l, mut r) = (bm.left(), bm.right());
                        while l <= r && !bm.get_bit(row, l) { l += 1; }
                        while l <= r && !bm.get_bit(row, r) { r -= 1; }
                        r - l + 1
                    })
                    .collect();
            }
        }
    }

    pub fn limit(&mut self) -> i32 { self.ensure_init(); self.limit }
    pub fn samples(&mut self) -> i32 { self.ensure_init(); self.data.len() as i32 }
    pub fn pos(&mut self, p: i32) -> i32 { ((self.samples() - 1) * p) / 100 }

    pub fn mean(&mut self) -> i32 {
        if self.mean.is_none() {
            self.ensure_init();
            let mut m: i32 = self.data.iter().sum();
            if self.samples() > 1 { m /= self.samples(); }
            self.mean = Some(m);
        }
        self.mean.unwrap()
    }

    pub fn max(&mut self) -> i32 {
        if self.max.is_none() {
            self.ensure_init();
            self.max = Some(self.data.iter().copied().max().unwrap_or(0));
        }
        self.max.unwrap()
    }

    /// `max(l, r)` with `r < 0` meaning "through the last sample".
    pub fn max_range(&mut self, l: i32, r: i32) -> i32 {
        self.ensure_init();
        let r = if r < 0 { self.samples() - 1 } else { r };
        (l..=r).map(|i| self.data[i as usize]).max().unwrap_or(0).max(0)
    }

    pub fn min(&mut self) -> i32 {
        if self.min.is_none() {
            self.ensure_init();
            self.min = Some(self.data.iter().copied().min().unwrap_or(0));
        }
        self.min.unwrap()
    }

    /// `min(l, r)` with `r < 0` meaning "through the last sample".
    pub fn min_range(&mut self, l: i32, r: i32) -> i32 {
        self.ensure_init();
        let r = if r < 0 { self.samples() - 1 } else { r };
        let limit = self.limit;
        (l..=r).map(|i| self.data[i as usize]).fold(limit, i32::min)
    }

    pub fn at(&mut self, i: i32) -> i32 {
        self.ensure_init();
        let samples = self.samples();
        let i = i.clamp(0, samples - 1);
        self.data[i as usize]
    }

    pub fn at_pos(&mut self, p: i32) -> i32 {
        let pos = self.pos(p);
        self.at(pos)
    }

    pub fn increasing_pos(&mut self, p: i32, min_delta: i32) -> bool {
        let pos = self.pos(p);
        self.increasing(pos, min_delta)
    }

    pub fn range(&mut self) -> i32 { self.max() - self.min() }

    /// `area(l, r)` with `r < 0` meaning "through the last sample".
    pub fn area(&mut self, l: i32, r: i32) -> i32 {
        self.ensure_init();
        let r = if r < 0 { self.samples() - 1 } else { r };
        (l..=r).map(|i| self.data[i as usize]).sum()
    }

    pub fn increasing(&mut self, i: i32, min_delta: i32) -> bool {
        self.ensure_init();
        let samples = self.samples();
        if i < 0 || i > samples - 2 || self.data[(samples - 1) as usize] - self.data[i as usize] < min_delta {
            return false;
        }
        for k in (i + 1)..samples {
            if self.data[k as usize] < self.data[(k - 1) as usize] { return false; }
        }
        true
    }

    pub fn decreasing(&mut self, i: i32) -> bool {
        self.ensure_init();
        let samples = self.samples();
        let noise = (samples.min(self.limit) / 20) + 1;
        if i < 0 || samples - i <= 2 * noise
            || self.data[i as usize] - self.data[(samples - noise) as usize] < noise + 1
        {
            return false;
        }
        for k in (i + 1)..(samples - noise) {
            if self.data[k as usize] > self.data[(k - 1) as usize] { return false; }
        }
        true
    }

    pub fn isconcave(&mut self) -> bool {
        if let Some(v) = self.isconcave { return v; }
        self.ensure_init();
        let mut result = false;
        'outer: loop {
            if self.samples() < 5 { break; }
            let mut dmax = -1;
            let (mut l, mut r) = (0, 0);
            let (p10, p90) = (self.pos(10), self.pos(90));
            for i in p10..=p90 {
                let d = self.data[i as usize];
                if d > dmax { dmax = d; l = i; r = i; } else if d == dmax { r = i; }
            }
            if l > r || l < self.pos(25) || r > self.pos(75) { break; }
            if self.data[p10 as usize] >= dmax || self.data[p90 as usize] >= dmax { break; }
            let imax = (l + r) / 2;
            for i in p10..imax {
                if self.data[i as usize] > self.data[(i + 1) as usize] { break 'outer; }
            }
            let mut i = p90;
            while i > imax {
                if self.data[i as usize] > self.data[(i - 1) as usize] { break 'outer; }
                i -= 1;
            }
            result = true;
            break;
        }
        self.isconcave = Some(result);
        result
    }

    pub fn isconvex(&mut self) -> bool {
        if let Some(v) = self.isconvex { return v; }
        self.ensure_init();
        let mut result = false;
        'outer: loop {
            let limit = self.limit;
            if self.samples() < 9 || limit < 5 { break; }
            let mut min = limit;
            let (mut min_begin, mut min_end) = (0, 0);
            let (mut lmin, mut rmax) = (limit, -limit);
            let (mut l, mut r) = (0, 0);
            for i in 1..self.samples() {
                let d = self.data[i as usize] - self.data[(i - 1) as usize];
                if d < lmin { lmin = d; l = i - 1; }
                if d >= rmax { rmax = d; r = i; }
                if self.data[i as usize] <= min {
                    min_end = i;
                    if self.data[i as usize] < min { min = self.data[i as usize]; min_begin = i; }
                }
            }
            if l >= r || l >= self.pos(25) || r <= self.pos(75) { break; }
            if lmin >= 0 || rmax <= 0 || self.data[l as usize] < 2 || self.data[r as usize] < 2
                || 3 * (self.data[l as usize] + self.data[r as usize]) <= limit.min(self.samples())
            {
                break;
            }
            if 3 * (min_end - min_begin + 1) > 2 * self.samples() { break; }
            if 2 * l >= min_begin || 2 * r <= min_end + self.samples() - 1 { break; }
            if min_begin < self.pos(10) || min_end > self.pos(90) { break; }

            let noise = (self.samples().min(limit) / 30) + 1;
            let mut dmax = -limit;
            for i in (l + 1)..=r {
                if i >= min_begin && i <= min_end {
                    if self.data[i as usize] <= noise { continue; }
                    break 'outer;
                }
                let d = self.data[i as usize] - self.data[(i - 1) as usize];
                if d == 0 { continue; }
                if d > dmax {
                    if d.abs() <= noise { dmax += 1; } else { dmax = d; }
                } else if d < dmax - noise {
                    break 'outer;
                }
            }
            if 2 * (min_end - min_begin + 1) < self.samples() {
                let mut varea = (min_begin - l + 1) * self.data[l as usize] / 2;
                varea += (r - min_end + 1) * self.data[r as usize] / 2;
                if self.area(l, min_begin - 1) + self.area(min_end + 1, r) >= varea { break; }
            }
            result = true;
            break;
        }
        self.isconvex = Some(result);
        result
    }

    pub fn isflat(&mut self) -> bool {
        if let Some(v) = self.isflat { return v; }
        self.ensure_init();
        let result = if self.samples() < 10 {
            false
        } else {
            let samples = self.samples();
            let mut mn = self.data[(samples / 2) as usize];
            let mut mx = mn;
            for i in 1..(samples - 1) {
                let d = self.data[i as usize];
                if d < mn { mn = d; } else if d > mx { mx = d; }
            }
            mx - mn <= 1 + (samples / 30)
        };
        self.isflat = Some(result);
        result
    }

    pub fn isflats(&mut self) -> bool {
        if let Some(v) = self.isflats { return v; }
        self.ensure_init();
        let mut result = false;
        'outer: loop {
            if self.samples() < 12 { break; }
            let s1 = self.pos(15).max(3);
            let s2 = self.pos(85).min(self.samples() - 4);
            let mut mn = -1;
            let mut mx = 0;
            for i in (s1 + 2)..s2 {
                if self.data[(i - 1) as usize] == self.data[i as usize] {
                    mn = self.data[i as usize];
                    mx = mn;
                    break;
                }
            }
            if mn < 0 { break; }
            for i in 1..=s1 {
                if self.data[i as usize] > mx { mx = self.data[i as usize]; }
            }
            for i in (s1 + 1)..s2 {
                let d = self.data[i as usize];
                if d < mn { mn = d; } else if d > mx { mx = d; }
            }
            for i in s2..(self.samples() - 1) {
                if self.data[i as usize] > mx { mx = self.data[i as usize]; }
            }
            result = mx - mn <= 1 + (self.samples() / 30);
            break;
        }
        self.isflats = Some(result);
        result
    }

    pub fn ispit(&mut self) -> bool {
        if let Some(v) = self.ispit { return v; }
        self.ensure_init();
        let mut result = false;
        'outer: loop {
            let samples = self.samples();
            if samples < 5 { break; }
            let noise = (samples.min(self.limit) / 25) + 1;
            for i in 0..noise {
                if self.data[i as usize] <= noise - i || self.data[(samples - i - 1) as usize] <= noise - i {
                    break 'outer;
                }
            }

            let dmin = self.min();
            let dmax = self.limit / 2;
            let mut begin = 0;
            let mut ref_ = dmax;
            let mut found_begin = false;
            for i in 0..samples {
                let d = self.data[i as usize];
                if d == dmin { begin = i; found_begin = true; break; }
                if d < ref_ { ref_ = d; } else if d > ref_ + noise && ref_ < dmax { break 'outer; }
            }
            if !found_begin || begin < 2 || begin > samples - 3 { break; }

            let mut end = 0;
            ref_ = dmax;
            let mut found_end = false;
            let mut i = samples - 1;
            while i >= begin {
                let d = self.data[i as usize];
                if d == dmin { end = i; found_end = true; break; }
                if d < ref_ { ref_ = d; } else if d > ref_ + noise && ref_ < dmax { break 'outer; }
                i -= 1;
            }
            if !found_end || end < begin || end > samples - 3 { break; }

            for i in (begin + 1)..end {
                if self.data[i as usize] > dmin + noise { break 'outer; }
            }
            result = true;
            break;
        }
        self.ispit = Some(result);
        result
    }

    pub fn iscpit(&mut self, cpos: i32) -> bool {
        self.ensure_init();
        let samples = self.samples();
        if samples < 5 || cpos < 25 || cpos > 75 { return false; }
        let mid = ((samples - 1) * cpos) / 100;
        let iend = (samples / 4).min(mid.min(samples - mid));
        let th = if self.mean() < 2 { 2 } else { self.mean() };
        let mut imin = -1;
        for i in 0..iend {
            if self.data[(mid + i) as usize] < th { imin = mid + i; break; }
            if self.data[(mid - i - 1) as usize] < th { imin = mid - i - 1; break; }
        }
        if imin < 0 { return false; }

        for i in (imin + 1)..samples {
            if self.data[i as usize] > th {
                let mut j = imin - 1;
                while j >= 0 {
                    if self.data[j as usize] > th { return true; }
                    j -= 1;
                }
                break;
            }
        }
        false
    }

    pub fn islpit(&mut self) -> bool {
        self.ensure_init();
        let samples = self.samples();
        if samples < 5 { return false; }
        let noise = samples / 30;
        if self.data[0] < noise + 2 { return false; }

        let dmin = self.min();
        let mut begin = 0;
        let mut ref_ = self.limit;
        let mut found = false;
        for i in 0..samples {
            let d = self.data[i as usize];
            if d == dmin { begin = i; found = true; break; }
            if d < ref_ { ref_ = d; } else if d > ref_ + 1 { return false; }
        }
        found && begin >= 2 && 2 * begin < samples
    }

    pub fn istpit(&mut self) -> bool {
        if let Some(v) = self.istpit { return v; }
        self.ensure_init();
        let result = if self.limit < 5 || self.samples() < 5 || !self.ispit() {
            false
        } else {
            let samples = self.samples();
            let noise = (self.limit.min(samples) / 30) + 1;
            let (mut l, mut r) = (-1, 0);
            for i in 0..samples {
                if self.data[i as usize] <= noise { r = i; if l < 0 { l = i; } }
            }
            l > 0 && 4 * (r - l + 1) < samples
        };
        self.istpit = Some(result);
        result
    }

    pub fn isupit(&mut self) -> bool {
        if let Some(v) = self.isupit { return v; }
        self.ensure_init();
        let mut result = false;
        'outer: loop {
            if self.samples() < 5 { break; }
            let range = self.range();
            let th = if self.mean() < 2 && range > 2 { 2 } else { self.mean() };
            let mut status = 0;
            let (mut ucount, mut lcount) = (0, 0);
            let (mut umean, mut lmean) = (0, 0);
            let samples = self.samples();
            for i in 0..samples {
                let d = self.data[i as usize];
                match status {
                    0 => {
                        if d < th {
                            if i < self.pos(25) || i > self.pos(70) { break 'outer; }
                            status = 1;
                        } else if d > th {
                            ucount += 1; umean += d;
                        }
                    }
                    1 => {
                        if d > th {
                            if i < self.pos(30) || i > self.pos(75) { break 'outer; }
                            status = 2;
                        } else if d < th {
                            lcount += 1; lmean += d;
                        }
                    }
                    _ => {
                        if d < th { break 'outer; }
                        if d > th { ucount += 1; umean += d; }
                    }
                }
            }
            if ucount > 1 { umean /= ucount; }
            if lcount > 1 { lmean /= lcount; }
            result = status == 2 && umean - lmean > range / 2;
            break;
        }
        self.isupit = Some(result);
        result
    }

    pub fn isvpit(&mut self) -> bool {
        if let Some(v) = self.isvpit { return v; }
        self.ensure_init();
        let result = if self.limit < 5 || self.samples() < 5 || !self.ispit() {
            false
        } else {
            let noise = self.limit / 20;
            let level = (self.limit / 10) + 2;
            let (mut ll, mut ln, mut rl, mut rn) = (-1, -1, -1, -1);
            for i in 0..self.samples() {
                if self.data[i as usize] <= level {
                    rl = i; if ll < 0 { ll = i; }
                    if self.data[i as usize] <= noise { rn = i; if ln < 0 { ln = i; } }
                }
            }
            let wl = rl - ll + 1;
            let wn = rn - ln + 1;
            ln > 0 && 2 * wl <= self.samples() + 1 && wl - wn <= 2 * (level - noise)
        };
        self.isvpit = Some(result);
        result
    }

    pub fn istip(&mut self) -> bool {
        if let Some(v) = self.istip { return v; }
        self.ensure_init();
        let mut result = false;
        'outer: loop {
            let samples = self.samples();
            if samples < 5 { break; }
            let range = self.range();
            let mut th = if self.mean() < 2 && range > 2 { 2 } else { self.mean() };
            if th < 2 { th += 1; }
            let mut lth = self.data[0];
            let mut rth = self.data[(samples - 1) as usize];
            let mut begin = 0;
            let mut end = samples - 1;
            let j = 2.max(samples / 10);
            for i in 1..j {
                if self.data[i as usize] < lth { lth = self.data[i as usize]; begin = i; }
                if self.data[(samples - 1 - i) as usize] < rth {
                    rth = self.data[(samples - 1 - i) as usize];
                    end = samples - 1 - i;
                }
            }
            if lth >= th || rth >= th { break; }
            if 3 * lth >= 2 * range || 3 * rth >= 2 * range { break; }
            th = lth.max(rth);
            let mut status = 0;
            for i in (begin + 1)..end {
                let d = self.data[i as usize];
                match status {
                    0 => { if d > th + 1 { status = 1; } }
                    1 => { status = if d > th + 1 { 2 } else { 0 }; }
                    2 => { if d <= th { status = 3; } }
                    _ => { if d > th + 1 { break 'outer; } }
                }
            }
            result = status >= 2;
            break;
        }
        self.istip = Some(result);
        result
    }

    pub fn isctip(&mut self, cpos: i32) -> bool {
        self.ensure_init();
        let samples = self.samples();
        if samples < 5 || cpos < 25 || cpos > 75 { return false; }
        let mid = ((samples - 1) * cpos) / 100;
        let iend = (samples / 4).min(mid.min(samples - mid));
        let mut th = 2.max(self.mean().min(self.limit / 3));
        let mut imax = -1;
        for i in 0..iend {
            if self.data[(mid + i) as usize] > th { imax = mid + i; break; }
            if self.data[(mid - i - 1) as usize] > th { imax = mid - i - 1; break; }
        }
        if imax < 0 && self.mean() == 0 {
            th -= 1;
            for i in 0..iend {
                if self.data[(mid + i) as usize] > th { imax = mid + i; break; }
                if self.data[(mid - i - 1) as usize] > th { imax = mid - i - 1; break; }
            }
        }
        if imax < 0 { return false; }

        th = th.max(self.data[imax as usize] / 2);
        for i in (imax + 1)..samples {
            if self.data[i as usize] < th {
                let mut j = imax - 1;
                while j >= 0 {
                    if self.data[j as usize] < th { return true; }
                    j -= 1;
                }
                break;
            }
        }
        false
    }

    pub fn imaximum(&mut self) -> i32 {
        self.ensure_init();
        let samples = self.samples();
        let margin = (samples / 30) + 1;
        let mut mbegin = 0;
        let mut mvalue = 0;
        for i in margin..(samples - margin) {
            if self.data[i as usize] > mvalue { mvalue = self.data[i as usize]; mbegin = i; }
        }
        let mut mend = mbegin + 1;
        while mend < samples {
            if self.data[mend as usize] < mvalue { break; }
            mend += 1;
        }
        (mbegin + mend - 1) / 2
    }

    pub fn iminimum(&mut self, m: i32, th: i32) -> i32 {
        self.ensure_init();
        let samples = self.samples();
        let margin = (samples / 30) + 1;
        if samples < 2 * margin { return 0; }
        let th = if th < 2 { if self.mean() < 2 { 2 } else { self.mean() } } else { th };
        let mut minima = 0;
        let mut status = 0;
        let mut begin = 0;
        let mut end = margin;
        let mut value = self.limit + 1;
        while end < samples - margin {
            if status == 0 {
                if self.data[end as usize] < th { status = 1; minima += 1; begin = end; }
            } else if self.data[end as usize] > th {
                if minima == m + 1 { end -= 1; break; }
                status = 0;
            }
            end += 1;
        }
        if end >= samples { end -= 1; }
        if minima != m + 1 { return 0; }

        for i in begin..=end {
            if self.data[i as usize] < value { value = self.data[i as usize]; begin = i; }
        }
        let mut end = end;
        while end >= begin {
            if self.data[end as usize] == value { break; }
            end -= 1;
        }
        (begin + end) / 2
    }

    pub fn minima(&mut self, th: i32) -> i32 {
        self.ensure_init();
        if self.samples() == 0 { return 0; }
        let th = if th < 1 { if self.mean() < 2 { 2 } else { self.mean() } } else { th };
        let noise = self.limit / 40;
        let dth = th - ((noise + 1) / 2);
        let uth = th + (noise / 2);
        if dth < 1 { return 1; }
        let mut minima = i32::from(self.data[0] < dth);
        let mut status = i32::from(minima != 0);
        for i in 1..self.samples() {
            match status {
                0 => { if self.data[i as usize] < dth { status = 1; minima += 1; } }
                _ => { if self.data[i as usize] > uth { status = 0; } }
            }
        }
        minima
    }

    pub fn straight(&mut self) -> Option<i32> {
        self.ensure_init();
        let samples = self.samples();
        if samples < 5 { return None; }
        let xl = (samples / 30) + 1;
        let yl = (self.data[xl as usize] + self.data[(xl + 1) as usize]) / 2;
        let xr = samples - xl - 1;
        let yr = (self.data[(xr - 1) as usize] + self.data[xr as usize]) / 2;
        let dx = xr - xl;
        let dy = yr - yl;
        if dx <= 0 { return None; }
        let dmax = dx * ((samples / 20) + 2);
        let mut faults = samples / 10;
        for i in 0..samples {
            let y = (dx * yl) + ((i - xl) * dy);
            let d = ((dx * self.data[i as usize]) - y).abs();
            if d >= dmax && ((dx * self.data[i as usize]) < y || (i >= xl && i <= xr)) {
                if d > dmax { return None; }
                faults -= 1;
                if faults < 0 { return None; }
            }
        }
        Some(dy)
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
    fn left_profile_measures_gap_to_first_black() {
        let bm = bitmap_from_rows(&["..#", "#..", ".#."]);
        let mut p = Profile::new(&bm, Kind::Left);
        assert_eq!(p.at(0), 2);
        assert_eq!(p.at(1), 0);
        assert_eq!(p.at(2), 1);
    }

    #[test]
    fn flat_profile_detected_on_uniform_edge() {
        let rows: Vec<String> = (0..12).map(|_| "##########".to_string()).collect();
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let bm = bitmap_from_rows(&row_refs);
        let mut p = Profile::new(&bm, Kind::Top);
        assert!(p.isflat());
    }

    #[test]
    fn pit_profile_detects_v_shaped_dip() {
        let bm = bitmap_from_rows(&[
            "##########",
            "##########",
            "##.....###",
            "###.....##",
            "##########",
            "##########",
            "##########",
        ]);
        let mut p = Profile::new(&bm, Kind::Bottom);
        assert!(p.ispit());
    }
}
