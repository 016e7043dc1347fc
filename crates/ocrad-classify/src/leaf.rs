//! Leaf tests for the 0-hole and 1-hole branches of the classifier
//! cascade that can't live as `Features` methods: the 1-hole family
//! needs the owning [`Blob`] for hole access, and three of the 0-hole
//! leaves (`test_235esz`/`test_cefijllt`/`test_s_cedilla`) return a `UCS`
//! code point, and `ocrad-profile` can't depend on the `UCS` table one
//! layer above it without a cycle.
//!
//! Every function returns a code point as a plain `i32`, `0` meaning "no
//! guess" — the original's own convention, and the one every call site in
//! the cascade (`if( code ) ...`) is built around.
//!
//! Grounded on `feats_test0.cc` (0-hole family: `test_solid`/`test_comma`/
//! `test_easy`/`test_line`/`test_235Esz`/`test_CEFIJLlT`/
//! `test_s_cedilla`) and `feats_test1.cc` (1-hole family:
//! `test_49ARegpq`/`test_4ADQao`/`test_6abd`).

use ocrad_core::{similar, Charset, Rectangle};
use ocrad_profile::{Kind, Profile};
use ocrad_region::Blob;

use crate::ucs;

/// Solid/filled-shape leaf: `.`, `-`, `_`, `,`, `'`, `|`. Only meaningful
/// for a blob with no holes.
pub fn test_solid(b: &Blob, f: &mut crate::Features, charbox: &Rectangle) -> i32 {
    if b.holes() != 0 { return 0; }

    if b.height() >= 5 && b.width() >= 5 {
        if 2 * b.height() > b.width() && (f.tp.minima(-1) != 1 || f.bp.minima(-1) != 1) {
            return 0;
        }
        if b.height() < 2 * b.width() && (f.lp.minima(-1) != 1 || f.rp.minima(-1) != 1) {
            return 0;
        }
    }

    let (inner_area, inner_size, mut porosity);
    if b.width() >= 3 && b.height() >= 3 {
        inner_size = (b.width() - 2) * (b.height() - 2);
        let mut area = 0;
        porosity = 0;
        for row in (b.top() + 1)..b.bottom() {
            let mut holes = 0;
            for col in (b.left() + 1)..b.right() {
                if b.get_bit(row, col) { area += 1; } else { holes += 1; }
            }
            if 5 * holes >= b.width() { porosity += (5 * holes) / b.width(); }
        }
        if area * 100 < inner_size * 70 { return 0; }
        inner_area = area;
    } else {
        inner_size = 0;
        inner_area = b.area();
        porosity = 0;
    }

    if similar(b.height(), f.wp.max(), 20, 2) {
        let n = b.height().min(b.width());
        if n >= 6 {
            let mut d: i32 = 0;
            for i in 0..n {
                if b.get_bit(b.top() + i, b.left() + i) { d += 1; }
                if b.get_bit(b.top() + i, b.right() - i) { d -= 1; }
            }
            if 2 * d.abs() >= n - 1 { return 0; }
        }
        if (porosity == 0 && inner_area * 100 >= inner_size * 75)
            || (b.width() >= 7
                && b.height() >= 7
                && (100 * b.area_octagon() >= 95 * b.size_octagon()
                    || 100 * b.area_octagon() >= 95 * b.area()))
        {
            return '.' as i32;
        }
        return 0;
    }
    if porosity > 1 || inner_area * 100 < inner_size * 85 || (porosity != 0 && inner_area * 100 < inner_size * 95) {
        return 0;
    }
    if b.width() > b.height() {
        if b.top() > charbox.vpos(90)
            || (charbox.bottom() - b.bottom() < b.top() - charbox.vcenter() && b.width() >= 5 * b.height())
        {
            return '_' as i32;
        }
        return '-' as i32;
    }
    if b.height() > b.width() {
        if b.top() > charbox.vcenter() { return ',' as i32; }
        if b.bottom() <= charbox.vcenter() { return '\'' as i32; }
        return '|' as i32;
    }
    0
}

/// Distinguishes a comma (tall, narrow, curved, top-heavy) from a simple
/// apostrophe/period.
pub fn test_comma(b: &Blob) -> bool {
    if b.holes() != 0 || b.height() <= b.width() || b.height() > 3 * b.width() { return false; }

    if b.width() >= 3 && b.height() >= 3 {
        let mut upper_area = 0;
        for row in b.top()..(b.top() + b.width()) {
            for col in b.left()..=b.right() {
                if b.get_bit(row, col) { upper_area += 1; }
            }
        }
        if upper_area < (b.width() - 2) * (b.width() - 2) { return false; }
        let mut count1 = 0;
        let mut count2 = 0;
        for col in b.left()..=b.right() {
            if b.get_bit(b.top() + 1, col) { count1 += 1; }
            if b.get_bit(b.bottom() - 1, col) { count2 += 1; }
        }
        if count1 <= count2 { return false; }
    }
    true
}

/// The small set of shapes cheap enough to check before the dense
/// hole-count-specific leaves run.
pub fn test_easy(b: &Blob, f: &mut crate::Features, charbox: &Rectangle) -> i32 {
    let code = test_solid(b, f, charbox);
    if code != 0 { return code; }

    if b.top() >= charbox.vcenter() && test_comma(b) { return ',' as i32; }
    if b.bottom() <= charbox.vcenter() && b.height() > b.width() && f.bp.minima(-1) == 1 {
        return if f.tp.iminimum(0, -1) < f.tp.pos(50) && f.bp.iminimum(0, -1) > f.bp.pos(50) {
            '`' as i32
        } else {
            '\'' as i32
        };
    }
    if 2 * b.height() > 3 * f.wp.max() && b.top() >= charbox.vcenter() && f.bp.minima(-1) == 1 {
        return ',' as i32;
    }
    0
}

/// Single-stroke, non-rectangular shapes: `'`, `/`, `<`, `>`, `\`, `^`, `` ` ``.
pub fn test_line(b: &Blob, f: &mut crate::Features, charbox: &Rectangle) -> i32 {
    if f.tp.minima(-1) != 1 { return 0; }

    if f.lp.minima(-1) == 1 && f.rp.minima(-1) == 1 && 2 * b.height() >= b.width() {
        if let (Some(slope1), Some(slope2)) = (f.lp.straight(), f.rp.straight()) {
            if slope1 < 0 && slope2 < 0 && f.bp.minima(-1) == 2 { return '^' as i32; }
            if f.bp.minima(-1) != 1 { return 0; }
            if slope1 < 0 && slope2 > 0 {
                if b.v_includes(charbox.vcenter()) {
                    if 10 * b.area() < 3 * b.size() { return '/' as i32; }
                    if b.height() > 2 * b.width() { return 'l' as i32; }
                    return 0;
                }
                if b.top() >= charbox.vcenter() { return ',' as i32; }
                return '\'' as i32;
            }
            if slope1 > 0 && slope2 < 0 {
                if b.bottom() > charbox.vcenter() {
                    if (3 * b.width() > b.height() && b.height() > charbox.height()) || 2 * b.width() >= b.height()
                    {
                        return '\\' as i32;
                    }
                    return 0;
                }
                return '`' as i32;
            }
            return 0;
        }
    }

    if f.bp.minima(-1) == 1 && 2 * b.width() >= b.height() {
        if let (Some(slope1), Some(slope2)) = (f.tp.straight(), f.bp.straight()) {
            if f.lp.minima(-1) == 1 && f.rp.minima(-1) == 1 {
                if slope1 < 0 && slope2 > 0 {
                    if b.v_includes(charbox.vcenter()) { return '/' as i32; }
                    if b.top() >= charbox.vcenter() { return ',' as i32; }
                    return '\'' as i32;
                }
                if slope1 > 0 && slope2 < 0 {
                    if b.bottom() > charbox.vcenter() { return '\\' as i32; }
                    return '`' as i32;
                }
            } else if 2 * b.width() >= b.height() {
                if slope1 < 0 && slope2 < 0 && f.lp.minima(-1) == 1 && f.rp.minima(-1) == 2 {
                    return '<' as i32;
                }
                if slope1 > 0 && slope2 > 0 && f.lp.minima(-1) == 2 && f.rp.minima(-1) == 1 {
                    return '>' as i32;
                }
            }
        }
    }
    0
}

/// Whether the lower half of a 1-hole glyph is open to the left, right,
/// and/or bottom: `A`, `R`, `e`, `g`, `p`, `s`, `Q`, `2`, `q`.
pub fn test_49aregpq(b: &Blob, f: &mut crate::Features, charbox: &Rectangle) -> i32 {
    let h = b.hole(0).expect("recognize111 dispatches test_49aregpq only when holes() == 1");

    if f.bp.minima(b.height() / 10 + 1) == 2 && f.bp.isctip(50) && f.tp.minima(-1) == 1 {
        return if f.tp.isvpit() || f.rp.decreasing(1) { 'A' as i32 } else { 'R' as i32 };
    }

    let mut col = h.hcenter();
    let mut row = b.seek_bottom(h.bottom(), col, false) + 1;
    if row >= b.vpos(90) {
        col = h.left();
        row = b.seek_bottom(h.bottom(), col, false) + 1;
    }
    if row >= b.bottom() { return 0; }

    if b.escape_right(row, col) {
        if (f.lp.ispit() && b.seek_bottom(row, h.right(), true) < b.bottom())
            || (f.lp.isconvex() && b.seek_bottom(row, h.hcenter(), true) < b.bottom())
        {
            return 'e' as i32;
        }
        if f.bp.ispit() {
            let row2 = b.seek_bottom(row, h.right(), true);
            if row2 < b.vpos(75) { return 'g' as i32; }
            if row2 < b.bottom() { return 'e' as i32; }
        }
        return 'p' as i32;
    } else if b.escape_left(row, col) {
        let mut hlp = Profile::new(h, Kind::Left);
        let mut htp = Profile::new(h, Kind::Top);
        let mut hwp = Profile::new(h, Kind::Width);
        if f.vbars() == 1
            && f.vbar(0).hcenter() > b.hcenter()
            && hlp.decreasing(1)
            && htp.decreasing(1)
            && hwp.at_pos(30) < hwp.at_pos(70)
        {
            return '4' as i32;
        }
        if f.rp.isconvex() && f.rp.ispit() && f.rp.minima(-1) == 1 && f.tp.ispit() && charbox.bottom() > b.vpos(80) {
            return '9' as i32;
        }
        if let Some(hdiff) = b.bottom_hook() {
            if hdiff > 0 {
                return if h.bottom() < b.vcenter()
                    && h.right() + 2 <= b.right()
                    && (!b.get_bit(h.bottom() + 1, h.right() + 1)
                        || !b.get_bit(h.bottom() + 1, h.right() + 2)
                        || f.rp.isctip(50))
                {
                    's' as i32
                } else {
                    'g' as i32
                };
            }
        }
        if row > b.vpos(85) && f.tp.ispit() { return 'Q' as i32; }
        let row2 = b.seek_bottom(row, col, true);
        if row2 < b.bottom() && f.rp.increasing(((row + row2) / 2) - b.top(), 2) {
            return 'g' as i32;
        }
        if f.bp.minima(-1) == 1 {
            if h.height() >= charbox.height() { return 'Q' as i32; }
            if h.right() < b.hcenter() && h.bottom() < b.vcenter() { return '2' as i32; }
            return 'q' as i32;
        }
    }
    0
}

/// `4`/`A`/`D`/`Q`/`a`/`o` family: the hole is roughly vertically
/// centred in the blob.
pub fn test_4adqao(b: &Blob, f: &mut crate::Features, charset: &Charset, charbox: &Rectangle) -> i32 {
    let h = b.hole(0).expect("recognize111 dispatches test_4adqao only when holes() == 1");
    let left_delta = h.left() - b.left();
    let right_delta = b.right() - h.right();

    if !f.lp.ispit() && f.lp.isflats() && f.rp.ispit() { return 'D' as i32; }

    if !f.rp.isconvex() {
        if similar(left_delta, right_delta, 40, 1) && f.tp.minima(-1) == 2 && f.bp.minima(-1) == 2 {
            return '#' as i32;
        }
        if f.tp.minima(-1) == 1 && f.bp.minima(-1) == 1 {
            let mut row = b.seek_bottom(h.bottom(), h.hcenter(), false);
            if charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9) {
                if !f.lp.isconvex() && f.bp.isconvex() && b.seek_bottom(row, h.hcenter(), true) < b.bottom() {
                    return ucs::code::SEACUTE;
                }
            }
            row = (row + b.seek_bottom(row, h.hcenter(), true)) / 2;
            if row < b.bottom() - 1 && !f.lp.isflats() && b.seek_left(row, h.hcenter(), true) <= b.left() {
                return if f.wp.at(h.top() - b.top()) < f.wp.at(h.bottom() - b.top()) {
                    '4' as i32
                } else {
                    'Q' as i32
                };
            }
        }
        if 2 * b.width() > 5 * h.width() {
            let c = f.segments_in_row(h.vcenter());
            let m = f.bp.minima(-1);
            if c == 3
                && h.top() < b.vcenter()
                && h.bottom() > b.vcenter()
                && 3 * h.height() >= b.height()
                && (m == 3 || m == 2)
                && !f.lp.ispit()
            {
                return 'm' as i32;
            }
            if c == 3 && left_delta > right_delta && f.lp.ispit() && f.segments_in_col(h.hcenter()) == 4 {
                return '@' as i32;
            }
            if c == 4 && similar(left_delta, right_delta, 40, 1) && f.lp.ispit() {
                return '@' as i32;
            }
        }
        if f.tp.minima(-1) == 1 && f.bp.istip() && !f.lp.isconvex() && !f.rp.isctip(66) {
            return 'A' as i32;
        }
    }

    if similar(left_delta, right_delta, 50, 1) {
        if f.bp.minima(-1) == 1 && f.rp.isconvex() && b.test_bd() { return 'D' as i32; }
        if f.bp.minima(-1) > 1 || f.rp.minima(-1) > 1 || b.test_q() {
            return if 4 * h.size() >= b.size() || f.tp.ispit() || f.lp.ispit() { 'Q' as i32 } else { 0 };
        }
        if 3 * f.bp.at_pos(100) < b.height() && 5 * f.rp.at_pos(55) >= b.width() {
            return 'a' as i32;
        }
        if f.lp.istip() { return 'n' as i32; }
        if b.vpos(80) < charbox.vcenter() { return ucs::code::DEG; }
        return 'o' as i32;
    }
    if left_delta > right_delta && f.rp.ispit() && f.tp.minima(-1) == 1 && f.bp.minima(-1) == 1 {
        return 'D' as i32;
    }
    if similar(left_delta, right_delta, 50, 1) && (f.bp.minima(-1) > 1 || f.rp.minima(-1) > 1) {
        return 'a' as i32;
    }
    0
}

/// `6`/`a`/`b`/`d` family: the hole is roughly vertically centred, with
/// the upper half of the glyph the one examined for openings.
pub fn test_6abd(b: &Blob, f: &mut crate::Features, charset: &Charset) -> i32 {
    let h = b.hole(0).expect("recognize111 dispatches test_6abd only when holes() == 1");

    if 3 * h.width() < b.width()
        && (f.bp.minima(b.height() / 4) != 1 || f.tp.minima(h.vcenter() - b.top()) != 1)
    {
        return 0;
    }

    let mut col = h.hcenter();
    let mut row = b.seek_top(h.top(), col, false) - 1;
    if row <= b.top() {
        col = h.right();
        if b.right() - h.right() > h.width() { col += 1; }
        row = b.seek_top(h.top(), col, false) - 1;
    }
    if row <= b.top() { return 0; }
    let rcol = (b.right() + h.right()) / 2;
    let urow = h.top() - (b.bottom() - h.bottom());
    let oacute1 = b.seek_right(urow - 1, h.right(), true) >= b.right() || b.seek_right(row, col, true) >= b.right();

    if b.escape_right(row, col) {
        let noise = (b.width() / 30) + 1;
        let c = f.lp.at(urow - b.top());
        let oacute2 = c > f.lp.at(h.top() - b.top()) + noise
            && urow <= b.top() + f.tp.at((c - 1).min(b.width() / 4));
        if oacute1 && oacute2 && (charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9)) {
            let oacute3 = b.right() - f.rp.at_pos(5) >= h.right() || b.left() + f.lp.at(h.top() - b.top()) <= b.hpos(5);
            if oacute3 { return ucs::code::SOACUTE; }
        }
        if !oacute2 && f.lp.ispit() && f.bp.ispit() {
            let mut row2 = b.seek_top(h.top(), h.right() + 1, false) - 1;
            row2 = b.seek_top(row2, h.right() + 1, true);
            if row2 > b.top() { return '6' as i32; }
        }
        let mut row2 = b.seek_top(h.top(), rcol, false) - 1;
        row2 = b.seek_top(row2, rcol, true);
        if row2 <= b.top() { return 'b' as i32; }
        let m = f.tp.minima(b.height() / 2);
        return if m == 1 { 's' as i32 } else if m == 2 { 'k' as i32 } else { 0 };
    }

    if b.escape_left(row, col) {
        let col2 = h.left().max(h.hpos(10));
        let mut row2 = b.seek_top(h.top(), col2, false) - 1;
        row2 = b.seek_top(row2, col2, true);
        if row2 > b.top() {
            if charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9) {
                let row3 = b.seek_top(row, col, true);
                if row > b.vcenter() && row3 > b.vpos(20) { return ucs::code::SAACUTE; }
                if oacute1 { return ucs::code::SOGRAVE; }
            }
            return 'a' as i32;
        }
        if charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9) {
            if oacute1 { return ucs::code::SOACUTE; }
        }
        return 'd' as i32;
    }

    if b.width() > 3 * h.width() && h.top() < b.vcenter() && f.segments_in_row(b.vcenter()) == 3 && !f.lp.isconvex() {
        return 'm' as i32;
    }
    if let Some(hdiff) = b.top_hook() {
        if hdiff > 0 { return 's' as i32; }
    }
    0
}

/// Three black sections stacked in column `hcenter() ± n`: `2`/`3`/`5`/`E`/
/// `F`/`f`/`s`/`z`, plus `CCCEDI`/`SCCEDI` when the active charset carries
/// cedilla forms.
pub fn test_235esz(f: &mut crate::Features, charset: &Charset) -> i32 {
    let b = f.bitmap();
    const CSIZE: i32 = 3;
    const UCOFF: [i32; 3] = [0, -1, 1];
    const LCOFF: [i32; 9] = [0, -1, 1, -1, 0, 1, 1, 0, -1];

    if b.width() < 9 || b.height() > 3 * b.width() || f.bp.minima(b.height() / 2) > 1 {
        return 0;
    }

    let noise = (b.height().min(b.width()) / 15) + 1;
    let (mut lrow1, mut urow2, mut lrow2, mut urow3) = (0, 0, 0, 0);
    let (mut lcol1, mut ucol2, mut lcol2, mut ucol3) = (0, 0, 0, 0);
    let mut done = false;

    for i in 0..CSIZE {
        if done { break; }
        let ucol = b.hcenter() + noise * UCOFF[i as usize];
        let mut row = b.top() + f.tp.at(ucol - b.left());
        row += 1;
        while row < b.bottom() && b.get_bit(row, ucol) { row += 1; }
        if row <= b.vpos(30) { lrow1 = row; lcol1 = ucol; } else { continue; }
        row += 1;
        while row < b.bottom() && !b.get_bit(row, ucol) { row += 1; }
        if row < b.bottom() {
            urow2 = row - 1;
            ucol2 = ucol;
            for j in 0..CSIZE {
                if done { break; }
                let lcol = b.hcenter() + noise * LCOFF[(CSIZE * i + j) as usize];
                row = urow2 + 1;
                if ucol != lcol {
                    let d = if ucol > lcol { 1 } else { -1 };
                    let mut c = lcol;
                    while c != ucol && b.get_bit(row, c) { c += d; }
                    if c != ucol { continue; }
                }
                row += 1;
                while row < b.bottom() && b.get_bit(row, lcol) { row += 1; }
                if row < b.bottom() { lrow2 = row; lcol2 = lcol; } else { continue; }
                row += 1;
                while row <= b.bottom() && !b.get_bit(row, lcol) { row += 1; }
                if row <= b.bottom() && row > b.vpos(70) {
                    urow3 = row - 1;
                    ucol3 = lcol;
                    done = true;
                }
            }
        }
    }
    if !done { return 0; }

    let bopen = b.escape_bottom(urow3, ucol3);
    let topen = b.escape_top(lrow1, lcol1);
    let tbopen = bopen && topen;
    let ascode = if b.get_bit(b.vcenter(), b.hcenter()) { '*' as i32 } else { 0 };

    if b.escape_left(lrow2, lcol2) {
        if b.escape_left(urow2, ucol2) {
            if tbopen { return ascode; }
            if !bopen && !topen && b.height() <= 3 * b.width() {
                let lm = f.lp.minima(-1);
                let rm = f.rp.minima(-1);
                if (lm == 3 || lm == 2) && (rm == 2 || (rm == 1 && f.rp.iminimum(0, -1) < f.rp.pos(80))) {
                    return '3' as i32;
                }
            }
        } else if b.escape_right(urow2, ucol2) {
            if tbopen { return ascode; }
            if f.rp.at(lrow1 + 1 - b.top()) >= lcol1 - b.left()
                && (f.lp.at(lrow2 + 1 - b.top()) < lcol2 - b.left() || f.lp.at(urow3 - 1 - b.top()) < ucol3 - b.left())
            {
                let mut c = 0;
                if b.top_hook().map_or(true, |hdiff| 5 * hdiff >= 4 * b.height()) { c += 1; }
                if 2 * f.lp.at(lrow2 - b.top()) < lcol2 - b.left() { c += 1; }
                if !f.tp.isconvex() || (!f.tp.ispit() && f.bp.ispit()) { c += 1; }
                if c >= 2 { return '5' as i32; }
            }
            if charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9) {
                if urow2 > b.vpos(55) && b.seek_right(urow2 - 1, ucol2, true) < b.right() {
                    return if urow2 > b.vpos(63) { ucs::code::CCCEDI } else { ucs::code::SCCEDI };
                }
            }
            return 's' as i32;
        }
    } else if b.escape_right(lrow2, lcol2) {
        if b.escape_right(urow2, ucol2) {
            if tbopen { return ascode; }
            if f.bp.minima(b.height() / 5) == 1 {
                if 8 * f.lp.at(((lrow2 + urow3) / 2) - b.top()) >= b.width()
                    && b.escape_top((lrow1 + urow2) / 2, b.left())
                    && !b.escape_top((lrow2 + urow3) / 2, b.left())
                {
                    return 'f' as i32;
                }
                if f.rp.minima(b.width() / 8) < 3 && b.escape_bottom(urow3, ucol3) {
                    if (charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9))
                        && 2 * f.lp.at_pos(95) > f.rp.at_pos(95)
                    {
                        return if urow2 > b.vpos(63) { ucs::code::CCCEDI } else { ucs::code::SCCEDI };
                    }
                    return 'F' as i32;
                } else if lrow1 < urow2 && lrow2 < urow3 {
                    return 'E' as i32;
                }
            }
        } else if b.escape_left(urow2, ucol2) {
            if !tbopen
                && (2 * f.lp.at_pos(50)) + 2 >= b.width()
                && (f.tp.isconvex() || (f.tp.ispit() && !f.bp.ispit()))
            {
                return '2' as i32;
            }
            if b.height() <= 2 * f.wp.max() && f.bp.at_pos(75) <= b.height() / 10 {
                return 'z' as i32;
            }
        }
    }
    0
}

/// `C`/`E`/`F`/`I`/`J`/`L`/`l`/`T` family, keyed off the blob's vertical and
/// horizontal bars.
pub fn test_cefijllt(f: &mut crate::Features, charset: &Charset) -> i32 {
    let b = f.bitmap();
    if f.tp.minima(b.height() / 4) != 1 || f.bp.minima(b.height() / 4) != 1 {
        return 0;
    }

    let noise = (b.height().min(b.width()) / 30) + 1;
    {
        let col = if 2 * (f.lp.at_pos(50) + noise) >= b.width() { b.hpos(25) } else { b.hpos(75) };
        let row = b.seek_top(b.vcenter(), col, true);
        if row <= b.top() || (row < b.vpos(25) && b.escape_top(row, col)) {
            if let Some(hdiff) = b.bottom_hook() {
                if hdiff > b.height() / 2 && f.rp.increasing_pos(80, 1) && !f.rp.decreasing(1) {
                    return 'J' as i32;
                }
                if -hdiff > b.height() / 2 {
                    if 5 * f.lp.at_pos(80) >= 2 * b.width() { return 'v' as i32; }
                    if col > b.hcenter() { return 'L' as i32; }
                }
            }
        }
    }

    let vnoise = (b.height() / 30) + 1;
    let topmax = b.top() + vnoise;
    let botmin = b.bottom() - vnoise;
    if f.vbars() == 1 && f.vbar(0).width() >= 2 && 2 * f.vbar(0).width() < b.width() {
        let v0 = f.vbar(0);
        if (v0.hcenter() - b.hcenter()).abs() <= noise
            && ((v0.left() - b.left()) - (b.right() - v0.right())).abs() <= 2 * noise
        {
            if f.hbars() == 1 && 4 * f.hbar(0).height() <= b.height() {
                let h0 = f.hbar(0);
                if h0.top() <= topmax || h0.bottom() < b.vpos(15) { return 'T' as i32; }
                if (h0.vcenter() - b.vcenter()).abs() <= 1 && similar(b.height(), b.width(), 50, 0) {
                    return '+' as i32;
                }
            }
            if f.hbars() == 2
                && f.hbar(0).top() <= topmax
                && 4 * f.hbar(0).height() <= b.height()
                && f.hbar(1).bottom() >= botmin
                && 4 * f.hbar(1).height() <= b.height()
                && 3 * f.hbar(0).width() > 4 * f.hbar(1).width()
            {
                return 'T' as i32;
            }
        }
    }

    if f.vbars() == 1 && f.vbar(0).width() >= 2 && 2 * f.vbar(0).width() <= b.width() {
        let v0 = f.vbar(0);
        if v0.right() <= b.hcenter() {
            if (f.hbars() == 2 || f.hbars() == 3)
                && f.hbar(0).top() <= topmax
                && f.hbar(0).width() + 1 >= f.hbar(1).width()
                && 2 * f.hbar(1).width() >= 3 * v0.width()
                && v0.h_overlaps(&f.hbar(1))
            {
                if f.hbars() == 3
                    && similar(f.hbar(0).width(), f.hbar(2).width(), 10, 2)
                    && 10 * f.hbar(2).width() >= 9 * f.hbar(1).width()
                    && f.hbar(0).left() <= f.hbar(1).left() + 1
                {
                    return 'E' as i32;
                }
                if (f.hbars() == 2 || f.hbar(0).width() > f.hbar(2).width())
                    && (f.hbar(1).includes_vcenter(b.rect())
                        || (3 * f.hbar(1).width() > 2 * f.hbar(0).width()
                            && 10 * f.lp.at(vnoise) < b.width()
                            && f.hbar(1).top() > b.vpos(30)
                            && f.hbar(1).bottom() < b.vpos(60)))
                {
                    return 'F' as i32;
                }
            }
            if f.hbars() == 2
                && f.hbar(1).bottom() >= botmin
                && b.height() > b.width()
                && f.hbar(1).width() > f.hbar(0).width()
                && (v0.hcenter() - f.hbar(0).hcenter()).abs() <= 1
                && f.rp.iminimum(0, -1) > f.rp.pos(70)
            {
                return 'L' as i32;
            }
            if f.hbars() == 1 && similar(f.hbar(0).width(), b.width(), 10, 0) && v0.left() <= b.hpos(30) {
                if f.hbar(0).bottom() >= botmin && b.escape_top(b.vcenter(), b.hpos(75)) {
                    return 'L' as i32;
                }
                if f.hbar(0).top() <= topmax
                    && 2 * f.wp.at_pos(50) >= b.width()
                    && 4 * f.wp.at_pos(75) < b.width()
                    && b.escape_right(b.vpos(25), b.hcenter())
                {
                    return 'F' as i32;
                }
            }
        }

        if v0.left() > b.hcenter() && f.hbars() == 1 && f.hbar(0).top() <= topmax && f.hbar(0).width() + 1 >= b.width()
        {
            if (charset.enabled(Charset::ISO_8859_15) || charset.enabled(Charset::ISO_8859_9)) && b.width() > b.height() {
                return ucs::code::NOT;
            }
            return 0;
        }
    }

    if f.vbars() == 1 && f.vbar(0).width() >= 2 && f.tp.minima(-1) == 1 && f.bp.minima(-1) == 1 {
        let v0 = f.vbar(0);
        if 3 * b.height() > 4 * b.width() && similar(v0.left() - b.left(), b.right() - v0.right(), 30, 2 * noise) {
            if b.height() <= 3 * f.wp.max() && f.rp.istip() && f.lp.istip() {
                if b.height() <= 3 * b.width()
                    && f.lp.at_pos(40) > f.lp.at_pos(60) + noise
                    && f.rp.at_pos(60) > f.rp.at_pos(40) + noise
                {
                    return 'z' as i32;
                }
                return 'I' as i32;
            }
            if f.rp.isflats()
                && (f.lp.istip()
                    || f.lp.isflats()
                    || (f.lp.isctip(50)
                        && f.lp.minima(-1) == 2
                        && f.lp.iminimum(0, -1) < f.lp.pos(30)
                        && f.lp.iminimum(1, -1) > f.lp.pos(80)))
            {
                return 'l' as i32;
            }
            if b.height() > 3 * f.wp.max() {
                if f.rp.istip() && f.lp.ispit() && similar(f.lp.iminimum(0, -1), f.lp.pos(50), 10, 0) {
                    return if f.lp.istpit() { '{' as i32 } else { '(' as i32 };
                }
                if f.lp.istip() && f.rp.ispit() && similar(f.rp.iminimum(0, -1), f.rp.pos(50), 10, 0) {
                    return if f.rp.istpit() { '}' as i32 } else { ')' as i32 };
                }
                if f.rp.isflats() && 2 * v0.size() >= b.area() { return 'l' as i32; }
            }
            if 2 * b.height() > 3 * b.width() && f.lp.minima(-1) <= 2 && (f.rp.isflats() || f.rp.minima(-1) == 1) {
                if v0.right() >= b.hpos(70) || b.escape_top(b.vpos(75), b.right().min(v0.right() + 1)) {
                    let mut i = v0.left() - 1;
                    while i > b.left() {
                        if b.seek_bottom(b.vpos(75), i, true) < b.bottom() && f.bp.at(i - b.left()) <= noise {
                            return 'l' as i32;
                        }
                        i -= 1;
                    }
                }
            }
        }
        if v0.left() <= b.left() + 1 && b.height() > 2 * b.width() && f.rp.istip() {
            if 2 * f.rp.at_pos(50) > b.width() {
                let row = b.seek_top(b.vcenter(), b.hcenter(), true);
                let col = b.seek_right(row, b.hcenter(), true);
                if col < b.right() {
                    let row = b.seek_bottom(b.vcenter(), b.hcenter(), true);
                    let col = b.seek_right(row, b.hcenter(), true);
                    if col < b.right() { return 'C' as i32; }
                }
            }
            return '[' as i32;
        }
        if v0.right() >= b.right() - 1 {
            if f.lp.istip() && b.height() > 2 * b.width() {
                if 2 * v0.width() <= f.wp.max() && f.lp.at_pos(50) >= b.width() / 2 { return ']' as i32; }
                if b.height() >= 3 * b.width() { return 'l' as i32; }
            }
            if 2 * b.height() >= 3 * b.width() && v0.height() >= 3 * v0.width() && f.lp.istpit() && f.lp.minima(-1) == 1 {
                let i = f.lp.iminimum(0, -1);
                if i > f.lp.pos(10) && i < f.lp.pos(40) { return '1' as i32; }
            }
        }
    }
    if f.hbars() == 1
        && (f.hbar(0).vcenter() - b.vcenter()).abs() <= 1
        && similar(b.height(), b.width(), 50, 0)
        && f.tp.isupit()
        && f.bp.isupit()
    {
        return '+' as i32;
    }
    0
}

/// Four black sections in column `hcenter() ± 1`: `s`-cedilla's only
/// diagnostic feature is the escape pattern of the inner two gaps.
pub fn test_s_cedilla(f: &mut crate::Features) -> i32 {
    let b = f.bitmap();
    let (mut urow2, mut urow3, mut urow4) = (0, 0, 0);
    let mut col = 0;
    let mut black_section = 0;

    for c in (b.hcenter() - 1)..=(b.hcenter() + 1) {
        col = c;
        let mut prev_black = false;
        for row in b.top()..=b.bottom() {
            let black = b.get_bit(row, col);
            if black && !prev_black {
                black_section += 1;
                match black_section {
                    2 => urow2 = row - 1,
                    3 => urow3 = row - 1,
                    4 => urow4 = row - 1,
                    _ => {}
                }
            }
            prev_black = black;
        }
        if black_section == 4 && urow2 < b.vpos(50) && urow4 >= b.vpos(70) { break; }
        black_section = 0;
    }

    if black_section == 4 && b.escape_right(urow2, col) && b.escape_left(urow3, col) && b.escape_left(urow4, col) {
        return ucs::code::SSCEDI;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Features;
    use ocrad_core::Rectangle;

    fn solid_square_blob() -> Blob {
        let mut b = Blob::blank(0, 0, 9, 9).unwrap();
        for row in 0..=9 { for col in 0..=9 { b.add_point(row, col); } }
        b
    }

    #[test]
    fn solid_filled_square_reads_as_period() {
        let b = solid_square_blob();
        let mut f = Features::new(b.bitmap());
        let charbox = Rectangle::new(0, 0, 9, 20).unwrap();
        assert_eq!(test_solid(&b, &mut f, &charbox), '.' as i32);
    }

    #[test]
    fn comma_rejects_blob_with_holes() {
        let mut b = Blob::blank(0, 0, 4, 9).unwrap();
        for row in 0..=9 { for col in 0..=4 { b.add_point(row, col); } }
        b.find_holes();
        assert!(!test_comma(&b));
    }
}
