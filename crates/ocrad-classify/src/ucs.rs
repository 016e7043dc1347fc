//! Unicode code points for the accented Latin-1/Latin-9 glyphs the
//! classifier composes from a base letter plus an accent stroke, and the
//! small set of codepoint predicates/conversions the cascade and the
//! output writers need.
//!
//! Grounded on `ucs.h`/`ucs.cc`.

/// Named code points, kept as plain `i32` constants (not an enum) since
/// they're used as ordinary guess codes alongside arbitrary ASCII values,
/// never matched exhaustively over a closed set.
pub mod code {
    pub const IEXCLAM: i32 = 0x00A1;
    pub const COPY: i32 = 0x00A9;
    pub const FEMIORD: i32 = 0x00AA;
    pub const LDANGLE: i32 = 0x00AB;
    pub const NOT: i32 = 0x00AC;
    pub const REG: i32 = 0x00AE;
    pub const DEG: i32 = 0x00B0;
    pub const PLUSMIN: i32 = 0x00B1;
    pub const POW2: i32 = 0x00B2;
    pub const POW3: i32 = 0x00B3;
    pub const MICRO: i32 = 0x00B5;
    pub const PILCROW: i32 = 0x00B6;
    pub const MIDDOT: i32 = 0x00B7;
    pub const POW1: i32 = 0x00B9;
    pub const MASCORD: i32 = 0x00BA;
    pub const RDANGLE: i32 = 0x00BB;
    pub const IQUEST: i32 = 0x00BF;
    pub const CAGRAVE: i32 = 0x00C0;
    pub const CAACUTE: i32 = 0x00C1;
    pub const CACIRCU: i32 = 0x00C2;
    pub const CATILDE: i32 = 0x00C3;
    pub const CADIAER: i32 = 0x00C4;
    pub const CARING: i32 = 0x00C5;
    pub const CCCEDI: i32 = 0x00C7;
    pub const CEGRAVE: i32 = 0x00C8;
    pub const CEACUTE: i32 = 0x00C9;
    pub const CECIRCU: i32 = 0x00CA;
    pub const CEDIAER: i32 = 0x00CB;
    pub const CIGRAVE: i32 = 0x00CC;
    pub const CIACUTE: i32 = 0x00CD;
    pub const CICIRCU: i32 = 0x00CE;
    pub const CIDIAER: i32 = 0x00CF;
    pub const CNTILDE: i32 = 0x00D1;
    pub const COGRAVE: i32 = 0x00D2;
    pub const COACUTE: i32 = 0x00D3;
    pub const COCIRCU: i32 = 0x00D4;
    pub const COTILDE: i32 = 0x00D5;
    pub const CODIAER: i32 = 0x00D6;
    pub const CUGRAVE: i32 = 0x00D9;
    pub const CUACUTE: i32 = 0x00DA;
    pub const CUCIRCU: i32 = 0x00DB;
    pub const CUDIAER: i32 = 0x00DC;
    pub const CYACUTE: i32 = 0x00DD;
    pub const SSSHARP: i32 = 0x00DF;
    pub const SAGRAVE: i32 = 0x00E0;
    pub const SAACUTE: i32 = 0x00E1;
    pub const SACIRCU: i32 = 0x00E2;
    pub const SATILDE: i32 = 0x00E3;
    pub const SADIAER: i32 = 0x00E4;
    pub const SARING: i32 = 0x00E5;
    pub const SCCEDI: i32 = 0x00E7;
    pub const SEGRAVE: i32 = 0x00E8;
    pub const SEACUTE: i32 = 0x00E9;
    pub const SECIRCU: i32 = 0x00EA;
    pub const SEDIAER: i32 = 0x00EB;
    pub const SIGRAVE: i32 = 0x00EC;
    pub const SIACUTE: i32 = 0x00ED;
    pub const SICIRCU: i32 = 0x00EE;
    pub const SIDIAER: i32 = 0x00EF;
    pub const SNTILDE: i32 = 0x00F1;
    pub const SOGRAVE: i32 = 0x00F2;
    pub const SOACUTE: i32 = 0x00F3;
    pub const SOCIRCU: i32 = 0x00F4;
    pub const SOTILDE: i32 = 0x00F5;
    pub const SODIAER: i32 = 0x00F6;
    pub const DIV: i32 = 0x00F7;
    pub const SUGRAVE: i32 = 0x00F9;
    pub const SUACUTE: i32 = 0x00FA;
    pub const SUCIRCU: i32 = 0x00FB;
    pub const SUDIAER: i32 = 0x00FC;
    pub const SYACUTE: i32 = 0x00FD;
    pub const SYDIAER: i32 = 0x00FF;
    pub const CGBREVE: i32 = 0x011E;
    pub const SGBREVE: i32 = 0x011F;
    pub const CIDOT: i32 = 0x0130;
    pub const SINODOT: i32 = 0x0131;
    pub const CSCEDI: i32 = 0x015E;
    pub const SSCEDI: i32 = 0x015F;
    pub const CSCARON: i32 = 0x0160;
    pub const SSCARON: i32 = 0x0161;
    pub const CZCARON: i32 = 0x017D;
    pub const SZCARON: i32 = 0x017E;
    pub const EURO: i32 = 0x20AC;
}

use code::*;

/// Strips an accent off a capital/small accented letter, returning the
/// plain ASCII base letter it was built from, or `0` if `code` isn't one
/// of the accented letters this table knows.
#[must_use]
pub fn base_letter(code: i32) -> i32 {
    match code {
        CAGRAVE | CAACUTE | CACIRCU | CATILDE | CADIAER | CARING => 'A' as i32,
        CCCEDI => 'C' as i32,
        CEGRAVE | CEACUTE | CECIRCU | CEDIAER => 'E' as i32,
        CGBREVE => 'G' as i32,
        CIGRAVE | CIACUTE | CICIRCU | CIDIAER | CIDOT => 'I' as i32,
        CNTILDE => 'N' as i32,
        COGRAVE | COACUTE | COCIRCU | COTILDE | CODIAER => 'O' as i32,
        CSCEDI => 'S' as i32,
        CUGRAVE | CUACUTE | CUCIRCU | CUDIAER => 'U' as i32,
        CYACUTE => 'Y' as i32,
        SAGRAVE | SAACUTE | SACIRCU | SATILDE | SADIAER | SARING => 'a' as i32,
        SCCEDI => 'c' as i32,
        SEGRAVE | SEACUTE | SECIRCU | SEDIAER => 'e' as i32,
        SGBREVE => 'g' as i32,
        SIGRAVE | SIACUTE | SICIRCU | SIDIAER | SINODOT => 'i' as i32,
        SNTILDE => 'n' as i32,
        SOGRAVE | SOACUTE | SOCIRCU | SOTILDE | SODIAER => 'o' as i32,
        SSCEDI => 's' as i32,
        SUGRAVE | SUACUTE | SUCIRCU | SUDIAER => 'u' as i32,
        SYACUTE | SYDIAER => 'y' as i32,
        _ => 0,
    }
}

/// Builds an accented code point from a base `letter` and an `accent`
/// stroke character (`'\''`, `` '`' ``, `'^'`, `':'`), or `0` if that
/// combination isn't one of the known compositions.
#[must_use]
pub fn compose(letter: i32, accent: i32) -> i32 {
    let acute = '\'' as i32;
    let grave = '`' as i32;
    let circu = '^' as i32;
    let diaer = ':' as i32;
    match letter as u8 as char {
        'A' => {
            if accent == acute { return CAACUTE; }
            if accent == grave { return CAGRAVE; }
            if accent == circu { return CACIRCU; }
            if accent == diaer { return CADIAER; }
        }
        'E' => {
            if accent == acute { return CEACUTE; }
            if accent == grave { return CEGRAVE; }
            if accent == circu { return CECIRCU; }
            if accent == diaer { return CEDIAER; }
        }
        'G' => return CGBREVE,
        '[' | 'I' => {
            if accent == acute { return CIACUTE; }
            if accent == grave { return CIGRAVE; }
            if accent == circu { return CICIRCU; }
            if accent == diaer { return CIDIAER; }
        }
        'N' => { if accent != diaer { return CNTILDE; } }
        'O' => {
            if accent == acute { return COACUTE; }
            if accent == grave { return COGRAVE; }
            if accent == circu { return COCIRCU; }
            if accent == diaer { return CODIAER; }
        }
        'S' => return CSCARON,
        'U' | 'V' => {
            if accent == acute { return CUACUTE; }
            if accent == grave { return CUGRAVE; }
            if accent == circu { return CUCIRCU; }
            if accent == diaer { return CUDIAER; }
        }
        'Z' => return CZCARON,
        'a' => {
            if accent == acute { return SAACUTE; }
            if accent == grave { return SAGRAVE; }
            if accent == circu { return SACIRCU; }
            if accent == diaer { return SADIAER; }
        }
        'e' => {
            if accent == acute { return SEACUTE; }
            if accent == grave { return SEGRAVE; }
            if accent == circu { return SECIRCU; }
            if accent == diaer { return SEDIAER; }
        }
        '9' | 'g' => return SGBREVE,
        '|' | ']' | 'i' | 'l' => {
            if accent == acute { return SIACUTE; }
            if accent == grave { return SIGRAVE; }
            if accent == circu { return SICIRCU; }
            if accent == diaer { return SIDIAER; }
        }
        'n' => { if accent != diaer { return SNTILDE; } }
        'o' => {
            if accent == acute { return SOACUTE; }
            if accent == grave { return SOGRAVE; }
            if accent == circu { return SOCIRCU; }
            if accent == diaer { return SODIAER; }
        }
        's' => return SSCARON,
        'u' | 'v' => {
            if accent == acute { return SUACUTE; }
            if accent == grave { return SUGRAVE; }
            if accent == circu { return SUCIRCU; }
            if accent == diaer { return SUDIAER; }
        }
        'y' => {
            if accent == acute { return SYACUTE; }
            if accent == diaer { return SYDIAER; }
        }
        'z' => return SZCARON,
        _ => {}
    }
    0
}

#[must_use]
pub fn isalnum(code: i32) -> bool { isalpha(code) || isdigit(code) }

#[must_use]
pub fn isalpha(code: i32) -> bool {
    (code < 128 && is_ascii_alpha(code)) || base_letter(code) != 0
}

#[must_use]
pub fn isdigit(code: i32) -> bool { (b'0' as i32..=b'9' as i32).contains(&code) }

/// High-waisted glyphs whose top extends to cap height, like `A`, `1`,
/// `b`, `|`.
#[must_use]
pub fn ishigh(code: i32) -> bool {
    if isupper(code) || isdigit(code) { return true; }
    matches!(
        code as u8 as char,
        'b' | 'd' | 'f' | 'g' | 'h' | 'i' | 'j' | 'k' | 'l' | 'p' | 'q' | 't' | 'y' | '|'
    ) && code < 128
}

#[must_use]
pub fn islower(code: i32) -> bool {
    if code < 128 && is_ascii_lower(code) { return true; }
    let base = base_letter(code);
    base != 0 && is_ascii_lower(base)
}

/// Lowercase glyphs easily mistaken for their uppercase counterpart at
/// small point sizes (includes the small-ambiguous set).
#[must_use]
pub fn islower_ambiguous(code: i32) -> bool {
    if islower_small_ambiguous(code) { return true; }
    code == 'k' as i32
        || code == 'p' as i32
        || matches!(
            code,
            SCCEDI | SIGRAVE | SIACUTE | SICIRCU | SIDIAER | SOGRAVE | SOACUTE | SOCIRCU
                | SOTILDE | SODIAER | SUGRAVE | SUACUTE | SUCIRCU | SUDIAER | SSCEDI | SSCARON
                | SZCARON
        )
}

/// Lowercase glyphs whose x-height body looks like a shrunk capital
/// (`a c e m n o r s u v w x z`).
#[must_use]
pub fn islower_small(code: i32) -> bool {
    if code >= 128 || !is_ascii_lower(code) { return false; }
    matches!(code as u8 as char, 'a' | 'c' | 'e' | 'm' | 'n' | 'o' | 'r' | 's' | 'u' | 'v' | 'w' | 'x' | 'z')
}

#[must_use]
pub fn islower_small_ambiguous(code: i32) -> bool {
    if code >= 128 || !is_ascii_lower(code) { return false; }
    matches!(code as u8 as char, 'c' | 'o' | 's' | 'u' | 'v' | 'w' | 'x' | 'z')
}

#[must_use]
pub fn isspace(code: i32) -> bool { code < 128 && is_ascii_space(code) }

#[must_use]
pub fn isupper(code: i32) -> bool {
    if code < 128 && is_ascii_upper(code) { return true; }
    let base = base_letter(code);
    base != 0 && is_ascii_upper(base)
}

#[must_use]
pub fn isvowel(code: i32) -> bool {
    let code = if code >= 128 { base_letter(code) } else { code };
    if code == 0 || !(code < 128 && is_ascii_alpha(code)) { return false; }
    let lower = ascii_tolower(code);
    matches!(lower as u8 as char, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Folds a code point down to the matching Latin-9 (ISO 8859-15) byte, or
/// `0` if it has no Latin-9 representation.
#[must_use]
pub fn map_to_byte(code: i32) -> u8 {
    if code < 0 { return 0; }
    if code < 256 { return code as u8; }
    match code {
        CGBREVE => 0xD0,
        SGBREVE => 0xF0,
        CIDOT => 0xDD,
        SINODOT => 0xFD,
        CSCEDI => 0xDE,
        SSCEDI => 0xFE,
        CSCARON => 0xA6,
        SSCARON => 0xA8,
        CZCARON => 0xB4,
        SZCARON => 0xB8,
        EURO => 0xA4,
        _ => 0,
    }
}

/// Encodes `code` as UTF-8, or an empty string for a negative or
/// out-of-range code point. Returns an owned `String` instead of the
/// original's reused static buffer — nothing here needs to avoid an
/// allocation per character.
#[must_use]
pub fn ucs_to_utf8(code: i32) -> String {
    if code < 0 || code > 0x7FFF_FFFF { return String::new(); }
    if let Some(c) = char::from_u32(code as u32) {
        let mut buf = [0u8; 4];
        return c.encode_utf8(&mut buf).to_string();
    }
    // Surrogate-range or otherwise non-scalar values still need the RFC
    // 2279-style 5/6-byte forms the original emitted; `char` can't
    // represent them, so encode by hand.
    let (len, mask): (usize, u8) = if code < 0x800 {
        (2, 0xC0)
    } else if code < 0x1_0000 {
        (3, 0xE0)
    } else if code < 0x20_0000 {
        (4, 0xF0)
    } else if code < 0x400_0000 {
        (5, 0xF8)
    } else {
        (6, 0xFC)
    };
    let mut bytes = vec![0u8; len];
    let mut d = 0;
    for i in (1..len).rev() {
        bytes[i] = 0x80 | (((code >> d) & 0x3F) as u8);
        d += 6;
    }
    bytes[0] = mask | ((code >> d) as u8);
    String::from_utf8(bytes).unwrap_or_default()
}

/// OCR-confusion table: maps a letter/symbol commonly mistaken for a
/// digit to that digit (`'O'` -> `'0'`, `'S'` -> `'5'`, ...).
#[must_use]
pub fn to_nearest_digit(code: i32) -> i32 {
    match code as u8 as char {
        'O' | 'Q' | 'o' => '0' as i32,
        '|' | 'I' | 'L' | 'l' => '1' as i32,
        _ if code == SINODOT => '1' as i32,
        'Z' | 'z' => '2' as i32,
        'A' | 'q' => '4' as i32,
        'S' | 's' => '5' as i32,
        'G' | 'b' => '6' as i32,
        _ if code == SOACUTE => '6' as i32,
        'J' | 'T' => '7' as i32,
        '&' | 'B' => '8' as i32,
        'g' => '9' as i32,
        _ => code,
    }
}

/// Inverse of [`to_nearest_digit`]: maps a digit to the letter/symbol it's
/// commonly mistaken for.
#[must_use]
pub fn to_nearest_letter(code: i32) -> i32 {
    match code as u8 as char {
        '0' => 'O' as i32,
        '1' => 'l' as i32,
        '2' => 'Z' as i32,
        '4' => 'q' as i32,
        '5' => 'S' as i32,
        '6' => SOACUTE,
        '7' => 'I' as i32,
        '8' => 'B' as i32,
        '9' => 'g' as i32,
        _ => code,
    }
}

#[must_use]
pub fn toupper(code: i32) -> i32 {
    if code < 128 { return ascii_toupper(code); }
    match code {
        SAGRAVE => CAGRAVE,
        SAACUTE => CAACUTE,
        SACIRCU => CACIRCU,
        SATILDE => CATILDE,
        SADIAER => CADIAER,
        SARING => CARING,
        SCCEDI => CCCEDI,
        SEGRAVE => CEGRAVE,
        SEACUTE => CEACUTE,
        SECIRCU => CECIRCU,
        SEDIAER => CEDIAER,
        SGBREVE => CGBREVE,
        SIGRAVE => CIGRAVE,
        SIACUTE => CIACUTE,
        SICIRCU => CICIRCU,
        SIDIAER => CIDIAER,
        SNTILDE => CNTILDE,
        SOGRAVE => COGRAVE,
        SOACUTE => COACUTE,
        SOCIRCU => COCIRCU,
        SOTILDE => COTILDE,
        SODIAER => CODIAER,
        SSCEDI => CSCEDI,
        SUGRAVE => CUGRAVE,
        SUACUTE => CUACUTE,
        SUCIRCU => CUCIRCU,
        SUDIAER => CUDIAER,
        SYACUTE => CYACUTE,
        _ => code,
    }
}

fn is_ascii_alpha(code: i32) -> bool { (0..128).contains(&code) && (code as u8 as char).is_ascii_alphabetic() }
fn is_ascii_lower(code: i32) -> bool { (0..128).contains(&code) && (code as u8 as char).is_ascii_lowercase() }
fn is_ascii_upper(code: i32) -> bool { (0..128).contains(&code) && (code as u8 as char).is_ascii_uppercase() }
fn is_ascii_space(code: i32) -> bool { (0..128).contains(&code) && (code as u8 as char).is_ascii_whitespace() }
fn ascii_tolower(code: i32) -> i32 { (code as u8 as char).to_ascii_lowercase() as i32 }
fn ascii_toupper(code: i32) -> i32 { (code as u8 as char).to_ascii_uppercase() as i32 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_accented_letters() {
        assert_eq!(compose('A' as i32, '\'' as i32), CAACUTE);
        assert_eq!(compose('n' as i32, '~' as i32), SNTILDE);
        assert_eq!(compose('x' as i32, '\'' as i32), 0);
    }

    #[test]
    fn base_letter_strips_accents() {
        assert_eq!(base_letter(CAACUTE), 'A' as i32);
        assert_eq!(base_letter('A' as i32), 0);
    }

    #[test]
    fn utf8_roundtrips_through_char() {
        assert_eq!(ucs_to_utf8('A' as i32), "A");
        assert_eq!(ucs_to_utf8(EURO), "\u{20AC}".to_string());
    }

    #[test]
    fn digit_letter_confusion_table_is_mutual_on_common_pairs() {
        assert_eq!(to_nearest_digit('O' as i32), '0' as i32);
        assert_eq!(to_nearest_letter('0' as i32), 'O' as i32);
    }

    #[test]
    fn map_to_byte_handles_euro() {
        assert_eq!(map_to_byte(EURO), 0xA4);
        assert_eq!(map_to_byte('A' as i32), b'A');
    }

    #[test]
    fn isvowel_checks_base_letter_of_accented_code() {
        assert!(isvowel(CAACUTE));
        assert!(!isvowel('b' as i32));
    }
}
