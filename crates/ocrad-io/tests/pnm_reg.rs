//! Crate-level regression test: a raw PNM byte stream in, a recognized
//! (blank) page's ORF and plain-text exports out, exercising `pnm`, `orf`
//! and `text` together rather than each in isolation.

use ocrad_core::{Charset, Filter};
use ocrad_io::{read_pnm, write_orf, write_text};
use ocrad_layout::Textpage;

#[test]
fn blank_pbm_round_trips_through_recognition_and_export() {
    let pnm = b"P1\n20 20\n".to_vec();
    let mut pixels = String::new();
    for _ in 0..20 * 20 {
        pixels.push_str("0 ");
    }
    let mut cursor = std::io::Cursor::new([pnm, pixels.into_bytes()].concat());

    let page = read_pnm(&mut cursor, false).unwrap();
    assert_eq!(page.width(), 20);
    assert_eq!(page.height(), 20);

    let mut tp = Textpage::new(&page, "blank.pbm", true);
    tp.recognize(&Charset::default(), &Filter::default());
    assert_eq!(tp.textblocks(), 0);

    let mut orf = Vec::new();
    write_orf(&mut orf, &tp, false).unwrap();
    let orf = String::from_utf8(orf).unwrap();
    assert!(orf.starts_with("source file blank.pbm\n"));
    assert!(orf.contains("total text blocks 0\n"));

    let mut text = Vec::new();
    write_text(&mut text, &tp, false).unwrap();
    assert!(text.is_empty());
}

#[test]
fn malformed_magic_is_rejected_before_any_recognition_runs() {
    let mut cursor = std::io::Cursor::new(&b"not a pnm file"[..]);
    let err = read_pnm(&mut cursor, false).unwrap_err();
    assert!(err.to_string().contains("bad magic") || err.to_string().contains("malformed"));
}
