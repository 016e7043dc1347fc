//! Crate-level regression test for the public facade: exercises
//! `Descriptor`'s full call sequence (PNM ingestion, configuration,
//! recognition, ORF export) the way an external caller would, entirely
//! through the crate's public API.

use ocrad::{Descriptor, Error};

fn blank_pbm() -> Vec<u8> {
    let mut pnm = b"P1\n16 16\n".to_vec();
    for _ in 0..16 * 16 {
        pnm.extend_from_slice(b"0 ");
    }
    pnm
}

#[test]
fn full_lifecycle_from_pnm_bytes_to_orf_export() {
    let mut d = Descriptor::new();
    assert!(matches!(d.result_blocks(), Err(Error::SequenceError(_))));

    let pnm = blank_pbm();
    let mut cursor = std::io::Cursor::new(&pnm[..]);
    d.set_image_from_pnm(&mut cursor, "blank.pbm", false).unwrap();

    d.set_charset("ascii").unwrap();
    d.set_filter("none").unwrap();
    d.set_utf8_format(false).unwrap();

    d.recognize(true).unwrap();
    assert_eq!(d.result_blocks().unwrap(), 0);
    assert_eq!(d.result_chars_total().unwrap(), 0);
    assert_eq!(d.result_first_character().unwrap(), 0);

    let mut orf = Vec::new();
    d.write_orf(&mut orf).unwrap();
    let orf = String::from_utf8(orf).unwrap();
    assert!(orf.starts_with("source file blank.pbm\n"));
}

#[test]
fn version_is_the_crate_version() {
    assert_eq!(Descriptor::version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn bad_charset_name_is_rejected() {
    let mut d = Descriptor::new();
    assert!(d.set_charset("klingon").is_err());
}
