//! Turns a binarized page into glyph-sized blobs: connected-component
//! scanning, noise/frame pruning, and per-blob hole extraction.

pub mod blob;
pub mod scan;

pub use blob::Blob;
pub use scan::{
    ignore_abnormal_blobs, ignore_small_blobs, ignore_wide_blobs, prune_noise,
    remove_left_right_noise, remove_top_bottom_noise, scan_and_filter, scan_page,
};
