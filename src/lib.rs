//! Blockdiff: positional block-by-block binary diff with text overlays.
//!
//! The crate provides:
//! - A lock-step block diff engine and line renderer (`diff`)
//! - Packed base-40 and screen-code text codecs (`codec`)
//! - A single-file block dump in the same layout (`dump`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use blockdiff::diff::{DiffOptions, Overlays, diff_all};
//!
//! let left = b"HELLO WORLD";
//! let right = b"HELLO WORLD!";
//!
//! let opts = DiffOptions {
//!     line_length: 8,
//!     offset_width: 4,
//!     overlays: Overlays::ASCII,
//! };
//! let text = diff_all(left, right, opts).unwrap();
//! assert!(text.contains("0008:   52 4C 44(--)--"));
//! assert!(text.contains("0008:   52 4C 44(21)--"));
//! ```

pub mod codec;
pub mod diff;
pub mod dump;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;
