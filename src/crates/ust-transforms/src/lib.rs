//! Transforms over a loaded UTAU note file
//!
//! Every transform takes a [`UstFile`](ust_core::UstFile), changes it in
//! place and leaves the writing to the caller. Deleted notes stay in the
//! list tagged `[#DELETE]` and new ones are tagged `[#INSERT]`, which is
//! how UTAU expects a plugin to report structural edits.
//!
//! # Examples
//!
//! ```
//! use ust_core::UstFile;
//! use ust_transforms::sokuon::split_sokuon;
//!
//! let mut file = UstFile::parse("[#0000]\nLength=120\nLyric=くっ\nNoteNum=60\n");
//! split_sokuon(&mut file).unwrap();
//! assert_eq!(file.notes[0].lyric().unwrap(), "く");
//! assert_eq!(file.notes[1].lyric().unwrap(), "っ");
//! ```
//!
//! # Modules
//!
//! - [`lyric`], [`kana`], [`daimyojin`]: lyric text
//! - [`sokuon`], [`rest`], [`length`]: splitting, merging and resizing notes
//! - [`pitch`]: pitch-bend points, widths, heights and shapes
//! - [`annotate`]: note data copied into labels and flags
//! - [`mojibake`]: encoding repair
//! - [`enunu`]: the fixed ENUNU preparation sequence

pub mod annotate;
pub mod daimyojin;
pub mod enunu;
pub mod error;
pub mod kana;
pub mod length;
pub mod lyric;
pub mod mojibake;
pub mod pitch;
pub mod rest;
pub mod sokuon;

pub use error::{Result, TransformError};
pub use lyric::Dialect;
