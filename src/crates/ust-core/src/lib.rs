//! Note-file model for UTAU plugin sessions
//!
//! UTAU hands a plugin a temporary file holding the selected notes, the
//! note before the selection and the project settings. This crate loads
//! that file (or a saved `.ust` project) into a [`UstFile`], gives typed
//! access to each [`Note`], and writes the result back in the charset
//! and line endings it was read with.
//!
//! # Examples
//!
//! ```
//! use ust_core::UstFile;
//!
//! let mut file = UstFile::parse("[#0000]\nLength=480\nLyric=a\nNoteNum=60\n");
//! file.notes[0].set_lyric("R");
//! assert_eq!(file.to_text(), "[#0000]\nLength=480\nLyric=R\nNoteNum=60\n");
//! ```

pub mod charset;
pub mod error;
pub mod file;
pub mod note;
pub mod pitch;
pub mod section;
pub mod settings;

pub use charset::Charset;
pub use error::{Result, UstError};
pub use file::UstFile;
pub use note::{Note, REST};
pub use pitch::{PitchCurve, PitchShape, PitchStart};
pub use section::{Entries, Line, Section, Tag};
pub use settings::Settings;
