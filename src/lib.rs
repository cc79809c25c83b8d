//! UTAU plugin toolbox
//!
//! Each utility loads the note file UTAU hands to a plugin, applies one
//! transform from [`ust_transforms`] and writes the file back for UTAU to
//! pick up. The modules here hold the parts that reach outside that one
//! file: the pitch-pattern store, the lyric export and the project-backed
//! mojibake repair.

pub mod error;
pub mod lyric_export;
pub mod pipeline;
pub mod pitch_memory;
pub mod prompt;
pub mod repair;

pub use error::{Result, ToolboxError};
pub use pipeline::{check, run, RoundTrip};
pub use pitch_memory::{Mode, PitchMemory, PitchStore};
pub use repair::{repair, Repair};
