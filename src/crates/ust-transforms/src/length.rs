use std::num::NonZeroU32;

use ust_core::{UstError, UstFile};

use crate::error::{Result, TransformError};

pub const DEFAULT_LENGTH_UNIT: u32 = 10;

/// A 32nd note, the length of each rolled repetition
pub const ROLL_NOTE_LENGTH: u32 = 60;

const ROLL_VELOCITY: i32 = 200;

/// Round half away from zero to a multiple of `unit`. `None` if the
/// result no longer fits a length.
pub fn round_length(length: u32, unit: NonZeroU32) -> Option<u32> {
    let unit = u64::from(unit.get());
    let rounded = (u64::from(length) + unit / 2) / unit * unit;
    u32::try_from(rounded).ok()
}

pub fn round_lengths(file: &mut UstFile, unit: NonZeroU32) -> Result<()> {
    for note in &mut file.notes {
        let length = note.length()?;
        let rounded = round_length(length, unit)
            .ok_or_else(|| UstError::invalid(note.tag(), "Length", length.to_string()))?;
        if rounded != length {
            tracing::debug!("{}: length {} -> {}", note.tag(), length, rounded);
            note.set_length(rounded);
        }
    }
    Ok(())
}

/// Rolled-tongue effect on the first note: `count` short copies in front
/// of it, taken out of its own length, all with a fast consonant
pub fn roll_first_note(file: &mut UstFile, count: u32) -> Result<()> {
    let (first, _) = file.live_notes().next().ok_or(TransformError::NoNotes)?;
    let note = &mut file.notes[first];
    let length = note.length()?;
    let needed = match ROLL_NOTE_LENGTH.checked_mul(count) {
        Some(needed) if needed < length => needed,
        needed => {
            return Err(TransformError::TooShort {
                tag: note.tag().to_string(),
                length,
                needed: needed.unwrap_or(u32::MAX),
            })
        }
    };

    note.set_length(length - needed);
    note.set_velocity(ROLL_VELOCITY);

    let mut short = note.duplicate();
    short.set_length(ROLL_NOTE_LENGTH);
    tracing::info!("{}: {} rolled notes added", note.tag(), count);

    for _ in 0..count {
        file.notes.insert(first, short.clone());
    }
    Ok(())
}
