//! Rest handling: splitting, merging and marking rests

use ust_core::{Note, UstError, UstFile, REST};

use crate::error::{Result, TransformError};

/// Lowest pitch UTAU can show
pub const LOWEST_NOTENUM: i32 = 24;

/// Length of a rest added at the end of a phrase
pub const TRAILING_REST_LENGTH: u32 = 480;

/// Rests longer than a half note give up a quarter note; shorter ones
/// are halved
const SPLIT_THRESHOLD: u32 = 960;
const QUARTER: u32 = 480;

fn previous_live(notes: &[Note], index: usize) -> Option<usize> {
    (0..index).rev().find(|&j| !notes[j].is_deleted())
}

fn next_live(notes: &[Note], index: usize) -> Option<usize> {
    (index + 1..notes.len()).find(|&j| !notes[j].is_deleted())
}

/// Lengths of the two parts of a split rest
pub fn rest_split_lengths(length: u32) -> (u32, u32) {
    if length > SPLIT_THRESHOLD {
        (QUARTER, length - QUARTER)
    } else {
        (length / 2, length - length / 2)
    }
}

/// A rest right after a sung note takes that note's pitch and is split in
/// two, so an `x R` breath ending can sit on the first part. The previous
/// note may be `[#PREV]`.
pub fn split_rests(file: &mut UstFile) -> Result<()> {
    let mut before = match file.prev_note() {
        Some(prev) => Some((prev.lyric()?.contains('R'), prev.notenum()?)),
        None => None,
    };

    let mut i = 0;
    while i < file.notes.len() {
        if file.notes[i].is_deleted() {
            i += 1;
            continue;
        }
        let note = &mut file.notes[i];
        let current = (note.lyric()?.contains('R'), note.notenum()?);
        let is_rest = note.lyric()? == REST;
        let length = note.length()?;

        match before {
            Some((false, notenum)) if is_rest && length >= 2 => {
                let (head, tail) = rest_split_lengths(length);
                tracing::debug!("{}: rest {} split into {} + {}", note.tag(), length, head, tail);
                note.set_notenum(notenum);
                note.set_length(head);
                file.notes.insert(i + 1, Note::inserted(REST, tail, notenum));
                before = Some((true, notenum));
                i += 2;
            }
            _ => {
                before = Some(current);
                i += 1;
            }
        }
    }
    Ok(())
}

/// Runs of rests collapse into their last rest, which takes the whole
/// length; the others are deleted
pub fn join_rests(file: &mut UstFile) -> Result<()> {
    for i in 0..file.notes.len() {
        if file.notes[i].is_deleted() || !file.notes[i].is_rest()? {
            continue;
        }
        let Some(j) = next_live(&file.notes, i) else {
            break;
        };
        if !file.notes[j].is_rest()? {
            continue;
        }
        let length = file.notes[i].length()?;
        let next_length = file.notes[j].length()?;
        let merged = next_length.checked_add(length).ok_or_else(|| {
            UstError::invalid(file.notes[j].tag(), "Length", next_length.to_string())
        })?;
        file.notes[j].set_length(merged);
        file.notes[i].delete();
        tracing::debug!("{}: merged rest, now {}", file.notes[j].tag(), merged);
    }
    Ok(())
}

/// End the selection on a rest if it does not already
pub fn append_rest(file: &mut UstFile) -> Result<()> {
    let last = previous_live(&file.notes, file.notes.len()).ok_or(TransformError::NoNotes)?;
    let note = &file.notes[last];
    if !note.is_rest()? {
        let rest = Note::inserted(REST, TRAILING_REST_LENGTH, note.notenum()?);
        file.notes.push(rest);
        tracing::debug!("Appended a trailing rest");
    }
    Ok(())
}

/// Drop rests to the bottom of the piano roll so they stay out of the way
pub fn rest_notenum_low(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        if note.is_rest()? {
            note.set_notenum(LOWEST_NOTENUM);
        }
    }
    Ok(())
}

/// Breath-ending lyrics such as `a R` get consonant velocity 100
pub fn breath_velocity(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        let lyric = note.lyric()?;
        if lyric != REST && lyric.contains('R') {
            note.set_velocity(100);
        }
    }
    Ok(())
}
