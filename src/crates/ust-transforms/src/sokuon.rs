//! Splitting and joining the glottal stop `っ`

use ust_core::{UstError, UstFile};

use crate::error::Result;

pub const SOKUON: &str = "っ";

/// Lengths of the two halves of a split note. The sounding half gets the
/// extra tick so `120` splits as `61 + 59`.
pub fn split_lengths(length: u32) -> (u32, u32) {
    let head = length / 2 + 1;
    (head, length - head)
}

/// `くっ` becomes `く` followed by an inserted `っ`, sharing the original
/// length. Notes under three ticks and lyrics that are only `っ` stay.
pub fn split_sokuon(file: &mut UstFile) -> Result<()> {
    let mut notes = Vec::with_capacity(file.notes.len());
    for note in std::mem::take(&mut file.notes) {
        let lyric = note.lyric()?;
        let stripped = lyric.replace(SOKUON, "");
        let length = note.length()?;
        if note.is_deleted() || !lyric.contains(SOKUON) || stripped.is_empty() || length < 3 {
            notes.push(note);
            continue;
        }

        let (head_length, tail_length) = split_lengths(length);
        tracing::debug!(
            "{}: {:?} split into {:?} ({}) + {:?} ({})",
            note.tag(),
            lyric,
            stripped,
            head_length,
            SOKUON,
            tail_length
        );

        let mut tail = note.duplicate();
        tail.set_lyric(SOKUON);
        tail.set_length(tail_length);

        let mut head = note;
        head.set_lyric(stripped);
        head.set_length(head_length);

        notes.push(head);
        notes.push(tail);
    }
    file.notes = notes;
    Ok(())
}

/// A note that is only `っ` is deleted and its length added to the
/// nearest live note before it, which gains the `っ`
pub fn join_sokuon(file: &mut UstFile) -> Result<()> {
    for i in 0..file.notes.len() {
        if file.notes[i].is_deleted() || file.notes[i].lyric()? != SOKUON {
            continue;
        }
        let Some(target) = (0..i).rev().find(|&j| !file.notes[j].is_deleted()) else {
            tracing::warn!(
                "{}: no note before this {} to join it to",
                file.notes[i].tag(),
                SOKUON
            );
            continue;
        };

        let length = file.notes[i].length()?;
        let target_length = file.notes[target].length()?;
        let joined_length = target_length.checked_add(length).ok_or_else(|| {
            UstError::invalid(file.notes[target].tag(), "Length", target_length.to_string())
        })?;
        file.notes[i].delete();

        let previous = &mut file.notes[target];
        let joined_lyric = format!("{}{}", previous.lyric()?, SOKUON);
        tracing::debug!("{}: joined into {:?} ({})", previous.tag(), joined_lyric, joined_length);
        previous.set_length(joined_length);
        previous.set_lyric(joined_lyric);
    }
    Ok(())
}
