//! Interval arrows on lyrics.
//!
//! Marks each lyric with how far it jumps from the note before it:
//! three semitones or more gets one arrow, five or more gets two.

use ust_core::{Note, UstFile, REST};

use crate::error::Result;

const UP: char = '↑';
const DOWN: char = '↓';

/// Arrow suffix for a pitch step in semitones
pub fn arrows(step: i32) -> &'static str {
    match step {
        s if s >= 5 => "↑↑",
        3..=4 => "↑",
        -4..=-3 => "↓",
        s if s <= -5 => "↓↓",
        _ => "",
    }
}

fn strip_arrows(lyric: &str) -> &str {
    lyric.trim_end_matches(|c| c == UP || c == DOWN)
}

/// Re-annotate every lyric. The `[#PREV]` note is used as the neighbour
/// of the first note but is not changed. Arrows are removed, and not
/// added back, where either side is a rest.
pub fn daimyojinize(file: &mut UstFile) -> Result<()> {
    let mut previous = match file.prev_note() {
        Some(prev) => Some(context(prev)?),
        None => None,
    };

    for note in &mut file.notes {
        let current = context(note)?;
        let base = strip_arrows(note.lyric()?).to_string();
        let lyric = match previous {
            Some((prev_notenum, false)) if !current.1 => {
                format!("{}{}", base, arrows(current.0 - prev_notenum))
            }
            _ => base,
        };
        if lyric != note.lyric()? {
            tracing::debug!("{}: {:?} -> {:?}", note.tag(), note.lyric()?, lyric);
            note.set_lyric(lyric);
        }
        previous = Some(current);
    }
    Ok(())
}

/// Pitch and rest flag of a note, judged on the lyric without arrows
fn context(note: &Note) -> Result<(i32, bool)> {
    Ok((note.notenum()?, strip_arrows(note.lyric()?) == REST))
}
