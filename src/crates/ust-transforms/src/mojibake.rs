//! Repair of lyrics that were UTF-8 but got read as CP932, plus the tempo
//! a MIDI import leaves behind

use std::collections::HashMap;

use encoding_rs::SHIFT_JIS;
use ust_core::UstFile;

use crate::error::Result;

/// CP932 readings of the UTF-8 lead bytes of kana and CJK punctuation
const MOJIBAKE_MARKERS: [char; 4] = ['縺', '繧', '繝', '縲'];

/// Tempo values UTAU shows after importing a MIDI file (microseconds per
/// quarter note taken as BPM)
const MIDI_TEMPOS: [&str; 2] = ["500000", "500000.00"];

const REPAIRED_TEMPO: f64 = 120.0;

pub fn is_mojibake(text: &str) -> bool {
    text.contains(&MOJIBAKE_MARKERS[..])
}

pub fn has_mojibake_lyrics(file: &UstFile) -> Result<bool> {
    for note in &file.notes {
        if is_mojibake(note.lyric()?) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Undo the mis-decoding: back to CP932 bytes, then read those as UTF-8.
/// Characters and bytes that were lost in the first decode are dropped.
pub fn reinterpret_lyric(lyric: &str) -> String {
    let mut bytes = Vec::with_capacity(lyric.len());
    let mut buf = [0u8; 4];
    for c in lyric.chars() {
        let (encoded, _, unmappable) = SHIFT_JIS.encode(c.encode_utf8(&mut buf));
        if !unmappable {
            bytes.extend_from_slice(&encoded);
        }
    }
    String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Set the first note to 120 BPM when the project tempo came from a MIDI
/// import. Returns whether anything changed.
pub fn fix_midi_tempo(file: &mut UstFile) -> bool {
    let imported = file
        .settings()
        .get("Tempo")
        .is_some_and(|tempo| MIDI_TEMPOS.contains(&tempo.trim()));
    if !imported {
        return false;
    }
    let Some(first) = file.notes.first_mut() else {
        return false;
    };
    first.set_tempo(REPAIRED_TEMPO);
    tracing::info!("MIDI import tempo replaced with {}", REPAIRED_TEMPO);
    true
}

/// Reinterpret every mojibake lyric in place. Lyrics that would come out
/// empty are left as they are.
pub fn reinterpret_lyrics(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        let lyric = note.lyric()?;
        if !is_mojibake(lyric) {
            continue;
        }
        let repaired = reinterpret_lyric(lyric);
        if repaired.is_empty() {
            tracing::warn!("{}: could not repair {:?}", note.tag(), lyric);
            continue;
        }
        tracing::debug!("{}: {:?} -> {:?}", note.tag(), lyric, repaired);
        note.set_lyric(repaired);
    }
    Ok(())
}

/// Take lyrics from an intact copy of the project, matching notes by their
/// `[#0000]` index. Notes the source has no lyric for are reinterpreted
/// instead. Returns how many lyrics came from the source.
pub fn restore_lyrics_from(file: &mut UstFile, source: &UstFile) -> Result<usize> {
    let mut by_index = HashMap::new();
    for note in &source.notes {
        if let Some(index) = note.tag().index() {
            by_index.insert(index, note.lyric()?);
        }
    }

    let mut restored = 0;
    for note in &mut file.notes {
        let original = note.tag().index().and_then(|index| by_index.get(&index).copied());
        match original {
            Some(lyric) => {
                if lyric != note.lyric()? {
                    tracing::debug!("{}: {:?} -> {:?}", note.tag(), note.lyric()?, lyric);
                    note.set_lyric(lyric);
                }
                restored += 1;
            }
            None if is_mojibake(note.lyric()?) => {
                let repaired = reinterpret_lyric(note.lyric()?);
                if !repaired.is_empty() {
                    note.set_lyric(repaired);
                }
            }
            None => {}
        }
    }
    Ok(restored)
}
