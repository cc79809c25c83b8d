//! Lyric text cleanup
//!
//! "Bare" (suppin) lyrics keep only the hiragana a single-sound voice bank
//! can sing: no romaji prefixes, no breath marks, no decorations.

use ust_core::{UstFile, REST};

use crate::error::Result;
use crate::kana::{halfwidth_to_fullwidth_kana, is_plain_hiragana, katakana_to_hiragana};

/// Which plugin's rules to follow; they differ in rest detection and in
/// the `p` ending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Very-suppin: a rest is `R` or anything ending in ` R`
    VerySuppin,
    /// ENUNU preprocessing: anything containing `R` is a rest
    Enunu,
}

/// Replacements applied in order. The leading space marks the tail of a
/// continuous-sound lyric such as `a n`.
const SPECIAL_LYRICS: &[(&str, &str)] = &[
    ("ゔ", "ヴ"),
    (" n", "ん"),
    (" s", " す"),
    (" t", " っ"),
    (" k", " っ"),
    (" p", " っ"),
    (" h", " R"),
    (" -", " R"),
    ("息", "R"),
    ("ぶれす", "R"),
    ("br", "R"),
    ("づ", "ず"),
    ("を", "お"),
];

const SOLFEGE: [&str; 12] = [
    "ど", "れ", "れ", "み", "み", "ふぁ", "そ", "そ", "ら", "ら", "し", "し",
];

/// Half-width and full-width katakana become full-width hiragana
pub fn zenkaku_hiragana(lyric: &str) -> String {
    katakana_to_hiragana(&halfwidth_to_fullwidth_kana(lyric))
}

pub fn replace_special(lyric: &str, dialect: Dialect) -> String {
    SPECIAL_LYRICS
        .iter()
        .filter(|(from, _)| dialect == Dialect::Enunu || *from != " p")
        .fold(lyric.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Keep only plain hiragana, or `R` for rests. If nothing would be left
/// the lyric is returned unchanged.
pub fn bare_lyric(lyric: &str, dialect: Dialect) -> String {
    let is_rest = match dialect {
        Dialect::VerySuppin => lyric == REST || lyric.contains(" R"),
        Dialect::Enunu => lyric.contains('R'),
    };
    let bare: String = if is_rest {
        REST.to_string()
    } else {
        lyric.chars().filter(|&c| is_plain_hiragana(c)).collect()
    };
    if bare.is_empty() {
        lyric.to_string()
    } else {
        bare
    }
}

fn map_lyrics(file: &mut UstFile, f: impl Fn(&str) -> String) -> Result<()> {
    for note in &mut file.notes {
        let new = f(note.lyric()?);
        if new != note.lyric()? {
            tracing::debug!("{}: {:?} -> {:?}", note.tag(), note.lyric()?, new);
            note.set_lyric(new);
        }
    }
    Ok(())
}

pub fn to_zenkaku_hiragana(file: &mut UstFile) -> Result<()> {
    map_lyrics(file, zenkaku_hiragana)
}

pub fn replace_special_lyrics(file: &mut UstFile, dialect: Dialect) -> Result<()> {
    map_lyrics(file, |lyric| replace_special(lyric, dialect))
}

pub fn strip_to_hiragana(file: &mut UstFile, dialect: Dialect) -> Result<()> {
    map_lyrics(file, |lyric| bare_lyric(lyric, dialect))
}

/// Hiragana, special endings resolved, then stripped to bare kana
pub fn very_suppin(file: &mut UstFile) -> Result<()> {
    to_zenkaku_hiragana(file)?;
    replace_special_lyrics(file, Dialect::VerySuppin)?;
    strip_to_hiragana(file, Dialect::VerySuppin)
}

/// Placeholder lyrics from pitch: do re mi in hiragana
pub fn solfege_lyrics(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        if note.lyric()?.contains('R') {
            continue;
        }
        let syllable = SOLFEGE[note.notenum()?.rem_euclid(12) as usize];
        note.set_lyric(syllable);
    }
    Ok(())
}

/// Turn every note into a bare rest
pub fn set_rest_lyrics(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        note.set_lyric(REST);
        note.make_bare();
    }
    Ok(())
}

/// Continuous-sound lyrics to single-sound: `a か` becomes `か`
pub fn keep_last_syllable(file: &mut UstFile) -> Result<()> {
    map_lyrics(file, |lyric| {
        lyric
            .split_whitespace()
            .last()
            .unwrap_or(lyric)
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(lyrics: &[&str]) -> UstFile {
        let text: String = lyrics
            .iter()
            .enumerate()
            .map(|(i, lyric)| {
                format!(
                    "[#{:04}]\nLength=480\nLyric={}\nNoteNum={}\nPBS=-20;0\n",
                    i,
                    lyric,
                    60 + i
                )
            })
            .collect();
        UstFile::parse(&text)
    }

    fn lyrics(file: &UstFile) -> Vec<&str> {
        file.notes.iter().map(|n| n.lyric().unwrap()).collect()
    }

    #[test]
    fn test_zenkaku_hiragana() {
        assert_eq!(zenkaku_hiragana("ｶﾞｯｺｳ"), "がっこう");
        assert_eq!(zenkaku_hiragana("a カ"), "a か");
    }

    #[test]
    fn test_replace_special() {
        assert_eq!(replace_special("a n", Dialect::VerySuppin), "aん");
        assert_eq!(replace_special("u s", Dialect::VerySuppin), "u す");
        assert_eq!(replace_special("a p", Dialect::VerySuppin), "a p");
        assert_eq!(replace_special("a p", Dialect::Enunu), "a っ");
        assert_eq!(replace_special("o -", Dialect::Enunu), "o R");
        assert_eq!(replace_special("を", Dialect::Enunu), "お");
        assert_eq!(replace_special("ぶれす", Dialect::Enunu), "R");
    }

    #[test]
    fn test_bare_lyric() {
        assert_eq!(bare_lyric("a か↑", Dialect::VerySuppin), "か");
        assert_eq!(bare_lyric("o R", Dialect::VerySuppin), "R");
        assert_eq!(bare_lyric("Rか", Dialect::VerySuppin), "か");
        assert_eq!(bare_lyric("Rか", Dialect::Enunu), "R");
        // Nothing left, keep the original
        assert_eq!(bare_lyric("ヴ", Dialect::VerySuppin), "ヴ");
    }

    #[test]
    fn test_very_suppin() {
        let mut f = file(&["- ｶ", "a ア", "a n", "i s", "息", "u h", "ヴ"]);
        very_suppin(&mut f).unwrap();
        assert_eq!(lyrics(&f), ["か", "あ", "ん", "す", "R", "R", "ヴ"]);
    }

    #[test]
    fn test_solfege() {
        let mut f = file(&["a", "R", "a", "a"]);
        // pitches are 60, 61, 62, 63
        solfege_lyrics(&mut f).unwrap();
        assert_eq!(lyrics(&f), ["ど", "R", "れ", "み"]);
    }

    #[test]
    fn test_set_rest_lyrics() {
        let mut f = file(&["a", "b"]);
        set_rest_lyrics(&mut f).unwrap();
        assert_eq!(lyrics(&f), ["R", "R"]);
        assert!(!f.notes[0].contains("PBS"));
        assert_eq!(f.notes[0].length().unwrap(), 480);
    }

    #[test]
    fn test_keep_last_syllable() {
        let mut f = file(&["a か", "R", "- さ"]);
        keep_last_syllable(&mut f).unwrap();
        assert_eq!(lyrics(&f), ["か", "R", "さ"]);
    }
}
