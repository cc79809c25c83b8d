//! Preparing a selection for the ENUNU neural singing engine, which only
//! understands bare hiragana and single rests

use ust_core::UstFile;

use crate::error::Result;
use crate::lyric::{self, Dialect};
use crate::rest;

/// Bare hiragana lyrics, merged rests and a closing rest
pub fn prepare_for_enunu(file: &mut UstFile) -> Result<()> {
    lyric::to_zenkaku_hiragana(file)?;
    lyric::replace_special_lyrics(file, Dialect::Enunu)?;
    lyric::strip_to_hiragana(file, Dialect::Enunu)?;
    rest::join_rests(file)?;
    rest::append_rest(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare() {
        let text = "[#0000]\nLength=480\nLyric=ｶﾞ\nNoteNum=60\n\
                    [#0001]\nLength=480\nLyric=a p\nNoteNum=62\n\
                    [#0002]\nLength=240\nLyric=息\nNoteNum=60\n\
                    [#0003]\nLength=240\nLyric=R\nNoteNum=60\n\
                    [#0004]\nLength=480\nLyric=を\nNoteNum=64\n";
        let mut file = UstFile::parse(text);
        prepare_for_enunu(&mut file).unwrap();
        let live: Vec<_> = file
            .live_notes()
            .map(|(_, n)| (n.lyric().unwrap().to_string(), n.length().unwrap()))
            .collect();
        assert_eq!(
            live,
            [
                ("が".to_string(), 480),
                ("っ".to_string(), 480),
                ("R".to_string(), 480),
                ("お".to_string(), 480),
                ("R".to_string(), 480),
            ]
        );
        assert_eq!(file.notes.last().unwrap().notenum().unwrap(), 64);
    }
}
