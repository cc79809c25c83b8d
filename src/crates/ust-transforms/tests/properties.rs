use std::num::NonZeroU32;

use proptest::prelude::*;
use ust_core::UstFile;
use ust_transforms::{length, pitch, rest, sokuon};

fn note_file(notes: &[(String, u32, i32)], tempo: &str) -> UstFile {
    let mut text = format!("[#SETTING]\nTempo={}\nMode2=True\n", tempo);
    for (i, (lyric, length, notenum)) in notes.iter().enumerate() {
        text.push_str(&format!(
            "[#{:04}]\nLength={}\nLyric={}\nNoteNum={}\n",
            i, length, lyric, notenum
        ));
    }
    UstFile::parse(&text)
}

fn notes() -> impl Strategy<Value = Vec<(String, u32, i32)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["R", "あ", "か", "くっ", "a R"]).prop_map(String::from),
            3u32..4000,
            40i32..80,
        ),
        1..12,
    )
}

fn total_length(file: &UstFile) -> u32 {
    file.live_notes().map(|(_, n)| n.length().unwrap()).sum()
}

fn live_lyrics(file: &UstFile) -> Vec<String> {
    file.live_notes()
        .map(|(_, n)| n.lyric().unwrap().to_string())
        .collect()
}

proptest! {
    #[test]
    fn join_rests_preserves_duration(notes in notes()) {
        let mut file = note_file(&notes, "120");
        let before = total_length(&file);
        rest::join_rests(&mut file).unwrap();
        prop_assert_eq!(total_length(&file), before);

        let lyrics = live_lyrics(&file);
        prop_assert!(!lyrics.windows(2).any(|w| w[0] == "R" && w[1] == "R"));
    }

    #[test]
    fn split_rests_preserves_duration(notes in notes()) {
        let mut file = note_file(&notes, "120");
        let before = total_length(&file);
        rest::split_rests(&mut file).unwrap();
        prop_assert_eq!(total_length(&file), before);
    }

    #[test]
    fn sokuon_split_then_join_restores_notes(notes in notes()) {
        let original = note_file(&notes, "120");
        let mut file = original.clone();
        sokuon::split_sokuon(&mut file).unwrap();
        prop_assert_eq!(total_length(&file), total_length(&original));

        sokuon::join_sokuon(&mut file).unwrap();
        prop_assert_eq!(live_lyrics(&file), live_lyrics(&original));
        let lengths: Vec<u32> = file.live_notes().map(|(_, n)| n.length().unwrap()).collect();
        let expected: Vec<u32> = original.live_notes().map(|(_, n)| n.length().unwrap()).collect();
        prop_assert_eq!(lengths, expected);
    }

    #[test]
    fn round_lengths_is_idempotent(notes in notes(), unit in 1u32..500) {
        let unit = NonZeroU32::new(unit).unwrap();
        let mut file = note_file(&notes, "120");
        length::round_lengths(&mut file, unit).unwrap();
        let once = file.to_text();
        length::round_lengths(&mut file, unit).unwrap();
        prop_assert_eq!(file.to_text(), once);
    }

    #[test]
    fn pitch_rounding_is_idempotent(
        notes in notes(),
        tempo in prop::sample::select(vec!["120", "130.5", "97", "200.00"]),
        curve in (
            -300.0f64..0.0,
            prop::collection::vec(0.0f64..400.0, 1..6),
            prop::collection::vec(-120.0f64..120.0, 0..6),
        ),
    ) {
        let (offset, widths, heights) = curve;
        let mut file = note_file(&notes, tempo);
        for note in &mut file.notes {
            note.set("PBS", format!("{};7", offset));
            note.set("PBW", widths.iter().map(|w| w.to_string()).collect::<Vec<_>>().join(","));
            note.set("PBY", heights.iter().map(|h| h.to_string()).collect::<Vec<_>>().join(","));
        }

        pitch::round_pitch_heights(&mut file).unwrap();
        pitch::round_pitch(&mut file).unwrap();
        let once = file.to_text();
        pitch::round_pitch_heights(&mut file).unwrap();
        pitch::round_pitch(&mut file).unwrap();
        prop_assert_eq!(file.to_text(), once);
    }
}
