//! Writing note information into `Label` and `Flags` so it shows up in
//! the editor's piano roll

use regex::Regex;
use ust_core::{Note, UstFile};

use crate::error::Result;

const MARKER: &str = "【.*?】";

/// Strip markers when every sung note already has one, otherwise strip
/// them and prefix fresh ones. Returns true when markers were added.
fn toggle<R, W, M>(file: &mut UstFile, read: R, write: W, make: M) -> Result<bool>
where
    R: Fn(&Note) -> &str,
    W: Fn(&mut Note, String),
    M: Fn(&Note) -> Result<String>,
{
    let marker = Regex::new(MARKER)?;
    let mut all_marked = true;
    for note in &file.notes {
        if !note.is_rest()? && !marker.is_match(read(note)) {
            all_marked = false;
            break;
        }
    }

    for note in &mut file.notes {
        let current = read(note);
        let stripped = marker.replace_all(current, "");
        let value = if all_marked {
            stripped.into_owned()
        } else {
            format!("【{}】{}", make(note)?, stripped)
        };
        if value != read(note) {
            write(note, value);
        }
    }
    Ok(!all_marked)
}

/// `【0003】` in front of each label, or gone again
pub fn toggle_index_labels(file: &mut UstFile) -> Result<()> {
    let added = toggle(
        file,
        |n| n.label(),
        |n, v| n.set_label(v),
        |n| Ok(n.tag().name()),
    )?;
    tracing::info!("Note indexes {} labels", if added { "written to" } else { "removed from" });
    Ok(())
}

/// `【480】` in front of each flag string, or gone again
pub fn toggle_length_flags(file: &mut UstFile) -> Result<()> {
    let added = toggle(
        file,
        |n| n.flags(),
        |n, v| n.set_flags(v),
        |n| Ok(n.length()?.to_string()),
    )?;
    tracing::info!("Note lengths {} flags", if added { "written to" } else { "removed from" });
    Ok(())
}

/// Every entry of the note as `'Key': 'value'`, comma separated
pub fn entries_summary(note: &Note) -> String {
    note.entries()
        .iter()
        .map(|(key, value)| format!("'{}': '{}'", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Replace each note's flags with a dump of all its entries
pub fn dump_entries_to_flags(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        let summary = entries_summary(note);
        tracing::debug!("{}: {}", note.tag(), summary);
        note.set_flags(summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "[#0000]\nLength=480\nLyric=あ\nNoteNum=60\nFlags=g-2H40\n\
                        [#0001]\nLength=240\nLyric=R\nNoteNum=60\n\
                        [#INSERT]\nLength=120\nLyric=い\nNoteNum=62\nLabel=memo\n";

    #[test]
    fn test_index_labels_toggle() {
        let mut file = UstFile::parse(TEXT);
        toggle_index_labels(&mut file).unwrap();
        let labels: Vec<_> = file.notes.iter().map(|n| n.label().to_string()).collect();
        assert_eq!(labels, ["【0000】", "【0001】", "【INSERT】memo"]);

        toggle_index_labels(&mut file).unwrap();
        let labels: Vec<_> = file.notes.iter().map(|n| n.label().to_string()).collect();
        assert_eq!(labels, ["", "", "memo"]);
    }

    #[test]
    fn test_rests_do_not_block_removal() {
        let mut file = UstFile::parse(TEXT);
        file.notes[0].set_flags("【480】g-2H40");
        file.notes[2].set_flags("x【120】");
        toggle_length_flags(&mut file).unwrap();
        let flags: Vec<_> = file.notes.iter().map(|n| n.flags().to_string()).collect();
        assert_eq!(flags, ["g-2H40", "", "x"]);
    }

    #[test]
    fn test_length_flags_rewrite_partial() {
        let mut file = UstFile::parse(TEXT);
        file.notes[0].set_flags("【999】g-2H40");
        toggle_length_flags(&mut file).unwrap();
        assert_eq!(file.notes[0].flags(), "【480】g-2H40");
        assert_eq!(file.notes[2].flags(), "【120】");
    }

    #[test]
    fn test_dump_entries() {
        let mut file = UstFile::parse(TEXT);
        dump_entries_to_flags(&mut file).unwrap();
        assert_eq!(
            file.notes[0].flags(),
            "'Length': '480', 'Lyric': 'あ', 'NoteNum': '60', 'Flags': 'g-2H40'"
        );
    }
}
