//! Lyrics written out as `[a][b][c]` text, one line per phrase

use std::path::{Path, PathBuf};

use ust_core::UstFile;

use crate::error::{Result, ToolboxError};

pub const EXPORT_FILE: &str = "lyrics_bracketed.txt";

/// Each lyric in brackets; a rest ends the line
pub fn bracket_lyrics(file: &UstFile) -> Result<String> {
    let mut lyrics = Vec::new();
    for (_, note) in file.live_notes() {
        lyrics.push(note.lyric()?);
    }
    Ok(format!("[{}]", lyrics.join("][")).replace("[R]", "\n"))
}

/// Where the export goes by default: next to the saved project
pub fn default_export_path(file: &UstFile) -> Result<PathBuf> {
    let project = file.settings().project().ok_or(ToolboxError::UnsavedProject)?;
    let dir = Path::new(project).parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(EXPORT_FILE))
}

/// Write the bracketed lyrics to `target`, or beside the project when no
/// target is given. Returns the path written.
pub fn export_lyrics(file: &UstFile, target: Option<&Path>) -> Result<PathBuf> {
    let path = match target {
        Some(path) => path.to_path_buf(),
        None => default_export_path(file)?,
    };
    let text = bracket_lyrics(file)?;
    std::fs::write(&path, text).map_err(|e| ToolboxError::io("write", &path, e))?;
    tracing::info!("Lyrics written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(project: &str) -> UstFile {
        UstFile::parse(&format!(
            "[#SETTING]\nProject={}\n\
             [#0000]\nLength=480\nLyric=か\nNoteNum=60\n\
             [#0001]\nLength=480\nLyric=え\nNoteNum=60\n\
             [#DELETE]\nLength=480\nLyric=x\nNoteNum=60\n\
             [#0002]\nLength=480\nLyric=R\nNoteNum=60\n\
             [#0003]\nLength=480\nLyric=る\nNoteNum=60\n",
            project
        ))
    }

    #[test]
    fn test_bracket_lyrics() {
        assert_eq!(bracket_lyrics(&session("")).unwrap(), "[か][え]\n[る]");
    }

    #[test]
    fn test_unsaved_project() {
        let err = export_lyrics(&session(""), None).unwrap_err();
        assert!(matches!(err, ToolboxError::UnsavedProject));
    }

    #[test]
    fn test_export_beside_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("song.ust");
        let file = session(&project.display().to_string());

        let written = export_lyrics(&file, None).unwrap();
        assert_eq!(written, dir.path().join(EXPORT_FILE));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "[か][え]\n[る]");
    }

    #[test]
    fn test_export_to_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let written = export_lyrics(&session(""), Some(&target)).unwrap();
        assert_eq!(written, target);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[か][え]\n[る]");
        assert!(!dir.path().join(EXPORT_FILE).exists());
    }
}
