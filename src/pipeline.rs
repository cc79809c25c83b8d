//! Load, transform, write back

use std::path::Path;

use ust_core::{Charset, UstFile};

use crate::error::{Result, ToolboxError};

/// Run one transform over a note file. The result overwrites `input`
/// unless `output` is given, which is how UTAU picks up plugin edits.
pub fn run<F, E>(input: &Path, output: Option<&Path>, transform: F) -> Result<UstFile>
where
    F: FnOnce(&mut UstFile) -> std::result::Result<(), E>,
    ToolboxError: From<E>,
{
    let mut file = UstFile::load(input)?;
    transform(&mut file)?;

    let target = output.unwrap_or(input);
    file.save(target)?;
    tracing::info!(
        "Wrote {} notes to {}",
        file.live_notes().count(),
        target.display()
    );
    Ok(file)
}

/// What a load and write without changes does to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    pub charset: Charset,
    pub notes: usize,
    pub identical: bool,
}

pub fn check(path: &Path) -> Result<RoundTrip> {
    let bytes = std::fs::read(path).map_err(|e| ToolboxError::io("read", path, e))?;
    let file = UstFile::from_bytes(&bytes)?;
    let written = file.to_bytes()?;
    Ok(RoundTrip {
        charset: file.charset(),
        notes: file.notes.len(),
        identical: written == bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ust_transforms::lyric;

    const TMP: &[u8] = b"[#SETTING]\r\nTempo=120.00\r\n[#0000]\r\nLength=480\r\nLyric=- \x82\xa9\r\nNoteNum=60\r\n";

    #[test]
    fn test_run_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin.tmp");
        std::fs::write(&path, TMP).unwrap();

        let file = run(&path, None, lyric::very_suppin).unwrap();
        assert_eq!(file.notes[0].lyric().unwrap(), "か");

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(
            bytes,
            b"[#SETTING]\r\nTempo=120.00\r\n[#0000]\r\nLength=480\r\nLyric=\x82\xa9\r\nNoteNum=60\r\n"
        );
    }

    #[test]
    fn test_run_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.ust");
        let output = dir.path().join("out.ust");
        std::fs::write(&input, TMP).unwrap();

        run(&input, Some(&output), lyric::set_rest_lyrics).unwrap();
        assert_eq!(std::fs::read(&input).unwrap(), TMP);
        let written = UstFile::load(&output).unwrap();
        assert!(written.notes[0].is_rest().unwrap());
    }

    #[test]
    fn test_failed_transform_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin.tmp");
        std::fs::write(&path, b"[#0000]\nLength=480\n").unwrap();

        let err = run(&path, None, lyric::very_suppin).unwrap_err();
        assert!(err.to_string().contains("Lyric"));
        assert_eq!(std::fs::read(&path).unwrap(), b"[#0000]\nLength=480\n");
    }

    #[test]
    fn test_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.ust");
        std::fs::write(&path, TMP).unwrap();
        let report = check(&path).unwrap();
        assert_eq!(
            report,
            RoundTrip {
                charset: Charset::ShiftJis,
                notes: 1,
                identical: true
            }
        );
    }
}
