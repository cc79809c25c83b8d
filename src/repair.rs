//! Repair of a session whose lyrics turned into mojibake.
//!
//! This happens when a project saved as UTF-8 is opened by an editor that
//! reads CP932. The best source for the real lyrics is the project file
//! itself, if it is still intact UTF-8; otherwise each lyric is decoded
//! back as far as the lost bytes allow.

use std::path::{Path, PathBuf};

use ust_core::{Charset, UstFile};
use ust_transforms::mojibake;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    /// No lyric was mojibake
    Clean,
    /// Lyrics came from the project file, which was rewritten as CP932
    FromProject { restored: usize },
    /// Lyrics were decoded back one by one
    Reinterpreted,
}

pub fn repair(file: &mut UstFile) -> Result<Repair> {
    mojibake::fix_midi_tempo(file);
    if !mojibake::has_mojibake_lyrics(file)? {
        return Ok(Repair::Clean);
    }

    if let Some(project) = file.settings().project().map(PathBuf::from) {
        if let Some(mut original) = intact_project(&project) {
            let restored = mojibake::restore_lyrics_from(file, &original)?;
            rewrite_project(&mut original, &project)?;
            tracing::info!("Restored {} lyrics from {}", restored, project.display());
            return Ok(Repair::FromProject { restored });
        }
    }

    tracing::info!("Repairing lyrics as far as possible");
    mojibake::reinterpret_lyrics(file)?;
    Ok(Repair::Reinterpreted)
}

/// The project, if it still reads as UTF-8 without mojibake
fn intact_project(path: &Path) -> Option<UstFile> {
    if !path.exists() {
        tracing::debug!("Project {} not found", path.display());
        return None;
    }
    match UstFile::load_as(path, Charset::Utf8) {
        Ok(project) => match mojibake::has_mojibake_lyrics(&project) {
            Ok(false) => Some(project),
            Ok(true) => {
                tracing::warn!("Project {} already has mojibake lyrics", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Project {} is unusable: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Project {} is not intact UTF-8: {}", path.display(), e);
            None
        }
    }
}

/// Save the project as CP932 with Mode2 on, so the editor reads it
/// correctly next time
fn rewrite_project(project: &mut UstFile, path: &Path) -> Result<()> {
    project.settings_mut().set("Mode2", "True");
    project.settings_mut().remove("Charset");
    mojibake::fix_midi_tempo(project);
    project.set_charset(Charset::ShiftJis);
    project.save(path)?;
    tracing::info!("Rewrote {} as {}", path.display(), Charset::ShiftJis.name());
    Ok(())
}
