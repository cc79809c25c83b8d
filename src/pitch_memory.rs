//! Pitch-pattern memory.
//!
//! Pitch curves drawn once can be stored and stamped onto other notes
//! later. A pattern is filed under the shape of the phrase it was drawn
//! for: the previous note's length, this note's length, the interval
//! between them and the lyric. Recall looks up notes by the same key.
//!
//! The store is a JSON object kept beside the executable (or wherever
//! `--store` points). Each memorize also writes `memory_view.ust`, a
//! project that lays every stored pattern out so it can be browsed in
//! the editor.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ust_core::{Charset, Note, Tag, UstFile, REST};

use crate::error::{Result, ToolboxError};

pub const MEMORY_FILE: &str = "memory.json";
pub const BACKUP_FILE: &str = "memory_backup.json";
pub const VIEW_FILE: &str = "memory_view.ust";

const LENGTH_STEP: u32 = 10;
const MAX_KEY_LENGTH: u32 = 3840;

const VIEW_NOTENUM: i32 = 60;
const VIEW_BAR: u32 = 1920;
const VIEW_LEAD_LYRIC: &str = "dummy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Memorize,
    Recall,
    Clean,
}

impl Mode {
    /// Menu numbers shown by the interactive prompt
    pub const MENU: &'static str = "Select a mode\n\
        1: Memorize pitch patterns\n\
        2: Recall pitch patterns\n\
        99: Clean (delete all memorized patterns)";

    pub fn from_menu(choice: &str) -> Option<Self> {
        match crate::prompt::normalize_digits(choice.trim()).as_str() {
            "1" => Some(Mode::Memorize),
            "2" => Some(Mode::Recall),
            "99" => Some(Mode::Clean),
            _ => None,
        }
    }
}

/// The four Mode2 pitch fields, kept exactly as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PitchPattern {
    pub pbs: String,
    pub pbw: String,
    pub pby: String,
    pub pbm: String,
}

impl PitchPattern {
    /// `None` unless the note has all four fields
    pub fn from_note(note: &Note) -> Option<Self> {
        Some(PitchPattern {
            pbs: note.get("PBS")?.to_string(),
            pbw: note.get("PBW")?.to_string(),
            pby: note.get("PBY")?.to_string(),
            pbm: note.get("PBM")?.to_string(),
        })
    }

    pub fn apply(&self, note: &mut Note) {
        note.set("PBS", self.pbs.as_str());
        note.set("PBW", self.pbw.as_str());
        note.set("PBY", self.pby.as_str());
        note.set("PBM", self.pbm.as_str());
    }
}

/// Length as it appears in a key: nearest multiple of 10, within 10..=3840
pub fn key_length(length: u32) -> u32 {
    let length = length.min(MAX_KEY_LENGTH);
    let rounded = (length + LENGTH_STEP / 2) / LENGTH_STEP * LENGTH_STEP;
    rounded.max(LENGTH_STEP)
}

/// `{previous length}_{length}_{interval}_{lyric}`
pub fn pattern_key(previous: &Note, note: &Note) -> Result<String> {
    Ok(format!(
        "{}_{}_{}_{}",
        key_length(previous.length()?),
        key_length(note.length()?),
        note.notenum()? - previous.notenum()?,
        note.lyric()?
    ))
}

/// A key split back into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyParts<'a> {
    previous_length: u32,
    length: u32,
    interval: i32,
    lyric: &'a str,
}

impl<'a> KeyParts<'a> {
    fn parse(key: &'a str) -> Option<Self> {
        let mut parts = key.splitn(4, '_');
        Some(KeyParts {
            previous_length: parts.next()?.parse().ok()?,
            length: parts.next()?.parse().ok()?,
            interval: parts.next()?.parse().ok()?,
            lyric: parts.next()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchMemory {
    patterns: BTreeMap<String, PitchPattern>,
}

impl PitchMemory {
    /// Read a store; a missing file is an empty store
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ToolboxError::io("read", path, e)),
        };
        serde_json::from_str(&text).map_err(|source| ToolboxError::Store {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self).map_err(|source| ToolboxError::Store {
            path: path.to_path_buf(),
            source,
        })?;
        json.push('\n');
        std::fs::write(path, json).map_err(|e| ToolboxError::io("write", path, e))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PitchPattern> {
        self.patterns.get(key)
    }

    /// Store the curve of every live note that has one and a note before
    /// it. Returns how many patterns were stored.
    pub fn memorize(&mut self, file: &UstFile) -> Result<usize> {
        let mut previous = file.prev_note();
        let mut stored = 0;
        for (_, note) in file.live_notes() {
            if let (Some(prev), Some(pattern)) = (previous, PitchPattern::from_note(note)) {
                let key = pattern_key(prev, note)?;
                tracing::debug!("{}: memorized as {}", note.tag(), key);
                self.patterns.insert(key, pattern);
                stored += 1;
            }
            previous = Some(note);
        }
        Ok(stored)
    }

    /// Overwrite the curve of every note whose key is stored. Returns how
    /// many notes changed.
    pub fn recall(&self, file: &mut UstFile) -> Result<usize> {
        let mut found = Vec::new();
        let mut previous = file.prev_note();
        for (index, note) in file.live_notes() {
            if let Some(prev) = previous {
                let key = pattern_key(prev, note)?;
                if let Some(pattern) = self.patterns.get(&key) {
                    tracing::debug!("{}: recalled {}", note.tag(), key);
                    found.push((index, pattern));
                }
            }
            previous = Some(note);
        }

        let recalled = found.len();
        for (index, pattern) in found {
            pattern.apply(&mut file.notes[index]);
        }
        Ok(recalled)
    }

    /// A project with one bar per pattern: a lead-in note at the previous
    /// length, the patterned note, then a rest to the end of the bar
    pub fn to_view(&self) -> UstFile {
        let mut view = UstFile::new_project(Charset::Utf8);
        view.settings_mut().set("Mode2", "True");
        view.settings_mut().set("Charset", Charset::Utf8.name());

        for (key, pattern) in &self.patterns {
            let Some(parts) = KeyParts::parse(key) else {
                tracing::warn!("Skipping malformed pitch memory key {:?}", key);
                continue;
            };

            let mut lead = Note::inserted(VIEW_LEAD_LYRIC, parts.previous_length, VIEW_NOTENUM);
            lead.set_label(parts.previous_length.to_string());

            let mut body = Note::inserted(parts.lyric, parts.length, VIEW_NOTENUM + parts.interval);
            body.set_label(parts.length.to_string());
            pattern.apply(&mut body);
            body.set("Modulation", "0");

            let used = (parts.previous_length + parts.length) % VIEW_BAR;
            let rest = Note::inserted(REST, VIEW_BAR - used, VIEW_NOTENUM);

            view.notes.extend([lead, body, rest]);
        }

        for (index, note) in view.notes.iter_mut().enumerate() {
            note.set_tag(Tag::Index(index));
        }
        view
    }
}

/// The directory holding `memory.json` and its companions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchStore {
    dir: PathBuf,
}

impl PitchStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PitchStore { dir: dir.into() }
    }

    /// The store next to the running executable
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|_| ToolboxError::NoStoreDir)?;
        let dir = exe.parent().ok_or(ToolboxError::NoStoreDir)?;
        Ok(Self::new(dir))
    }

    pub fn memory_path(&self) -> PathBuf {
        self.dir.join(MEMORY_FILE)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.dir.join(BACKUP_FILE)
    }

    pub fn view_path(&self) -> PathBuf {
        self.dir.join(VIEW_FILE)
    }

    pub fn load(&self) -> Result<PitchMemory> {
        PitchMemory::load(&self.memory_path())
    }

    /// Copy the store to the backup file; false if there was nothing to copy
    fn backup(&self) -> Result<bool> {
        let memory = self.memory_path();
        if !memory.exists() {
            return Ok(false);
        }
        let backup = self.backup_path();
        std::fs::copy(&memory, &backup).map_err(|e| ToolboxError::io("back up", &memory, e))?;
        tracing::debug!("Backed up {} to {}", memory.display(), backup.display());
        Ok(true)
    }

    pub fn memorize(&self, file: &UstFile) -> Result<usize> {
        let mut memory = self.load()?;
        self.backup()?;
        let stored = memory.memorize(file)?;
        memory.save(&self.memory_path())?;
        memory.to_view().save(&self.view_path())?;
        tracing::info!(
            "Memorized {} pitch patterns ({} in store)",
            stored,
            memory.len()
        );
        Ok(stored)
    }

    pub fn recall(&self, file: &mut UstFile) -> Result<usize> {
        let memory = self.load()?;
        let recalled = memory.recall(file)?;
        tracing::info!("Recalled pitch patterns for {} notes", recalled);
        Ok(recalled)
    }

    /// Back up the store, then remove it and its preview
    pub fn clean(&self) -> Result<()> {
        self.backup()?;
        for path in [self.memory_path(), self.view_path()] {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::info!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(ToolboxError::io("remove", path, e)),
            }
        }
        Ok(())
    }
}
