//! Loading and writing whole note files.
//!
//! A plugin temporary file looks like:
//! ```text
//! [#SETTING]
//! Tempo=120.00
//! Project=C:\song.ust
//! [#PREV]
//! Length=480
//! Lyric=R
//! NoteNum=60
//! [#0003]
//! Length=480
//! Lyric=あ
//! NoteNum=62
//! [#NEXT]
//! ...
//! ```
//! A saved `.ust` project has the same shape with `[#VERSION]` first and
//! `[#TRACKEND]` last.

use std::path::Path;

use crate::charset::{self, Charset};
use crate::error::{Result, UstError};
use crate::note::Note;
use crate::section::{Entries, Section, Tag};
use crate::settings::Settings;

const PROJECT_VERSION: &str = "UST Version1.2";

/// Where each part goes when the file is written
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Section(Section),
    Setting,
    Prev,
    Notes,
    Next,
}

/// A note sequence with its settings and surrounding context
#[derive(Debug, Clone, PartialEq)]
pub struct UstFile {
    charset: Charset,
    bom: bool,
    newline: &'static str,
    trailing_newline: bool,
    /// Ending of every line, kept only when the file mixes them
    line_endings: Vec<&'static str>,
    preamble: Vec<String>,
    blocks: Vec<Block>,
    settings: Settings,
    prev: Option<Note>,
    next: Option<Note>,
    pub notes: Vec<Note>,
}

impl Default for UstFile {
    fn default() -> Self {
        UstFile {
            charset: Charset::ShiftJis,
            bom: false,
            newline: "\r\n",
            trailing_newline: true,
            line_endings: Vec::new(),
            preamble: Vec::new(),
            blocks: Vec::new(),
            settings: Settings::default(),
            prev: None,
            next: None,
            notes: Vec::new(),
        }
    }
}

impl UstFile {
    /// An empty file that will be written in the given charset
    pub fn new(charset: Charset) -> Self {
        UstFile {
            charset,
            ..Default::default()
        }
    }

    /// An empty saved-project layout: `[#VERSION]`, settings, notes and
    /// `[#TRACKEND]`
    pub fn new_project(charset: Charset) -> Self {
        let mut version = Entries::new();
        version.push_line(PROJECT_VERSION);
        UstFile {
            charset,
            blocks: vec![
                Block::Section(Section {
                    tag: Tag::Version,
                    entries: version,
                }),
                Block::Setting,
                Block::Notes,
                Block::Section(Section {
                    tag: Tag::TrackEnd,
                    entries: Entries::new(),
                }),
            ],
            ..Default::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| UstError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_bytes(&bytes)?;
        tracing::debug!(
            "Loaded {} notes from {} ({})",
            file.notes.len(),
            path.display(),
            file.charset.name()
        );
        Ok(file)
    }

    /// Load insisting on one charset, e.g. to tell whether a project is
    /// still intact UTF-8
    pub fn load_as(path: &Path, charset: Charset) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| UstError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = charset.decode_strict(&bytes).ok_or(UstError::Malformed {
            declared: charset.name(),
        })?;
        let mut file = Self::parse(&text);
        file.charset = charset;
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| UstError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Wrote {} ({})", path.display(), self.charset.name());
        Ok(())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = charset::decode(bytes)?;
        let mut file = Self::parse(&decoded.text);
        file.charset = decoded.charset;
        file.bom = decoded.bom;
        Ok(file)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        charset::encode(&self.to_text(), self.charset, self.bom)
    }

    /// Parse already-decoded text; the charset defaults to UTF-8
    pub fn parse(text: &str) -> Self {
        let mut file = UstFile {
            charset: Charset::Utf8,
            newline: if text.contains("\r\n") { "\r\n" } else { "\n" },
            trailing_newline: text.ends_with('\n'),
            ..Default::default()
        };

        let body = text
            .strip_suffix(file.newline)
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);
        if text.is_empty() {
            return file;
        }

        let mut endings = Vec::new();
        let mut current: Option<(Tag, Entries)> = None;
        for line in body.split('\n') {
            let (line, ending) = match line.strip_suffix('\r') {
                Some(line) => (line, "\r\n"),
                None => (line, "\n"),
            };
            endings.push(ending);
            if let Some(tag) = Tag::from_header(line) {
                if let Some((tag, entries)) = current.take() {
                    file.push_section(tag, entries);
                }
                current = Some((tag, Entries::new()));
            } else if let Some((_, entries)) = current.as_mut() {
                entries.push_line(line);
            } else {
                file.preamble.push(line.to_string());
            }
        }
        if let Some((tag, entries)) = current {
            file.push_section(tag, entries);
        }

        if let Some(last) = endings.last_mut() {
            *last = match &text[body.len()..] {
                "\r\n" => "\r\n",
                "\n" => "\n",
                _ if *last == "\r\n" => "\r",
                _ => "",
            };
        }
        let final_ending = if file.trailing_newline { file.newline } else { "" };
        let uniform = endings.split_last().map_or(true, |(last, rest)| {
            *last == final_ending && rest.iter().all(|e| *e == file.newline)
        });
        if !uniform {
            file.line_endings = endings;
        }
        file
    }

    fn push_section(&mut self, tag: Tag, entries: Entries) {
        match tag {
            Tag::Setting if !self.blocks.contains(&Block::Setting) => {
                self.settings = Settings::new(entries);
                self.blocks.push(Block::Setting);
            }
            Tag::Prev if self.prev.is_none() => {
                self.prev = Some(Note::with_entries(tag, entries));
                self.blocks.push(Block::Prev);
            }
            Tag::Next if self.next.is_none() => {
                self.next = Some(Note::with_entries(tag, entries));
                self.blocks.push(Block::Next);
            }
            tag if tag.is_note() => {
                self.notes.push(Note::with_entries(tag, entries));
                if !self.blocks.contains(&Block::Notes) {
                    self.blocks.push(Block::Notes);
                }
            }
            tag => self.blocks.push(Block::Section(Section { tag, entries })),
        }
    }

    /// Block order for writing, with placeholders added for parts that
    /// did not exist when the file was read
    fn layout(&self) -> Vec<Block> {
        let mut blocks = self.blocks.clone();
        let anchor = |blocks: &[Block], after: &[Block]| {
            blocks
                .iter()
                .position(|b| after.contains(b))
                .unwrap_or(blocks.len())
        };
        if !self.settings.is_empty() && !blocks.contains(&Block::Setting) {
            let at = anchor(&blocks, &[Block::Prev, Block::Notes, Block::Next]);
            blocks.insert(at, Block::Setting);
        }
        if self.prev.is_some() && !blocks.contains(&Block::Prev) {
            let at = anchor(&blocks, &[Block::Notes, Block::Next]);
            blocks.insert(at, Block::Prev);
        }
        if !self.notes.is_empty() && !blocks.contains(&Block::Notes) {
            let at = anchor(&blocks, &[Block::Next]);
            blocks.insert(at, Block::Notes);
        }
        if self.next.is_some() && !blocks.contains(&Block::Next) {
            let at = blocks
                .iter()
                .position(|b| matches!(b, Block::Section(s) if s.tag == Tag::TrackEnd))
                .unwrap_or(blocks.len());
            blocks.insert(at, Block::Next);
        }
        blocks
    }

    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = self.preamble.clone();
        let mut push = |tag: &Tag, entries: &Entries| {
            lines.push(tag.to_string());
            lines.extend(entries.lines().iter().map(|line| line.to_string()));
        };

        for block in self.layout() {
            match block {
                Block::Section(section) => push(&section.tag, &section.entries),
                Block::Setting => push(&Tag::Setting, self.settings.entries()),
                Block::Prev => {
                    if let Some(prev) = &self.prev {
                        push(prev.tag(), prev.entries());
                    }
                }
                Block::Notes => {
                    for note in &self.notes {
                        push(note.tag(), note.entries());
                    }
                }
                Block::Next => {
                    if let Some(next) = &self.next {
                        push(next.tag(), next.entries());
                    }
                }
            }
        }

        // Mixed endings are reproduced only while the line count is unchanged
        if self.line_endings.len() == lines.len() {
            let mut text = String::new();
            for (line, ending) in lines.iter().zip(&self.line_endings) {
                text.push_str(line);
                text.push_str(ending);
            }
            return text;
        }

        let mut text = lines.join(self.newline);
        if self.trailing_newline && !lines.is_empty() {
            text.push_str(self.newline);
        }
        text
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn set_charset(&mut self, charset: Charset) {
        self.charset = charset;
        self.bom = false;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The note just before the edited selection, if the editor sent one
    pub fn prev_note(&self) -> Option<&Note> {
        self.prev.as_ref()
    }

    pub fn next_note(&self) -> Option<&Note> {
        self.next.as_ref()
    }

    /// Notes that are not marked `[#DELETE]`, with their list positions
    pub fn live_notes(&self) -> impl Iterator<Item = (usize, &Note)> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| !note.is_deleted())
    }

    /// Tempo in effect at note `index`: the nearest `Tempo` on that note
    /// or an earlier one, then `[#PREV]`, then `[#SETTING]`
    pub fn tempo_at(&self, index: usize) -> Result<Option<f64>> {
        for note in self.notes.iter().take(index + 1).rev() {
            if let Some(tempo) = note.tempo()? {
                return Ok(Some(tempo));
            }
        }
        if let Some(tempo) = self.prev.as_ref().map(Note::tempo).transpose()?.flatten() {
            return Ok(Some(tempo));
        }
        Ok(self.settings.tempo())
    }
}
