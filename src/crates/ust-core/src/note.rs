use std::str::FromStr;

use crate::error::{Result, UstError};
use crate::pitch::{
    format_number, format_number_list, format_shape_list, parse_number_list, parse_shape_list,
    PitchCurve, PitchShape, PitchStart,
};
use crate::section::{Entries, Tag};

/// Lyric of a rest
pub const REST: &str = "R";

/// Entries kept when a note is made bare
const BARE_KEYS: [&str; 4] = ["Length", "Lyric", "NoteNum", "Tempo"];

/// One note section of the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    tag: Tag,
    entries: Entries,
}

impl Note {
    pub fn new(tag: Tag) -> Self {
        Note {
            tag,
            entries: Entries::new(),
        }
    }

    pub fn with_entries(tag: Tag, entries: Entries) -> Self {
        Note { tag, entries }
    }

    /// A new `[#INSERT]` note with the three fields UTAU needs
    pub fn inserted(lyric: &str, length: u32, notenum: i32) -> Self {
        let mut note = Note::new(Tag::Insert);
        note.set_length(length);
        note.set_lyric(lyric);
        note.set_notenum(notenum);
        note
    }

    /// Copy of this note re-tagged as an insertion
    pub fn duplicate(&self) -> Self {
        Note {
            tag: Tag::Insert,
            entries: self.entries.clone(),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: Tag) {
        self.tag = tag;
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.set(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    fn require(&self, key: &'static str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| UstError::missing(&self.tag, key))
    }

    fn parse_required<T: FromStr>(&self, key: &'static str) -> Result<T> {
        let value = self.require(key)?;
        value
            .trim()
            .parse()
            .map_err(|_| UstError::invalid(&self.tag, key, value))
    }

    fn parse_optional<T: FromStr>(&self, key: &'static str) -> Result<Option<T>> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| UstError::invalid(&self.tag, key, value)),
            _ => Ok(None),
        }
    }

    pub fn lyric(&self) -> Result<&str> {
        self.require("Lyric")
    }

    pub fn set_lyric(&mut self, lyric: impl Into<String>) {
        self.set("Lyric", lyric);
    }

    pub fn length(&self) -> Result<u32> {
        self.parse_required("Length")
    }

    pub fn set_length(&mut self, length: u32) {
        self.set("Length", length.to_string());
    }

    pub fn notenum(&self) -> Result<i32> {
        self.parse_required("NoteNum")
    }

    pub fn set_notenum(&mut self, notenum: i32) {
        self.set("NoteNum", notenum.to_string());
    }

    pub fn tempo(&self) -> Result<Option<f64>> {
        self.parse_optional("Tempo")
    }

    pub fn set_tempo(&mut self, tempo: f64) {
        self.set("Tempo", format_number(tempo));
    }

    pub fn velocity(&self) -> Result<Option<i32>> {
        self.parse_optional("Velocity")
    }

    pub fn set_velocity(&mut self, velocity: i32) {
        self.set("Velocity", velocity.to_string());
    }

    /// Flags, empty when absent
    pub fn flags(&self) -> &str {
        self.get("Flags").unwrap_or("")
    }

    pub fn set_flags(&mut self, flags: impl Into<String>) {
        self.set("Flags", flags);
    }

    /// Label, empty when absent
    pub fn label(&self) -> &str {
        self.get("Label").unwrap_or("")
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.set("Label", label);
    }

    pub fn is_rest(&self) -> Result<bool> {
        Ok(self.lyric()? == REST)
    }

    pub fn is_deleted(&self) -> bool {
        self.tag == Tag::Delete
    }

    /// Mark for deletion; the note stays in the list until written
    pub fn delete(&mut self) {
        self.tag = Tag::Delete;
    }

    /// Drop everything but length, lyric, pitch and tempo
    pub fn make_bare(&mut self) {
        self.entries.retain_keys(&BARE_KEYS);
    }

    pub fn pbs(&self) -> Result<Option<PitchStart>> {
        match self.get("PBS") {
            None => Ok(None),
            Some(value) => PitchStart::parse(value)
                .map(Some)
                .ok_or_else(|| UstError::invalid(&self.tag, "PBS", value)),
        }
    }

    pub fn set_pbs(&mut self, start: PitchStart) {
        self.set("PBS", start.format());
    }

    fn number_list(&self, key: &'static str) -> Result<Option<Vec<f64>>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => parse_number_list(value)
                .map(Some)
                .ok_or_else(|| UstError::invalid(&self.tag, key, value)),
        }
    }

    pub fn pbw(&self) -> Result<Option<Vec<f64>>> {
        self.number_list("PBW")
    }

    pub fn set_pbw(&mut self, widths: &[f64]) {
        self.set("PBW", format_number_list(widths));
    }

    pub fn pby(&self) -> Result<Option<Vec<f64>>> {
        self.number_list("PBY")
    }

    pub fn set_pby(&mut self, heights: &[f64]) {
        self.set("PBY", format_number_list(heights));
    }

    pub fn pbm(&self) -> Option<Vec<PitchShape>> {
        self.get("PBM").map(parse_shape_list)
    }

    pub fn set_pbm(&mut self, shapes: &[PitchShape]) {
        self.set("PBM", format_shape_list(shapes));
    }

    /// The full curve, or `None` unless both `PBS` and `PBW` are present
    pub fn pitch_curve(&self) -> Result<Option<PitchCurve>> {
        let (Some(start), Some(widths)) = (self.pbs()?, self.pbw()?) else {
            return Ok(None);
        };
        Ok(Some(PitchCurve {
            start,
            widths,
            heights: self.pby()?.unwrap_or_default(),
            shapes: self.pbm().unwrap_or_default(),
        }))
    }

    pub fn set_pitch_curve(&mut self, curve: &PitchCurve) {
        self.set_pbs(curve.start);
        self.set_pbw(&curve.widths);
        self.set_pby(&curve.heights);
        self.set_pbm(&curve.shapes);
    }
}
