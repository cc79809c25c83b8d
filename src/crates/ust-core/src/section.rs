//! Section headers and `key=value` bodies.
//!
//! Lines are stored as written so that a file nobody touched serializes
//! back to the same text.

use std::fmt;

/// The `[#...]` header of a section
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Version,
    Setting,
    Prev,
    Next,
    TrackEnd,
    /// A note newly added by a plugin
    Insert,
    /// A note the editor should remove
    Delete,
    /// A note that exists in the editor, `[#0012]`
    Index(usize),
    /// A note index written with other than four digits, `[#012]`
    RawIndex(String),
    Other(String),
}

impl Tag {
    /// Parse a header line such as `[#0003]`; `None` if the line is not a header
    pub fn from_header(line: &str) -> Option<Self> {
        let inner = line.strip_prefix("[#")?.strip_suffix(']')?;
        Some(match inner {
            "VERSION" => Tag::Version,
            "SETTING" => Tag::Setting,
            "PREV" => Tag::Prev,
            "NEXT" => Tag::Next,
            "TRACKEND" => Tag::TrackEnd,
            "INSERT" => Tag::Insert,
            "DELETE" => Tag::Delete,
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                match digits.parse::<usize>() {
                    Ok(index) if format!("{:04}", index) == digits => Tag::Index(index),
                    Ok(_) => Tag::RawIndex(digits.to_string()),
                    Err(_) => Tag::Other(digits.to_string()),
                }
            }
            other => Tag::Other(other.to_string()),
        })
    }

    /// True for tags that mark an element of the note list
    pub fn is_note(&self) -> bool {
        matches!(
            self,
            Tag::Index(_) | Tag::RawIndex(_) | Tag::Insert | Tag::Delete
        )
    }

    /// Position in the editor of a note that has one
    pub fn index(&self) -> Option<usize> {
        match self {
            Tag::Index(index) => Some(*index),
            Tag::RawIndex(digits) => digits.parse().ok(),
            _ => None,
        }
    }

    /// The text between `[#` and `]`
    pub fn name(&self) -> String {
        match self {
            Tag::Version => "VERSION".into(),
            Tag::Setting => "SETTING".into(),
            Tag::Prev => "PREV".into(),
            Tag::Next => "NEXT".into(),
            Tag::TrackEnd => "TRACKEND".into(),
            Tag::Insert => "INSERT".into(),
            Tag::Delete => "DELETE".into(),
            Tag::Index(index) => format!("{:04}", index),
            Tag::RawIndex(digits) | Tag::Other(digits) => digits.clone(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[#{}]", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Entry { key: String, value: String },
    /// Anything without `=`, e.g. `UST Version1.2` or a blank line
    Raw(String),
}

impl Line {
    pub fn parse(line: &str) -> Self {
        match line.split_once('=') {
            Some((key, value)) if !key.is_empty() => Line::Entry {
                key: key.to_string(),
                value: value.to_string(),
            },
            _ => Line::Raw(line.to_string()),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Entry { key, value } => write!(f, "{}={}", key, value),
            Line::Raw(text) => f.write_str(text),
        }
    }
}

/// Ordered body of a section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    lines: Vec<Line>,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        self.lines.push(Line::parse(line));
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replace the first entry with this key, or append a new one
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        for line in &mut self.lines {
            if let Line::Entry { key: k, value: v } = line {
                if k == key {
                    *v = value;
                    return;
                }
            }
        }
        self.lines.push(Line::Entry {
            key: key.to_string(),
            value,
        });
    }

    /// Remove every entry with this key, returning the first value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let mut removed = None;
        self.lines.retain(|line| match line {
            Line::Entry { key: k, value } if k == key => {
                removed.get_or_insert_with(|| value.clone());
                false
            }
            _ => true,
        });
        removed
    }

    /// Keep only entries whose key is listed; raw lines are dropped too
    pub fn retain_keys(&mut self, keep: &[&str]) {
        self.lines.retain(|line| match line {
            Line::Entry { key, .. } => keep.contains(&key.as_str()),
            Line::Raw(_) => false,
        });
    }

    /// Key/value pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { key, value } => Some((key.as_str(), value.as_str())),
            Line::Raw(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A non-note section, kept as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub tag: Tag,
    pub entries: Entries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_parsing() {
        assert_eq!(Tag::from_header("[#0012]"), Some(Tag::Index(12)));
        assert_eq!(Tag::from_header("[#PREV]"), Some(Tag::Prev));
        assert_eq!(Tag::from_header("[#INSERT]"), Some(Tag::Insert));
        assert_eq!(
            Tag::from_header("[#CUSTOM]"),
            Some(Tag::Other("CUSTOM".into()))
        );
        assert_eq!(Tag::from_header("Lyric=a"), None);
        assert_eq!(Tag::Index(7).to_string(), "[#0007]");
    }

    #[test]
    fn test_unusual_index_width_is_kept() {
        for header in ["[#012]", "[#00012]", "[#0]"] {
            let tag = Tag::from_header(header).unwrap();
            assert!(tag.is_note());
            assert_eq!(tag.to_string(), header);
        }
        assert_eq!(Tag::from_header("[#00012]").unwrap().index(), Some(12));
        assert_eq!(Tag::from_header("[#0012]").unwrap().index(), Some(12));
        assert_eq!(Tag::Insert.index(), None);
    }

    #[test]
    fn test_line_parsing() {
        assert_eq!(
            Line::parse("Flags=g-2=B"),
            Line::Entry {
                key: "Flags".into(),
                value: "g-2=B".into()
            }
        );
        assert_eq!(Line::parse("UST Version1.2"), Line::Raw("UST Version1.2".into()));
        assert_eq!(Line::parse("=oops"), Line::Raw("=oops".into()));
        assert_eq!(Line::parse("Label=").to_string(), "Label=");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut entries = Entries::new();
        entries.push_line("Length=480");
        entries.push_line("Lyric=a");
        entries.set("Length", "240");
        entries.set("NoteNum", "60");
        let keys: Vec<_> = entries.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Length", "Lyric", "NoteNum"]);
        assert_eq!(entries.get("Length"), Some("240"));
    }

    #[test]
    fn test_retain_keys() {
        let mut entries = Entries::new();
        for line in ["Length=480", "Lyric=a", "PBS=0", "", "Flags=B50"] {
            entries.push_line(line);
        }
        entries.retain_keys(&["Length", "Lyric"]);
        assert_eq!(entries.lines().len(), 2);
        assert_eq!(entries.remove("Lyric"), Some("a".into()));
        assert!(!entries.contains("Lyric"));
    }
}
