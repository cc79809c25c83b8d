//! Text encodings used by UTAU note files.
//!
//! UTAU itself writes CP932 (Windows Shift_JIS). Newer projects may be
//! saved as UTF-8 and say so with `Charset=UTF-8` in `[#SETTING]`.

use encoding_rs::SHIFT_JIS;

use crate::error::{Result, UstError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// CP932, decoded with the WHATWG Shift_JIS table (which is CP932)
    ShiftJis,
    Utf8,
}

impl Charset {
    pub fn name(self) -> &'static str {
        match self {
            Charset::ShiftJis => "CP932",
            Charset::Utf8 => "UTF-8",
        }
    }

    /// Parse the value of a `Charset=` setting
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "shift-jis" | "sjis" | "cp932" | "windows-31j" => Some(Charset::ShiftJis),
            _ => None,
        }
    }

    /// Decode without any replacement characters; `None` on malformed input
    pub fn decode_strict(self, bytes: &[u8]) -> Option<String> {
        match self {
            Charset::ShiftJis => SHIFT_JIS
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            Charset::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::ShiftJis => {
                let (bytes, _, had_unmappable) = SHIFT_JIS.encode(text);
                if had_unmappable {
                    let offending = text
                        .chars()
                        .filter(|c| SHIFT_JIS.encode(&c.to_string()).2)
                        .collect();
                    return Err(UstError::Unencodable {
                        charset: self.name(),
                        text: offending,
                    });
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

/// Result of sniffing and decoding a raw note file
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub charset: Charset,
    pub bom: bool,
}

/// Decode a note file, choosing the charset the way UTAU would read it.
///
/// Order: UTF-8 BOM, a declared `Charset=`, strict CP932, strict UTF-8.
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        let text = Charset::Utf8
            .decode_strict(rest)
            .ok_or(UstError::Malformed { declared: "UTF-8" })?;
        return Ok(Decoded {
            text,
            charset: Charset::Utf8,
            bom: true,
        });
    }

    if let Some(declared) = declared_charset(bytes) {
        let text = declared
            .decode_strict(bytes)
            .ok_or(UstError::Malformed {
                declared: declared.name(),
            })?;
        return Ok(Decoded {
            text,
            charset: declared,
            bom: false,
        });
    }

    for charset in [Charset::ShiftJis, Charset::Utf8] {
        if let Some(text) = charset.decode_strict(bytes) {
            tracing::debug!("Decoded note file as {}", charset.name());
            return Ok(Decoded {
                text,
                charset,
                bom: false,
            });
        }
    }

    Err(UstError::UnknownEncoding)
}

/// Encode text for writing, restoring the BOM if the source had one
pub fn encode(text: &str, charset: Charset, bom: bool) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if bom && charset == Charset::Utf8 {
        out.extend_from_slice(UTF8_BOM);
    }
    out.extend(charset.encode(text)?);
    Ok(out)
}

/// Look for a `Charset=` line. The key and the usual values are ASCII, so
/// this works before the file is decoded.
fn declared_charset(bytes: &[u8]) -> Option<Charset> {
    bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .find_map(|line| line.strip_prefix(b"Charset="))
        .and_then(|value| std::str::from_utf8(value).ok())
        .and_then(Charset::from_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_jis_is_default() {
        let bytes = Charset::ShiftJis.encode("Lyric=あ\r\n").unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.charset, Charset::ShiftJis);
        assert_eq!(decoded.text, "Lyric=あ\r\n");
        assert!(!decoded.bom);
    }

    #[test]
    fn test_declared_utf8_wins() {
        let text = "[#SETTING]\nCharset=UTF-8\n[#0000]\nLyric=あ\n";
        let decoded = decode(text.as_bytes()).unwrap();
        assert_eq!(decoded.charset, Charset::Utf8);
        assert_eq!(decoded.text, text);
    }

    #[test]
    fn test_undeclared_utf8_falls_back() {
        // "あ" in UTF-8 is E3 81 82; 0x82 then "\n" is not a CP932 pair
        let text = "Lyric=あ\n";
        let decoded = decode(text.as_bytes()).unwrap();
        assert_eq!(decoded.charset, Charset::Utf8);
    }

    #[test]
    fn test_bom_is_kept() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Lyric=あ\n".as_bytes());
        let decoded = decode(&bytes).unwrap();
        assert!(decoded.bom);
        assert_eq!(encode(&decoded.text, decoded.charset, decoded.bom).unwrap(), bytes);
    }

    #[test]
    fn test_unencodable_character() {
        let err = Charset::ShiftJis.encode("Lyric=😀").unwrap_err();
        assert!(matches!(err, UstError::Unencodable { ref text, .. } if text == "😀"));
    }

    #[test]
    fn test_charset_labels() {
        assert_eq!(Charset::from_label("UTF-8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_label("shift_jis"), Some(Charset::ShiftJis));
        assert_eq!(Charset::from_label("latin1"), None);
    }
}
