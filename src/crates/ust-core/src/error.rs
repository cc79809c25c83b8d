use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, UstError>;

#[derive(Debug, thiserror::Error)]
pub enum UstError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is neither valid CP932 nor valid UTF-8")]
    UnknownEncoding,

    #[error("File declares Charset={declared} but is not valid {declared}")]
    Malformed { declared: &'static str },

    #[error("Text cannot be encoded as {charset}: {text:?}")]
    Unencodable { charset: &'static str, text: String },

    #[error("Note {tag} has no {key} entry")]
    MissingField { tag: String, key: &'static str },

    #[error("Note {tag} has an invalid {key} value: {value:?}")]
    InvalidValue {
        tag: String,
        key: &'static str,
        value: String,
    },
}

impl UstError {
    pub fn missing(tag: impl ToString, key: &'static str) -> Self {
        UstError::MissingField {
            tag: tag.to_string(),
            key,
        }
    }

    pub fn invalid(tag: impl ToString, key: &'static str, value: impl Into<String>) -> Self {
        UstError::InvalidValue {
            tag: tag.to_string(),
            key,
            value: value.into(),
        }
    }
}
