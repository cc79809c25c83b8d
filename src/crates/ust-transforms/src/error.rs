use ust_core::UstError;

pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Ust(#[from] UstError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Mode2 pitch editing is not enabled in UTAU")]
    Mode2Disabled,

    #[error("No notes selected")]
    NoNotes,

    #[error("Note {tag} is {length} ticks long, too short for {needed} ticks of rolled notes")]
    TooShort {
        tag: String,
        length: u32,
        needed: u32,
    },

    #[error("No tempo found for note {tag}")]
    MissingTempo { tag: String },
}
