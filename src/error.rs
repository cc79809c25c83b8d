use std::path::PathBuf;

use ust_core::UstError;
use ust_transforms::TransformError;

pub type Result<T> = std::result::Result<T, ToolboxError>;

#[derive(Debug, thiserror::Error)]
pub enum ToolboxError {
    #[error(transparent)]
    Ust(#[from] UstError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("The project has not been saved yet; save the .ust file and run again")]
    UnsavedProject,

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pitch memory {} is not valid JSON: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read an answer from the terminal: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Could not find a directory for the pitch memory; pass --store")]
    NoStoreDir,
}

impl ToolboxError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolboxError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
