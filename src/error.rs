use std::io;

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use serde_yaml::Error as YamlError;
use thiserror::Error;

/// Fatal failures. Anything that should only degrade a single record is reported as a
/// [`Diagnostic`](crate::codec::Diagnostic) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum LoreError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Schema definition error: {0}")]
    Schema(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Vocabulary error: {0}")]
    Vocabulary(String),
}

impl LoreError {
    /// Process exit code for the `lore` binary when the run aborts on this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoreError::Config(_) => 78,
            LoreError::NotFound(_) => 66,
            LoreError::Io(_) => 74,
            LoreError::Schema(_) | LoreError::Vocabulary(_) | LoreError::Serialization(_) => 65,
        }
    }
}

impl From<toml::de::Error> for LoreError {
    fn from(src: toml::de::Error) -> LoreError {
        LoreError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<JsonError> for LoreError {
    fn from(src: JsonError) -> LoreError {
        LoreError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<YamlError> for LoreError {
    fn from(src: YamlError) -> LoreError {
        LoreError::Serialization(format!("YAML deserialization error: {src}"))
    }
}

impl From<walkdir::Error> for LoreError {
    fn from(src: walkdir::Error) -> LoreError {
        match src.io_error().map(|e| e.kind()) {
            Some(io::ErrorKind::NotFound) => LoreError::NotFound(format!("{src}")),
            _ => LoreError::Io(format!("Directory walk failed: {src}")),
        }
    }
}

impl From<io::Error> for LoreError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => LoreError::NotFound(format!("{x}")),
            _ => LoreError::Io(format!("IOError: {}: {x}", x.kind())),
        }
    }
}

impl From<RegexError> for LoreError {
    fn from(x: RegexError) -> Self {
        LoreError::Serialization(format!("Regex parse failed: {x}"))
    }
}
