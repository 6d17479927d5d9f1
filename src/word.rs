use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// A single vocabulary entry as supplied by the word-list collaborator.
///
/// Identity is the `name` field: `SessionStore` correlates per-word logs back
/// to words by name when rebuilding the error-practice subset, so names must
/// be unique within one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub name: String,
    #[serde(default)]
    pub trans: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usphone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ukphone: Option<String>,
}

impl Word {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            trans: Vec::new(),
            usphone: None,
            ukphone: None,
        }
    }

    pub fn with_trans<S: Into<String>>(name: S, trans: Vec<String>) -> Self {
        Self {
            name: name.into(),
            trans,
            usphone: None,
            ukphone: None,
        }
    }
}

/// Load an ordered word list from a JSON file (an array of `Word` objects).
pub fn load_word_list<P: AsRef<Path>>(path: P) -> io::Result<Vec<Word>> {
    let bytes = fs::read(path)?;
    let words: Vec<Word> = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(words)
}
