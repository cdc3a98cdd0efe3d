// src/domain/note.rs
use crate::domain::SyncError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref NOTE_ID_REGEX: Regex =
        Regex::new(r"^\d+$").expect("Failed to compile note id regex");
}

/// Identifier DocBase assigns to a post. Always digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for NoteId {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if NOTE_ID_REGEX.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(SyncError::parse(format!("invalid note id '{}'", s)))
        }
    }
}

impl From<u64> for NoteId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured form of a note, built transiently for each pull or push.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NoteRecord {
    pub title: String,
    pub body: String,
    pub draft: bool,
    pub tags: Vec<String>,
    pub remote_id: Option<NoteId>,
}

/// A note as returned by the DocBase API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteNote {
    pub id: Option<NoteId>,
    pub title: String,
    pub body: String,
    pub draft: bool,
    pub tags: Vec<String>,
    pub url: Option<String>,
}

impl RemoteNote {
    /// Convert into a record, keeping `fallback_id` when the payload carries none
    pub fn into_record(self, fallback_id: Option<&NoteId>) -> NoteRecord {
        NoteRecord {
            title: self.title,
            body: self.body,
            draft: self.draft,
            tags: self.tags,
            remote_id: self.id.or_else(|| fallback_id.cloned()),
        }
    }
}
