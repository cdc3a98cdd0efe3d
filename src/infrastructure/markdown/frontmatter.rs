//! YAML front-matter parsing and rendering.

use crate::constants::{FRONT_MATTER_DELIMITER, NOTE_ID_KEY};
use crate::domain::{NoteId, SyncError};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Fields the sync cares about. Everything else in the block is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    pub note_id: Option<NoteId>,
    pub title: Option<String>,
    pub draft: bool,
    pub tags: Vec<String>,
}

/// Front matter split off a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterSplit<'a> {
    /// Raw YAML between the delimiters.
    pub yaml: &'a str,
    /// Everything after the closing delimiter line.
    pub rest: &'a str,
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn is_delimiter(line: &str) -> bool {
    strip_line_ending(line).trim_end() == FRONT_MATTER_DELIMITER
}

/// Byte offsets of the front-matter block within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    yaml_start: usize,
    yaml_end: usize,
    rest_start: usize,
    crlf: bool,
}

fn locate(text: &str) -> Result<Bounds, SyncError> {
    let missing = || SyncError::parse("missing front matter");

    let mut offset = if text.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let mut lines = text[offset..].split_inclusive('\n');

    // Opening delimiter
    let crlf = loop {
        let line = lines.next().ok_or_else(missing)?;
        offset += line.len();
        if is_delimiter(line) {
            break line.ends_with("\r\n");
        }
        if !line.trim().is_empty() {
            return Err(missing());
        }
    };

    let yaml_start = offset;
    for line in lines {
        if is_delimiter(line) {
            return Ok(Bounds {
                yaml_start,
                yaml_end: offset,
                rest_start: offset + line.len(),
                crlf,
            });
        }
        offset += line.len();
    }

    Err(missing())
}

/// Split a document into its front-matter block and the remaining text.
///
/// The block must open the document (leading blank lines are tolerated) and
/// is closed by the next line holding only the delimiter.
pub fn split(text: &str) -> Result<FrontMatterSplit<'_>, SyncError> {
    let bounds = locate(text)?;
    Ok(FrontMatterSplit {
        yaml: &text[bounds.yaml_start..bounds.yaml_end],
        rest: &text[bounds.rest_start..],
    })
}

/// Parse the front matter of `text` into [`Metadata`] and return the text after it.
pub fn parse(text: &str) -> Result<(Metadata, &str), SyncError> {
    let split = split(text)?;
    let metadata = parse_yaml(split.yaml)?;
    Ok((metadata, split.rest))
}

/// Front-matter keys as written. Scalars are read as their literal text, so a
/// bare `1.50` tag stays `1.50`.
#[derive(Debug, Default, Deserialize)]
struct RawFrontMatter {
    #[serde(rename = "docbase_note_id", default)]
    note_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    draft: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    tags: Vec<String>,
}

struct TagsVisitor;

impl<'de> Visitor<'de> for TagsVisitor {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of tag names")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    // A lone scalar counts as a single tag
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut tags = Vec::new();
        // Each item is read as a string so plain scalars keep their text
        while let Some(tag) = seq.next_element::<String>()? {
            tags.push(tag);
        }
        Ok(tags)
    }
}

fn deserialize_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    deserializer.deserialize_any(TagsVisitor)
}

fn parse_yaml(yaml: &str) -> Result<Metadata, SyncError> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::default());
    }

    let raw: Option<RawFrontMatter> = serde_yaml::from_str(yaml)
        .map_err(|e| SyncError::parse(format!("invalid front matter: {}", e)))?;
    let raw = raw.unwrap_or_default();

    Ok(Metadata {
        note_id: raw.note_id.map(|id| id.parse()).transpose()?,
        title: raw.title,
        draft: draft_from(raw.draft.as_deref())?,
        tags: raw.tags,
    })
}

fn draft_from(value: Option<&str>) -> Result<bool, SyncError> {
    match value.map(str::trim) {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(SyncError::parse(format!("invalid draft flag '{}'", other))),
    }
}

fn is_note_id_line(line: &str) -> bool {
    line.strip_prefix(NOTE_ID_KEY)
        .map(|after| after.trim_start().starts_with(':'))
        .unwrap_or(false)
}

/// Link a document to `id` by adding the note id as the first front-matter key.
///
/// Only that line changes; an existing empty `docbase_note_id:` entry is
/// replaced. Everything else in the document is kept byte for byte.
pub fn insert_note_id(text: &str, id: &NoteId) -> Result<String, SyncError> {
    let bounds = locate(text)?;
    let newline = if bounds.crlf { "\r\n" } else { "\n" };

    let mut out = String::with_capacity(text.len() + 32);
    out.push_str(&text[..bounds.yaml_start]);
    out.push_str(&format!("{}: {}{}", NOTE_ID_KEY, quote(id.as_str()), newline));
    for line in text[bounds.yaml_start..bounds.yaml_end].split_inclusive('\n') {
        if !is_note_id_line(line) {
            out.push_str(line);
        }
    }
    out.push_str(&text[bounds.yaml_end..]);
    Ok(out)
}

/// Render a YAML double-quoted scalar.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render metadata as a front-matter block followed by `body`.
///
/// Tags are always emitted as a sequence, `[]` when there are none.
pub fn render(metadata: &Metadata, body: &str) -> String {
    let mut out = String::new();
    out.push_str(FRONT_MATTER_DELIMITER);
    out.push('\n');

    if let Some(id) = &metadata.note_id {
        out.push_str(&format!("{}: {}\n", NOTE_ID_KEY, quote(id.as_str())));
    }
    let title = metadata.title.as_deref().unwrap_or_default();
    out.push_str(&format!("title: {}\n", quote(title)));
    out.push_str(&format!("draft: {}\n", metadata.draft));
    if metadata.tags.is_empty() {
        out.push_str("tags: []\n");
    } else {
        out.push_str("tags:\n");
        for tag in &metadata.tags {
            out.push_str(&format!("  - {}\n", quote(tag)));
        }
    }

    out.push_str(FRONT_MATTER_DELIMITER);
    out.push('\n');
    out.push_str(body);
    out
}
