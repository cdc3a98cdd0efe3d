//! Transcoding between document text and [`NoteRecord`].
//!
//! Rendering is a full overwrite: anything in the document besides the note
//! id, title, draft flag, tags and body is not carried over. Pulling a note
//! therefore drops extra front-matter keys and any text above the title
//! heading. Linking a newly created note does not go through here; see
//! [`frontmatter::insert_note_id`].

use crate::domain::{NoteRecord, SyncError};
use crate::infrastructure::markdown::frontmatter::{self, Metadata};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING_REGEX: Regex =
        Regex::new(r"^#(?:[ \t].*)?$").expect("Failed to compile heading regex");
}

/// Split the text following the front matter into the title heading and the body.
///
/// The body starts after the first level-one heading line. One blank line
/// directly after the heading is treated as layout and skipped.
pub fn extract_body(rest: &str) -> Result<(String, String), SyncError> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        offset += line.len();
        if HEADING_REGEX.is_match(content) {
            let heading = content[1..].trim().to_string();
            let after = &rest[offset..];
            let body = after
                .strip_prefix("\r\n")
                .or_else(|| after.strip_prefix('\n'))
                .unwrap_or(after);
            return Ok((heading, body.to_string()));
        }
    }
    Err(SyncError::parse("missing body"))
}

/// Parse a document that must already be linked to a DocBase note.
pub fn parse_document(text: &str) -> Result<NoteRecord, SyncError> {
    let record = parse_unlinked(text)?;
    if record.remote_id.is_none() {
        return Err(SyncError::parse("missing note id"));
    }
    Ok(record)
}

/// Parse a document whose note id may still be absent.
pub fn parse_unlinked(text: &str) -> Result<NoteRecord, SyncError> {
    let (metadata, rest) = frontmatter::parse(text)?;
    let (heading, body) = extract_body(rest)?;

    Ok(NoteRecord {
        // Front matter wins; the heading only fills in a missing title
        title: metadata.title.unwrap_or(heading),
        body,
        draft: metadata.draft,
        tags: metadata.tags,
        remote_id: metadata.note_id,
    })
}

/// Render a record as full document text.
pub fn render_document(record: &NoteRecord) -> String {
    let metadata = Metadata {
        note_id: record.remote_id.clone(),
        title: Some(record.title.clone()),
        draft: record.draft,
        tags: record.tags.clone(),
    };
    // A title spanning lines would end the heading early
    let heading = record.title.replace(['\r', '\n'], " ");
    let body = format!("\n# {}\n\n{}", heading, record.body);
    frontmatter::render(&metadata, &body)
}
