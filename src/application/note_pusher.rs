// src/application/note_pusher.rs
use crate::application::NoteRemote;
use crate::domain::{RemoteNote, SyncError};
use crate::infrastructure::markdown::{document, frontmatter};
use tracing::{debug, info};

/// Result of sending a document to DocBase
#[derive(Debug, Clone, PartialEq)]
pub struct PushOutcome {
    pub note: RemoteNote,
    /// Replacement document text, set only when the note was newly created
    pub document: Option<String>,
}

impl PushOutcome {
    pub fn created(&self) -> bool {
        self.document.is_some()
    }
}

pub struct NotePusher<R: NoteRemote> {
    remote: R,
}

impl<R: NoteRemote> NotePusher<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// Update the linked note. The document must carry a note id.
    pub fn push(&mut self, document_text: &str) -> Result<PushOutcome, SyncError> {
        let record = document::parse_document(document_text)?;
        let id = record
            .remote_id
            .as_ref()
            .ok_or_else(|| SyncError::parse("missing note id"))?;

        info!(note_id = %id, "Pushing note");
        debug!(?record, "Parsed local document");
        let note = self.remote.save_note(&record, Some(id))?;

        Ok(PushOutcome {
            note,
            document: None,
        })
    }

    /// Push a document, creating the remote note first if it is not linked yet.
    ///
    /// On create the id DocBase assigns is added to the front matter of the
    /// returned document; the rest of the text is left as it was.
    pub fn publish(&mut self, document_text: &str) -> Result<PushOutcome, SyncError> {
        let record = document::parse_unlinked(document_text)?;
        if record.remote_id.is_some() {
            return self.push(document_text);
        }

        info!(title = %record.title, "Creating note");
        let note = self.remote.save_note(&record, None)?;
        let id = note.id.clone().ok_or_else(|| {
            SyncError::RemoteDecode("create response did not include an id".to_string())
        })?;
        info!(note_id = %id, "Created note");

        let linked = frontmatter::insert_note_id(document_text, &id)?;
        Ok(PushOutcome {
            note,
            document: Some(linked),
        })
    }
}
