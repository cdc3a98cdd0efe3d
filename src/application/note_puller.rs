// src/application/note_puller.rs
use crate::application::NoteRemote;
use crate::domain::SyncError;
use crate::infrastructure::markdown::document;
use tracing::{debug, info};

pub struct NotePuller<R: NoteRemote> {
    remote: R,
}

impl<R: NoteRemote> NotePuller<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// Fetch the note the document points at and return the replacement text
    pub fn pull(&mut self, document_text: &str) -> Result<String, SyncError> {
        let local = document::parse_document(document_text)?;
        let id = local
            .remote_id
            .ok_or_else(|| SyncError::parse("missing note id"))?;

        info!(note_id = %id, "Pulling note");
        let remote = self.remote.fetch_note(&id)?;
        debug!(?remote, "Fetched note");

        // The document's id stays authoritative
        let mut record = remote.into_record(None);
        record.remote_id = Some(id);

        Ok(document::render_document(&record))
    }
}
