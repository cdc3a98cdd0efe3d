// src/application/document_sync.rs
use crate::application::{NotePuller, NotePusher, NoteRemote, PushOutcome};
use crate::domain::{RemoteNote, SyncError};
use crate::infrastructure::file_writer::{self, DocumentLock};
use crate::infrastructure::markdown::document;
use std::path::Path;
use tracing::{debug, info, instrument};

/// What a sync did to a document
#[derive(Debug, Clone, PartialEq)]
pub enum SyncReport {
    Pulled { title: String },
    Pushed { note: RemoteNote },
    Created { note: RemoteNote },
}

/// Runs pull and push against a document on disk.
///
/// Each run holds the document's lock for the whole read-modify-write, and the
/// file is only replaced once its new content is fully computed.
pub struct DocumentSync<R: NoteRemote> {
    remote: R,
}

impl<R: NoteRemote> DocumentSync<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    pub fn into_remote(self) -> R {
        self.remote
    }

    #[instrument(level = "debug", skip(self))]
    pub fn pull(&mut self, path: &Path) -> Result<SyncReport, SyncError> {
        let _lock = DocumentLock::acquire(path)?;
        let text = file_writer::read_document(path)?;

        let updated = NotePuller::new(&mut self.remote).pull(&text)?;
        let title = document::parse_document(&updated)?.title;

        file_writer::write_document(path, &updated)?;
        info!(?path, "Document updated from DocBase");
        Ok(SyncReport::Pulled { title })
    }

    /// Push the document. With `create`, an unlinked document is created remotely
    /// and the assigned id is written back into the file.
    #[instrument(level = "debug", skip(self))]
    pub fn push(&mut self, path: &Path, create: bool) -> Result<SyncReport, SyncError> {
        let _lock = DocumentLock::acquire(path)?;
        let text = file_writer::read_document(path)?;

        let mut pusher = NotePusher::new(&mut self.remote);
        let outcome = if create {
            pusher.publish(&text)?
        } else {
            pusher.push(&text)?
        };

        match outcome {
            PushOutcome {
                note,
                document: Some(updated),
            } => {
                file_writer::write_document(path, &updated)?;
                info!(?path, "Linked document to new note");
                Ok(SyncReport::Created { note })
            }
            PushOutcome { note, document: None } => {
                debug!(?path, "Document left unchanged");
                Ok(SyncReport::Pushed { note })
            }
        }
    }
}
