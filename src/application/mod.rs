// src/application/mod.rs
pub mod document_sync;
pub mod note_puller;
pub mod note_pusher;

pub use document_sync::{DocumentSync, SyncReport};
pub use note_puller::NotePuller;
pub use note_pusher::{NotePusher, PushOutcome};

use crate::domain::{NoteId, NoteRecord, RemoteNote, SyncError};

/// Access to the remote note service
pub trait NoteRemote {
    fn fetch_note(&mut self, id: &NoteId) -> Result<RemoteNote, SyncError>;

    /// Update the note `id`, or create a new one when `id` is `None`
    fn save_note(
        &mut self,
        record: &NoteRecord,
        id: Option<&NoteId>,
    ) -> Result<RemoteNote, SyncError>;
}

impl<R: NoteRemote + ?Sized> NoteRemote for &mut R {
    fn fetch_note(&mut self, id: &NoteId) -> Result<RemoteNote, SyncError> {
        (**self).fetch_note(id)
    }

    fn save_note(
        &mut self,
        record: &NoteRecord,
        id: Option<&NoteId>,
    ) -> Result<RemoteNote, SyncError> {
        (**self).save_note(record, id)
    }
}
