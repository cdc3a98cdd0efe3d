// src/domain/mod.rs
pub mod error;
pub mod note;

pub use error::SyncError;
pub use note::{NoteId, NoteRecord, RemoteNote};
