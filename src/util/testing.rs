// src/util/testing.rs

use anyhow::Result;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::env;
use std::rc::Rc;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::NoteRemote;
use crate::domain::{NoteId, NoteRecord, RemoteNote, SyncError};

/// A request the mock received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Fetch(NoteId),
    Update(NoteId, NoteRecord),
    Create(NoteRecord),
}

/// Shared mock remote for testing use cases that depend on NoteRemote
///
/// # Examples
///
/// ```
/// use docbase_sync::util::testing::MockNoteRemote;
/// use docbase_sync::domain::RemoteNote;
///
/// let mock = MockNoteRemote::builder()
///     .with_note(42, RemoteNote {
///         id: None,
///         title: "Title".to_string(),
///         body: "Body".to_string(),
///         draft: false,
///         tags: vec![],
///         url: None,
///     })
///     .with_network_failure(13)
///     .build();
/// ```
pub struct MockNoteRemote {
    notes: HashMap<NoteId, RemoteNote>,
    failures: HashSet<NoteId>,
    save_result: Option<RemoteNote>,
    calls: Rc<RefCell<Vec<RemoteCall>>>,
}

impl MockNoteRemote {
    pub fn builder() -> MockNoteRemoteBuilder {
        MockNoteRemoteBuilder::new()
    }

    /// Handle to the recorded calls, usable after the mock is moved
    pub fn calls(&self) -> Rc<RefCell<Vec<RemoteCall>>> {
        Rc::clone(&self.calls)
    }

    fn check_failure(&self, id: &NoteId) -> Result<(), SyncError> {
        if self.failures.contains(id) {
            return Err(SyncError::Network(format!("HTTP 500 for note {}", id)));
        }
        Ok(())
    }
}

impl NoteRemote for MockNoteRemote {
    fn fetch_note(&mut self, id: &NoteId) -> Result<RemoteNote, SyncError> {
        self.calls.borrow_mut().push(RemoteCall::Fetch(id.clone()));
        self.check_failure(id)?;
        self.notes
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::Network(format!("HTTP 404 for note {}", id)))
    }

    fn save_note(
        &mut self,
        record: &NoteRecord,
        id: Option<&NoteId>,
    ) -> Result<RemoteNote, SyncError> {
        let call = match id {
            Some(id) => RemoteCall::Update(id.clone(), record.clone()),
            None => RemoteCall::Create(record.clone()),
        };
        self.calls.borrow_mut().push(call);
        if let Some(id) = id {
            self.check_failure(id)?;
        }

        Ok(self.save_result.clone().unwrap_or_else(|| RemoteNote {
            id: id.cloned(),
            title: record.title.clone(),
            body: record.body.clone(),
            draft: record.draft,
            tags: record.tags.clone(),
            url: None,
        }))
    }
}

/// Builder for MockNoteRemote
pub struct MockNoteRemoteBuilder {
    notes: HashMap<NoteId, RemoteNote>,
    failures: HashSet<NoteId>,
    save_result: Option<RemoteNote>,
}

impl MockNoteRemoteBuilder {
    pub fn new() -> Self {
        Self {
            notes: HashMap::new(),
            failures: HashSet::new(),
            save_result: None,
        }
    }

    /// Add a note that can be retrieved by fetch_note
    pub fn with_note(mut self, id: u64, note: RemoteNote) -> Self {
        self.notes.insert(NoteId::from(id), note);
        self
    }

    /// Make every request for `id` fail with a network error
    pub fn with_network_failure(mut self, id: u64) -> Self {
        self.failures.insert(NoteId::from(id));
        self
    }

    /// Note returned by save_note instead of echoing the request
    pub fn with_save_result(mut self, note: RemoteNote) -> Self {
        self.save_result = Some(note);
        self
    }

    pub fn build(self) -> MockNoteRemote {
        MockNoteRemote {
            notes: self.notes,
            failures: self.failures,
            save_result: self.save_result,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Default for MockNoteRemoteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "mio", "rustls", "mockito"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        init_test_setup().expect("Failed to initialize test setup");
    }

    fn note(title: &str) -> RemoteNote {
        RemoteNote {
            id: None,
            title: title.to_string(),
            body: String::new(),
            draft: false,
            tags: vec![],
            url: None,
        }
    }

    #[test]
    fn given_note_added_when_fetching_then_returns_note() {
        let mut mock = MockNoteRemote::builder().with_note(123, note("Q")).build();

        let result = mock.fetch_note(&NoteId::from(123)).expect("Note should exist");

        assert_eq!(result.title, "Q");
    }

    #[test]
    fn given_no_note_when_fetching_then_returns_network_error() {
        let mut mock = MockNoteRemote::builder().build();

        let result = mock.fetch_note(&NoteId::from(999));

        assert!(matches!(result, Err(SyncError::Network(_))));
    }

    #[test]
    fn given_no_save_result_when_saving_then_echoes_record() {
        let mut mock = MockNoteRemote::builder().build();
        let record = NoteRecord {
            title: "T".to_string(),
            ..Default::default()
        };

        let saved = mock.save_note(&record, Some(&NoteId::from(5))).unwrap();

        assert_eq!(saved.id, Some(NoteId::from(5)));
        assert_eq!(saved.title, "T");
    }

    #[test]
    fn given_calls_when_inspecting_then_records_in_order() {
        let mut mock = MockNoteRemote::builder().with_note(1, note("A")).build();
        let calls = mock.calls();

        let _ = mock.fetch_note(&NoteId::from(1));
        let _ = mock.save_note(&NoteRecord::default(), None);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], RemoteCall::Fetch(_)));
        assert!(matches!(calls[1], RemoteCall::Create(_)));
    }
}
