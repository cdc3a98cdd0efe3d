// src/infrastructure/docbase.rs
use crate::application::NoteRemote;
use crate::constants::TOKEN_HEADER;
use crate::domain::{NoteId, NoteRecord, RemoteNote, SyncError};
use crate::infrastructure::config::Settings;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Blocking client for the DocBase posts API
pub struct DocBaseClient {
    client: Client,
    base_url: String,
    team_id: String,
    access_token: String,
    timeout_secs: u64,
}

/// Request body for create and update. Tags are always an array.
#[derive(Debug, Serialize, PartialEq)]
pub struct PostRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub draft: bool,
    pub tags: &'a [String],
}

impl<'a> From<&'a NoteRecord> for PostRequest<'a> {
    fn from(record: &'a NoteRecord) -> Self {
        Self {
            title: &record.title,
            body: &record.body,
            draft: record.draft,
            tags: &record.tags,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTag {
    Name(String),
    Object { name: String },
}

#[derive(Debug, Deserialize)]
struct PostPayload {
    #[serde(default)]
    id: Option<WireId>,
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    tags: Vec<WireTag>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    messages: Vec<String>,
}

/// Decode a post from a DocBase JSON response
pub fn decode_post(json: &str) -> Result<RemoteNote, SyncError> {
    let payload: PostPayload =
        serde_json::from_str(json).map_err(|e| SyncError::RemoteDecode(e.to_string()))?;

    let id = match payload.id {
        None => None,
        Some(WireId::Number(n)) => Some(NoteId::from(n)),
        Some(WireId::Text(s)) => Some(
            s.parse()
                .map_err(|_| SyncError::RemoteDecode(format!("invalid post id '{}'", s)))?,
        ),
    };

    Ok(RemoteNote {
        id,
        title: payload.title,
        body: payload.body.unwrap_or_default(),
        draft: payload.draft,
        tags: payload
            .tags
            .into_iter()
            .map(|tag| match tag {
                WireTag::Name(name) | WireTag::Object { name } => name,
            })
            .collect(),
        url: payload.url,
    })
}

impl DocBaseClient {
    pub fn new(settings: &Settings) -> Result<Self, SyncError> {
        settings.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("docbase-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Network(format!("Failed to build HTTP client: {}", e)))?;

        debug!(base_url = %settings.base_url, team = %settings.team_id, "Created DocBase client");
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            team_id: settings.team_id.trim().to_string(),
            access_token: settings.access_token.trim().to_string(),
            timeout_secs: settings.timeout_secs,
        })
    }

    /// `/teams/{team}/posts` or `/teams/{team}/posts/{id}`
    pub fn posts_url(&self, id: Option<&NoteId>) -> String {
        let collection = format!("{}/teams/{}/posts", self.base_url, self.team_id);
        match id {
            Some(id) => format!("{}/{}", collection, id),
            None => collection,
        }
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<RemoteNote, SyncError> {
        let response = request
            .header(TOKEN_HEADER, &self.access_token)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SyncError::Network(format!(
                        "request to {} timed out after {}s",
                        url, self.timeout_secs
                    ))
                } else {
                    SyncError::Network(format!("request to {} failed: {}", url, e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| SyncError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorPayload>(&text)
                .ok()
                .filter(|p| !p.messages.is_empty())
                .map(|p| format!(": {}", p.messages.join(", ")))
                .unwrap_or_default();
            return Err(SyncError::Network(format!("HTTP {}{}", status, detail)));
        }

        decode_post(&text)
    }
}

impl NoteRemote for DocBaseClient {
    #[instrument(level = "debug", skip(self))]
    fn fetch_note(&mut self, id: &NoteId) -> Result<RemoteNote, SyncError> {
        let url = self.posts_url(Some(id));
        let note = self.send(self.client.get(&url), &url)?;
        info!(note_id = %id, "Fetched note from DocBase");
        Ok(note)
    }

    #[instrument(level = "debug", skip(self, record))]
    fn save_note(
        &mut self,
        record: &NoteRecord,
        id: Option<&NoteId>,
    ) -> Result<RemoteNote, SyncError> {
        let url = self.posts_url(id);
        let payload = PostRequest::from(record);
        debug!(?payload, "Sending post");

        let request = match id {
            Some(_) => self.client.patch(&url),
            None => self.client.post(&url),
        };
        let note = self.send(request.json(&payload), &url)?;
        info!(note_id = ?note.id, "Saved note to DocBase");
        Ok(note)
    }
}
