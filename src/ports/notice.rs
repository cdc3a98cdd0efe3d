// src/ports/notice.rs
use crate::application::SyncReport;
use crate::domain::SyncError;
use tracing::instrument;

/// Turns sync outcomes into the one-line notifications shown to the user
#[derive(Debug, Default)]
pub struct NoticePresenter;

impl NoticePresenter {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "trace", ret)]
    pub fn success(&self, report: &SyncReport) -> String {
        match report {
            SyncReport::Pulled { title } => {
                format!("DocBase note \"{}\" pulled successfully.", title)
            }
            SyncReport::Pushed { note } => match &note.url {
                Some(url) => format!("DocBase note pushed successfully: {}", url),
                None => "DocBase note pushed successfully.".to_string(),
            },
            SyncReport::Created { note } => {
                let id = note
                    .id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                match &note.url {
                    Some(url) => format!("Created DocBase note {}: {}", id, url),
                    None => format!("Created DocBase note {}.", id),
                }
            }
        }
    }

    #[instrument(level = "trace", ret)]
    pub fn failure(&self, action: &str, error: &SyncError) -> String {
        let hint = match error {
            SyncError::Config(_) => " Check your DocBase settings.",
            SyncError::Locked(_) => " Another sync is running.",
            _ => "",
        };
        format!("Failed to {} DocBase note: {}.{}", action, error, hint)
    }
}
