use docbase_sync::infrastructure::Settings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture holding a markdown document in a temporary directory
#[allow(dead_code)]
pub struct TestDocument {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestDocument {
    /// Write `content` to a fresh `note.md`
    pub fn new(content: &str) -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let path = temp_dir.path().join("note.md");
        std::fs::write(&path, content).context("Failed to write test document")?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).context("Failed to read test document")
    }

    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }
}

/// Settings pointing at a mock server
#[allow(dead_code)]
pub fn settings_for(base_url: &str) -> Settings {
    Settings {
        access_token: test_docs::TOKEN.to_string(),
        team_id: test_docs::TEAM.to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
    }
}

/// Known documents and payloads
#[allow(dead_code)]
pub mod test_docs {
    pub const TOKEN: &str = "test-token";
    pub const TEAM: &str = "acme";

    pub const LINKED: &str = "---\ndocbase_note_id: \"42\"\ntitle: \"T\"\ndraft: true\ntags:\n  - \"x\"\n---\n# T\nHello";

    pub const UNLINKED: &str = "---\ntitle: \"Draft idea\"\ntags:\n  - \"ideas\"\n  - \"rust\"\n---\n\n# Draft idea\n\nSome text.\n";

    pub const NO_FRONT_MATTER: &str = "# T\n\nJust markdown.\n";

    pub const PULL_RESPONSE: &str =
        r#"{"id":42,"title":"T","body":"B","draft":false,"tags":[{"name":"x"}]}"#;
}
