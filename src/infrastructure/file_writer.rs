// src/infrastructure/file_writer.rs
use crate::constants::{LOCK_MAX_ATTEMPTS, LOCK_STALE_SECS, LOCK_SUFFIX, LOCK_WAIT_MS};
use crate::domain::SyncError;
use crate::util::process::process_alive;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

/// Read markdown file content
pub fn read_document(path: impl AsRef<Path>) -> Result<String, SyncError> {
    Ok(fs::read_to_string(path.as_ref())?)
}

/// Replace the document atomically: write a sibling temp file, then rename it over.
#[instrument(level = "debug", skip(content))]
pub fn write_document(path: &Path, content: &str) -> Result<(), SyncError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    // Carry over permissions of the existing file
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }

    tmp.persist(path).map_err(|e| SyncError::Io(e.error))?;
    debug!(bytes = content.len(), "Wrote document");
    Ok(())
}

/// Lock file path for a document
pub fn lock_file_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(LOCK_SUFFIX);
    path.with_file_name(name)
}

/// A lock is stale when the process that wrote it is gone. Without a readable
/// PID, fall back to the age of the file.
fn lock_is_stale(lock_path: &Path) -> bool {
    if let Ok(content) = fs::read_to_string(lock_path) {
        if let Ok(pid) = content.trim().parse::<u32>() {
            return !process_alive(pid);
        }
    }

    fs::metadata(lock_path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .map(|age| age > Duration::from_secs(LOCK_STALE_SECS))
        .unwrap_or(false)
}

/// Guard that releases the document lock when dropped.
#[derive(Debug)]
pub struct DocumentLock {
    path: PathBuf,
}

impl DocumentLock {
    /// Acquire the lock for `document`, waiting briefly if another operation holds it.
    pub fn acquire(document: &Path) -> Result<Self, SyncError> {
        let lock_path = lock_file_path(document);
        let mut attempts = 0;

        loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(mut file) => {
                    let _ = writeln!(file, "{}", std::process::id());
                    debug!(path = ?lock_path, "Acquired document lock");
                    return Ok(Self { path: lock_path });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    attempts += 1;
                    if lock_is_stale(&lock_path) {
                        warn!(path = ?lock_path, "Removing stale document lock");
                        match fs::remove_file(&lock_path) {
                            Ok(()) => continue,
                            // Another process cleaned it up first
                            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                            Err(e) => return Err(SyncError::Io(e)),
                        }
                    }
                    if attempts >= LOCK_MAX_ATTEMPTS {
                        return Err(SyncError::Locked(format!(
                            "{} (remove {} if no sync is running)",
                            document.display(),
                            lock_path.display()
                        )));
                    }
                    std::thread::sleep(Duration::from_millis(LOCK_WAIT_MS));
                }
                Err(e) => return Err(SyncError::Io(e)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
