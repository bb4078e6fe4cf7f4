use crate::{SessionError, SessionResult, SessionStore, StoredSession};

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};

const BACKUP_DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// JSON session file, written atomically.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move an unreadable session file aside so the next save starts clean.
    fn backup_corrupted(&self) -> Option<PathBuf> {
        let file_name = self.path.file_name()?.to_string_lossy().into_owned();
        let timestamp = Utc::now().format(BACKUP_DATE_FORMAT);
        let backup_path = self
            .path
            .with_file_name(format!("{file_name}.corrupted.{timestamp}"));

        match fs::rename(&self.path, &backup_path) {
            Ok(()) => {
                warn!("Backed up corrupted session file to {backup_path:?}");
                Some(backup_path)
            }
            Err(e) => {
                warn!("Failed to back up corrupted session file {:?}: {e}", self.path);
                None
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionResult<StoredSession> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session file at {:?}", self.path);
                return Ok(StoredSession::default());
            }
            Err(e) => return Err(SessionError::store_read(self.path.clone(), e)),
        };

        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!("Session file corrupted at {:?}: {e}", self.path);
                self.backup_corrupted();
                Ok(StoredSession::default())
            }
        }
    }

    /// Write to a temp file, fsync, then rename over the session file.
    fn save(&self, session: &StoredSession) -> SessionResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| SessionError::store_write(dir.to_path_buf(), e))?;
        }

        let mut session = session.clone();
        session.saved_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(&session)?;

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("session.json"));
        let temp_path = self
            .path
            .with_file_name(format!("{file_name}.tmp.{}", std::process::id()));

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| SessionError::store_write(temp_path.clone(), e))?;

            file.write_all(json.as_bytes())
                .map_err(|e| SessionError::store_write(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| SessionError::store_write(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SessionError::atomic_rename(temp_path, self.path.clone(), e)
        })?;

        debug!("Saved session to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::store_write(self.path.clone(), e)),
        }
    }
}
