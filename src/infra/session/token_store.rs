use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::usecase::ports::token_store::TokenStore;

#[derive(Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RefCell::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// `session.json` next to the rest of the app's per-user data.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_session_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "umrah", "umrah-admin")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("session.json"))
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str::<StoredSession>(&text)
            .ok()
            .map(|session| session.token)
            .filter(|token| !token.trim().is_empty())
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
        }
        let body = serde_json::to_string(&StoredSession {
            token: token.to_string(),
        })
        .context("failed to serialize session")?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("failed to write session: {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove session: {}", self.path.display())),
        }
    }
}
