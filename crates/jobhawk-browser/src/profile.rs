use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Chrome user-data directory for one run
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    /// Fresh directory removed when the manager is dropped
    pub fn temporary() -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("jobhawk-profile-")
            .tempdir()?
            .keep();

        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    /// Named profile kept under `~/.jobhawk/profiles`, so the browser's own
    /// login state survives between runs
    pub fn named(name: &str) -> Result<Self> {
        let root = dirs::home_dir()
            .ok_or_else(|| Error::Browser("Could not determine home directory".to_string()))?
            .join(".jobhawk")
            .join("profiles");
        Self::named_in(&root, name)
    }

    fn named_in(root: &Path, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Browser(format!("Invalid profile name: '{}'", name)));
        }

        let path = root.join(name);
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
            tracing::info!("Created profile directory {}", path.display());
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                tracing::warn!("Could not remove temporary profile {}: {}", self.path.display(), e);
            }
        }
    }
}
