use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Executable names tried on `PATH` when no install location matches
const BINARY_NAMES: [&str; 4] = [
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Resolves the Chrome or Chromium binary the session is launched from
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// An explicit path must be valid. Otherwise the platform install
    /// locations are tried first, then the usual names on `PATH`.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(path) = &self.custom_path {
            return Self::validate(path);
        }

        let locations = Self::install_locations();
        let found = locations
            .iter()
            .find_map(|p| Self::validate(p).ok())
            .or_else(Self::search_path);

        match found {
            Some(path) => {
                tracing::debug!("Using Chrome at {}", path.display());
                Ok(path)
            }
            None => Err(Error::ChromeNotFound(format!(
                "checked {} and {} on PATH",
                locations
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                BINARY_NAMES.join(", ")
            ))),
        }
    }

    fn search_path() -> Option<PathBuf> {
        BINARY_NAMES
            .iter()
            .find_map(|name| which::which(name).ok())
            .and_then(|path| Self::validate(&path).ok())
    }

    fn install_locations() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/opt/google/chrome/chrome"),
            PathBuf::from("/snap/bin/chromium"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }

    fn validate(path: &Path) -> Result<PathBuf> {
        if !path.is_file() {
            return Err(Error::ChromeNotFound(path.display().to_string()));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(path)?.permissions().mode();
            if mode & 0o111 == 0 {
                return Err(Error::Browser(format!(
                    "{} is not executable",
                    path.display()
                )));
            }
        }

        Ok(path.to_path_buf())
    }
}
