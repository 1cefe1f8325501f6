use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Domain applied to cookies whose record does not name one
pub const DEFAULT_COOKIE_DOMAIN: &str = ".linkedin.com";

/// A single browser cookie as stored in a session file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: None,
            http_only: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Domain to inject the cookie under
    pub fn effective_domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_COOKIE_DOMAIN)
    }
}

/// Credential set read from disk, plus how many records were dropped
#[derive(Debug, Clone, Default)]
pub struct LoadedSession {
    pub cookies: Vec<SessionCookie>,
    pub rejected: usize,
}

impl LoadedSession {
    /// Number of records in the file, accepted or not
    pub fn total(&self) -> usize {
        self.cookies.len() + self.rejected
    }
}

pub struct SessionStore;

impl SessionStore {
    /// Check if a session file exists at the given path
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Read a session file, keeping every well-formed cookie record
    pub fn load(path: &Path) -> Result<LoadedSession> {
        tracing::debug!("Reading session file from: {}", path.display());

        if !Self::exists(path) {
            return Err(Error::SessionNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let records: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| Error::SessionCorrupt {
                path: path.to_path_buf(),
                source,
            })?;

        let session = Self::from_records(records);
        tracing::info!(
            "Loaded {} cookies from {} ({} rejected)",
            session.cookies.len(),
            path.display(),
            session.rejected
        );

        Ok(session)
    }

    /// Parse a session from a JSON string
    pub fn from_str(content: &str) -> Result<LoadedSession> {
        let records: Vec<serde_json::Value> =
            serde_json::from_str(content).map_err(|source| Error::SessionCorrupt {
                path: PathBuf::from("<string>"),
                source,
            })?;
        Ok(Self::from_records(records))
    }

    fn from_records(records: Vec<serde_json::Value>) -> LoadedSession {
        let mut session = LoadedSession::default();

        for (idx, record) in records.into_iter().enumerate() {
            let label = record
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or("unknown")
                .to_string();

            match serde_json::from_value::<SessionCookie>(record) {
                Ok(cookie) if cookie.name.is_empty() => {
                    tracing::warn!("Skipping cookie record {}: empty name", idx);
                    session.rejected += 1;
                }
                Ok(cookie) => session.cookies.push(cookie),
                Err(e) => {
                    tracing::warn!("Skipping cookie record {} ('{}'): {}", idx, label, e);
                    session.rejected += 1;
                }
            }
        }

        session
    }

    /// Write cookies to a session file with indentation, returning the path
    pub fn save(path: &Path, cookies: &[SessionCookie]) -> Result<PathBuf> {
        tracing::debug!("Writing session file to: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, cookies)?;
        writer.flush()?;

        tracing::info!("Saved {} cookies to {}", cookies.len(), path.display());

        Ok(path.to_path_buf())
    }
}
