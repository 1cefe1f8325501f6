pub mod config;
pub mod error;
pub mod session;

pub use config::{AuthStrategy, Credentials, RawSettings, SearchQuery, Settings, Timeouts};
pub use error::{Error, Result};
pub use session::{LoadedSession, SessionCookie, SessionStore};
