mod chrome_finder;
mod chromium;
pub mod driver;
mod error;
mod launcher;
mod profile;
pub mod wait;

pub use chrome_finder::ChromeFinder;
pub use chromium::ChromiumDriver;
pub use driver::{BrowserDriver, ElementState, Locator};
pub use error::{Error, Result};
pub use launcher::{ChromiumLauncher, LaunchOptions};
pub use profile::ProfileManager;
pub use wait::{Condition, Waiter};
