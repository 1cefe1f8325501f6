pub mod check_auth;
pub mod completion;
pub mod config;
pub mod export;
pub mod run;
pub mod session;
