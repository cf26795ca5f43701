//! Session binding for the development identity resolver.
//!
//! A production deployment puts a real authentication layer in front of the
//! API. Every layer only has to store a [`warden_core::UserIdentity`] under
//! [`SESSION_USER_KEY`]; the access middleware reads nothing else.

mod bootstrap;
mod session;

pub use bootstrap::session_bootstrap_handler;
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Absolute session creation timestamp.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
