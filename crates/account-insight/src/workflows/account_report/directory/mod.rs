//! Contract for the third-party account directory the reports are built from.

mod memory;

pub use memory::{AccountFixture, FixtureError, FriendFixture, InMemoryDirectory, InMemorySession};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity record returned by a profile lookup.
///
/// `profile` and `legacy_profile` are untrusted documents of arbitrary shape;
/// nothing inside them is assumed present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    pub online_id: String,
    pub account_id: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub profile: Value,
    #[serde(default)]
    pub legacy_profile: Option<Value>,
}

/// Lightweight reference to a friend of the inspected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendHandle {
    pub online_id: String,
    pub account_id: String,
}

/// Failure reported by the directory or its transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("account not found")]
    NotFound,
    #[error("access forbidden")]
    Forbidden,
    #[error("directory transport failed: {0}")]
    Transport(String),
}

/// Entry point that turns a credential token into an authenticated session.
pub trait AccountDirectory: Send + Sync {
    type Session: DirectorySession;

    fn open(&self, credential: &str) -> Result<Self::Session, DirectoryError>;
}

/// Per-request view of the directory. Calls are synchronous and any timeout
/// is the implementation's concern; it surfaces as [`DirectoryError::Transport`].
pub trait DirectorySession {
    fn fetch_profile(&self, online_id: &str) -> Result<RawProfile, DirectoryError>;
    fn fetch_region(&self, account: &RawProfile) -> Result<Value, DirectoryError>;
    fn fetch_presence(&self, account: &RawProfile) -> Result<Value, DirectoryError>;
    fn fetch_trophy_summary(&self, account: &RawProfile) -> Result<Value, DirectoryError>;
    fn fetch_titles(&self, account: &RawProfile) -> Result<Vec<Value>, DirectoryError>;
    fn fetch_friends(&self, account: &RawProfile) -> Result<Vec<FriendHandle>, DirectoryError>;
    fn fetch_friend_presence(&self, friend: &FriendHandle) -> Result<Value, DirectoryError>;
}
