use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::{AccountDirectory, DirectoryError, DirectorySession, FriendHandle, RawProfile};

/// One account as stored in a fixture document.
///
/// Missing `titles` or `friends` model a private list and are reported as
/// [`DirectoryError::Forbidden`]; other missing blobs are reported as
/// [`DirectoryError::NotFound`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountFixture {
    pub online_id: String,
    pub account_id: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub profile: Value,
    #[serde(default)]
    pub legacy_profile: Option<Value>,
    #[serde(default)]
    pub region: Option<Value>,
    #[serde(default)]
    pub presence: Option<Value>,
    #[serde(default)]
    pub trophy_summary: Option<Value>,
    #[serde(default)]
    pub titles: Option<Vec<Value>>,
    #[serde(default)]
    pub friends: Option<Vec<FriendFixture>>,
    #[serde(default)]
    pub forbidden: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendFixture {
    pub online_id: String,
    pub account_id: String,
    #[serde(default)]
    pub presence: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    accounts: Vec<AccountFixture>,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read directory fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid directory fixture: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
struct DirectoryData {
    accounts: HashMap<String, AccountFixture>,
    friend_presence: HashMap<String, Value>,
}

/// Directory backed by fixture accounts held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    data: Arc<DirectoryData>,
    required_credential: Option<String>,
}

impl InMemoryDirectory {
    pub fn with_accounts(accounts: impl IntoIterator<Item = AccountFixture>) -> Self {
        let mut data = DirectoryData::default();
        for account in accounts {
            for friend in account.friends.iter().flatten() {
                if let Some(presence) = &friend.presence {
                    data.friend_presence
                        .insert(friend.account_id.clone(), presence.clone());
                }
            }
            data.accounts
                .insert(account.online_id.to_ascii_lowercase(), account);
        }

        Self {
            data: Arc::new(data),
            required_credential: None,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FixtureError> {
        let document: FixtureDocument = serde_json::from_str(raw)?;
        Ok(Self::with_accounts(document.accounts))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Rejects sessions opened with any other credential.
    pub fn require_credential(mut self, credential: impl Into<String>) -> Self {
        self.required_credential = Some(credential.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.accounts.is_empty()
    }
}

impl AccountDirectory for InMemoryDirectory {
    type Session = InMemorySession;

    fn open(&self, credential: &str) -> Result<Self::Session, DirectoryError> {
        match &self.required_credential {
            Some(expected) if expected != credential => Err(DirectoryError::Forbidden),
            _ => Ok(InMemorySession {
                data: Arc::clone(&self.data),
            }),
        }
    }
}

pub struct InMemorySession {
    data: Arc<DirectoryData>,
}

impl InMemorySession {
    fn account(&self, account: &RawProfile) -> Result<&AccountFixture, DirectoryError> {
        self.data
            .accounts
            .get(&account.online_id.to_ascii_lowercase())
            .ok_or(DirectoryError::NotFound)
    }
}

impl DirectorySession for InMemorySession {
    fn fetch_profile(&self, online_id: &str) -> Result<RawProfile, DirectoryError> {
        let fixture = self
            .data
            .accounts
            .get(&online_id.trim().to_ascii_lowercase())
            .ok_or(DirectoryError::NotFound)?;

        if fixture.forbidden {
            return Err(DirectoryError::Forbidden);
        }

        Ok(RawProfile {
            online_id: fixture.online_id.clone(),
            account_id: fixture.account_id.clone(),
            avatar_url: fixture.avatar_url.clone(),
            profile: fixture.profile.clone(),
            legacy_profile: fixture.legacy_profile.clone(),
        })
    }

    fn fetch_region(&self, account: &RawProfile) -> Result<Value, DirectoryError> {
        self.account(account)?
            .region
            .clone()
            .ok_or(DirectoryError::NotFound)
    }

    fn fetch_presence(&self, account: &RawProfile) -> Result<Value, DirectoryError> {
        self.account(account)?
            .presence
            .clone()
            .ok_or(DirectoryError::NotFound)
    }

    fn fetch_trophy_summary(&self, account: &RawProfile) -> Result<Value, DirectoryError> {
        self.account(account)?
            .trophy_summary
            .clone()
            .ok_or(DirectoryError::NotFound)
    }

    fn fetch_titles(&self, account: &RawProfile) -> Result<Vec<Value>, DirectoryError> {
        self.account(account)?
            .titles
            .clone()
            .ok_or(DirectoryError::Forbidden)
    }

    fn fetch_friends(&self, account: &RawProfile) -> Result<Vec<FriendHandle>, DirectoryError> {
        let friends = self
            .account(account)?
            .friends
            .as_ref()
            .ok_or(DirectoryError::Forbidden)?;

        Ok(friends
            .iter()
            .map(|friend| FriendHandle {
                online_id: friend.online_id.clone(),
                account_id: friend.account_id.clone(),
            })
            .collect())
    }

    fn fetch_friend_presence(&self, friend: &FriendHandle) -> Result<Value, DirectoryError> {
        if let Some(presence) = self.data.friend_presence.get(&friend.account_id) {
            return Ok(presence.clone());
        }

        self.data
            .accounts
            .get(&friend.online_id.to_ascii_lowercase())
            .and_then(|account| account.presence.clone())
            .ok_or(DirectoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXTURE: &str = r#"{
        "accounts": [
            {
                "online_id": "Falcon_77",
                "account_id": "7394829103847561234",
                "presence": { "availability": "online" },
                "titles": [],
                "friends": [
                    { "online_id": "wren", "account_id": "11", "presence": { "availability": "online" } },
                    { "online_id": "Quiet_Owl", "account_id": "12" }
                ]
            },
            {
                "online_id": "Quiet_Owl",
                "account_id": "12",
                "presence": { "availability": "offline" }
            },
            { "online_id": "locked", "account_id": "13", "forbidden": true }
        ]
    }"#;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::from_json_str(FIXTURE).expect("fixture parses")
    }

    #[test]
    fn profile_lookup_is_case_insensitive() {
        let session = directory().open("token").expect("session opens");
        let profile = session.fetch_profile("falcon_77").expect("profile found");
        assert_eq!(profile.online_id, "Falcon_77");
        assert_eq!(profile.account_id, "7394829103847561234");
    }

    #[test]
    fn unknown_and_forbidden_accounts_map_to_directory_errors() {
        let session = directory().open("token").expect("session opens");
        assert_eq!(
            session.fetch_profile("nobody"),
            Err(DirectoryError::NotFound)
        );
        assert_eq!(
            session.fetch_profile("locked"),
            Err(DirectoryError::Forbidden)
        );
    }

    #[test]
    fn missing_lists_are_reported_as_private() {
        let session = directory().open("token").expect("session opens");
        let owl = session.fetch_profile("quiet_owl").expect("profile found");
        assert_eq!(session.fetch_titles(&owl), Err(DirectoryError::Forbidden));
        assert_eq!(session.fetch_friends(&owl), Err(DirectoryError::Forbidden));
        assert_eq!(
            session.fetch_trophy_summary(&owl),
            Err(DirectoryError::NotFound)
        );
    }

    #[test]
    fn friend_presence_prefers_inline_then_account_record() {
        let session = directory().open("token").expect("session opens");
        let falcon = session.fetch_profile("falcon_77").expect("profile found");
        let friends = session.fetch_friends(&falcon).expect("friends listed");
        assert_eq!(friends.len(), 2);

        assert_eq!(
            session.fetch_friend_presence(&friends[0]),
            Ok(json!({ "availability": "online" }))
        );
        assert_eq!(
            session.fetch_friend_presence(&friends[1]),
            Ok(json!({ "availability": "offline" }))
        );
    }

    #[test]
    fn required_credential_rejects_other_tokens() {
        let directory = directory().require_credential("expected");
        assert!(directory.open("expected").is_ok());
        assert!(matches!(
            directory.open("other"),
            Err(DirectoryError::Forbidden)
        ));
    }

    #[test]
    fn malformed_fixture_is_rejected() {
        let error = InMemoryDirectory::from_json_str("{ not json").expect_err("invalid json");
        assert!(matches!(error, FixtureError::Json(_)));
    }
}
