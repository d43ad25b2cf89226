use tracing::debug;

use super::presence::is_online;
use crate::workflows::account_report::directory::{DirectorySession, RawProfile};

/// Upper bound on per-friend presence lookups for one report.
pub const FRIEND_PRESENCE_SAMPLE: usize = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FriendStats {
    pub total: Option<usize>,
    pub online_estimate: Option<usize>,
}

/// Friend count plus an online estimate taken from the first
/// [`FRIEND_PRESENCE_SAMPLE`] friends only. An unavailable or empty list
/// yields no stats; individual presence failures are skipped.
pub fn quick_friends_stats<S>(session: &S, account: &RawProfile) -> FriendStats
where
    S: DirectorySession + ?Sized,
{
    let friends = match session.fetch_friends(account) {
        Ok(friends) if !friends.is_empty() => friends,
        Ok(_) => return FriendStats::default(),
        Err(err) => {
            debug!(online_id = %account.online_id, error = %err, "friends list unavailable");
            return FriendStats::default();
        }
    };

    let online_estimate = friends
        .iter()
        .take(FRIEND_PRESENCE_SAMPLE)
        .filter(|friend| match session.fetch_friend_presence(friend) {
            Ok(presence) => is_online(&presence),
            Err(err) => {
                debug!(friend = %friend.online_id, error = %err, "skipping friend presence");
                false
            }
        })
        .count();

    FriendStats {
        total: Some(friends.len()),
        online_estimate: Some(online_estimate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::account_report::directory::{DirectoryError, FriendHandle};
    use serde_json::{json, Value};
    use std::cell::Cell;

    struct FriendsOnly {
        friends: Result<Vec<FriendHandle>, DirectoryError>,
        presence_calls: Cell<usize>,
    }

    impl FriendsOnly {
        fn with_friends(count: usize) -> Self {
            let friends = (0..count)
                .map(|index| FriendHandle {
                    online_id: format!("friend-{index}"),
                    account_id: index.to_string(),
                })
                .collect();
            Self {
                friends: Ok(friends),
                presence_calls: Cell::new(0),
            }
        }
    }

    impl DirectorySession for FriendsOnly {
        fn fetch_profile(&self, _online_id: &str) -> Result<RawProfile, DirectoryError> {
            Err(DirectoryError::NotFound)
        }
        fn fetch_region(&self, _account: &RawProfile) -> Result<Value, DirectoryError> {
            Err(DirectoryError::NotFound)
        }
        fn fetch_presence(&self, _account: &RawProfile) -> Result<Value, DirectoryError> {
            Err(DirectoryError::NotFound)
        }
        fn fetch_trophy_summary(&self, _account: &RawProfile) -> Result<Value, DirectoryError> {
            Err(DirectoryError::NotFound)
        }
        fn fetch_titles(&self, _account: &RawProfile) -> Result<Vec<Value>, DirectoryError> {
            Err(DirectoryError::NotFound)
        }
        fn fetch_friends(&self, _account: &RawProfile) -> Result<Vec<FriendHandle>, DirectoryError> {
            self.friends.clone()
        }
        fn fetch_friend_presence(&self, friend: &FriendHandle) -> Result<Value, DirectoryError> {
            self.presence_calls.set(self.presence_calls.get() + 1);
            let index: usize = friend.account_id.parse().unwrap_or(0);
            match index % 3 {
                0 => Ok(json!({ "availability": "online" })),
                1 => Ok(json!({ "availability": "offline" })),
                _ => Err(DirectoryError::Transport("timeout".to_string())),
            }
        }
    }

    fn account() -> RawProfile {
        RawProfile {
            online_id: "target".to_string(),
            account_id: "1".to_string(),
            avatar_url: None,
            profile: Value::Null,
            legacy_profile: None,
        }
    }

    #[test]
    fn samples_at_most_fifteen_friends() {
        let session = FriendsOnly::with_friends(40);
        let stats = quick_friends_stats(&session, &account());

        assert_eq!(stats.total, Some(40));
        // indices 0, 3, 6, 9, 12 are online within the first fifteen
        assert_eq!(stats.online_estimate, Some(5));
        assert_eq!(session.presence_calls.get(), FRIEND_PRESENCE_SAMPLE);
    }

    #[test]
    fn presence_failures_are_skipped() {
        let session = FriendsOnly::with_friends(3);
        let stats = quick_friends_stats(&session, &account());
        assert_eq!(stats.total, Some(3));
        assert_eq!(stats.online_estimate, Some(1));
    }

    #[test]
    fn private_or_empty_lists_yield_no_stats() {
        let private = FriendsOnly {
            friends: Err(DirectoryError::Forbidden),
            presence_calls: Cell::new(0),
        };
        assert_eq!(quick_friends_stats(&private, &account()), FriendStats::default());

        let empty = FriendsOnly::with_friends(0);
        assert_eq!(quick_friends_stats(&empty, &account()), FriendStats::default());
    }
}
