//! Best-effort extraction of canonical values from loosely shaped directory
//! documents. Every normalizer is total: malformed input yields `None`.

mod account;
mod avatar;
mod friends;
mod presence;
mod region;
mod trophies;

pub use account::account_hex;
pub use avatar::{extract_avatar_url, score_avatar_url};
pub use friends::{quick_friends_stats, FriendStats, FRIEND_PRESENCE_SAMPLE};
pub use presence::{current_title, is_online, presence_text};
pub use region::{dig_region, flag_for_code, normalize_region, normalize_region_code, region_pretty};
pub use trophies::{parse_trophy_summary, TrophyStats};

use serde_json::Value;

/// Depth-first search for the first value stored under one of `keys` that
/// `handler` accepts. Keys of a mapping are checked before its children are
/// visited.
pub(crate) fn find_keyed<T, F>(value: &Value, keys: &[&str], handler: &F) -> Option<T>
where
    F: Fn(&Value) -> Option<T>,
{
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| keys.contains(&key.as_str()))
            .find_map(|(_, nested)| handler(nested))
            .or_else(|| {
                map.values()
                    .find_map(|nested| find_keyed(nested, keys, handler))
            }),
        Value::Array(items) => items
            .iter()
            .find_map(|item| find_keyed(item, keys, handler)),
        _ => None,
    }
}

/// Collects every string in the tree accepted by `accept`, in document order.
pub(crate) fn collect_strings<'a, F>(value: &'a Value, accept: &F, found: &mut Vec<&'a str>)
where
    F: Fn(&str) -> bool,
{
    match value {
        Value::String(text) if accept(text) => found.push(text),
        Value::Object(map) => {
            for nested in map.values() {
                collect_strings(nested, accept, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_strings(item, accept, found);
            }
        }
        _ => {}
    }
}

/// First non-empty string stored under one of `keys`.
pub(crate) fn first_text<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
}
