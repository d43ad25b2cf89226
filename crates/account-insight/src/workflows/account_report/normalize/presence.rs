use serde_json::Value;

use super::first_text;

const AVAILABILITY_KEYS: [&str; 2] = ["availability", "onlineStatus"];

/// Pipe-joined status line: availability, platform, then the current title.
/// Returns `None` when the presence blob is not a mapping.
pub fn presence_text(presence: &Value) -> Option<String> {
    if !presence.is_object() {
        return None;
    }

    let mut line = first_text(presence, &AVAILABILITY_KEYS)
        .unwrap_or("unknown")
        .to_string();

    let platform = presence
        .get("primaryPlatformInfo")
        .and_then(|info| first_text(info, &["platform"]))
        .or_else(|| first_text(presence, &["platform"]));
    if let Some(platform) = platform {
        line.push_str(" | ");
        line.push_str(platform);
    }

    if let Some(title) = current_title(presence) {
        line.push_str(" | Playing: ");
        line.push_str(&title);
    }

    Some(line)
}

/// Title of the first entry in the presence game list.
pub fn current_title(presence: &Value) -> Option<String> {
    let first = presence.get("gameTitleInfoList")?.as_array()?.first()?;
    first_text(first, &["titleName", "name"]).map(str::to_string)
}

pub fn is_online(presence: &Value) -> bool {
    first_text(presence, &AVAILABILITY_KEYS)
        .is_some_and(|status| status.trim().eq_ignore_ascii_case("online"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_presence_renders_all_parts() {
        let presence = json!({
            "availability": "online",
            "platform": "PS5",
            "gameTitleInfoList": [{ "titleName": "Game X" }, { "titleName": "Game Y" }]
        });
        assert_eq!(
            presence_text(&presence).as_deref(),
            Some("online | PS5 | Playing: Game X")
        );
        assert_eq!(current_title(&presence).as_deref(), Some("Game X"));
    }

    #[test]
    fn nested_platform_and_status_fallbacks() {
        let presence = json!({
            "onlineStatus": "offline",
            "primaryPlatformInfo": { "platform": "PS4", "onlineStatus": "offline" },
            "gameTitleInfoList": [{ "name": "Legacy Title" }]
        });
        assert_eq!(
            presence_text(&presence).as_deref(),
            Some("offline | PS4 | Playing: Legacy Title")
        );
    }

    #[test]
    fn empty_mapping_defaults_to_unknown() {
        assert_eq!(presence_text(&json!({})).as_deref(), Some("unknown"));
        assert_eq!(current_title(&json!({ "gameTitleInfoList": [] })), None);
    }

    #[test]
    fn non_mapping_presence_is_unresolved() {
        assert_eq!(presence_text(&Value::Null), None);
        assert_eq!(presence_text(&json!(["online"])), None);
        assert_eq!(current_title(&Value::Null), None);
    }

    #[test]
    fn online_detection_accepts_either_status_key() {
        assert!(is_online(&json!({ "availability": "online" })));
        assert!(is_online(&json!({ "onlineStatus": "ONLINE" })));
        assert!(!is_online(&json!({ "availability": "offline" })));
        assert!(!is_online(&json!({})));
    }
}
