use serde_json::Value;

use super::collect_strings;

const DIRECT_FIELDS: [&str; 8] = [
    "avatarUrl",
    "avatar_url",
    "profileAvatarUrl",
    "profilePictureUrl",
    "profile_picture_url",
    "picture",
    "image",
    "primaryAvatarUrl",
];

const COLLECTION_FIELDS: [&str; 5] = [
    "avatars",
    "avatarUrls",
    "profilePictures",
    "images",
    "pictures",
];

const ITEM_URL_FIELDS: [&str; 3] = ["url", "href", "src"];
const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".webp"];
const SIZE_TOKENS: [&str; 4] = ["2048", "1024", "512", "256"];

fn is_absolute_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

/// Heuristic likelihood that a URL points at a profile picture.
pub fn score_avatar_url(url: &str) -> u32 {
    let lowered = url.to_ascii_lowercase();
    let has = |needle: &str| lowered.contains(needle);

    let mut score = 0;
    if has("avatar") {
        score += 3;
    }
    if has("profile") {
        score += 2;
    }
    if IMAGE_EXTENSIONS.iter().any(|&ext| has(ext)) {
        score += 2;
    }
    if has("image") || has("pic") {
        score += 1;
    }
    if has("size=") || has("w=") {
        score += 1;
    }
    if SIZE_TOKENS.iter().any(|&size| has(size)) {
        score += 1;
    }
    score
}

/// Highest scoring candidate; the first seen wins a tie.
fn best_scoring<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .into_iter()
        .fold(None, |best: Option<(&'a str, u32)>, url| {
            let score = score_avatar_url(url);
            match best {
                Some((_, top)) if top >= score => best,
                _ => Some((url, score)),
            }
        })
        .map(|(url, _)| url)
}

/// Picks the most plausible avatar URL from a profile-like document: direct
/// fields first, then known picture collections, then any URL at all.
pub fn extract_avatar_url(document: &Value) -> Option<String> {
    let record = document.as_object()?;

    let direct = DIRECT_FIELDS
        .iter()
        .filter_map(|field| record.get(*field).and_then(Value::as_str))
        .find(|url| is_absolute_url(url));
    if let Some(url) = direct {
        return Some(url.to_string());
    }

    for field in COLLECTION_FIELDS {
        let Some(items) = record.get(field).and_then(Value::as_array) else {
            continue;
        };

        let candidates = items
            .iter()
            .filter_map(|item| match item {
                Value::String(url) => Some(url.as_str()),
                Value::Object(entry) => ITEM_URL_FIELDS
                    .iter()
                    .find_map(|key| entry.get(*key).and_then(Value::as_str)),
                _ => None,
            })
            .filter(|url| is_absolute_url(url));

        if let Some(url) = best_scoring(candidates) {
            return Some(url.to_string());
        }
    }

    let mut urls = Vec::new();
    collect_strings(document, &is_absolute_url, &mut urls);
    best_scoring(urls).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scoring_rewards_avatar_markers() {
        assert_eq!(
            score_avatar_url("https://cdn.example/avatar/profile_1024.png"),
            3 + 2 + 2 + 1
        );
        assert_eq!(score_avatar_url("https://example.com/"), 0);
    }

    #[test]
    fn direct_field_wins() {
        let profile = json!({
            "avatarUrl": "https://cdn.example/a.png",
            "avatars": [{ "url": "https://cdn.example/avatar_2048.png" }]
        });
        assert_eq!(
            extract_avatar_url(&profile).as_deref(),
            Some("https://cdn.example/a.png")
        );
    }

    #[test]
    fn relative_direct_field_is_skipped() {
        let profile = json!({
            "avatarUrl": "/static/a.png",
            "avatars": [
                { "size": "s", "url": "https://cdn.example/x/small" },
                { "size": "xl", "url": "https://cdn.example/avatar/xl_1024.png" }
            ]
        });
        assert_eq!(
            extract_avatar_url(&profile).as_deref(),
            Some("https://cdn.example/avatar/xl_1024.png")
        );
    }

    #[test]
    fn collection_ties_keep_first_seen() {
        let profile = json!({
            "pictures": ["https://cdn.example/one", "https://cdn.example/two"]
        });
        assert_eq!(
            extract_avatar_url(&profile).as_deref(),
            Some("https://cdn.example/one")
        );
    }

    #[test]
    fn falls_back_to_any_url_in_document() {
        let profile = json!({
            "links": { "home": "https://example.com/home" },
            "media": [{ "thumb": "https://cdn.example/u/avatar.jpg" }],
            "note": "not a url"
        });
        assert_eq!(
            extract_avatar_url(&profile).as_deref(),
            Some("https://cdn.example/u/avatar.jpg")
        );
    }

    #[test]
    fn no_url_yields_none() {
        assert_eq!(extract_avatar_url(&json!({ "name": "x" })), None);
        assert_eq!(extract_avatar_url(&json!("https://cdn.example/a.png")), None);
    }
}
