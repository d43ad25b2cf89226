use serde_json::Value;

use super::find_keyed;

/// Fields consulted, in order, when a region is given as a nested record.
const REGION_RECORD_FIELDS: [&str; 9] = [
    "code",
    "country",
    "countryCode",
    "region",
    "territory",
    "storeRegion",
    "storeCountry",
    "market",
    "locale",
];

/// Keys that mark a region-ish value anywhere inside a document.
const REGION_KEYS: [&str; 12] = [
    "region",
    "country",
    "countryCode",
    "country_code",
    "accountCountry",
    "userCountry",
    "currentCountry",
    "market",
    "territory",
    "locale",
    "storeRegion",
    "storeCountry",
];

const REGION_ALIASES: [(&str, &str); 8] = [
    ("ksa", "SA"),
    ("saudi", "SA"),
    ("uae", "AE"),
    ("uk", "GB"),
    ("usa", "US"),
    ("us", "US"),
    ("jp", "JP"),
    ("jpn", "JP"),
];

const REGIONAL_INDICATOR_OFFSET: u32 = 0x1F1E6 - 'A' as u32;

/// Normalizes a single region value: a string, or a record carrying one.
pub fn normalize_region(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => normalize_region_code(raw),
        Value::Object(record) => REGION_RECORD_FIELDS
            .iter()
            .find_map(|field| record.get(*field).and_then(Value::as_str))
            .and_then(normalize_region_code),
        _ => None,
    }
}

/// `"ar-SA"` becomes `"SA"`, known aliases map to their ISO code and short
/// alphabetic codes are uppercased. Normalizing a normalized code is a no-op.
pub fn normalize_region_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let code = trimmed.rsplit('-').next().unwrap_or(trimmed).trim();
    if code.is_empty() {
        return None;
    }

    let lowered = code.to_ascii_lowercase();
    if let Some((_, alias)) = REGION_ALIASES.iter().find(|(name, _)| *name == lowered) {
        return Some((*alias).to_string());
    }

    if code.len() <= 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        Some(code.to_string())
    }
}

/// Searches an arbitrary document for a region. A bare string is taken as
/// the region itself; otherwise only values under region-ish keys count.
pub fn dig_region(document: &Value) -> Option<String> {
    match document {
        Value::String(_) => normalize_region(document),
        _ => find_keyed(document, &REGION_KEYS, &normalize_region),
    }
}

/// Regional-indicator flag for a two-letter code, e.g. `"SA"` -> 🇸🇦.
pub fn flag_for_code(code: &str) -> Option<String> {
    let upper = code.trim().to_ascii_uppercase();
    let code = match upper.as_str() {
        "KSA" => "SA",
        "UAE" => "AE",
        other => other,
    };

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    code.chars()
        .map(|c| char::from_u32(c as u32 + REGIONAL_INDICATOR_OFFSET))
        .collect()
}

/// Display form: `"🇸🇦 SA"`, the bare code when no flag applies, or `"N/A"`.
pub fn region_pretty(region: Option<&str>) -> String {
    let Some(code) = region.and_then(normalize_region_code) else {
        return "N/A".to_string();
    };

    match flag_for_code(&code) {
        Some(flag) => format!("{flag} {code}"),
        None => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn locale_suffix_becomes_region_code() {
        assert_eq!(normalize_region_code("ar-SA").as_deref(), Some("SA"));
        assert_eq!(normalize_region_code("en-us").as_deref(), Some("US"));
        assert_eq!(normalize_region_code("zh-Hant-TW").as_deref(), Some("TW"));
    }

    #[test]
    fn aliases_map_to_iso_codes() {
        assert_eq!(normalize_region_code("uk").as_deref(), Some("GB"));
        assert_eq!(normalize_region_code("USA").as_deref(), Some("US"));
        assert_eq!(normalize_region_code(" ksa ").as_deref(), Some("SA"));
        assert_eq!(normalize_region_code("uae").as_deref(), Some("AE"));
    }

    #[test]
    fn normalization_is_idempotent_for_codes() {
        for code in ["SA", "US", "GB", "JP", "DE", "BR"] {
            let once = normalize_region_code(code).expect("code normalizes");
            assert_eq!(once, code);
            assert_eq!(normalize_region_code(&once).as_deref(), Some(code));
        }
    }

    #[test]
    fn blank_and_non_string_values_are_absent() {
        assert_eq!(normalize_region_code("   "), None);
        assert_eq!(normalize_region(&json!(42)), None);
        assert_eq!(normalize_region(&Value::Null), None);
    }

    #[test]
    fn record_values_use_field_priority() {
        let record = json!({ "locale": "ja-JP", "countryCode": "kr", "market": "us" });
        assert_eq!(normalize_region(&record).as_deref(), Some("KR"));

        let locale_only = json!({ "locale": "ja-JP" });
        assert_eq!(normalize_region(&locale_only).as_deref(), Some("JP"));
    }

    #[test]
    fn dig_region_finds_nested_keys_depth_first() {
        let profile = json!({
            "onlineId": "Falcon_77",
            "personalDetail": { "firstName": "Sam" },
            "presences": [
                { "platform": "PS5" },
                { "store": { "storeCountry": "ar-AE" } }
            ]
        });
        assert_eq!(dig_region(&profile).as_deref(), Some("AE"));
    }

    #[test]
    fn dig_region_ignores_unrelated_strings() {
        let profile = json!({ "onlineId": "Falcon_77", "aboutMe": "hello" });
        assert_eq!(dig_region(&profile), None);
    }

    #[test]
    fn dig_region_accepts_bare_strings() {
        assert_eq!(dig_region(&json!("saudi")).as_deref(), Some("SA"));
    }

    #[test]
    fn flags_only_for_two_letter_codes() {
        assert_eq!(flag_for_code("SA").as_deref(), Some("\u{1F1F8}\u{1F1E6}"));
        assert_eq!(flag_for_code("ksa").as_deref(), Some("\u{1F1F8}\u{1F1E6}"));
        assert_eq!(flag_for_code("EU1"), None);
        assert_eq!(flag_for_code("USA"), None);
    }

    #[test]
    fn pretty_region_prefixes_flag() {
        assert_eq!(region_pretty(Some("US")), "\u{1F1FA}\u{1F1F8} US");
        assert_eq!(region_pretty(Some("EU1")), "EU1");
        assert_eq!(region_pretty(None), "N/A");
    }
}
