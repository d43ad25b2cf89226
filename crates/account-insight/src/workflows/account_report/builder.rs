use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::cache::ReportCache;
use super::directory::{AccountDirectory, DirectoryError, DirectorySession, RawProfile};
use super::normalize::{
    account_hex, current_title, dig_region, extract_avatar_url, normalize_region,
    parse_trophy_summary, presence_text, quick_friends_stats, region_pretty,
};
use super::scoring::{score_account, ActivitySegment};
use super::views::AccountReport;

/// Shortest credential token accepted before the directory is contacted.
pub const MIN_CREDENTIAL_LEN: usize = 40;

/// Reasons a report could not be produced. The messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("invalid credential token (fewer than {MIN_CREDENTIAL_LEN} characters)")]
    InvalidCredential,
    #[error("account not found; check the online id")]
    TargetNotFound,
    #[error("access denied by the account directory; check the credential or try again later")]
    AccessForbidden,
    #[error("account directory error: {0}")]
    Upstream(String),
}

impl From<DirectoryError> for ReportError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound => Self::TargetNotFound,
            DirectoryError::Forbidden => Self::AccessForbidden,
            DirectoryError::Transport(detail) => Self::Upstream(detail),
        }
    }
}

/// Cache key for a target account as seen through one credential. Only a
/// digest of the credential is kept.
pub fn cache_key(online_id: &str, credential: &str) -> String {
    let digest = Sha256::digest(credential.as_bytes());
    let fingerprint: String = digest
        .iter()
        .take(8)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    format!("web_report:{}:{fingerprint}", online_id.trim().to_ascii_lowercase())
}

/// Single entry point used by the web layer to inspect an account.
///
/// Successful reports are cached; failures never are. Apart from the profile
/// lookup, every directory failure degrades its field to absent.
pub struct AccountReportBuilder<D> {
    directory: Arc<D>,
    cache: Arc<ReportCache>,
}

impl<D> AccountReportBuilder<D>
where
    D: AccountDirectory,
{
    pub fn new(directory: Arc<D>, cache: Arc<ReportCache>) -> Self {
        Self { directory, cache }
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    pub fn build(
        &self,
        online_id: &str,
        credential: &str,
    ) -> Result<Arc<AccountReport>, ReportError> {
        if credential.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(ReportError::InvalidCredential);
        }

        let online_id = online_id.trim();
        let key = cache_key(online_id, credential);
        if let Some(report) = self.cache.get(&key) {
            debug!(online_id, "account report served from cache");
            return Ok(report);
        }

        let session = self.directory.open(credential).map_err(|err| {
            warn!(online_id, error = %err, "failed to open account directory session");
            ReportError::from(err)
        })?;

        let profile = session.fetch_profile(online_id).map_err(|err| {
            warn!(online_id, error = %err, "profile lookup failed");
            ReportError::from(err)
        })?;

        let report = Arc::new(assemble_report(&session, online_id, &profile));
        info!(
            online_id = %report.online_id,
            value_score = report.value_score,
            risk_level = report.risk_level.label(),
            "account report built"
        );

        self.cache.set(key, Arc::clone(&report));
        Ok(report)
    }
}

fn assemble_report<S>(session: &S, requested_id: &str, profile: &RawProfile) -> AccountReport
where
    S: DirectorySession,
{
    let region = resolve_region(session, profile);

    let presence_raw = optional(profile, "presence", session.fetch_presence(profile));
    let presence = presence_raw.as_ref().and_then(presence_text);
    let current_title = presence_raw.as_ref().and_then(current_title);

    let trophies = optional(profile, "trophy summary", session.fetch_trophy_summary(profile))
        .map(|summary| parse_trophy_summary(&summary))
        .unwrap_or_default();

    let titles_count =
        optional(profile, "titles", session.fetch_titles(profile)).map(|titles| titles.len());
    let friends = quick_friends_stats(session, profile);

    let score = score_account(
        &trophies,
        titles_count,
        friends.total,
        presence.as_deref(),
        region.as_deref(),
    );
    let activity = ActivitySegment::from_total_trophies(trophies.total);

    let online_id = if profile.online_id.trim().is_empty() {
        requested_id.to_string()
    } else {
        profile.online_id.clone()
    };

    AccountReport {
        online_id,
        account_id: profile.account_id.clone(),
        account_hex: account_hex(&profile.account_id),
        region_pretty: region_pretty(region.as_deref()),
        region,
        avatar_url: resolve_avatar(profile),
        presence,
        presence_raw,
        current_title,
        trophy_summary: trophies.summary_line(),
        trophies,
        titles_count,
        friends_total: friends.total,
        friends_online_estimate: friends.online_estimate,
        value_score: score.value_score,
        value_segment: score.value_segment,
        value_segment_label: score.value_segment.label(),
        value_components: score.components,
        activity_segment: activity,
        activity_segment_label: activity.label(),
        risk_level: score.risk_level,
        risk_level_label: score.risk_level.label(),
        risk_notes: score
            .risk_flags
            .iter()
            .map(|flag| flag.description())
            .collect(),
        risk_flags: score.risk_flags,
        generated_at: Utc::now(),
    }
}

fn optional<T>(profile: &RawProfile, field: &str, result: Result<T, DirectoryError>) -> Option<T> {
    result
        .map_err(|err| {
            debug!(online_id = %profile.online_id, field, error = %err, "field unavailable");
        })
        .ok()
}

/// Dedicated region lookup first, then the profile documents. The lookup may
/// return the region record itself, so its own fields are read before the
/// deep search.
fn resolve_region<S>(session: &S, profile: &RawProfile) -> Option<String>
where
    S: DirectorySession,
{
    optional(profile, "region", session.fetch_region(profile))
        .and_then(|region| normalize_region(&region).or_else(|| dig_region(&region)))
        .or_else(|| dig_region(&profile.profile))
        .or_else(|| profile.legacy_profile.as_ref().and_then(dig_region))
}

fn resolve_avatar(profile: &RawProfile) -> Option<String> {
    profile
        .avatar_url
        .as_deref()
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
        .map(str::to_string)
        .or_else(|| extract_avatar_url(&profile.profile))
        .or_else(|| {
            profile
                .legacy_profile
                .as_ref()
                .and_then(extract_avatar_url)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::account_report::directory::{AccountFixture, InMemoryDirectory};
    use crate::workflows::account_report::scoring::RiskFlag;
    use serde_json::json;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    fn build_with_region(region: serde_json::Value) -> Arc<AccountReport> {
        let directory = InMemoryDirectory::with_accounts([AccountFixture {
            online_id: "ghost".to_string(),
            account_id: "77".to_string(),
            region: Some(region),
            ..AccountFixture::default()
        }]);
        let cache = Arc::new(ReportCache::new(
            NonZeroUsize::new(4).expect("non-zero capacity"),
            Duration::from_secs(90),
        ));
        AccountReportBuilder::new(Arc::new(directory), cache)
            .build("ghost", &"c".repeat(MIN_CREDENTIAL_LEN))
            .expect("report builds")
    }

    #[test]
    fn region_record_from_lookup_is_resolved() {
        let report = build_with_region(json!({ "code": "SA" }));
        assert_eq!(report.region.as_deref(), Some("SA"));
        assert_eq!(report.region_pretty, "\u{1F1F8}\u{1F1E6} SA");
        assert!(!report.risk_flags.contains(&RiskFlag::RegionUnresolved));
    }

    #[test]
    fn region_lookup_falls_back_to_nested_keys() {
        let report = build_with_region(json!({ "account": { "storeCountry": "en-uk" } }));
        assert_eq!(report.region.as_deref(), Some("GB"));
    }

    #[test]
    fn cache_key_hides_credential_and_normalizes_id() {
        let credential = "c".repeat(64);
        let key = cache_key(" Falcon_77 ", &credential);
        assert!(key.starts_with("web_report:falcon_77:"));
        assert!(!key.contains(&credential));
        assert_eq!(key, cache_key("falcon_77", &credential));
        assert_ne!(key, cache_key("falcon_77", &"d".repeat(64)));
    }

    #[test]
    fn directory_errors_map_to_report_errors() {
        assert_eq!(
            ReportError::from(DirectoryError::NotFound),
            ReportError::TargetNotFound
        );
        assert_eq!(
            ReportError::from(DirectoryError::Forbidden),
            ReportError::AccessForbidden
        );
        assert_eq!(
            ReportError::from(DirectoryError::Transport("reset".to_string())),
            ReportError::Upstream("reset".to_string())
        );
    }
}
