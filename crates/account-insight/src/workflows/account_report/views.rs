use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::normalize::TrophyStats;
use super::scoring::{ActivitySegment, RiskFlag, RiskLevel, ValueComponent, ValueSegment};
use super::ReportError;

/// Flattened, reviewer-facing summary of one account. Immutable once built;
/// every field that could not be extracted is simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub online_id: String,
    pub account_id: String,
    pub account_hex: Option<String>,
    pub region: Option<String>,
    pub region_pretty: String,
    pub avatar_url: Option<String>,
    pub presence: Option<String>,
    pub presence_raw: Option<Value>,
    pub current_title: Option<String>,
    pub trophy_summary: Option<String>,
    pub trophies: TrophyStats,
    pub titles_count: Option<usize>,
    pub friends_total: Option<usize>,
    pub friends_online_estimate: Option<usize>,
    pub value_score: u8,
    pub value_segment: ValueSegment,
    pub value_segment_label: &'static str,
    pub value_components: Vec<ValueComponent>,
    pub activity_segment: ActivitySegment,
    pub activity_segment_label: &'static str,
    pub risk_level: RiskLevel,
    pub risk_level_label: &'static str,
    pub risk_flags: Vec<RiskFlag>,
    pub risk_notes: Vec<&'static str>,
    pub generated_at: DateTime<Utc>,
}

/// Wire shape handed to the web layer: `{ "ok": true, ...report }` or
/// `{ "ok": false, "message": ... }`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportEnvelope {
    Ready {
        ok: bool,
        #[serde(flatten)]
        report: AccountReport,
    },
    Failed {
        ok: bool,
        message: String,
    },
}

impl ReportEnvelope {
    pub fn ready(report: AccountReport) -> Self {
        Self::Ready { ok: true, report }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            ok: false,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

impl From<Result<Arc<AccountReport>, ReportError>> for ReportEnvelope {
    fn from(result: Result<Arc<AccountReport>, ReportError>) -> Self {
        match result {
            Ok(report) => Self::ready(Arc::unwrap_or_clone(report)),
            Err(err) => Self::failed(err.to_string()),
        }
    }
}
