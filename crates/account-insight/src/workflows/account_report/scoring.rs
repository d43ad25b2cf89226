//! Fixed business heuristics that summarize an account for a reviewer.

use serde::Serialize;

use super::normalize::TrophyStats;

/// Ascending thresholds, checked from the top; the first match awards its points.
type Buckets = [(i64, u8); 4];

const LEVEL_BUCKETS: Buckets = [(400, 4), (250, 3), (100, 2), (50, 1)];
const TOTAL_TROPHY_BUCKETS: Buckets = [(5000, 4), (2500, 3), (1000, 2), (300, 1)];
const PLATINUM_BUCKETS: Buckets = [(50, 4), (20, 3), (5, 2), (1, 1)];
const TITLE_BUCKETS: Buckets = [(150, 4), (80, 3), (40, 2), (10, 1)];
const FRIEND_BUCKETS: [(i64, u8); 3] = [(200, 3), (80, 2), (30, 1)];

pub const MAX_VALUE_SCORE: u8 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFactor {
    PlayerLevel,
    TotalTrophies,
    Platinum,
    Titles,
    Friends,
}

/// Points awarded by a single factor, kept for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueComponent {
    pub factor: ValueFactor,
    pub input: i64,
    pub points: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSegment {
    Distinguished,
    Strong,
    Average,
    Basic,
    InsufficientData,
}

impl ValueSegment {
    pub fn from_score(score: u8) -> Self {
        match score {
            12.. => Self::Distinguished,
            8.. => Self::Strong,
            4.. => Self::Average,
            1.. => Self::Basic,
            0 => Self::InsufficientData,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Distinguished => "distinguished/rare",
            Self::Strong => "strong",
            Self::Average => "average",
            Self::Basic => "basic",
            Self::InsufficientData => "insufficient data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySegment {
    WeakOrNew,
    Light,
    Good,
    Heavy,
}

impl ActivitySegment {
    /// Derived from the total trophy count alone.
    pub fn from_total_trophies(total: Option<i64>) -> Self {
        match total.unwrap_or(0) {
            i64::MIN..=0 => Self::WeakOrNew,
            1..=299 => Self::Light,
            300..=1499 => Self::Good,
            _ => Self::Heavy,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::WeakOrNew => "weak/very new",
            Self::Light => "light",
            Self::Good => "good",
            Self::Heavy => "high/heavy player",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    RegionUnresolved,
    TitlesUnavailable,
    FriendsUnavailable,
    PresenceHidden,
}

impl RiskFlag {
    pub const fn description(self) -> &'static str {
        match self {
            Self::RegionUnresolved => "account region could not be determined",
            Self::TitlesUnavailable => "title list unavailable (possibly private)",
            Self::FriendsUnavailable => "friends list unavailable (possibly private)",
            Self::PresenceHidden => "no clear online status (presence may be hidden)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_flag_count(count: usize) -> Self {
        match count {
            0 => Self::Low,
            1 | 2 => Self::Medium,
            _ => Self::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountScore {
    pub value_score: u8,
    pub value_segment: ValueSegment,
    pub risk_level: RiskLevel,
    pub risk_flags: Vec<RiskFlag>,
    pub components: Vec<ValueComponent>,
}

fn bucket(value: i64, buckets: &[(i64, u8)]) -> u8 {
    buckets
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(0, |(_, points)| *points)
}

fn count_input(count: Option<usize>) -> i64 {
    count.map_or(0, |count| i64::try_from(count).unwrap_or(i64::MAX))
}

/// Value and risk assessment. Unknown inputs count as zero for the value
/// score; unresolved region, titles, friends or presence each raise a flag.
pub fn score_account(
    trophies: &TrophyStats,
    titles_count: Option<usize>,
    friends_total: Option<usize>,
    presence_text: Option<&str>,
    region: Option<&str>,
) -> AccountScore {
    let factors = [
        (ValueFactor::PlayerLevel, trophies.level.unwrap_or(0), &LEVEL_BUCKETS[..]),
        (ValueFactor::TotalTrophies, trophies.total.unwrap_or(0), &TOTAL_TROPHY_BUCKETS[..]),
        (ValueFactor::Platinum, trophies.platinum.unwrap_or(0), &PLATINUM_BUCKETS[..]),
        (ValueFactor::Titles, count_input(titles_count), &TITLE_BUCKETS[..]),
        (ValueFactor::Friends, count_input(friends_total), &FRIEND_BUCKETS[..]),
    ];

    let components: Vec<ValueComponent> = factors
        .into_iter()
        .map(|(factor, input, buckets)| ValueComponent {
            factor,
            input,
            points: bucket(input, buckets),
        })
        .collect();
    let value_score = components.iter().map(|component| component.points).sum();

    let mut risk_flags = Vec::new();
    if region.map_or(true, |code| code.trim().is_empty()) {
        risk_flags.push(RiskFlag::RegionUnresolved);
    }
    if titles_count.is_none() {
        risk_flags.push(RiskFlag::TitlesUnavailable);
    }
    if friends_total.is_none() {
        risk_flags.push(RiskFlag::FriendsUnavailable);
    }
    if presence_text.is_none() {
        risk_flags.push(RiskFlag::PresenceHidden);
    }

    AccountScore {
        value_score,
        value_segment: ValueSegment::from_score(value_score),
        risk_level: RiskLevel::from_flag_count(risk_flags.len()),
        risk_flags,
        components,
    }
}
