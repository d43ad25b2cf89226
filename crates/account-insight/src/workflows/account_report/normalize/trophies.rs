use serde::Serialize;
use serde_json::Value;

/// Numeric trophy summary. `total` is the medal sum, absent when no medal
/// was counted so "no data" stays distinguishable from real counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrophyStats {
    pub level: Option<i64>,
    pub progress: Option<i64>,
    pub platinum: Option<i64>,
    pub gold: Option<i64>,
    pub silver: Option<i64>,
    pub bronze: Option<i64>,
    pub total: Option<i64>,
}

impl TrophyStats {
    /// Compact line such as `"Lvl:450 | %:12 | Pt:60"`, listing known fields only.
    pub fn summary_line(&self) -> Option<String> {
        let parts: Vec<String> = [
            ("Lvl", self.level),
            ("%", self.progress),
            ("Pt", self.platinum),
            ("G", self.gold),
            ("S", self.silver),
            ("B", self.bronze),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| format!("{label}:{value}")))
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}

pub fn parse_trophy_summary(summary: &Value) -> TrophyStats {
    if !summary.is_object() {
        return TrophyStats::default();
    }

    let medal = |name: &str| {
        field(summary, &[name]).or_else(|| {
            summary
                .get("earnedTrophies")
                .and_then(|earned| field(earned, &[name]))
        })
    };

    let platinum = medal("platinum");
    let gold = medal("gold");
    let silver = medal("silver");
    let bronze = medal("bronze");

    let sum = [platinum, gold, silver, bronze]
        .into_iter()
        .map(|count| count.unwrap_or(0))
        .fold(0_i64, i64::saturating_add);

    TrophyStats {
        level: field(summary, &["level", "trophyLevel"]),
        progress: field(summary, &["progress"]),
        platinum,
        gold,
        silver,
        bronze,
        total: (sum > 0).then_some(sum),
    }
}

fn field(document: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| document.get(*key))
        .find(|value| !value.is_null())
        .and_then(coerce_int)
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}
