use crate::infra::{load_directory, report_cache};
use account_insight::config::AppConfig;
use account_insight::error::AppError;
use account_insight::telemetry;
use account_insight::workflows::account_report::{
    AccountReport, AccountReportBuilder, ReportEnvelope, ReportError,
};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Online id of the account to inspect
    #[arg(long)]
    pub(crate) online_id: String,
    /// Credential token (defaults to DIRECTORY_CREDENTIAL)
    #[arg(long)]
    pub(crate) credential: Option<String>,
    /// JSON accounts fixture (defaults to DIRECTORY_FIXTURE)
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Print the JSON envelope instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        online_id,
        credential,
        fixture,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let credential = credential
        .or(config.directory.credential)
        .ok_or(AppError::MissingCredential)?;
    let fixture = fixture.or(config.directory.fixture_path);
    let directory = Arc::new(load_directory(fixture.as_deref())?);
    let builder = AccountReportBuilder::new(directory, report_cache(&config.report));

    let result = builder.build(&online_id, &credential);
    let stdout = io::stdout();
    write_report(&mut stdout.lock(), result, json)
}

/// Writes the JSON envelope, or the text summary of a successful report.
/// In text mode a failed report is returned as the error.
pub(crate) fn write_report<W: Write>(
    out: &mut W,
    result: Result<Arc<AccountReport>, ReportError>,
    json: bool,
) -> Result<(), AppError> {
    if json {
        let envelope = ReportEnvelope::from(result);
        serde_json::to_writer_pretty(&mut *out, &envelope).map_err(io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    let report = result?;
    write_summary(out, &report)?;
    Ok(())
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| value.to_string())
}

pub(crate) fn write_summary<W: Write>(out: &mut W, report: &AccountReport) -> io::Result<()> {
    writeln!(out, "Account report: {}", report.online_id)?;
    writeln!(
        out,
        "- Account id: {} ({})",
        report.account_id,
        or_na(report.account_hex.as_deref())
    )?;
    writeln!(out, "- Region: {}", report.region_pretty)?;
    writeln!(out, "- Presence: {}", or_na(report.presence.as_deref()))?;
    writeln!(out, "- Avatar: {}", or_na(report.avatar_url.as_deref()))?;
    writeln!(out, "- Trophies: {}", or_na(report.trophy_summary.as_deref()))?;
    writeln!(
        out,
        "- Titles: {} | Friends: {} (online now: {})",
        or_na(report.titles_count),
        or_na(report.friends_total),
        or_na(report.friends_online_estimate)
    )?;
    writeln!(
        out,
        "Value score: {} ({})",
        report.value_score, report.value_segment_label
    )?;
    for component in &report.value_components {
        writeln!(
            out,
            "  - {:?}: {} -> {} pts",
            component.factor, component.input, component.points
        )?;
    }
    writeln!(out, "Activity: {}", report.activity_segment_label)?;
    writeln!(out, "Risk: {}", report.risk_level_label)?;
    for note in &report.risk_notes {
        writeln!(out, "  - {note}")?;
    }
    Ok(())
}
