use account_insight::config::ReportConfig;
use account_insight::error::AppError;
use account_insight::workflows::account_report::{
    AccountReportBuilder, InMemoryDirectory, ReportCache,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared by the report routes: one builder (and so one cache) per process
/// plus the team credential, if configured.
pub(crate) struct ReportState<D> {
    pub(crate) builder: Arc<AccountReportBuilder<D>>,
    pub(crate) credential: Option<Arc<str>>,
}

impl<D> Clone for ReportState<D> {
    fn clone(&self) -> Self {
        Self {
            builder: Arc::clone(&self.builder),
            credential: self.credential.clone(),
        }
    }
}

impl<D> ReportState<D> {
    pub(crate) fn new(builder: AccountReportBuilder<D>, credential: Option<String>) -> Self {
        Self {
            builder: Arc::new(builder),
            credential: credential.map(Arc::from),
        }
    }
}

pub(crate) fn report_cache(config: &ReportConfig) -> Arc<ReportCache> {
    Arc::new(ReportCache::new(config.cache_capacity, config.cache_ttl))
}

/// Fixture-backed directory, or an empty one when no fixture is configured.
pub(crate) fn load_directory(path: Option<&Path>) -> Result<InMemoryDirectory, AppError> {
    match path {
        Some(path) => {
            let directory = InMemoryDirectory::from_path(path)?;
            info!(path = %path.display(), accounts = directory.len(), "directory fixture loaded");
            Ok(directory)
        }
        None => {
            warn!("no DIRECTORY_FIXTURE configured; every lookup will report not found");
            Ok(InMemoryDirectory::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shared_fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/account-insight/tests/fixtures/accounts.json")
    }

    #[test]
    fn loads_the_shared_accounts_fixture() {
        let directory = load_directory(Some(shared_fixture().as_path())).expect("fixture loads");
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn missing_fixture_path_is_an_error() {
        let error = load_directory(Some(Path::new("does/not/exist.json")))
            .expect_err("missing file rejected");
        assert!(matches!(error, AppError::Fixture(_)));
    }

    #[test]
    fn no_fixture_gives_an_empty_directory() {
        let directory = load_directory(None).expect("empty directory");
        assert!(directory.is_empty());
    }
}
