//! Account inspection reports: directory lookups, tolerant field
//! normalization, heuristic scoring and a short-lived report cache.

mod builder;
mod cache;
pub mod directory;
pub mod normalize;
pub mod scoring;
pub mod views;

pub use builder::{cache_key, AccountReportBuilder, ReportError, MIN_CREDENTIAL_LEN};
pub use cache::{ReportCache, TtlCache};
pub use directory::{
    AccountDirectory, AccountFixture, DirectoryError, DirectorySession, FixtureError,
    FriendFixture, FriendHandle, InMemoryDirectory, InMemorySession, RawProfile,
};
pub use scoring::{
    score_account, AccountScore, ActivitySegment, RiskFlag, RiskLevel, ValueComponent,
    ValueFactor, ValueSegment,
};
pub use views::{AccountReport, ReportEnvelope};
