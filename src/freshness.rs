use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The file exists and the day is old enough to be considered final.
    Skip,
    Process,
}

/// Decides whether the report for `day` has to be downloaded again.
///
/// Days within `refresh_interval_days` of `today` are always re-downloaded since
/// the source data may still be corrected; older days are only downloaded if the
/// output file is missing.
pub async fn check_freshness(
    day: NaiveDate,
    path: &Path,
    today: NaiveDate,
    refresh_interval_days: i64,
) -> Freshness {
    let age = (today - day).num_days();
    if age > refresh_interval_days && tokio::fs::try_exists(path).await.unwrap_or(false) {
        Freshness::Skip
    } else {
        Freshness::Process
    }
}
