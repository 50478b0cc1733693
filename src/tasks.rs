use crate::api_client::{ApiRequest, SearchAdsApi};
use crate::config::Config;
use crate::dates::generate_date_range;
use crate::error::Error;
use crate::freshness::{check_freshness, Freshness};
use crate::reports::{CampaignReportBody, ReportKind};
use crate::writer::write_rows;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::{Method, Url};
use serde_json::Value;
use std::path::{Path, PathBuf};

const CAMPAIGN_REPORT_FILE: &str = "campaign_report.csv";
const CAMPAIGNS_FILE: &str = "campaigns.csv";

/// A self-contained unit of work: one request and the file its rows go to.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub request: ApiRequest,
    pub output_path: PathBuf,
    pub first_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Written { rows: usize },
    /// The response held no rows, nothing was written.
    NoData,
}

/// `<data_dir>/<YYYY>/<MM>/<DD>/campaign_report.csv`
pub fn campaign_report_path(data_dir: &Path, day: NaiveDate) -> PathBuf {
    data_dir
        .join(day.format("%Y/%m/%d").to_string())
        .join(CAMPAIGN_REPORT_FILE)
}

pub fn campaigns_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CAMPAIGNS_FILE)
}

fn endpoint(api_url: &str, path: &str) -> Result<Url, Error> {
    let mut base = Url::parse(api_url)?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path)?)
}

async fn create_parent_dir(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(parent) => tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            }),
        None => Ok(()),
    }
}

/// Builds every task of a run: one campaign report per day that is not fresh yet,
/// followed by the campaign list.
///
/// # Arguments
/// * `config` - The run configuration.
/// * `today` - The current UTC date.
///
/// # Returns
/// A Result containing either the tasks or an [`Error`] if the first date or the api url is invalid.
/// Output directories of the returned tasks exist on return.
pub async fn build_requests(
    config: &Config,
    today: NaiveDate,
) -> Result<Vec<ReportRequest>, Error> {
    let report_url = endpoint(&config.api_url, "reports/campaigns")?;
    let campaigns_url = endpoint(&config.api_url, "campaigns")?;

    let mut requests = vec![];

    for day in generate_date_range(&config.first_date, today)? {
        let output_path = campaign_report_path(&config.data_dir, day);

        if check_freshness(day, &output_path, today, config.refresh_interval_days).await
            == Freshness::Skip
        {
            info!("Skipping {}, already exists", output_path.display());
            continue;
        }

        create_parent_dir(&output_path).await?;
        requests.push(ReportRequest {
            kind: ReportKind::CampaignReport,
            request: ApiRequest {
                method: Method::POST,
                url: report_url.clone(),
                body: Some(CampaignReportBody::for_day(day)),
            },
            output_path,
            first_column: day.format("%Y%m%d").to_string(),
        });
    }

    let output_path = campaigns_path(&config.data_dir);
    create_parent_dir(&output_path).await?;
    requests.push(ReportRequest {
        kind: ReportKind::Campaigns,
        request: ApiRequest {
            method: Method::GET,
            url: campaigns_url,
            body: None,
        },
        output_path,
        first_column: today.format("%Y%m%d").to_string(),
    });

    Ok(requests)
}

fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Runs one task: fetch, extract the rows and write them.
///
/// Nothing is written unless every step succeeds and at least one row was extracted.
pub async fn execute<A: SearchAdsApi + ?Sized>(
    api: &A,
    task: &ReportRequest,
) -> Result<TaskOutcome, Error> {
    let data = api.fetch(&task.request).await?;
    if is_empty_payload(&data) {
        warn!("Empty {} response from {}", task.kind.name(), task.request.url);
        return Ok(TaskOutcome::NoData);
    }

    let rows = task.kind.extract_rows(data, &task.first_column)?;
    if rows.is_empty() {
        warn!(
            "No rows in {} response for {}",
            task.kind.name(),
            task.output_path.display()
        );
        return Ok(TaskOutcome::NoData);
    }

    let rows = write_rows(&task.output_path, &rows).await?;
    info!(
        "Wrote {} rows from URL: {} in {}",
        rows,
        task.request.url,
        task.output_path.display()
    );
    Ok(TaskOutcome::Written { rows })
}
