use crate::api_client::{ApiClient, SearchAdsApi};
use crate::config::Config;
use crate::error::Error;
use crate::tasks::{build_requests, execute, ReportRequest, TaskOutcome};
use chrono::{NaiveDate, Utc};
use futures::stream::{self, Stream, StreamExt};
use log::{error, info};

/// Tally of the terminal states reached by the tasks of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.written + self.empty + self.failed
    }

    fn record(&mut self, task: &ReportRequest, outcome: Result<TaskOutcome, Error>) {
        match outcome {
            Ok(TaskOutcome::Written { .. }) => self.written += 1,
            Ok(TaskOutcome::NoData) => self.empty += 1,
            Err(err) => {
                error!(
                    "Failed {} task for {} [{} {}]: {}",
                    task.kind.name(),
                    task.output_path.display(),
                    task.request.method,
                    task.request.url,
                    err
                );
                self.failed += 1;
            }
        }
    }
}

/// Downloads every report that is due and the campaign list.
///
/// # Returns
/// A Result containing either the [`RunSummary`] or an [`Error`] raised while loading the
/// credentials or building the tasks. Failures of individual tasks only show up in the summary.
pub async fn download_reports(config: &Config) -> Result<RunSummary, Error> {
    let today = Utc::now().date_naive();
    let api_client = ApiClient::new(config)?;

    download_reports_for_day(&api_client, config, today).await
}

pub async fn download_reports_for_day<A: SearchAdsApi + ?Sized>(
    api: &A,
    config: &Config,
    today: NaiveDate,
) -> Result<RunSummary, Error> {
    let requests = build_requests(config, today).await?;
    info!(
        "Prepared {} tasks, running at most {} at a time",
        requests.len(),
        config.concurrency()
    );

    Ok(run_tasks(api, requests, config.concurrency()).await)
}

/// Runs all tasks with at most `concurrency` in flight and waits for every one of them.
///
/// A failing task is logged and counted as soon as it settles; it never stops the others.
pub async fn run_tasks<A: SearchAdsApi + ?Sized>(
    api: &A,
    requests: Vec<ReportRequest>,
    concurrency: usize,
) -> RunSummary {
    settled_tasks(api, requests, concurrency)
        .fold(RunSummary::default(), |mut summary, (task, outcome)| async move {
            summary.record(&task, outcome);
            summary
        })
        .await
}

/// Yields each task with its outcome in completion order.
pub fn settled_tasks<'a, A: SearchAdsApi + ?Sized>(
    api: &'a A,
    requests: Vec<ReportRequest>,
    concurrency: usize,
) -> impl Stream<Item = (ReportRequest, Result<TaskOutcome, Error>)> + 'a {
    stream::iter(requests)
        .map(move |task| async move {
            let outcome = execute(api, &task).await;
            (task, outcome)
        })
        .buffer_unordered(concurrency.max(1))
}
