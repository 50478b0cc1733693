use crate::error::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const CAMPAIGN_REPORT: &str = "campaign report";
const CAMPAIGNS: &str = "campaigns";

/// The kinds of reports downloaded by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Per-day campaign metrics.
    CampaignReport,
    /// The run-wide list of campaigns.
    Campaigns,
}

impl ReportKind {
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::CampaignReport => CAMPAIGN_REPORT,
            ReportKind::Campaigns => CAMPAIGNS,
        }
    }

    /// Transforms a decoded API response into csv rows, each prefixed with `first_column`.
    pub fn extract_rows(&self, data: Value, first_column: &str) -> Result<Vec<Row>, Error> {
        match self {
            ReportKind::CampaignReport => Ok(extract_campaign_report(data, first_column)?
                .into_iter()
                .map(Row::CampaignReport)
                .collect()),
            ReportKind::Campaigns => Ok(extract_campaigns(data, first_column)?
                .into_iter()
                .map(Row::Campaign)
                .collect()),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReportBody {
    start_time: String,
    end_time: String,
    selector: Selector,
    group_by: Vec<String>,
    time_zone: String,
    return_records_with_no_metrics: bool,
    return_row_totals: bool,
    return_grand_totals: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Selector {
    order_by: Vec<OrderBy>,
    pagination: Pagination,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct OrderBy {
    field: String,
    sort_order: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Pagination {
    offset: u32,
    limit: u32,
}

impl CampaignReportBody {
    /// Request body for the campaign report of a single day, grouped by country or region.
    pub fn for_day(day: NaiveDate) -> Self {
        let day = day.format("%Y-%m-%d").to_string();
        CampaignReportBody {
            start_time: day.clone(),
            end_time: day,
            selector: Selector {
                order_by: vec![OrderBy {
                    field: "countryOrRegion".to_string(),
                    sort_order: "ASCENDING".to_string(),
                }],
                pagination: Pagination {
                    offset: 0,
                    limit: 1000,
                },
            },
            group_by: vec!["countryOrRegion".to_string()],
            time_zone: "UTC".to_string(),
            return_records_with_no_metrics: true,
            return_row_totals: true,
            return_grand_totals: true,
        }
    }
}

/// One csv line of either report.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Row {
    CampaignReport(CampaignReportRow),
    Campaign(CampaignRow),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CampaignReportRow {
    pub first_column: String,
    pub campaign_id: i64,
    pub campaign_name: String,
    pub campaign_status: String,
    pub impressions: u64,
    pub taps: u64,
    pub installs: u64,
    pub new_downloads: u64,
    pub redownloads: u64,
    pub avg_cpa: String,
    pub avg_cpt: String,
    pub local_spend: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CampaignRow {
    pub first_column: String,
    pub id: i64,
    pub name: String,
    pub status: String,
    pub deleted: bool,
}

#[derive(Deserialize)]
struct ReportResponse {
    data: ReportData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportData {
    reporting_data_response: ReportingDataResponse,
}

#[derive(Deserialize)]
struct ReportingDataResponse {
    row: Vec<ReportRow>,
}

#[derive(Deserialize)]
struct ReportRow {
    metadata: ReportRowMetadata,
    total: ReportRowTotal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRowMetadata {
    campaign_id: i64,
    campaign_name: String,
    campaign_status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRowTotal {
    impressions: u64,
    taps: u64,
    installs: u64,
    new_downloads: u64,
    redownloads: u64,
    #[serde(rename = "avgCPA")]
    avg_cpa: Money,
    #[serde(rename = "avgCPT")]
    avg_cpt: Money,
    local_spend: Money,
}

#[derive(Deserialize)]
struct Money {
    #[serde(deserialize_with = "amount_as_string")]
    amount: String,
}

#[derive(Deserialize)]
struct CampaignsResponse {
    data: Vec<CampaignEntry>,
}

#[derive(Deserialize)]
struct CampaignEntry {
    id: i64,
    name: String,
    status: String,
    deleted: bool,
}

/// Amounts are sent as decimal strings, but plain numbers are accepted too and kept as sent.
fn amount_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number amount, found {}",
            other
        ))),
    }
}

/// Parses the grouped metric rows of a campaign report.
///
/// # Arguments
/// * `data` - The decoded response body.
/// * `first_column` - Value prepended to every row, usually the day as YYYYMMDD.
///
/// # Returns
/// A Result containing either the rows in response order or an [`Error::MalformedResponse`].
pub fn extract_campaign_report(
    data: Value,
    first_column: &str,
) -> Result<Vec<CampaignReportRow>, Error> {
    let response: ReportResponse =
        serde_json::from_value(data).map_err(|err| Error::MalformedResponse {
            report: CAMPAIGN_REPORT,
            message: err.to_string(),
        })?;

    Ok(response
        .data
        .reporting_data_response
        .row
        .into_iter()
        .map(|row| CampaignReportRow {
            first_column: first_column.to_string(),
            campaign_id: row.metadata.campaign_id,
            campaign_name: row.metadata.campaign_name,
            campaign_status: row.metadata.campaign_status,
            impressions: row.total.impressions,
            taps: row.total.taps,
            installs: row.total.installs,
            new_downloads: row.total.new_downloads,
            redownloads: row.total.redownloads,
            avg_cpa: row.total.avg_cpa.amount,
            avg_cpt: row.total.avg_cpt.amount,
            local_spend: row.total.local_spend.amount,
        })
        .collect())
}

/// Parses the campaign list.
pub fn extract_campaigns(data: Value, first_column: &str) -> Result<Vec<CampaignRow>, Error> {
    let response: CampaignsResponse =
        serde_json::from_value(data).map_err(|err| Error::MalformedResponse {
            report: CAMPAIGNS,
            message: err.to_string(),
        })?;

    Ok(response
        .data
        .into_iter()
        .map(|campaign| CampaignRow {
            first_column: first_column.to_string(),
            id: campaign.id,
            name: campaign.name,
            status: campaign.status,
            deleted: campaign.deleted,
        })
        .collect())
}
