use crate::error::Error;
use serde::Serialize;
use std::path::Path;

/// Serializes rows as csv without a header row, quoting only where needed.
pub fn rows_to_csv<R: Serialize>(rows: &[R]) -> Result<Vec<u8>, Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .quote(b'"')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.into_inner()
        .map_err(|err| Error::Csv(err.into_error().into()))
}

/// Writes `rows` to `path`, replacing any previous content.
///
/// Parent directories are created when missing.
///
/// # Returns
/// A Result containing either the number of rows written or an [`Error`].
pub async fn write_rows<R: Serialize>(path: &Path, rows: &[R]) -> Result<usize, Error> {
    let bytes = rows_to_csv(rows)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{CampaignReportRow, CampaignRow, Row};
    use tempfile::TempDir;

    fn campaign(id: i64, name: &str, deleted: bool) -> CampaignRow {
        CampaignRow {
            first_column: "20240110".to_string(),
            id,
            name: name.to_string(),
            status: "ENABLED".to_string(),
            deleted,
        }
    }

    fn read_back<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap()
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_with_special_characters() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("campaigns.csv");
        let rows = vec![
            campaign(1, "plain", false),
            campaign(2, "with, comma", true),
            campaign(3, "with \"quotes\"", false),
            campaign(4, "multi\nline", false),
        ];

        let written = write_rows(&path, &rows).await.unwrap();
        assert_eq!(written, 4);

        let parsed: Vec<CampaignRow> = read_back(&path);
        assert_eq!(parsed, rows);
    }

    #[tokio::test]
    async fn test_minimal_quoting_and_no_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("campaigns.csv");
        let rows = vec![campaign(1, "plain", false), campaign(2, "a \"b\", c", true)];

        write_rows(&path, &rows).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "20240110,1,plain,ENABLED,false\n20240110,2,\"a \"\"b\"\", c\",ENABLED,true\n"
        );
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("2024/01/09/campaign_report.csv");
        let rows = vec![Row::CampaignReport(CampaignReportRow {
            first_column: "20240109".to_string(),
            campaign_id: 9,
            campaign_name: "Nine".to_string(),
            campaign_status: "ENABLED".to_string(),
            impressions: 1,
            taps: 2,
            installs: 3,
            new_downloads: 4,
            redownloads: 5,
            avg_cpa: "0.1".to_string(),
            avg_cpt: "0.2".to_string(),
            local_spend: "0.3".to_string(),
        })];

        write_rows(&path, &rows).await.unwrap();

        let parsed: Vec<CampaignReportRow> = read_back(&path);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].campaign_name, "Nine");
    }

    #[tokio::test]
    async fn test_overwrites_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("campaigns.csv");
        let many: Vec<_> = (0..10).map(|i| campaign(i, "old", false)).collect();
        write_rows(&path, &many).await.unwrap();

        write_rows(&path, &[campaign(99, "new", false)]).await.unwrap();

        let parsed: Vec<CampaignRow> = read_back(&path);
        assert_eq!(parsed, vec![campaign(99, "new", false)]);
    }
}
