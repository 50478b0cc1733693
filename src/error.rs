use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'The date supplied {date} is invalid, expected YYYY-MM-DD'")]
    InvalidDateFormat { date: String },

    #[error("Failed to load credential file {path}: {source}")]
    CredentialLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid client certificate or key: {0}")]
    TlsConfig(#[source] reqwest::Error),

    #[error("The account id '{account_id}' cannot be used in an authorization header")]
    InvalidAccountId { account_id: String },

    #[error("Failed to parse URL: {0}")]
    UrlParsingFailed(#[from] url::ParseError),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API {url} responded with status {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed {report} response: {message}")]
    MalformedResponse {
        report: &'static str,
        message: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether the error happened before any task was started.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Error::InvalidDateFormat { .. }
                | Error::CredentialLoad { .. }
                | Error::TlsConfig(_)
                | Error::InvalidAccountId { .. }
                | Error::UrlParsingFailed(_)
        )
    }
}
