use crate::config::Config;
use crate::error::Error;
use crate::reports::CampaignReportBody;
use log::{debug, info};
use reqwest::{header::AUTHORIZATION, Client, Identity, Method, Url};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A single request against the reporting API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<CampaignReportBody>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchAdsApi: Send + Sync + 'static {
    /// Sends one request and decodes the response body.
    /// # Arguments
    /// * `request` - The endpoint, method and optional json body.
    /// # Returns
    /// A Result containing either the decoded json body or an Error classifying the failure
    /// as [`Error::Transport`], [`Error::HttpStatus`] or [`Error::Decode`].
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, Error>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    authorization: String,
}

fn read_credential(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|source| Error::CredentialLoad {
        path: path.to_path_buf(),
        source,
    })
}

impl ApiClient {
    /// Builds the shared client, authenticated with the configured certificate and key.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut pem = read_credential(&config.cert_path())?;
        let key = read_credential(&config.key_path())?;
        pem.push(b'\n');
        pem.extend_from_slice(&key);

        let identity = Identity::from_pem(&pem).map_err(Error::TlsConfig)?;
        let client = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(Error::TlsConfig)?;

        info!(
            "Loaded client certificate from {}",
            config.cert_dir.display()
        );
        ApiClient::with_client(client, &config.account_id)
    }

    pub fn with_client(client: Client, account_id: &str) -> Result<Self, Error> {
        let authorization = format!("orgId={}", account_id);
        if reqwest::header::HeaderValue::from_str(&authorization).is_err() {
            return Err(Error::InvalidAccountId {
                account_id: account_id.to_string(),
            });
        }

        Ok(ApiClient {
            client,
            authorization,
        })
    }
}

#[async_trait::async_trait]
impl SearchAdsApi for ApiClient {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, Error> {
        let url = request.url.to_string();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(AUTHORIZATION, &self.authorization);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { url, status });
        }
        info!("Got response [{}] for request: {}", status, url);

        let bytes = resp.bytes().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("Empty response body from {}", url);
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|source| Error::Decode { url, source })
    }
}
