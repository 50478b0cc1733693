use clap::Args as ClapArgs;
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "https://api.searchads.apple.com/api/v3/";
const CERT_DIR: &str = "../credentials";
const CERT_FILE: &str = "Admin_API_access.pem";
const KEY_FILE: &str = "Admin_API_access.key";
const DATA_DIR: &str = "./data";

#[derive(ClapArgs, Debug, Clone)]
pub struct Config {
    /// Search Ads organisation id, sent as `orgId=<id>`.
    #[arg(long, env = "ACCOUNT_ID")]
    pub(crate) account_id: String,

    #[arg(long, default_value = CERT_DIR, env = "CERT_DIR")]
    pub(crate) cert_dir: PathBuf,

    #[arg(long, default_value = CERT_FILE, env = "CERT_FILE")]
    pub(crate) cert_file: String,

    #[arg(long, default_value = KEY_FILE, env = "KEY_FILE")]
    pub(crate) key_file: String,

    /// Root directory for the downloaded csv files.
    #[arg(long, default_value = DATA_DIR, env = "DATA_DIR")]
    pub(crate) data_dir: PathBuf,

    /// First day to download reports for, in the form YYYY-MM-DD.
    #[arg(long, env = "FIRST_DATE")]
    pub(crate) first_date: String,

    /// Days within which an existing report is downloaded again.
    #[arg(long, default_value_t = 30, env = "REFRESH_INTERVAL_DAYS")]
    pub(crate) refresh_interval_days: i64,

    #[arg(long, default_value = DEFAULT_API_URL, env = "API_URL")]
    pub(crate) api_url: String,

    #[arg(long, default_value_t = 8, env = "MAX_CONCURRENT_REQUESTS")]
    pub(crate) max_concurrent_requests: usize,

    #[arg(long, default_value_t = 60, env = "REQUEST_TIMEOUT_SECS")]
    pub(crate) request_timeout_secs: u64,
}

impl Config {
    pub fn cert_path(&self) -> PathBuf {
        self.cert_dir.join(&self.cert_file)
    }

    pub fn key_path(&self) -> PathBuf {
        self.cert_dir.join(&self.key_file)
    }

    pub fn concurrency(&self) -> usize {
        self.max_concurrent_requests.max(1)
    }
}

#[cfg(test)]
pub(crate) fn test_config(data_dir: PathBuf, first_date: &str) -> Config {
    Config {
        account_id: "123456".to_string(),
        cert_dir: PathBuf::from("/path/to/credentials"),
        cert_file: CERT_FILE.to_string(),
        key_file: KEY_FILE.to_string(),
        data_dir,
        first_date: first_date.to_string(),
        refresh_interval_days: 30,
        api_url: DEFAULT_API_URL.to_string(),
        max_concurrent_requests: 4,
        request_timeout_secs: 5,
    }
}
