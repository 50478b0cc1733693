mod api_client;
mod config;
mod dates;
mod error;
mod freshness;
mod reports;
mod runner;
mod tasks;
mod writer;

use clap::Parser;
use config::Config;
use error::Error;
use log::{error, info};

/// Downloads daily Search Ads campaign reports and the campaign list as csv files.
#[derive(Parser)]
struct Args {
    #[command(flatten)]
    config: Config,
}

fn failure_message(err: &Error) -> String {
    let stage = if err.is_startup() {
        "start the download"
    } else {
        "prepare the download tasks"
    };
    format!("failed to {}: {}", stage, err)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match runner::download_reports(&args.config).await {
        Ok(summary) => {
            info!(
                "Finished {} tasks: {} written, {} empty, {} failed",
                summary.total(),
                summary.written,
                summary.empty,
                summary.failed
            );
        }
        Err(err) => {
            error!("{}", failure_message(&err));
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_failure_message_names_the_stage() {
        let startup = Error::InvalidDateFormat {
            date: "2024/01/01".to_string(),
        };
        assert!(failure_message(&startup).starts_with("failed to start the download: "));

        let preparing = Error::Io {
            path: PathBuf::from("/data/2024/01/09"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(failure_message(&preparing).starts_with("failed to prepare the download tasks: "));
    }
}
