use crate::commands::Out;
use crate::config::DEFAULT_SHEET_NAME;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its `.secrets` subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `spend_home` - The directory that will be the root of the home directory, e.g.
///   `$HOME/spend-tracker`
/// - `sheet_name` - The title of the Google sheet that holds the transactions, "Spend Tracker
///   Database" when `None`. The sheet must be shared with the service account's email address.
/// - `credentials` - The downloaded service account key. If given, it is copied into
///   `.secrets/credentials.json`. It can be left out when the key is provided through
///   `SPEND_TRACKER_SERVICE_ACCOUNT`.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(
    spend_home: &Path,
    sheet_name: Option<&str>,
    credentials: Option<&Path>,
) -> Result<Out<()>> {
    let sheet_name = sheet_name.unwrap_or(DEFAULT_SHEET_NAME);
    let config = Config::create(spend_home, sheet_name, credentials)
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Created {} for the sheet '{}'",
        config.config_path().display(),
        config.sheet_name()
    )
    .into())
}
