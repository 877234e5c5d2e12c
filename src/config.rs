//! Configuration file handling.
//!
//! The configuration file is stored at `$SPEND_HOME/config.json` and contains the name of the
//! Google sheet that holds the transactions, display settings and, optionally, the path to the
//! service account credential file.

use crate::error::Res;
use crate::report::DEFAULT_RECENT;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "spend-tracker";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const CREDENTIALS_JSON: &str = "credentials.json";
const CONFIG_JSON: &str = "config.json";

/// The spreadsheet title used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Spend Tracker Database";

/// The currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPEND_HOME` and from there it loads `$SPEND_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    sheet_name_override: Option<String>,
}

impl Config {
    /// Creates the home directory, its subdirectories and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/spend-tracker`
    /// - `sheet_name` - The title of the Google sheet that holds the transactions.
    /// - `credentials` - A downloaded service account key. If given, it is copied into
    ///   `.secrets/credentials.json`.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        sheet_name: &str,
        credentials: Option<&Path>,
    ) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spend-tracker home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        if let Some(source) = credentials {
            let destination = secrets.join(CREDENTIALS_JSON);
            utils::copy(source, &destination).await?;
            utils::restrict_permissions(&destination)?;
            debug!("Copied credentials to {}", destination.display());
        }

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            sheet_name: sheet_name.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            sheet_name_override: None,
        })
    }

    /// This will
    /// - validate that `spend_home` exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    pub async fn load(spend_home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = spend_home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The spend-tracker home directory '{}' does not exist, run 'spend init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            sheet_name_override: None,
        })
    }

    /// Uses `sheet_name` instead of the configured sheet name, when it is `Some`.
    pub fn with_sheet_name(mut self, sheet_name: Option<String>) -> Self {
        self.sheet_name_override = sheet_name;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    /// The title of the spreadsheet to open.
    pub fn sheet_name(&self) -> &str {
        self.sheet_name_override
            .as_deref()
            .unwrap_or(&self.config_file.sheet_name)
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }

    /// How many transactions the dashboard lists under recent activity.
    pub fn recent_count(&self) -> usize {
        self.config_file.recent_count
    }

    /// Returns the stored `credentials_path` if it is absolute, otherwise resolves it against the
    /// home directory.
    pub fn credentials_path(&self) -> PathBuf {
        let p = self.config_file.credentials_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spend-tracker",
///   "config_version": 1,
///   "sheet_name": "Spend Tracker Database",
///   "currency_symbol": "₹",
///   "recent_count": 5,
///   "credentials_path": ".secrets/credentials.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spend-tracker"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Title of the Google sheet
    sheet_name: String,

    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,

    #[serde(default = "default_recent_count")]
    recent_count: usize,

    /// Path to the service account key (relative to the home directory, or absolute).
    /// Defaults to $SPEND_HOME/.secrets/credentials.json if not specified
    #[serde(skip_serializing_if = "Option::is_none", default)]
    credentials_path: Option<PathBuf>,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_recent_count() -> usize {
    DEFAULT_RECENT
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            currency_symbol: default_currency_symbol(),
            recent_count: default_recent_count(),
            credentials_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it is not ours.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(CREDENTIALS_JSON))
    }
}
