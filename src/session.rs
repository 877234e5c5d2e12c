//! The per-run context: the loaded configuration and an open handle to the store.

use crate::api::{self, Mode, Sheet};
use crate::entry::{self, Entry};
use crate::error::{Error, ErrorType, IntoResult};
use crate::loader;
use crate::model::TransactionTable;
use crate::{Config, Result};
use anyhow::anyhow;
use std::path::Path;
use tracing::{debug, info};

/// Holds the configuration together with the sheet it names. Create one with `Session::connect`
/// and pass it to every command that reads or writes transactions; nothing here is global.
pub struct Session {
    config: Config,
    sheet: Box<dyn Sheet + Send>,
}

impl Session {
    /// Opens the store named by `config`.
    ///
    /// # Errors
    /// - `ErrorType::Config` if the sheet name is empty or no credential can be found.
    /// - `ErrorType::Connection` if authentication fails or the spreadsheet cannot be found.
    pub async fn connect(config: Config, mode: Mode) -> Result<Self> {
        if config.sheet_name().trim().is_empty() {
            return Err(Error::new(
                ErrorType::Config,
                anyhow!("Please enter your Google Sheet name"),
            ));
        }
        let sheet = api::sheet(&config, mode).await?;
        info!("Connected to '{}'", config.sheet_name());
        Ok(Self { config, sheet })
    }

    /// Loads the configuration from `spend_home`, applies `sheet_name` if given and connects.
    pub async fn open(spend_home: &Path, sheet_name: Option<&str>, mode: Mode) -> Result<Self> {
        let config = Config::load(spend_home)
            .await
            .pub_result(ErrorType::Config)?
            .with_sheet_name(sheet_name.map(str::to_string));
        Self::connect(config, mode).await
    }

    #[cfg(test)]
    pub(crate) fn with_sheet(config: Config, sheet: api::TestSheet) -> Self {
        Self {
            config,
            sheet: Box::new(sheet),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads every transaction from the store.
    pub async fn load(&mut self) -> Result<TransactionTable> {
        loader::load(self.sheet.as_mut())
            .await
            .pub_result(ErrorType::Connection)
    }

    /// Appends `entry` to the store. The caller should `load` again to see it.
    pub async fn submit(&mut self, entry: &Entry) -> Result<()> {
        entry::submit(self.sheet.as_mut(), entry)
            .await
            .pub_result(ErrorType::Write)?;
        debug!("Saved '{}'", entry.item());
        Ok(())
    }
}
