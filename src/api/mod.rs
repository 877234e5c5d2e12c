//! The remote store: a Google sheet that holds one transaction per row.
//!
//! Everything above this module talks to the store through the `Sheet` trait so that the
//! in-memory `TestSheet` can stand in for Google.

mod files;
mod oauth;
mod sheet;
mod sheet_test_client;

use crate::error::{ErrorType, IntoResult, Res};
use crate::{Config, Result};
use anyhow::Context;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use tracing::debug;

pub use files::SERVICE_ACCOUNT_ENV;
pub(crate) use files::ServiceAccount;
pub(crate) use oauth::TokenProvider;
pub(crate) use sheet::GoogleSheet;
pub(crate) use sheet_test_client::TestSheet;

// OAuth scopes required. The spreadsheets scope is for reading and appending rows, and the drive
// scope is needed to find a spreadsheet by its title.
const OAUTH_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.readonly",
];

/// When this environment variable is set and non-empty the program runs against an in-memory
/// sheet instead of Google.
pub const TEST_MODE_ENV: &str = "SPEND_TRACKER_IN_TEST_MODE";

/// Whether we are talking to Google or to the in-memory test sheet.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// A single value in a row that is being appended.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Number(Decimal),
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            // Sheets shows 4.50 as 4.5 when it reads it back
            Cell::Number(n) => write!(f, "{}", n.normalize()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(n) => serializer.serialize_f64(n.to_f64().unwrap_or_default()),
        }
    }
}

/// The two operations we need from the store.
#[async_trait::async_trait]
pub(crate) trait Sheet {
    /// Returns every row of the bound sheet, header row first. Cells are formatted strings.
    async fn get(&mut self) -> Res<Vec<Vec<String>>>;

    /// Appends `row` after the last row of the bound sheet.
    async fn append(&mut self, row: &[Cell]) -> Res<()>;
}

/// Opens the store named by `config`.
///
/// In `Mode::Google` this resolves the service account credential, authenticates and finds the
/// spreadsheet by its title. A missing credential is a `Config` error, everything after that is a
/// `Connection` error.
pub(crate) async fn sheet(config: &Config, mode: Mode) -> Result<Box<dyn Sheet + Send>> {
    match mode {
        Mode::Test => {
            debug!("Using the in-memory test sheet");
            Ok(Box::new(TestSheet::default()))
        }
        Mode::Google => {
            let account = ServiceAccount::resolve(&config.credentials_path())
                .await
                .pub_result(ErrorType::Config)?;
            let email = account.client_email().to_string();
            let token_provider = TokenProvider::new(account);
            let sheet = GoogleSheet::open(config.sheet_name(), token_provider)
                .await
                .with_context(|| {
                    format!(
                        "Could not connect to the sheet '{}'. Did you share it with {email}?",
                        config.sheet_name()
                    )
                })
                .pub_result(ErrorType::Connection)?;
            Ok(Box::new(sheet))
        }
    }
}
