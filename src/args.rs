//! These structs provide the CLI interface for the spend CLI.

use crate::model::{EntryCategory, EntryType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spend: A command-line tracker for personal expenses and income.
///
/// Your transactions live in a Google sheet with the columns Date, Item, Category, Amount, Type
/// and Notes. This program reads that sheet to show you totals, a breakdown by category and a
/// monthly trend, and it can append new transactions to it.
///
/// Access is through a Google service account. Create one, download its JSON key and share your
/// sheet with the account's email address as an Editor.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and the configuration file.
    ///
    /// Run this first. Pass the title of your Google sheet with --sheet-name and the downloaded
    /// service account key with --credentials. The key is copied into the home directory. You can
    /// leave --credentials out if you provide the key's JSON text in
    /// SPEND_TRACKER_SERVICE_ACCOUNT instead.
    Init(InitArgs),
    /// Show total expense, total income, balance and recent activity.
    Dashboard,
    /// Show spending by category and by month.
    Analysis,
    /// Append a transaction to the sheet and show the refreshed dashboard.
    Add(AddArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and credentials are held. Defaults to ~/spend-tracker
    #[arg(long, global = true, env = "SPEND_HOME", default_value_t = default_spend_home())]
    spend_home: DisplayPath,

    /// The title of your Google sheet. With `init` this is the name saved in config.json
    /// (default "Spend Tracker Database"), otherwise it is used instead of the saved name.
    #[arg(long, global = true, env = "SPEND_SHEET_NAME")]
    sheet_name: Option<String>,

    /// Print command output as JSON.
    #[arg(long, global = true)]
    json: bool,
}

impl Common {
    pub fn new(log_level: LevelFilter, spend_home: PathBuf) -> Self {
        Self {
            log_level,
            spend_home: spend_home.into(),
            sheet_name: None,
            json: false,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn spend_home(&self) -> &DisplayPath {
        &self.spend_home
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// (Not shown): Args for the `spend init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The path to your downloaded service account key.
    #[arg(long)]
    credentials: Option<PathBuf>,
}

impl InitArgs {
    pub fn new(credentials: Option<PathBuf>) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> Option<&Path> {
        self.credentials.as_deref()
    }
}

/// (Not shown): Args for the `spend add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The date of the transaction as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// What the money was spent on, or where it came from.
    #[arg(long)]
    item: String,

    /// The amount, zero or more.
    #[arg(long, value_parser = parse_amount)]
    amount: Decimal,

    #[arg(long = "type", value_enum, default_value_t)]
    r#type: EntryType,

    #[arg(long, value_enum, default_value_t)]
    category: EntryCategory,

    #[arg(long, default_value = "")]
    notes: String,
}

impl AddArgs {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn r#type(&self) -> EntryType {
        self.r#type
    }

    pub fn category(&self) -> EntryCategory {
        self.category
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(s.trim()).map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(format!("The amount must not be negative, got {s}"));
    }
    Ok(value)
}

fn default_spend_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spend-tracker"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --spend-home or SPEND_HOME instead of relying on the default \
                home directory.",
            );
            PathBuf::from("spend-tracker")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
