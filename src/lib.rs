//! spend-tracker: a personal expense and income tracker backed by a Google sheet.
//!
//! Transactions are read from the first tab of a spreadsheet, coerced into typed values and
//! summarized into a dashboard and an analysis. New transactions are appended as rows.

mod api;
pub mod args;
pub mod commands;
mod config;
pub mod entry;
mod error;
mod loader;
pub mod model;
pub mod report;
mod session;
mod utils;
mod view;


pub use api::{Mode, SERVICE_ACCOUNT_ENV, TEST_MODE_ENV};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use session::Session;
