//! Command handlers for the spend CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod analysis;
mod dashboard;
mod init;

use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

pub use add::add;
pub use analysis::analysis;
pub use dashboard::dashboard;
pub use init::init;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data for callers that want JSON instead of text.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Prints the message to stdout. When `json` is true the structured data is printed instead,
    /// if there is any.
    pub fn print(&self, json: bool) {
        let structure = self
            .structure()
            .and_then(|s| serde_json::to_string_pretty(s).ok());
        match structure {
            Some(json_text) if json => println!("{json_text}"),
            Some(json_text) => {
                debug!("Command output:\n\n{json_text}\n\n");
                println!("{}", self.message);
            }
            None => println!("{}", self.message),
        }
    }
}
