//! Error types for the public interface of the crate.
//!
//! Internally we use `anyhow` (aliased as `Res`) and attach context as errors travel up the stack.
//! At the boundary of a command the error is classified with `pub_result` so that callers can tell
//! a configuration problem from a connection problem or a failed write.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad class of an error, used to decide how it is reported.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// No credential could be resolved, no sheet name was given, or a config file is bad.
    Config,
    /// Authentication failed, the sheet could not be found, or reading it failed.
    Connection,
    /// Appending a row to the sheet failed.
    Write,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type. It wraps the `anyhow` chain that produced it along with its
/// `ErrorType`.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Wraps the error with an outer message, keeping its `ErrorType`.
    pub(crate) fn context<C>(self, context: C) -> Self
    where
        C: Display + Send + Sync + 'static,
    {
        Self {
            error_type: self.error_type,
            inner: self.inner.context(context),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The alternate form prints the whole context chain, e.g. "a: b: c".
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into a public one by classifying its error.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_keeps_context_chain() {
        let res: Res<()> = Err(anyhow::anyhow!("not shared"));
        let err = res
            .context("Could not open the sheet")
            .pub_result(ErrorType::Connection)
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Connection);
        assert_eq!(err.to_string(), "Could not open the sheet: not shared");
    }

    #[test]
    fn test_context_keeps_error_type() {
        let err = Error::new(ErrorType::Connection, anyhow::anyhow!("timed out"))
            .context("Saved 'Lunch' but could not reload the sheet");
        assert_eq!(err.error_type(), ErrorType::Connection);
        assert_eq!(
            err.to_string(),
            "Saved 'Lunch' but could not reload the sheet: timed out"
        );
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::Config.to_string(), "config");
        assert_eq!(ErrorType::Write.to_string(), "write");
    }
}
