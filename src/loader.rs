//! Loads the transaction table from the store.

use crate::api::Sheet;
use crate::error::Res;
use crate::model::TransactionTable;
use anyhow::Context;
use tracing::debug;

/// Reads every row of `sheet` and builds a `TransactionTable`. Malformed amounts and dates are
/// coerced rather than reported, so the only way this fails is if the read itself fails.
pub(crate) async fn load(sheet: &mut (dyn Sheet + Send)) -> Res<TransactionTable> {
    let values = sheet
        .get()
        .await
        .context("Failed to read the transactions")?;
    let table = TransactionTable::parse(values);
    debug!("Loaded {} transactions", table.len());
    Ok(table)
}
