//! Submission of a new transaction.

use crate::api::{Cell, Sheet};
use crate::error::Res;
use crate::model::{EntryCategory, EntryType, TransactionColumn};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A new transaction as entered by the user.
///
/// `amount` is expected to be non-negative; that is enforced where the value is entered, not
/// here. `type` and `category` are plain strings because the sheet does not constrain them.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    date: NaiveDate,
    item: String,
    category: String,
    amount: Decimal,
    r#type: String,
    notes: String,
}

impl Entry {
    /// Creates an entry. When `date` is `None` today's date is used.
    pub fn new(
        date: Option<NaiveDate>,
        item: impl Into<String>,
        amount: Decimal,
        r#type: impl Into<String>,
        category: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            date: date.unwrap_or_else(|| Local::now().date_naive()),
            item: item.into(),
            category: category.into(),
            amount,
            r#type: r#type.into(),
            notes: notes.into(),
        }
    }

    /// Creates an entry from the choices offered on the command line.
    pub fn from_choices(
        date: Option<NaiveDate>,
        item: impl Into<String>,
        amount: Decimal,
        r#type: EntryType,
        category: EntryCategory,
        notes: impl Into<String>,
    ) -> Self {
        Self::new(
            date,
            item,
            amount,
            r#type.to_string(),
            category.to_string(),
            notes,
        )
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The row as it is written to the sheet: Date, Item, Category, Amount, Type, Notes. This
    /// order matches the columns of the existing sheet and must not change.
    pub(crate) fn to_row(&self) -> Vec<Cell> {
        TransactionColumn::ALL
            .iter()
            .map(|column| match column {
                TransactionColumn::Date => Cell::Text(self.date.format("%Y-%m-%d").to_string()),
                TransactionColumn::Item => Cell::Text(self.item.clone()),
                TransactionColumn::Category => Cell::Text(self.category.clone()),
                TransactionColumn::Amount => Cell::Number(self.amount),
                TransactionColumn::Type => Cell::Text(self.r#type.clone()),
                TransactionColumn::Notes => Cell::Text(self.notes.clone()),
            })
            .collect()
    }
}

/// Appends `entry` to `sheet` as a new row. There is no retry; on failure the store's message is
/// returned to the caller.
pub(crate) async fn submit(sheet: &mut (dyn Sheet + Send), entry: &Entry) -> Res<()> {
    let row = entry.to_row();
    debug!("Appending {row:?}");
    sheet
        .append(&row)
        .await
        .context("Error saving the transaction to the sheet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestSheet;
    use std::str::FromStr;

    fn coffee() -> Entry {
        Entry::from_choices(
            NaiveDate::from_ymd_opt(2024, 1, 5),
            "Coffee",
            Decimal::from_str("4.50").unwrap(),
            EntryType::Expense,
            EntryCategory::Food,
            "",
        )
    }

    #[test]
    fn test_row_order() {
        let row = coffee().to_row();
        assert_eq!(
            row,
            vec![
                Cell::Text("2024-01-05".into()),
                Cell::Text("Coffee".into()),
                Cell::Text("Food".into()),
                Cell::Number(Decimal::from_str("4.50").unwrap()),
                Cell::Text("Expense".into()),
                Cell::Text("".into()),
            ]
        );
    }

    #[test]
    fn test_date_defaults_to_today() {
        let entry = Entry::new(None, "x", Decimal::ZERO, "Expense", "Other", "");
        assert_eq!(entry.date(), Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_submit_appends_one_row() {
        let mut sheet = TestSheet::empty();
        submit(&mut sheet, &coffee()).await.unwrap();
        let rows = sheet.get().await.unwrap();
        assert_eq!(
            rows,
            vec![vec!["2024-01-05", "Coffee", "Food", "4.5", "Expense", ""]]
        );
    }

    #[tokio::test]
    async fn test_submit_failure_is_reported() {
        let mut sheet = TestSheet::read_only(Vec::new());
        let err = submit(&mut sheet, &coffee()).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Error saving the transaction"));
        assert!(message.contains("permission"));
    }
}
