//! Implements the `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::{Cell, Sheet};
use crate::error::Res;
use anyhow::{bail, Context};
use std::io::Cursor;

/// An implementation of the `Sheet` trait that does not use Google sheets. It holds the rows of a
/// single tab in memory and, by default, is seeded with some sample transactions.
pub(crate) struct TestSheet {
    rows: Vec<Vec<String>>,
    read_only: bool,
    write_only: bool,
}

impl TestSheet {
    /// Create a new `TestSheet` holding `rows`, header row first.
    pub(crate) fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            read_only: false,
            write_only: false,
        }
    }

    /// A sheet with no rows at all, not even headers.
    pub(crate) fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A sheet that fails every append, as a sheet shared as "Viewer" would.
    #[cfg(test)]
    pub(crate) fn read_only(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            read_only: true,
            write_only: false,
        }
    }

    /// A sheet that accepts appends but fails every read.
    #[cfg(test)]
    pub(crate) fn write_only(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            read_only: false,
            write_only: true,
        }
    }

    /// Parses CSV text into a `TestSheet`.
    pub(crate) fn from_csv(csv_data: &str) -> Res<Self> {
        Ok(Self::new(load_csv(csv_data)?))
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self) -> Res<Vec<Vec<String>>> {
        if self.write_only {
            bail!("The service is currently unavailable");
        }
        Ok(self.rows.clone())
    }

    async fn append(&mut self, row: &[Cell]) -> Res<()> {
        if self.read_only {
            bail!("The caller does not have permission to write to this sheet");
        }
        self.rows.push(row.iter().map(|cell| cell.to_string()).collect());
        Ok(())
    }
}

impl Default for TestSheet {
    /// Loads seed data from this module.
    fn default() -> Self {
        // SEED_DATA is checked by test_seed_data_parses
        Self::from_csv(SEED_DATA).unwrap_or_else(|_| Self::empty())
    }
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Res<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Unable to parse CSV test data")?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed transaction data.
const SEED_DATA: &str = r##"Date,Item,Category,Amount,Type,Notes
2025-08-01,August salary,Salary,"85,000",Income,
2025-08-02,Rent,Rent,22000,Expense,Paid by bank transfer
2025-08-05,Groceries,Food,2350.75,Expense,
2025-08-09,Metro card,Transport,500,Expense,
2025-08-14,Electricity,Bills,1843.20,Expense,
2025-08-20,Index fund SIP,Other,10000,Investment,Monthly SIP
2025-08-23,Headphones,Shopping,3499,Expense,
2025-09-01,September salary,Salary,"85,000",Income,
2025-09-02,Rent,Rent,22000,Expense,
2025-09-04,Coffee,Food,180,Expense,
2025-09-06,Cab to airport,Transport,740.50,Expense,
2025-09-11,Mobile recharge,Bills,599,Expense,
2025-09-15,Dinner out,Food,1620,Expense,Birthday
,Cash gift,Other,2000,Expense,Date not recorded
2025-09-18,Refund,Shopping,n/a,Expense,Amount still pending
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_seed_data_parses() {
        let rows = load_csv(SEED_DATA).unwrap();
        assert_eq!(rows.len(), 16);
        assert_eq!(
            rows[0],
            vec!["Date", "Item", "Category", "Amount", "Type", "Notes"]
        );
        assert_eq!(rows[1][3], "85,000");
    }

    #[tokio::test]
    async fn test_append() {
        let mut sheet = TestSheet::empty();
        sheet
            .append(&[
                Cell::Text("2024-01-05".into()),
                Cell::Number(Decimal::new(450, 2)),
            ])
            .await
            .unwrap();
        assert_eq!(sheet.get().await.unwrap(), vec![vec!["2024-01-05", "4.5"]]);
    }

    #[tokio::test]
    async fn test_read_only_append_fails() {
        let mut sheet = TestSheet::read_only(Vec::new());
        let err = sheet.append(&[Cell::Text("x".into())]).await.unwrap_err();
        assert!(err.to_string().contains("permission"));
        assert!(sheet.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_only_get_fails() {
        let mut sheet = TestSheet::write_only(Vec::new());
        sheet.append(&[Cell::Text("x".into())]).await.unwrap();
        assert!(sheet.get().await.is_err());
    }
}
