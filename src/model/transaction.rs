use crate::model::date::coerce_date;
use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// The `Type` value of rows that count toward total expense.
pub const EXPENSE: &str = "Expense";

/// The `Type` value of rows that count toward total income.
pub const INCOME: &str = "Income";

/// Represents every transaction read from the sheet, in sheet order, along with the sheet's
/// header row.
///
/// A table is a value: it is rebuilt from the sheet on every load and is never updated in place.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionTable {
    headers: Vec<String>,
    data: Vec<Transaction>,
}

impl Default for TransactionTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl TransactionTable {
    /// An empty table that still has the fixed set of columns.
    pub fn empty() -> Self {
        Self {
            headers: TransactionColumn::ALL
                .iter()
                .map(|c| c.header().to_string())
                .collect(),
            data: Vec::new(),
        }
    }

    /// Builds a table from raw sheet values. The first row is the header row and every following
    /// row is a record keyed by those headers. Short rows are padded with empty cells, cells
    /// beyond the last header are ignored and fully blank rows are skipped. Amount and Date cells
    /// are coerced and never cause an error.
    pub fn parse<S, R>(sheet_data: impl IntoIterator<Item = R>) -> Self
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = sheet_data.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.into_iter().map(|s| s.into()).collect(),
            None => return Self::empty(),
        };

        let mut data = Vec::new();
        for (row_ix, row) in rows.enumerate() {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                trace!("Skipping blank row {}", row_ix + 2);
                continue;
            }
            if values.len() > headers.len() {
                trace!(
                    "Row {} has {} cells but there are only {} headers",
                    row_ix + 2,
                    values.len(),
                    headers.len()
                );
            }
            data.push(Transaction::from_record(&headers, &values));
        }

        if data.is_empty() {
            return Self::empty();
        }
        Self { headers, data }
    }

    /// The column names, in sheet order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Represents a single row from the sheet after coercion.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) date: Option<NaiveDate>,
    pub(crate) item: String,
    pub(crate) category: String,
    pub(crate) amount: Amount,
    pub(crate) r#type: String,
    pub(crate) notes: String,
    /// Columns that the sheet has but that we do not use, keyed by header.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub(crate) other_fields: BTreeMap<String, String>,
}

impl Transaction {
    /// Builds a transaction from one sheet row. Missing cells are treated as empty.
    pub fn from_record<S1, S2>(headers: &[S1], values: &[S2]) -> Self
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let mut transaction = Transaction::default();
        for (ix, header) in headers.iter().enumerate() {
            let value = values.get(ix).map(|v| v.as_ref()).unwrap_or_default();
            transaction.set_with_header(header.as_ref(), value);
        }
        transaction
    }

    /// Sets the field that corresponds to `header`, coercing Date and Amount.
    pub fn set_with_header(&mut self, header: &str, value: &str) {
        match TransactionColumn::from_header(header) {
            Some(TransactionColumn::Date) => self.date = coerce_date(value),
            Some(TransactionColumn::Item) => self.item = value.to_string(),
            Some(TransactionColumn::Category) => self.category = value.to_string(),
            Some(TransactionColumn::Amount) => self.amount = Amount::coerce(value),
            Some(TransactionColumn::Type) => self.r#type = value.to_string(),
            Some(TransactionColumn::Notes) => self.notes = value.to_string(),
            None => {
                let _ = self
                    .other_fields
                    .insert(header.to_string(), value.to_string());
            }
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn other_fields(&self) -> &BTreeMap<String, String> {
        &self.other_fields
    }

    /// True only when `Type` is exactly "Expense".
    pub fn is_expense(&self) -> bool {
        self.r#type == EXPENSE
    }

    /// True only when `Type` is exactly "Income".
    pub fn is_income(&self) -> bool {
        self.r#type == INCOME
    }
}

/// The columns we know about. This is also the order in which a new row is written.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum TransactionColumn {
    Date,
    Item,
    Category,
    Amount,
    Type,
    Notes,
}

serde_plain::derive_display_from_serialize!(TransactionColumn);
serde_plain::derive_fromstr_from_deserialize!(TransactionColumn);

impl TransactionColumn {
    pub const ALL: [TransactionColumn; 6] = [
        TransactionColumn::Date,
        TransactionColumn::Item,
        TransactionColumn::Category,
        TransactionColumn::Amount,
        TransactionColumn::Type,
        TransactionColumn::Notes,
    ];

    /// Header lookup is exact, the same way a header keyed record would be.
    pub fn from_header(header: &str) -> Option<TransactionColumn> {
        match header {
            DATE_STR => Some(TransactionColumn::Date),
            ITEM_STR => Some(TransactionColumn::Item),
            CATEGORY_STR => Some(TransactionColumn::Category),
            AMOUNT_STR => Some(TransactionColumn::Amount),
            TYPE_STR => Some(TransactionColumn::Type),
            NOTES_STR => Some(TransactionColumn::Notes),
            _ => None,
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            TransactionColumn::Date => DATE_STR,
            TransactionColumn::Item => ITEM_STR,
            TransactionColumn::Category => CATEGORY_STR,
            TransactionColumn::Amount => AMOUNT_STR,
            TransactionColumn::Type => TYPE_STR,
            TransactionColumn::Notes => NOTES_STR,
        }
    }
}

const DATE_STR: &str = "Date";
const ITEM_STR: &str = "Item";
const CATEGORY_STR: &str = "Category";
const AMOUNT_STR: &str = "Amount";
const TYPE_STR: &str = "Type";
const NOTES_STR: &str = "Notes";

/// The transaction types offered when adding a transaction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum EntryType {
    #[default]
    Expense,
    Income,
    Investment,
}

serde_plain::derive_display_from_serialize!(EntryType);
serde_plain::derive_fromstr_from_deserialize!(EntryType);

/// The categories offered when adding a transaction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum EntryCategory {
    #[default]
    Food,
    Transport,
    Rent,
    Bills,
    Shopping,
    Salary,
    Other,
}

serde_plain::derive_display_from_serialize!(EntryCategory);
serde_plain::derive_fromstr_from_deserialize!(EntryCategory);
