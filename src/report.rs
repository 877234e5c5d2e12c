//! Read-only views computed over a `TransactionTable`.
//!
//! Nothing here mutates the table or keeps state; every view is recomputed from a freshly loaded
//! table.

use crate::model::{Amount, Transaction, TransactionTable};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The number of rows shown in the recent activity list unless configured otherwise.
pub const DEFAULT_RECENT: usize = 5;

/// Sum of `Amount` over rows whose `Type` is exactly "Expense".
pub fn total_expense(table: &TransactionTable) -> Amount {
    table
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount())
        .sum()
}

/// Sum of `Amount` over rows whose `Type` is exactly "Income".
pub fn total_income(table: &TransactionTable) -> Amount {
    table
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount())
        .sum()
}

/// `total_income - total_expense`. Rows of any other type do not count.
pub fn balance(table: &TransactionTable) -> Amount {
    total_income(table) - total_expense(table)
}

/// The `n` most recent transactions, newest first. Rows without a date sort after every dated
/// row, and rows with the same date keep their sheet order.
pub fn recent(table: &TransactionTable, n: usize) -> Vec<Transaction> {
    let mut rows: Vec<&Transaction> = table.iter().collect();
    // sort_by is stable
    rows.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    rows.into_iter().take(n).cloned().collect()
}

/// Total expense for one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Amount,
}

/// Expense rows grouped by `Category` and summed, largest first. Categories with equal totals
/// are ordered by name.
pub fn category_breakdown(table: &TransactionTable) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, Amount> = BTreeMap::new();
    for t in table.iter().filter(|t| t.is_expense()) {
        *groups.entry(t.category()).or_default() += t.amount();
    }
    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    // sort_by is stable, so ties keep the name order from the map
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map_err(serde::de::Error::custom)?;
        Ok(Month::of(date))
    }
}

/// Total expense for one month. A `month` of `None` is the bucket for rows that have no date.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: Option<Month>,
    pub amount: Amount,
}

impl MonthTotal {
    /// The month as shown to the user, e.g. "2024-01", or "Unknown".
    pub fn label(&self) -> String {
        match self.month {
            Some(month) => month.to_string(),
            None => String::from("Unknown"),
        }
    }
}

/// Expense rows grouped by the year and month of their date, oldest first. Rows without a date
/// are summed into a single "Unknown" bucket at the end so that the trend still adds up to total
/// expense.
pub fn monthly_trend(table: &TransactionTable) -> Vec<MonthTotal> {
    let mut months: BTreeMap<Month, Amount> = BTreeMap::new();
    let mut unknown: Option<Amount> = None;
    for t in table.iter().filter(|t| t.is_expense()) {
        match t.date() {
            Some(date) => *months.entry(Month::of(date)).or_default() += t.amount(),
            None => *unknown.get_or_insert(Amount::ZERO) += t.amount(),
        }
    }
    let mut trend: Vec<MonthTotal> = months
        .into_iter()
        .map(|(month, amount)| MonthTotal {
            month: Some(month),
            amount,
        })
        .collect();
    if let Some(amount) = unknown {
        trend.push(MonthTotal {
            month: None,
            amount,
        });
    }
    trend
}

/// The figures shown on the dashboard.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_expense: Amount,
    pub total_income: Amount,
    pub balance: Amount,
    pub recent: Vec<Transaction>,
    pub transaction_count: usize,
}

impl Dashboard {
    pub fn new(table: &TransactionTable, recent_count: usize) -> Self {
        Self {
            total_expense: total_expense(table),
            total_income: total_income(table),
            balance: balance(table),
            recent: recent(table, recent_count),
            transaction_count: table.len(),
        }
    }
}

/// The figures shown on the analysis view.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub category_breakdown: Vec<CategoryTotal>,
    pub monthly_trend: Vec<MonthTotal>,
    pub transaction_count: usize,
}

impl Analysis {
    pub fn new(table: &TransactionTable) -> Self {
        Self {
            category_breakdown: category_breakdown(table),
            monthly_trend: monthly_trend(table),
            transaction_count: table.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[&str; 6]]) -> TransactionTable {
        let mut data = vec![vec!["Date", "Item", "Category", "Amount", "Type", "Notes"]];
        data.extend(rows.iter().map(|r| r.to_vec()));
        TransactionTable::parse(data)
    }

    fn amt(n: i64) -> Amount {
        Amount::new(n.into())
    }

    fn sample() -> TransactionTable {
        table(&[
            ["2024-01-10", "Groceries", "Food", "100", "Expense", ""],
            ["2024-02-03", "Dinner", "Food", "50", "Expense", ""],
            ["2024-01-31", "Pay", "Salary", "1000", "Income", ""],
        ])
    }

    #[test]
    fn test_scenario_totals() {
        let t = sample();
        assert_eq!(total_expense(&t), amt(150));
        assert_eq!(total_income(&t), amt(1000));
        assert_eq!(balance(&t), amt(850));
        assert_eq!(
            category_breakdown(&t),
            vec![CategoryTotal {
                category: "Food".to_string(),
                amount: amt(150)
            }]
        );
    }

    #[test]
    fn test_expense_minus_income_is_negative_balance() {
        let t = table(&[
            ["2024-01-10", "Rent", "Rent", "1200", "Expense", ""],
            ["2024-01-11", "Pay", "Salary", "900", "Income", ""],
            ["2024-01-12", "Fund", "Other", "300", "Investment", ""],
            ["2024-01-13", "Odd", "Other", "77", "expense", ""],
        ]);
        assert_eq!(total_expense(&t) - total_income(&t), amt(0) - balance(&t));
        assert_eq!(balance(&t), amt(-300));
    }

    #[test]
    fn test_empty_table_aggregates() {
        let t = TransactionTable::empty();
        assert_eq!(total_expense(&t), Amount::ZERO);
        assert_eq!(total_income(&t), Amount::ZERO);
        assert_eq!(balance(&t), Amount::ZERO);
        assert!(recent(&t, DEFAULT_RECENT).is_empty());
        assert!(category_breakdown(&t).is_empty());
        assert!(monthly_trend(&t).is_empty());
    }

    #[test]
    fn test_recent_newest_first_nulls_last() {
        let t = table(&[
            ["2024-01-01", "a", "Food", "1", "Expense", ""],
            ["garbage", "b", "Food", "1", "Expense", ""],
            ["2024-03-01", "c", "Food", "1", "Expense", ""],
            ["2024-02-01", "d", "Food", "1", "Expense", ""],
            ["2024-03-01", "e", "Food", "1", "Expense", ""],
            ["", "f", "Food", "1", "Expense", ""],
        ]);
        let items: Vec<String> = recent(&t, 10).iter().map(|t| t.item().to_string()).collect();
        assert_eq!(items, vec!["c", "e", "d", "a", "b", "f"]);

        let items: Vec<String> = recent(&t, 2).iter().map(|t| t.item().to_string()).collect();
        assert_eq!(items, vec!["c", "e"]);
    }

    #[test]
    fn test_category_breakdown_sorted_and_sums_to_total() {
        let t = table(&[
            ["2024-01-01", "a", "Transport", "20", "Expense", ""],
            ["2024-01-02", "b", "Food", "30", "Expense", ""],
            ["2024-01-03", "c", "Bills", "20", "Expense", ""],
            ["2024-01-04", "d", "Transport", "15", "Expense", ""],
            ["2024-01-05", "e", "Salary", "500", "Income", ""],
            ["2024-01-06", "f", "Shopping", "20", "Expense", ""],
        ]);
        let breakdown = category_breakdown(&t);
        let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Food", "Bills", "Shopping"]);
        let sum: Amount = breakdown.iter().map(|c| c.amount).sum();
        assert_eq!(sum, total_expense(&t));
    }

    #[test]
    fn test_category_breakdown_ties_ordered_by_name() {
        let t = table(&[
            ["2024-01-01", "a", "Shopping", "20", "Expense", ""],
            ["2024-01-02", "b", "Bills", "20", "Expense", ""],
            ["2024-01-03", "c", "Transport", "5", "Expense", ""],
            ["2024-01-04", "d", "Food", "20", "Expense", ""],
        ]);
        let names: Vec<String> = category_breakdown(&t)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, vec!["Bills", "Food", "Shopping", "Transport"]);
    }

    #[test]
    fn test_huge_amounts_do_not_panic() {
        let max = "79228162514264337593543950335";
        let t = table(&[
            ["2024-01-01", "a", "Food", max, "Expense", ""],
            ["2024-01-02", "b", "Food", max, "Expense", ""],
            ["2024-01-03", "c", "Salary", max, "Income", ""],
        ]);
        assert_eq!(total_expense(&t).value(), rust_decimal::Decimal::MAX);
        assert_eq!(balance(&t), Amount::ZERO);
        assert_eq!(category_breakdown(&t)[0].amount, total_expense(&t));
        assert_eq!(monthly_trend(&t)[0].amount, total_expense(&t));
    }

    #[test]
    fn test_monthly_trend_chronological_with_unknown_bucket() {
        let t = table(&[
            ["2024-03-05", "a", "Food", "10", "Expense", ""],
            ["not a date", "b", "Food", "7", "Expense", ""],
            ["2023-12-31", "c", "Food", "5", "Expense", ""],
            ["2024-03-20", "d", "Food", "2.5", "Expense", ""],
            ["2024-01-15", "e", "Salary", "1000", "Income", ""],
        ]);
        let trend = monthly_trend(&t);
        let labels: Vec<String> = trend.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-03", "Unknown"]);
        assert_eq!(trend[1].amount, Amount::coerce("12.5"));
        let sum: Amount = trend.iter().map(|m| m.amount).sum();
        assert_eq!(sum, total_expense(&t));
    }

    #[test]
    fn test_month_serde() {
        let m = Month::new(2024, 1);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2024-01\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_dashboard_and_analysis() {
        let t = sample();
        let dashboard = Dashboard::new(&t, 2);
        assert_eq!(dashboard.balance, amt(850));
        assert_eq!(dashboard.recent.len(), 2);
        assert_eq!(dashboard.recent[0].item(), "Dinner");
        assert_eq!(dashboard.transaction_count, 3);

        let analysis = Analysis::new(&t);
        assert_eq!(analysis.category_breakdown.len(), 1);
        assert_eq!(analysis.monthly_trend.len(), 2);
    }
}
