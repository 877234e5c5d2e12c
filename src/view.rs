//! Text rendering of the dashboard and the analysis. These are pure functions from report data to
//! a `String` so the commands can decide where the text goes.

use crate::model::Amount;
use crate::report::{Analysis, Dashboard};
use comfy_table::{Cell, CellAlignment, Table};
use rust_decimal::prelude::ToPrimitive;

pub(crate) const NO_DATA: &str = "No data found. Run 'spend add' to start tracking!";
pub(crate) const NO_ANALYTICS: &str = "Add data to see analytics.";

const BAR_WIDTH: usize = 30;

pub(crate) fn format_dashboard(dashboard: &Dashboard, symbol: &str) -> String {
    if dashboard.transaction_count == 0 {
        return NO_DATA.to_string();
    }

    let mut metrics = Table::new();
    metrics.set_header(vec!["Total Expense", "Total Income", "Balance"]);
    metrics.add_row(vec![
        money(dashboard.total_expense, symbol),
        money(dashboard.total_income, symbol),
        money(dashboard.balance, symbol),
    ]);

    let mut recent = Table::new();
    recent.set_header(vec!["Date", "Item", "Category", "Amount", "Type", "Notes"]);
    for t in &dashboard.recent {
        recent.add_row(vec![
            Cell::new(t.date().map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(t.item()),
            Cell::new(t.category()),
            money(t.amount(), symbol),
            Cell::new(t.r#type()),
            Cell::new(t.notes()),
        ]);
    }

    format!("Overview\n{metrics}\n\nRecent Activity\n{recent}")
}

pub(crate) fn format_analysis(analysis: &Analysis, symbol: &str) -> String {
    if analysis.transaction_count == 0 {
        return NO_ANALYTICS.to_string();
    }

    let mut categories = Table::new();
    categories.set_header(vec!["Category", "Spent"]);
    for c in &analysis.category_breakdown {
        categories.add_row(vec![Cell::new(&c.category), money(c.amount, symbol)]);
    }

    let max = analysis
        .monthly_trend
        .iter()
        .map(|m| m.amount)
        .max()
        .unwrap_or(Amount::ZERO);
    let mut trend = Table::new();
    trend.set_header(vec!["Month", "Spent", ""]);
    for m in &analysis.monthly_trend {
        trend.add_row(vec![
            Cell::new(m.label()),
            money(m.amount, symbol),
            Cell::new(bar(m.amount, max)),
        ]);
    }

    format!("Spending by Category\n{categories}\n\nMonthly Trend\n{trend}")
}

fn money(amount: Amount, symbol: &str) -> Cell {
    Cell::new(amount.format(symbol)).set_alignment(CellAlignment::Right)
}

/// A bar proportional to `amount / max`, at most `BAR_WIDTH` characters long.
fn bar(amount: Amount, max: Amount) -> String {
    if max <= Amount::ZERO || amount.is_negative() {
        return String::new();
    }
    let ratio = (amount.value() / max.value()).to_f64().unwrap_or_default();
    let len = (ratio * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionTable;

    fn table() -> TransactionTable {
        TransactionTable::parse(vec![
            vec!["Date", "Item", "Category", "Amount", "Type", "Notes"],
            vec!["2024-01-05", "Coffee", "Food", "4.50", "Expense", ""],
            vec!["2024-01-10", "Salary", "Salary", "1000", "Income", ""],
            vec!["2024-02-01", "Rent", "Rent", "9", "Expense", "Feb"],
        ])
    }

    #[test]
    fn test_format_dashboard() {
        let text = format_dashboard(&Dashboard::new(&table(), 5), "$");
        assert!(text.contains("Total Expense"));
        assert!(text.contains("$13.50"));
        assert!(text.contains("$1,000.00"));
        assert!(text.contains("$986.50"));
        assert!(text.contains("Coffee"));
        assert!(text.contains("Recent Activity"));
    }

    #[test]
    fn test_format_dashboard_empty() {
        let text = format_dashboard(&Dashboard::new(&TransactionTable::empty(), 5), "$");
        assert_eq!(text, NO_DATA);
    }

    #[test]
    fn test_format_analysis() {
        let text = format_analysis(&Analysis::new(&table()), "₹");
        assert!(text.contains("Spending by Category"));
        assert!(text.contains("2024-01"));
        assert!(text.contains("2024-02"));
        assert!(text.contains("₹9.00"));
        assert!(text.contains(&"█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_format_analysis_empty() {
        let text = format_analysis(&Analysis::new(&TransactionTable::empty()), "₹");
        assert_eq!(text, NO_ANALYTICS);
    }

    #[test]
    fn test_bar() {
        let max = Amount::coerce("10");
        assert_eq!(bar(Amount::coerce("5"), max), "█".repeat(15));
        assert_eq!(bar(Amount::coerce("10"), max), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(Amount::ZERO, max), "");
        assert_eq!(bar(Amount::coerce("1"), Amount::ZERO), "");
    }
}
