use crate::commands::Out;
use crate::report::Dashboard;
use crate::{view, Result, Session};

/// Loads every transaction and summarizes them: total expense, total income, balance and the most
/// recent transactions.
pub async fn dashboard(session: &mut Session) -> Result<Out<Dashboard>> {
    let table = session.load().await?;
    let dashboard = Dashboard::new(&table, session.config().recent_count());
    let text = view::format_dashboard(&dashboard, session.config().currency_symbol());
    Ok(Out::new(text, dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestSheet;
    use crate::model::Amount;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_dashboard_seed_data() {
        let env = TestEnv::new().await;
        let mut session = Session::with_sheet(env.config(), TestSheet::default());
        let out = dashboard(&mut session).await.unwrap();
        let d = out.structure().unwrap();
        assert_eq!(d.transaction_count, 15);
        assert_eq!(d.recent.len(), 5);
        assert_eq!(d.recent[0].item(), "Refund");
        assert_eq!(d.balance, d.total_income - d.total_expense);
        assert_eq!(d.total_income, Amount::coerce("170000"));
        assert!(out.message().contains("₹170,000.00"));
    }

    #[tokio::test]
    async fn test_dashboard_empty() {
        let env = TestEnv::new().await;
        let mut session = Session::with_sheet(env.config(), TestSheet::empty());
        let out = dashboard(&mut session).await.unwrap();
        assert_eq!(out.message(), view::NO_DATA);
        assert_eq!(out.structure().unwrap().total_expense, Amount::ZERO);
    }
}
