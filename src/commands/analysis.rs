use crate::commands::Out;
use crate::report::Analysis;
use crate::{view, Result, Session};

/// Loads every transaction and breaks expenses down by category and by month.
pub async fn analysis(session: &mut Session) -> Result<Out<Analysis>> {
    let table = session.load().await?;
    let analysis = Analysis::new(&table);
    let text = view::format_analysis(&analysis, session.config().currency_symbol());
    Ok(Out::new(text, analysis))
}
