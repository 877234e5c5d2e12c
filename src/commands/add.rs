use crate::commands::Out;
use crate::entry::Entry;
use crate::report::Dashboard;
use crate::{view, Result, Session};

/// Appends `entry` to the sheet, then reloads the whole sheet and returns the refreshed dashboard.
/// Nothing is cached between the write and the reload, so the dashboard always reflects what the
/// sheet holds.
pub async fn add(session: &mut Session, entry: Entry) -> Result<Out<Dashboard>> {
    session.submit(&entry).await?;
    let table = session.load().await.map_err(|e| {
        e.context(format!(
            "Saved '{}' but could not reload the sheet, do not add it again",
            entry.item()
        ))
    })?;
    let dashboard = Dashboard::new(&table, session.config().recent_count());
    let text = view::format_dashboard(&dashboard, session.config().currency_symbol());
    Ok(Out::new(
        format!("Saved '{}'\n\n{text}", entry.item()),
        dashboard,
    ))
}
