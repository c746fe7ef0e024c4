use crate::session::session::{ImportSession, ImportSummary};
use crate::transaction::RawRow;

use tokio::sync::mpsc;

/// Runs one import over the rows arriving on `rows`.
///
/// Rows are ingested in the order they are received. The session is
/// finished once every sender has been dropped; if that never happens the
/// future never resolves and the session stays loading.
pub async fn run_import(
    mut session: ImportSession,
    label: impl Into<String>,
    mut rows: mpsc::Receiver<RawRow>,
) -> (ImportSession, ImportSummary) {
    session.begin_loading(label);

    while let Some(row) = rows.recv().await {
        session.ingest_row(&row);
    }

    let summary = session.finish_loading();
    (session, summary)
}
