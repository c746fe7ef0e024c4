use crate::error::RowRejection;
use crate::transaction::{parse_row, RawRow, Transaction};

use log::{debug, error, info, warn};

/// A row that was rejected during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub reason: RowRejection,
}

impl Diagnostic {
    pub fn line(&self) -> Option<u64> {
        self.reason.line()
    }
}

/// What happened to a single ingested row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Appended,
    Ignored,
    Rejected,
}

/// Counts for one begin/finish run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub appended: usize,
    pub ignored: usize,
    pub rejected: usize,
    pub invalid_dates: usize,
}

/// Accumulates transactions for the lifetime of its owner.
///
/// `begin_loading` does not clear what earlier runs accumulated; call
/// [`ImportSession::clear`] for that.
#[derive(Debug, Default)]
pub struct ImportSession {
    is_loading: bool,
    loading_label: Option<String>,
    records: Vec<Transaction>,
    diagnostics: Vec<Diagnostic>,
    summary: ImportSummary,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_loading(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.records.is_empty() {
            debug!(
                "Starting \"{}\" with {} records kept from earlier imports",
                label,
                self.records.len()
            );
        }
        self.is_loading = true;
        self.loading_label = Some(label);
        self.summary = ImportSummary::default();
    }

    pub fn ingest_row(&mut self, row: &RawRow) -> RowOutcome {
        match parse_row(row) {
            Ok(tx) => {
                if !tx.has_valid_date() {
                    warn!(
                        "Unparseable date {:?}{}, keeping record",
                        tx.date.to_string(),
                        row.line.map(|l| format!(" at line {l}")).unwrap_or_default()
                    );
                    self.summary.invalid_dates += 1;
                }
                self.records.push(tx);
                self.summary.appended += 1;
                RowOutcome::Appended
            }
            Err(RowRejection::Ignored) => {
                self.summary.ignored += 1;
                RowOutcome::Ignored
            }
            Err(reason) => {
                error!("Failed to parse record: {} {:?}", reason, row.data);
                self.diagnostics.push(Diagnostic { reason });
                self.summary.rejected += 1;
                RowOutcome::Rejected
            }
        }
    }

    pub fn finish_loading(&mut self) -> ImportSummary {
        let label = self.loading_label.take().unwrap_or_default();
        self.is_loading = false;

        for tx in self.last_run_records() {
            debug!("{:?}", tx);
        }
        info!(
            "Finished \"{}\": {} appended, {} rejected, {} ignored, {} with invalid dates ({} records total)",
            label,
            self.summary.appended,
            self.summary.rejected,
            self.summary.ignored,
            self.summary.invalid_dates,
            self.records.len()
        );

        self.summary
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.diagnostics.clear();
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn loading_label(&self) -> Option<&str> {
        self.loading_label.as_deref()
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// Records appended since the last `begin_loading`.
    pub fn last_run_records(&self) -> &[Transaction] {
        let start = self.records.len().saturating_sub(self.summary.appended);
        &self.records[start..]
    }

    pub fn has_records(&self) -> bool {
        !self.is_loading && !self.records.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
