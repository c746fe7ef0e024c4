use crate::error::ReportError;
use crate::transaction::Transaction;

use serde::Serialize;
use std::io::Write;

const HEADER: [&str; 10] = [
    "date",
    "currency",
    "amount",
    "balance",
    "credit",
    "debit",
    "other_account",
    "other_name",
    "structured_comment",
    "free_comment",
];

// Field order follows HEADER.
#[derive(Debug, Serialize)]
struct RecordRow<'a> {
    date: String,
    currency: &'a str,
    amount: &'a str,
    balance: &'a str,
    credit: &'a str,
    debit: &'a str,
    other_account: &'a str,
    other_name: &'a str,
    structured_comment: &'a str,
    free_comment: &'a str,
}

impl<'a> From<&'a Transaction> for RecordRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            date: tx.date.to_string(),
            currency: &tx.currency,
            amount: &tx.amount,
            balance: &tx.balance,
            credit: &tx.credit,
            debit: &tx.debit,
            other_account: &tx.other_account,
            other_name: &tx.other_name,
            structured_comment: &tx.structured_comment,
            free_comment: &tx.free_comment,
        }
    }
}

/// Writes records as CSV, header first. Valid dates are written as
/// `YYYY-MM-DD`, invalid ones as the text found in the export.
pub fn dump_records<W: Write>(records: &[Transaction], writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for tx in records {
        wtr.serialize(RecordRow::from(tx))?;
    }

    wtr.flush()?;
    Ok(())
}
