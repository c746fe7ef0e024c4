use crate::error::RowRejection;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Fixed column layout of a statement export. Indices are 0-based.
pub mod columns {
    pub const FIELD_COUNT: usize = 18;

    pub const DATE: usize = 5;
    pub const CURRENCY: usize = 7;
    pub const AMOUNT: usize = 8;
    pub const BALANCE: usize = 9;
    pub const CREDIT: usize = 10;
    pub const DEBIT: usize = 11;
    pub const OTHER_ACCOUNT: usize = 12;
    pub const OTHER_NAME: usize = 14;
    pub const STRUCTURED_COMMENT: usize = 16;
    pub const FREE_COMMENT: usize = 17;

    /// `dd/MM/yyyy`
    pub const DATE_FORMAT: &str = "%d/%m/%Y";
}

/// One tokenized line as handed over by the row source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source file, when known.
    pub line: Option<u64>,
    pub data: Vec<String>,
    pub errors: Vec<String>,
}

impl RawRow {
    pub fn new<I, S>(data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            line: None,
            data: data.into_iter().map(Into::into).collect(),
            errors: Vec::new(),
        }
    }

    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// A single empty field, which is what a trailing blank line tokenizes to.
    pub fn is_blank(&self) -> bool {
        self.data.len() == 1 && self.data[0].is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionDate {
    Valid(NaiveDate),
    /// The trimmed text that did not match `dd/MM/yyyy`.
    Invalid(String),
}

impl TransactionDate {
    pub fn parse(raw: &str) -> Self {
        if has_date_shape(raw) {
            if let Ok(date) = NaiveDate::parse_from_str(raw, columns::DATE_FORMAT) {
                return TransactionDate::Valid(date);
            }
        }
        TransactionDate::Invalid(raw.to_string())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TransactionDate::Valid(_))
    }
}

impl fmt::Display for TransactionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionDate::Valid(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            TransactionDate::Invalid(raw) => f.write_str(raw),
        }
    }
}

// chrono accepts single-digit days and months, so the two-digit shape is
// checked up front.
fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: TransactionDate,
    pub currency: String,
    pub amount: String,
    pub balance: String,
    pub credit: String,
    pub debit: String,
    pub other_account: String,
    pub other_name: String,
    pub structured_comment: String,
    pub free_comment: String,
}

impl TryFrom<&RawRow> for Transaction {
    type Error = RowRejection;

    fn try_from(row: &RawRow) -> Result<Self, Self::Error> {
        parse_row(row)
    }
}

/// Maps one raw row to a transaction.
///
/// The blank sentinel row is checked before anything else and comes back as
/// [`RowRejection::Ignored`]. Rows with the wrong number of fields, or with
/// errors reported by the tokenizer, are [`RowRejection::Malformed`]. A row
/// whose date does not parse still yields a transaction, with the date
/// marked [`TransactionDate::Invalid`].
pub fn parse_row(row: &RawRow) -> Result<Transaction, RowRejection> {
    if row.is_blank() {
        return Err(RowRejection::Ignored);
    }

    if row.data.len() != columns::FIELD_COUNT || !row.errors.is_empty() {
        return Err(RowRejection::Malformed {
            line: row.line,
            expected: columns::FIELD_COUNT,
            field_count: row.data.len(),
            errors: row.errors.clone(),
        });
    }

    let field = |index: usize| row.data[index].trim().to_string();

    Ok(Transaction {
        date: TransactionDate::parse(row.data[columns::DATE].trim()),
        currency: field(columns::CURRENCY),
        amount: field(columns::AMOUNT),
        balance: field(columns::BALANCE),
        credit: field(columns::CREDIT),
        debit: field(columns::DEBIT),
        other_account: field(columns::OTHER_ACCOUNT),
        other_name: field(columns::OTHER_NAME),
        structured_comment: field(columns::STRUCTURED_COMMENT),
        free_comment: field(columns::FREE_COMMENT),
    })
}

impl Transaction {
    pub fn has_valid_date(&self) -> bool {
        self.date.is_valid()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self.date {
            TransactionDate::Valid(date) => Some(date),
            TransactionDate::Invalid(_) => None,
        }
    }

    pub fn amount_decimal(&self) -> Option<Decimal> {
        parse_decimal(&self.amount)
    }

    pub fn balance_decimal(&self) -> Option<Decimal> {
        parse_decimal(&self.balance)
    }
}

// Exports use either '.' or ',' as the decimal separator.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_str(&raw.replace(',', ".")))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement_row() -> Vec<String> {
        (0..columns::FIELD_COUNT)
            .map(|i| format!(" col{} ", i))
            .collect()
    }

    fn row_with(overrides: &[(usize, &str)]) -> RawRow {
        let mut data = statement_row();
        for (index, value) in overrides {
            data[*index] = value.to_string();
        }
        RawRow::new(data)
    }

    mod parse_row_tests {
        use super::*;

        #[test]
        fn test_extracts_and_trims_fixed_columns() {
            let row = row_with(&[(columns::DATE, " 31/12/2023 ")]);
            let tx = parse_row(&row).unwrap();

            assert_eq!(
                tx.date,
                TransactionDate::Valid(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
            );
            assert_eq!(tx.currency, "col7");
            assert_eq!(tx.amount, "col8");
            assert_eq!(tx.balance, "col9");
            assert_eq!(tx.credit, "col10");
            assert_eq!(tx.debit, "col11");
            assert_eq!(tx.other_account, "col12");
            assert_eq!(tx.other_name, "col14");
            assert_eq!(tx.structured_comment, "col16");
            assert_eq!(tx.free_comment, "col17");
        }

        #[test]
        fn test_blank_row_is_ignored() {
            assert_eq!(parse_row(&RawRow::new([""])), Err(RowRejection::Ignored));
        }

        #[test]
        fn test_blank_row_with_errors_is_still_ignored() {
            let row = RawRow::new([""]).with_error("trailing quote");
            assert_eq!(parse_row(&row), Err(RowRejection::Ignored));
        }

        #[test]
        fn test_single_non_empty_field_is_malformed() {
            let result = parse_row(&RawRow::new(["garbage"]));
            assert!(matches!(
                result,
                Err(RowRejection::Malformed { field_count: 1, .. })
            ));
        }

        #[test]
        fn test_whitespace_only_single_field_is_malformed() {
            let result = parse_row(&RawRow::new(["  "]));
            assert!(matches!(result, Err(RowRejection::Malformed { .. })));
        }

        #[test]
        fn test_short_row_is_malformed() {
            let row = RawRow::new(["a", "b", "c", "d", "e"]).at_line(4);

            match parse_row(&row) {
                Err(RowRejection::Malformed {
                    line,
                    expected,
                    field_count,
                    errors,
                }) => {
                    assert_eq!(line, Some(4));
                    assert_eq!(expected, 18);
                    assert_eq!(field_count, 5);
                    assert!(errors.is_empty());
                }
                other => panic!("Expected Malformed, got {:?}", other),
            }
        }

        #[test]
        fn test_long_row_is_malformed() {
            let mut data = statement_row();
            data.push("extra".to_string());
            let result = parse_row(&RawRow::new(data));
            assert!(matches!(
                result,
                Err(RowRejection::Malformed { field_count: 19, .. })
            ));
        }

        #[test]
        fn test_row_with_tokenizer_errors_is_malformed() {
            let row = row_with(&[]).with_error("unterminated quote");

            match parse_row(&row) {
                Err(RowRejection::Malformed { errors, .. }) => {
                    assert_eq!(errors, vec!["unterminated quote".to_string()]);
                }
                other => panic!("Expected Malformed, got {:?}", other),
            }
        }

        #[test]
        fn test_invalid_date_still_builds_transaction() {
            let row = row_with(&[(columns::DATE, "31/13/2023"), (columns::AMOUNT, "10.00")]);
            let tx = parse_row(&row).unwrap();

            assert_eq!(tx.date, TransactionDate::Invalid("31/13/2023".to_string()));
            assert!(!tx.has_valid_date());
            assert_eq!(tx.date(), None);
            assert_eq!(tx.amount, "10.00");
        }

        #[test]
        fn test_try_from_matches_parse_row() {
            let row = row_with(&[(columns::DATE, "01/01/2024")]);
            assert_eq!(Transaction::try_from(&row), parse_row(&row));
        }

        #[test]
        fn test_rejection_line() {
            let malformed = parse_row(&RawRow::new(["a"]).at_line(12)).unwrap_err();
            assert_eq!(malformed.line(), Some(12));

            let unnumbered = parse_row(&RawRow::new(["a"])).unwrap_err();
            assert_eq!(unnumbered.line(), None);

            assert_eq!(RowRejection::Ignored.line(), None);
        }

        #[test]
        fn test_malformed_display_names_line_and_errors() {
            let row = RawRow::new(["a", "b"]).at_line(9).with_error("bad quote");
            let message = parse_row(&row).unwrap_err().to_string();

            assert_eq!(
                message,
                "malformed row at line 9: expected 18 fields, got 2 (bad quote)"
            );
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn test_parses_valid_date() {
            assert_eq!(
                TransactionDate::parse("31/12/2023"),
                TransactionDate::Valid(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
            );
        }

        #[test]
        fn test_rejects_invalid_month() {
            assert!(!TransactionDate::parse("31/13/2023").is_valid());
        }

        #[test]
        fn test_rejects_impossible_day() {
            assert!(!TransactionDate::parse("30/02/2024").is_valid());
            assert!(TransactionDate::parse("29/02/2024").is_valid());
        }

        #[test]
        fn test_rejects_single_digit_parts() {
            assert!(!TransactionDate::parse("1/1/2024").is_valid());
            assert!(!TransactionDate::parse("01/1/2024").is_valid());
        }

        #[test]
        fn test_rejects_other_layouts() {
            assert!(!TransactionDate::parse("2023-12-31").is_valid());
            assert!(!TransactionDate::parse("31-12-2023").is_valid());
            assert!(!TransactionDate::parse("31/12/23").is_valid());
            assert!(!TransactionDate::parse("").is_valid());
        }

        #[test]
        fn test_display() {
            assert_eq!(TransactionDate::parse("05/03/2024").to_string(), "2024-03-05");
            assert_eq!(TransactionDate::parse("soon").to_string(), "soon");
        }
    }

    mod decimal_tests {
        use super::*;

        #[test]
        fn test_amount_with_dot_separator() {
            let tx = parse_row(&row_with(&[(columns::AMOUNT, "-12.50")])).unwrap();
            assert_eq!(tx.amount_decimal(), Some(Decimal::from_str("-12.50").unwrap()));
        }

        #[test]
        fn test_balance_with_comma_separator() {
            let tx = parse_row(&row_with(&[(columns::BALANCE, "1234,56")])).unwrap();
            assert_eq!(
                tx.balance_decimal(),
                Some(Decimal::from_str("1234.56").unwrap())
            );
        }

        #[test]
        fn test_empty_or_garbage_amount() {
            let tx = parse_row(&row_with(&[(columns::AMOUNT, " "), (columns::BALANCE, "n/a")]))
                .unwrap();
            assert_eq!(tx.amount_decimal(), None);
            assert_eq!(tx.balance_decimal(), None);
        }
    }
}
