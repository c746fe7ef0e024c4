use thiserror::Error;

/// Why a raw row did not become a transaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowRejection {
    /// Trailing blank line at the end of a file. Not an error.
    #[error("blank trailing row")]
    Ignored,

    #[error(
        "malformed row{}: expected {expected} fields, got {field_count}{}",
        at_line(.line),
        reported(.errors)
    )]
    Malformed {
        line: Option<u64>,
        expected: usize,
        field_count: usize,
        errors: Vec<String>,
    },
}

impl RowRejection {
    /// Line of the rejected row, when the source knew it.
    pub fn line(&self) -> Option<u64> {
        match self {
            RowRejection::Ignored => None,
            RowRejection::Malformed { line, .. } => *line,
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

fn reported(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(" ({})", errors.join("; "))
    }
}
