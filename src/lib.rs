pub mod error;
pub mod report;
pub mod session;
pub mod transaction;

use crate::error::SourceError;
use crate::transaction::RawRow;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Field separator. Guessed from the first line when `None`.
    pub delimiter: Option<u8>,
    pub has_headers: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_headers: true,
        }
    }
}

/// Picks `;` or `,`, whichever the line contains more of. Works on raw
/// bytes since exports are not always UTF-8.
pub fn detect_delimiter(first_line: &[u8]) -> u8 {
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Streams every line of a statement export as a [`RawRow`].
///
/// Lines keep whatever number of fields they have; a line the tokenizer
/// could not read comes through with no data and the error attached.
pub fn stream_rows(
    path: impl AsRef<Path>,
    options: &SourceOptions,
) -> Result<impl Iterator<Item = RawRow>, SourceError> {
    let path = path.as_ref();
    let delimiter = match options.delimiter {
        Some(d) => d,
        None => {
            let mut first_line = Vec::new();
            BufReader::new(File::open(path)?).read_until(b'\n', &mut first_line)?;
            detect_delimiter(&first_line)
        }
    };

    Ok(read_rows(File::open(path)?, delimiter, options.has_headers))
}

/// Same as [`stream_rows`] over any reader, with the delimiter already known.
pub fn read_rows<R: Read>(
    reader: R,
    delimiter: u8,
    has_headers: bool,
) -> impl Iterator<Item = RawRow> {
    let rdr = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    // An IO error ends the stream, the reader would keep failing on it.
    let mut io_failed = false;
    rdr.into_records().map_while(move |result| {
        if io_failed {
            return None;
        }
        Some(match result {
            Ok(record) => RawRow {
                line: record.position().map(|p| p.line()),
                data: record.iter().map(String::from).collect(),
                errors: Vec::new(),
            },
            Err(e) => {
                io_failed = matches!(e.kind(), csv::ErrorKind::Io(_));
                RawRow {
                    line: e.position().map(|p| p.line()),
                    data: Vec::new(),
                    errors: vec![e.to_string()],
                }
            }
        })
    })
}
