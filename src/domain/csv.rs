//! CSV encoding of an extracted table snapshot.
//!
//! This is the one place where byte-exact behavior matters: the landed file
//! is the parsing contract with downstream stages. The encoding is RFC 4180
//! CSV — a header row of comma-joined column names, one line per row with a
//! `\n` terminator, fields quoted only when they contain the delimiter, a
//! quote, or a line break, and NULL rendered as the empty field. The output
//! is deterministic for identical input; rows keep their extracted order.

use crate::domain::entities::TableData;
use crate::domain::errors::{LandingError, Result};
use csv::WriterBuilder;

fn encode_err(e: csv::Error) -> LandingError {
    LandingError::Io(std::io::Error::other(e))
}

/// Serializes a table snapshot to CSV bytes.
pub fn serialize(data: &TableData) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());

    wtr.write_record(&data.columns).map_err(encode_err)?;

    let mut record = Vec::with_capacity(data.columns.len());
    for row in &data.rows {
        record.clear();
        for cell in row {
            record.push(cell.as_field());
        }
        wtr.write_record(&record).map_err(encode_err)?;
    }

    wtr.into_inner()
        .map_err(|e| LandingError::Io(e.into_error()))
}
