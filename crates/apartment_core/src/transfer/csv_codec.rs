//! CSV row codec.

use super::{CodecError, RowSink};
use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::path::Path;

/// Reads every record as raw strings; records may differ in length.
pub(super) fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, CodecError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub(super) struct CsvSink {
    writer: Writer<File>,
}

impl CsvSink {
    pub(super) fn create(path: &Path) -> Result<Self, CodecError> {
        Ok(Self {
            writer: Writer::from_path(path)?,
        })
    }
}

impl RowSink for CsvSink {
    fn write_header(&mut self, header: &[&str]) -> Result<(), CodecError> {
        self.write_row(header)
    }

    fn write_row(&mut self, row: &[&str]) -> Result<(), CodecError> {
        self.writer.write_record(row)?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), CodecError> {
        self.writer.flush()?;
        Ok(())
    }
}
