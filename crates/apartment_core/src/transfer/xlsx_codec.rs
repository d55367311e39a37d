//! XLSX row codec.
//!
//! Reads the first worksheet with `calamine` and writes a single styled
//! `Sheet1` with `rust_xlsxwriter`.

use super::{CodecError, RowSink};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const SHEET_NAME: &str = "Sheet1";
const COLUMN_WIDTH: f64 = 20.0;
const COLUMN_COUNT: u16 = 4;
const HEADER_FILL: u32 = 0xCCCCCC;

/// Reads the first worksheet into string rows.
///
/// Cells before the used range are kept as empty positions so column
/// indexes match what a user sees; trailing empty cells are dropped.
pub(super) fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, CodecError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or("workbook has no worksheets")??;

    let Some((start_row, start_col)) = range.start() else {
        return Ok(Vec::new());
    };

    let mut rows: Vec<Vec<String>> = (0..start_row).map(|_| Vec::new()).collect();
    for cells in range.rows() {
        let mut row: Vec<String> = (0..start_col).map(|_| String::new()).collect();
        row.extend(cells.iter().map(cell_text));
        while row.last().is_some_and(String::is_empty) {
            row.pop();
        }
        rows.push(row);
    }
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        other => other.to_string(),
    }
}

pub(super) struct XlsxSink {
    path: PathBuf,
    worksheet: Worksheet,
    header_format: Format,
    next_row: u32,
}

impl XlsxSink {
    /// Prepares an in-memory sheet; the file is written by `finish`.
    pub(super) fn create(path: &Path) -> Result<Self, CodecError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(SHEET_NAME)?;
        for column in 0..COLUMN_COUNT {
            worksheet.set_column_width(column, COLUMN_WIDTH)?;
        }

        let header_format = Format::new()
            .set_bold()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(HEADER_FILL));

        Ok(Self {
            path: path.to_path_buf(),
            worksheet,
            header_format,
            next_row: 0,
        })
    }
}

impl RowSink for XlsxSink {
    fn write_header(&mut self, header: &[&str]) -> Result<(), CodecError> {
        for (column, label) in (0u16..).zip(header) {
            self.worksheet
                .write_string_with_format(self.next_row, column, *label, &self.header_format)?;
        }
        self.next_row += 1;
        Ok(())
    }

    fn write_row(&mut self, row: &[&str]) -> Result<(), CodecError> {
        for (column, value) in (0u16..).zip(row) {
            // Empty strings stay blank cells; they read back as "".
            if value.is_empty() {
                continue;
            }
            self.worksheet.write_string(self.next_row, column, *value)?;
        }
        self.next_row += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<(), CodecError> {
        let XlsxSink {
            path, worksheet, ..
        } = *self;
        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        workbook.save(&path)?;
        Ok(())
    }
}
