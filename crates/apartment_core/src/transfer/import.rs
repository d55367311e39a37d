//! Bulk loader: tabular file into the record store.
//!
//! # Invariants
//! - The whole source is parsed before the store is touched.
//! - Exactly one header row is skipped.
//! - Rows with fewer than three columns are skipped, not rejected.
//! - All candidate rows are applied in one transaction; later rows for a
//!   repeated `id` win.

use super::{format_for, read_rows, TransferError, TransferFormat, TransferResult};
use crate::model::apartment::Apartment;
use crate::repo::apartment_repo::ApartmentRepository;
use log::{error, info};
use std::path::Path;
use std::time::Instant;

const MIN_COLUMNS: usize = 3;

/// Outcome of a successful bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Data rows read after the header.
    pub rows_read: usize,
    /// Rows upserted into the store.
    pub imported: usize,
    /// Rows skipped for having fewer than three columns.
    pub skipped: usize,
}

/// Loads `path` (`.csv` or `.xlsx`) into the store all-or-nothing.
///
/// # Errors
/// - `UnsupportedFormat` for any other extension.
/// - `Import` when the file cannot be read, has no header row, or is a
///   spreadsheet without data rows. A header-only CSV imports nothing.
/// - `InvalidRow` when a row has an empty apartment ID.
/// - `Storage` when the transaction fails; nothing is persisted.
pub fn bulk_load<R>(repo: &R, path: &Path) -> TransferResult<ImportSummary>
where
    R: ApartmentRepository + ?Sized,
{
    let started_at = Instant::now();
    let result = load(repo, path);
    match &result {
        Ok(summary) => info!(
            "event=apartment_import module=transfer status=ok rows_read={} imported={} skipped={} duration_ms={}",
            summary.rows_read,
            summary.imported,
            summary.skipped,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=apartment_import module=transfer status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn load<R>(repo: &R, path: &Path) -> TransferResult<ImportSummary>
where
    R: ApartmentRepository + ?Sized,
{
    let format = format_for(path)?;
    info!(
        "event=apartment_import module=transfer status=start format={}",
        format.as_str()
    );

    let rows = read_rows(format, path).map_err(|err| TransferError::import(path, err))?;
    let (candidates, summary) = collect_candidates(path, format, &rows)?;

    let imported = repo.upsert_batch(&candidates)?;
    Ok(ImportSummary {
        imported,
        ..summary
    })
}

fn collect_candidates(
    path: &Path,
    format: TransferFormat,
    rows: &[Vec<String>],
) -> TransferResult<(Vec<Apartment>, ImportSummary)> {
    let Some((_header, data_rows)) = rows.split_first() else {
        return Err(TransferError::import(path, "missing header row"));
    };
    if data_rows.is_empty() && format == TransferFormat::Xlsx {
        return Err(TransferError::import(path, "no data rows after header"));
    }

    let mut candidates = Vec::with_capacity(data_rows.len());
    let mut summary = ImportSummary {
        rows_read: data_rows.len(),
        ..ImportSummary::default()
    };

    // Source row 1 is the header.
    for (row_number, row) in (2..).zip(data_rows) {
        if row.len() < MIN_COLUMNS {
            summary.skipped += 1;
            continue;
        }

        let apartment = Apartment::new(row[0].as_str(), row[1].as_str(), &row[2])
            .map_err(|error| TransferError::InvalidRow {
                row: row_number,
                error,
            })?;
        candidates.push(apartment);
    }

    Ok((candidates, summary))
}

#[cfg(test)]
mod tests {
    use super::{collect_candidates, ImportSummary};
    use crate::transfer::{TransferError, TransferFormat};
    use std::path::Path;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn short_rows_are_counted_as_skipped() {
        let source = rows(&[
            &["Apartment ID", "Owner", "Resident"],
            &["A-1", "Alice", "Alice"],
            &["A-2", "Bob"],
            &[],
            &["A-3", "Carol", "", "ignored extra"],
        ]);

        let (candidates, summary) =
            collect_candidates(Path::new("in.csv"), TransferFormat::Csv, &source).unwrap();
        assert_eq!(summary.rows_read, 4);
        assert_eq!(summary.skipped, 2);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].resident(), "Vacant");
    }

    #[test]
    fn header_only_spreadsheet_is_rejected_but_csv_is_empty_import() {
        let source = rows(&[&["Apartment ID", "Owner", "Resident"]]);
        let err = collect_candidates(Path::new("in.xlsx"), TransferFormat::Xlsx, &source)
            .unwrap_err();
        assert!(matches!(err, TransferError::Import { .. }));

        let (candidates, summary) =
            collect_candidates(Path::new("in.csv"), TransferFormat::Csv, &source).unwrap();
        assert!(candidates.is_empty());
        assert_eq!(summary, ImportSummary::default());
    }

    #[test]
    fn missing_header_is_rejected_for_both_formats() {
        for format in [TransferFormat::Csv, TransferFormat::Xlsx] {
            let err = collect_candidates(Path::new("in"), format, &[]).unwrap_err();
            assert!(err.to_string().contains("missing header row"));
        }
    }

    #[test]
    fn empty_id_reports_source_row_number() {
        let source = rows(&[
            &["Apartment ID", "Owner", "Resident"],
            &["A-1", "Alice", "Alice"],
            &["", "Bob", "Bob"],
        ]);

        let err =
            collect_candidates(Path::new("in.csv"), TransferFormat::Csv, &source).unwrap_err();
        assert!(matches!(err, TransferError::InvalidRow { row: 3, .. }));
    }
}
