//! Bulk exporter: record store into a tabular file.

use super::{format_for, open_sink, RowSink, TransferError, TransferResult};
use crate::model::apartment::Apartment;
use crate::repo::apartment_repo::ApartmentRepository;
use log::{error, info};
use std::path::Path;
use std::time::Instant;

/// Fixed header row written by every export.
pub const EXPORT_HEADER: [&str; 4] = ["Apartment ID", "Owner", "Resident", "Owner is Resident"];

/// Outcome of a successful export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Data rows written after the header.
    pub written: usize,
}

/// Writes every stored record to `path` (`.csv` or `.xlsx`) in ascending
/// `id` order.
///
/// # Errors
/// - `UnsupportedFormat` for any other extension.
/// - `Storage` when records cannot be read.
/// - `Export` when the destination cannot be created or written.
pub fn bulk_export<R>(repo: &R, path: &Path) -> TransferResult<ExportSummary>
where
    R: ApartmentRepository + ?Sized,
{
    let started_at = Instant::now();
    let result = export(repo, path);
    match &result {
        Ok(summary) => info!(
            "event=apartment_export module=transfer status=ok written={} duration_ms={}",
            summary.written,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=apartment_export module=transfer status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn export<R>(repo: &R, path: &Path) -> TransferResult<ExportSummary>
where
    R: ApartmentRepository + ?Sized,
{
    let format = format_for(path)?;
    info!(
        "event=apartment_export module=transfer status=start format={}",
        format.as_str()
    );

    let apartments = repo.list_apartments()?;
    let sink = open_sink(format, path).map_err(|err| TransferError::export(path, err))?;
    write_all(sink, &apartments).map_err(|err| TransferError::export(path, err))?;

    Ok(ExportSummary {
        written: apartments.len(),
    })
}

fn write_all(
    mut sink: Box<dyn RowSink>,
    apartments: &[Apartment],
) -> Result<(), super::CodecError> {
    sink.write_header(&EXPORT_HEADER)?;
    for apartment in apartments {
        sink.write_row(&[
            apartment.id(),
            apartment.owner(),
            apartment.resident(),
            same_flag_label(apartment.same_flag()),
        ])?;
    }
    sink.finish()
}

/// Renders the derived flag the way exports show it.
pub fn same_flag_label(same_flag: bool) -> &'static str {
    if same_flag {
        "Yes"
    } else {
        "No"
    }
}
