//! Bulk import/export between the record store and tabular files.
//!
//! # Responsibility
//! - Select a CSV or XLSX codec from the file extension.
//! - Load files into the store atomically and dump the store to files.
//!
//! # Invariants
//! - Both formats share one row model: a row is a list of strings.
//! - A failed import leaves the store exactly as it was before the call.

use crate::model::apartment::ApartmentValidationError;
use crate::repo::apartment_repo::RepoError;
use std::error::Error;
use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

mod csv_codec;
pub mod export;
pub mod import;
mod xlsx_codec;

pub use export::{bulk_export, ExportSummary, EXPORT_HEADER};
pub use import::{bulk_load, ImportSummary};

/// Error payload produced by the third-party codecs.
pub type CodecError = Box<dyn Error + Send + Sync + 'static>;

pub type TransferResult<T> = Result<T, TransferError>;

/// Supported tabular file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFormat {
    Csv,
    Xlsx,
}

impl TransferFormat {
    /// Picks the format from the case-insensitive file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)?;
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Errors raised by bulk import/export.
#[derive(Debug)]
pub enum TransferError {
    /// Extension is neither `.csv` nor `.xlsx`.
    UnsupportedFormat(PathBuf),
    /// Source could not be opened, parsed, or has too little content.
    Import { path: PathBuf, source: CodecError },
    /// A data row (1-based source row number) failed record validation.
    InvalidRow {
        row: usize,
        error: ApartmentValidationError,
    },
    /// Destination could not be created or written.
    Export { path: PathBuf, source: CodecError },
    Storage(RepoError),
}

impl TransferError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Import { .. } => "import_failed",
            Self::InvalidRow { .. } => "invalid_row",
            Self::Export { .. } => "export_failed",
            Self::Storage(err) => err.code(),
        }
    }

    pub(crate) fn import(path: &Path, source: impl Into<CodecError>) -> Self {
        Self::Import {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn export(path: &Path, source: impl Into<CodecError>) -> Self {
        Self::Export {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(path) => write!(
                f,
                "unsupported file format: `{}` (expected .csv or .xlsx)",
                path.display()
            ),
            Self::Import { path, source } => {
                write!(f, "failed to import `{}`: {source}", path.display())
            }
            Self::InvalidRow { row, error } => write!(f, "invalid data in row {row}: {error}"),
            Self::Export { path, source } => {
                write!(f, "failed to export `{}`: {source}", path.display())
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedFormat(_) => None,
            Self::Import { source, .. } | Self::Export { source, .. } => Some(source.as_ref()),
            Self::InvalidRow { error, .. } => Some(error),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RepoError> for TransferError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Resolves the format for `path` or reports it as unsupported.
pub fn format_for(path: &Path) -> TransferResult<TransferFormat> {
    TransferFormat::from_path(path).ok_or_else(|| TransferError::UnsupportedFormat(path.to_path_buf()))
}

/// Destination for exported rows. Implemented once per file format.
pub(crate) trait RowSink {
    fn write_header(&mut self, header: &[&str]) -> Result<(), CodecError>;
    fn write_row(&mut self, row: &[&str]) -> Result<(), CodecError>;
    /// Flushes buffered output to the destination.
    fn finish(self: Box<Self>) -> Result<(), CodecError>;
}

pub(crate) fn read_rows(format: TransferFormat, path: &Path) -> Result<Vec<Vec<String>>, CodecError> {
    match format {
        TransferFormat::Csv => csv_codec::read_rows(path),
        TransferFormat::Xlsx => xlsx_codec::read_rows(path),
    }
}

pub(crate) fn open_sink(format: TransferFormat, path: &Path) -> Result<Box<dyn RowSink>, CodecError> {
    match format {
        TransferFormat::Csv => Ok(Box::new(csv_codec::CsvSink::create(path)?)),
        TransferFormat::Xlsx => Ok(Box::new(xlsx_codec::XlsxSink::create(path)?)),
    }
}
