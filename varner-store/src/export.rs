use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use varner_order::OrderSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Summary,
}

impl ExportKind {
    /// `varners_order_20251018_093000.csv` style name for an export taken at `at`.
    pub fn default_file_name(&self, at: DateTime<Local>) -> String {
        let stamp = at.format("%Y%m%d_%H%M%S");
        match self {
            ExportKind::Csv => format!("varners_order_{}.csv", stamp),
            ExportKind::Summary => format!("varners_order_summary_{}.txt", stamp),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Csv => "Order CSV",
            ExportKind::Summary => "Printable summary",
        }
    }
}

/// Exports need at least one line with a quantity.
pub fn ensure_has_items(snapshot: &OrderSnapshot) -> Result<(), ExportError> {
    if snapshot.has_items() {
        Ok(())
    } else {
        Err(ExportError::EmptyOrder)
    }
}

/// Write a rendered export and log where it went.
pub(crate) fn write_export(kind: ExportKind, path: &Path, body: &str) -> Result<PathBuf, ExportError> {
    fs::write(path, body).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("{} saved: {}", kind.label(), path.display());
    Ok(path.to_path_buf())
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No items on the order; enter at least one quantity")]
    EmptyOrder,

    #[error("Failed to build CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
