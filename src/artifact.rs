//! Durable artifact output: one date-named JSON file per run, optionally
//! gzipped.

use crate::assemble::Record;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Persists a run's result set under the output directory.
pub struct ArtifactWriter {
    output_dir: PathBuf,
    compress: bool,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            compress,
        }
    }

    /// Write the records as `<output_dir>/<YYYY-MM-DD>.json[.gz]`, named
    /// from the run's start date. Returns the written path.
    pub fn write(&self, records: &[Record]) -> Result<PathBuf> {
        self.write_dated(records, chrono::Local::now().date_naive())
    }

    /// As [`write`](Self::write), with an explicit date.
    pub fn write_dated(&self, records: &[Record], date: NaiveDate) -> Result<PathBuf> {
        // "already exists" is not an error.
        std::fs::create_dir_all(&self.output_dir).map_err(|source| Error::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let stem = date.format("%Y-%m-%d");
        let name = if self.compress {
            format!("{stem}.json.gz")
        } else {
            format!("{stem}.json")
        };
        let path = self.output_dir.join(name);

        let payload = serde_json::to_vec_pretty(records)
            .map_err(|e| self.write_error(&path, e.into()))?;
        let bytes = if self.compress {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(&payload)
                .and_then(|()| encoder.finish())
                .map_err(|e| self.write_error(&path, e))?
        } else {
            payload
        };

        std::fs::write(&path, &bytes).map_err(|e| self.write_error(&path, e))?;
        info!(
            path = %path.display(),
            records = records.len(),
            bytes = bytes.len(),
            compressed = self.compress,
            "artifact written"
        );
        Ok(path)
    }

    fn write_error(&self, path: &Path, source: std::io::Error) -> Error {
        Error::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}
