//! Per-epoch metrics table with CSV export

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Column names of the exported table
pub const CSV_HEADER: [&str; 4] = ["epoch", "train_acc", "val_acc", "back_acc"];

/// One row of the metrics table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Zero-based epoch
    pub epoch: usize,
    /// Training accuracy on the poisoned set
    pub train_acc: f32,
    /// Clean test accuracy
    pub val_acc: f32,
    /// Attack success rate on eligible test samples
    pub back_acc: f32,
}

impl EpochMetrics {
    /// Build a row; an accuracy with nothing scored is stored as 0.0
    pub fn new(
        epoch: usize,
        train_acc: Option<f32>,
        val_acc: Option<f32>,
        back_acc: Option<f32>,
    ) -> Self {
        Self {
            epoch,
            train_acc: train_acc.unwrap_or(0.0),
            val_acc: val_acc.unwrap_or(0.0),
            back_acc: back_acc.unwrap_or(0.0),
        }
    }

    /// Plain-text summary line
    pub fn summary(&self) -> String {
        format!(
            "epoch: {:3}, train_acc: {:.3}, val_acc: {:.3}, back_acc: {:.3}",
            self.epoch, self.train_acc, self.val_acc, self.back_acc
        )
    }
}

/// Append-only collection of epoch rows
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    records: Vec<EpochMetrics>,
}

impl MetricsRecorder {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row; epochs must strictly increase
    pub fn record(&mut self, metrics: EpochMetrics) -> Result<()> {
        if let Some(last) = self.records.last() {
            if metrics.epoch <= last.epoch {
                return Err(Error::Metrics(format!(
                    "epoch {} recorded after epoch {}",
                    metrics.epoch, last.epoch
                )));
            }
        }
        self.records.push(metrics);
        Ok(())
    }

    /// All rows in insertion order
    pub fn records(&self) -> &[EpochMetrics] {
        &self.records
    }

    /// Most recent row
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.records.last()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the table with its header; the header is written even when empty
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for row in &self.records {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the table to `path`, creating parent directories
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        self.write_csv(io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(epoch: usize) -> EpochMetrics {
        EpochMetrics::new(epoch, Some(0.5), Some(0.25), None)
    }

    #[test]
    fn test_none_stored_as_zero() {
        let m = row(0);
        assert_eq!(m.back_acc, 0.0);
        assert_eq!(m.val_acc, 0.25);
    }

    #[test]
    fn test_summary_format() {
        let m = EpochMetrics::new(7, Some(0.91234), Some(0.5), Some(1.0));
        assert_eq!(m.summary(), "epoch:   7, train_acc: 0.912, val_acc: 0.500, back_acc: 1.000");
    }

    #[test]
    fn test_record_rejects_out_of_order() {
        let mut recorder = MetricsRecorder::new();
        recorder.record(row(0)).unwrap();
        recorder.record(row(1)).unwrap();
        assert!(matches!(recorder.record(row(1)), Err(Error::Metrics(_))));
        assert!(recorder.record(row(0)).is_err());
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.last().map(|m| m.epoch), Some(1));
    }

    #[test]
    fn test_csv_layout() {
        let mut recorder = MetricsRecorder::new();
        recorder.record(row(0)).unwrap();
        recorder.record(row(1)).unwrap();

        let mut out = Vec::new();
        recorder.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_acc,val_acc,back_acc");
        assert_eq!(lines[1], "0,0.5,0.25,0.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_csv_has_header() {
        let mut out = Vec::new();
        MetricsRecorder::new().write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "epoch,train_acc,val_acc,back_acc\n");
    }

    #[test]
    fn test_save_csv_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("run_transfer_metrics.csv");
        let mut recorder = MetricsRecorder::new();
        recorder.record(row(0)).unwrap();
        recorder.save_csv(&path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<EpochMetrics> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows, vec![row(0)]);
    }
}
