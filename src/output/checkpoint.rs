//! Buffered dual-format checkpoint sink

use crate::record::ListingRecord;
use crate::{Result, ScoutError};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// UTF-8 byte order mark, written once at CSV creation so spreadsheet
/// tools pick up the Cyrillic text correctly.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// How many consecutive flush failures the sink tolerates before giving up.
const MAX_FLUSH_FAILURES: u32 = 2;

/// Buffers records and checkpoints them to a CSV file and a JSONL file.
///
/// A failed flush keeps the buffer intact and is retried on the next
/// flush; a second consecutive failure is fatal so the run stops instead
/// of silently losing records.
pub struct CheckpointSink {
    csv_path: PathBuf,
    jsonl_path: PathBuf,
    buffer: Vec<ListingRecord>,
    flush_every: usize,
    failed_flushes: u32,
}

impl CheckpointSink {
    /// Creates a sink writing `<stem>.csv` and `<stem>.jsonl` under `dir`
    ///
    /// The directory is created if missing; existing files are appended to.
    ///
    /// # Arguments
    ///
    /// * `dir` - Output directory for both checkpoint files
    /// * `stem` - File name without extension, one per crawl scope
    /// * `flush_every` - Buffered records per automatic flush (min 1)
    pub fn new(dir: &Path, stem: &str, flush_every: usize) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            csv_path: dir.join(format!("{stem}.csv")),
            jsonl_path: dir.join(format!("{stem}.jsonl")),
            buffer: Vec::new(),
            flush_every: flush_every.max(1),
            failed_flushes: 0,
        })
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn jsonl_path(&self) -> &Path {
        &self.jsonl_path
    }

    /// Records buffered but not yet durable.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Adds a record to the buffer, flushing automatically once the buffer
    /// reaches the configured size.
    pub fn append(&mut self, record: ListingRecord) -> Result<()> {
        self.buffer.push(record);
        if self.buffer.len() >= self.flush_every {
            self.flush()?;
        }
        Ok(())
    }

    /// Writes all buffered records out. On failure the buffer is retained
    /// for retry; a repeat failure returns [`ScoutError::Sink`].
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        match self.try_flush() {
            Ok(()) => {
                debug!(
                    records = self.buffer.len(),
                    csv = %self.csv_path.display(),
                    "Checkpoint flushed"
                );
                self.buffer.clear();
                self.failed_flushes = 0;
                Ok(())
            }
            Err(e) => {
                self.failed_flushes += 1;
                warn!(
                    attempt = self.failed_flushes,
                    error = %e,
                    "Checkpoint flush failed, buffer retained"
                );
                if self.failed_flushes >= MAX_FLUSH_FAILURES {
                    return Err(ScoutError::Sink(format!(
                        "flush failed {} times in a row: {e}",
                        self.failed_flushes
                    )));
                }
                Ok(())
            }
        }
    }

    /// Flushes at scope end, when no later scheduled flush exists to retry.
    /// A first failure is retried immediately; a buffer that still cannot
    /// be written is an error, never a silent drop.
    pub fn finalize(&mut self) -> Result<()> {
        self.flush()?;
        if !self.buffer.is_empty() {
            self.flush()?;
        }
        if self.buffer.is_empty() {
            Ok(())
        } else {
            Err(ScoutError::Sink(format!(
                "{} records still buffered after final flush",
                self.buffer.len()
            )))
        }
    }

    fn try_flush(&self) -> Result<()> {
        self.write_csv()?;
        self.write_jsonl()?;
        Ok(())
    }

    fn write_csv(&self) -> Result<()> {
        let new_file = !self.csv_path.exists();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)?;
        if new_file {
            file.write_all(UTF8_BOM)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(new_file)
            .from_writer(file);
        for record in &self.buffer {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_jsonl(&self) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.jsonl_path)?;
        for record in &self.buffer {
            let line = serde_json::to_string(record)?;
            writeln!(file, "{line}")?;
        }
        file.flush()?;
        Ok(())
    }
}

/// Reads every record back from a JSONL checkpoint file.
pub fn read_jsonl(path: &Path) -> Result<Vec<ListingRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}
