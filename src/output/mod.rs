//! Checkpointed output
//!
//! Records are buffered and periodically flushed to a CSV/JSONL pair so a
//! run that dies mid-crawl keeps everything flushed so far. The CSV is the
//! human-facing spreadsheet view; the JSONL is the lossless line-per-record
//! form used for replay and tests.

mod checkpoint;
mod stats;

pub use checkpoint::{read_jsonl, CheckpointSink};
pub use stats::{print_summary, RunSummary};
