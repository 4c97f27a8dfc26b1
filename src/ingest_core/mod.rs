//! Ingest Core - Record Normalizer
//!
//! Turns raw tabular files into normalized `TransactionRecord` streams. Each
//! file in a batch loads as an independent unit of work: one file failing
//! validation surfaces a per-file diagnostic and never aborts its siblings.
//!
//! Recognized formats: `.csv` (header row with aliased column names) and
//! `.jsonl` (one object per line, aliased keys).

pub mod normalizer;
pub mod source;

pub use normalizer::{parse_csv, parse_jsonl, IngestError, CANONICAL_FIELDS};
pub use source::{load_batch, DatasetSource, FileOutcome, FileSource};
