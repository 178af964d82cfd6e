//! Parsers turning raw feed bytes into records.

mod doses;
mod error;
mod tables;

pub use doses::parse_dose_events;
pub use error::IngestError;
pub use tables::{parse_daily_counts, parse_inpatients};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Drops a leading UTF-8 byte order mark, if any.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(BOM).unwrap_or(bytes)
}
