use tracing::debug;

use super::{IngestError, strip_bom};
use crate::records::DoseEvent;

/// Parses newline-delimited JSON dose events. Blank lines are skipped.
pub fn parse_dose_events(bytes: &[u8]) -> Result<Vec<DoseEvent>, IngestError> {
    let mut events = Vec::new();

    for (index, line) in strip_bom(bytes).split(|b| *b == b'\n').enumerate() {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let event = serde_json::from_slice(line).map_err(|source| IngestError::InvalidEvent {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }

    debug!(events = events.len(), "Parsed dose events");
    Ok(events)
}
