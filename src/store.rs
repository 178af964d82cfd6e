//! In-memory record store loaded from a data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::feeds::Feed;
use crate::ingest::{parse_daily_counts, parse_dose_events, parse_inpatients};
use crate::records::{CumulativeDeath, DoseEvent, InpatientRecord, NewCase, SevereCase};

pub const UPDATE_FILE: &str = "update.json";

/// Extension of a downloaded feed file waiting for the rest of an update.
const STAGED_EXTENSION: &str = "part";

/// Contents of `update.json`, written after every successful download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    /// UTC epoch milliseconds.
    pub updated_at: i64,
}

impl UpdateInfo {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            updated_at: time.timestamp_millis(),
        }
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(UPDATE_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// All records of the five feeds plus the time they were fetched.
///
/// Built once and never mutated; every series is derived from a shared
/// reference to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    pub updated_at: i64,
    pub new_cases: Vec<NewCase>,
    pub severe_cases: Vec<SevereCase>,
    pub deaths: Vec<CumulativeDeath>,
    pub inpatients: Vec<InpatientRecord>,
    pub doses: Vec<DoseEvent>,
}

impl RecordStore {
    /// Loads `update.json` and every raw feed file from `dir`.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<Self> {
        let update = UpdateInfo::load(dir)?;
        let mut store = RecordStore {
            updated_at: update.updated_at,
            ..Default::default()
        };

        for feed in Feed::ALL {
            let path = dir.join(feed.file_name());
            let bytes =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            store
                .ingest(feed, &bytes)
                .with_context(|| format!("failed to parse {feed} feed"))?;
        }

        info!(
            new_cases = store.new_cases.len(),
            severe_cases = store.severe_cases.len(),
            deaths = store.deaths.len(),
            inpatients = store.inpatients.len(),
            doses = store.doses.len(),
            "Record store loaded"
        );
        Ok(store)
    }

    /// Parses `bytes` as the raw content of `feed`, replacing its records.
    pub fn ingest(&mut self, feed: Feed, bytes: &[u8]) -> Result<()> {
        match feed {
            Feed::NewCases => self.new_cases = parse_daily_counts(bytes)?,
            Feed::SevereCases => self.severe_cases = parse_daily_counts(bytes)?,
            Feed::Deaths => self.deaths = parse_daily_counts(bytes)?,
            Feed::Inpatients => self.inpatients = parse_inpatients(bytes)?,
            Feed::VaccineDoses => self.doses = parse_dose_events(bytes)?,
        }
        Ok(())
    }
}

/// Where a downloaded feed waits until every feed of the update succeeded.
pub fn staged_path(dir: &Path, feed: Feed) -> PathBuf {
    dir.join(format!("{}.{STAGED_EXTENSION}", feed.file_name()))
}

/// Checks that `bytes` decode as `feed` and writes them to the staged path.
/// The live file is left alone.
pub async fn stage_feed(dir: &Path, feed: Feed, bytes: &[u8]) -> Result<PathBuf> {
    RecordStore::default()
        .ingest(feed, bytes)
        .with_context(|| format!("downloaded {feed} feed does not parse"))?;

    let path = staged_path(dir, feed);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Moves every staged feed over its live file, then stamps `update.json`.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub async fn commit_staged(dir: &Path, updated_at: DateTime<Utc>) -> Result<()> {
    for feed in Feed::ALL {
        let staged = staged_path(dir, feed);
        let live = dir.join(feed.file_name());
        tokio::fs::rename(&staged, &live)
            .await
            .with_context(|| format!("failed to move {} into place", staged.display()))?;
    }

    let update = UpdateInfo::at(updated_at);
    let path = dir.join(UPDATE_FILE);
    tokio::fs::write(&path, serde_json::to_string_pretty(&update)?)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(updated_at = update.updated_at, "Committed feed update");
    Ok(())
}

/// Deletes the staged files of an update that did not complete.
pub async fn discard_staged(dir: &Path) {
    for feed in Feed::ALL {
        let path = staged_path(dir, feed);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Discarded staged feed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to discard staged feed"),
        }
    }
}
