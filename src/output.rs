//! Output formatting and persistence for assembled charts.
//!
//! Supports pretty-printing, JSON documents and long-format CSV, optionally
//! gzip-compressed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::pipeline::assemble::assemble;
use crate::pipeline::types::{AxisId, MetricGroup};
use crate::regions::{Prefecture, Region};
use crate::store::RecordStore;

/// Everything a renderer needs to draw the charts of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDocument {
    pub updated_at: i64,
    /// `None` for the nationwide page.
    pub region: Option<&'static Prefecture>,
    pub groups: Vec<MetricGroup>,
}

impl ChartDocument {
    pub fn build(store: &RecordStore, region: Region) -> Self {
        Self {
            updated_at: store.updated_at,
            region: region.prefecture(),
            groups: assemble(store, region),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// One point of one series, flattened for CSV.
#[derive(Debug, Serialize)]
struct PointRow<'a> {
    axis_id: AxisId,
    label: &'a str,
    x: i64,
    y: f64,
}

/// Logs a chart document using Rust's debug pretty-print format.
pub fn print_pretty(document: &ChartDocument) {
    debug!("{:#?}", document);
}

/// Logs a chart document as JSON.
pub fn print_json(document: &ChartDocument, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    info!("{}", json);
    Ok(())
}

/// File name of a region's document: `index` for nationwide, the prefecture
/// name otherwise.
pub fn document_file_name(region: Region, format: OutputFormat, gzip: bool) -> String {
    let stem = match region {
        Region::Nationwide => "index",
        Region::Prefecture(p) => p.name,
    };
    let suffix = if gzip { ".gz" } else { "" };
    format!("{stem}.{}{suffix}", format.extension())
}

/// Serializes a document in the requested format.
pub fn encode_document(document: &ChartDocument, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_vec(document)?),
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
            for group in &document.groups {
                for series in &group.series {
                    for point in &series.points {
                        writer.serialize(PointRow {
                            axis_id: group.axis_id,
                            label: series.label,
                            x: point.x,
                            y: point.y,
                        })?;
                    }
                }
            }
            writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("failed to flush CSV: {}", e))
        }
    }
}

/// Writes a region's document into `dir` and returns the file path.
pub fn write_document(
    dir: &Path,
    region: Region,
    document: &ChartDocument,
    format: OutputFormat,
    gzip: bool,
) -> Result<PathBuf> {
    let path = dir.join(document_file_name(region, format, gzip));
    let encoded = encode_document(document, format)?;

    let body = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&encoded)?;
        encoder.finish()?
    } else {
        encoded
    };

    debug!(path = %path.display(), bytes = body.len(), "Writing chart document");
    fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
