use crate::domain::model::{Advisory, ConversionStats, ServiceAssignment};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub target: &'a str,
    pub filter: &'a str,
    pub output_file: &'a str,
    pub stats: ConversionStats,
    pub services: Option<&'a [ServiceAssignment]>,
    pub advisories: &'a [Advisory],
}

/// Packs the converted file and a JSON run summary into one archive.
pub fn write_bundle(output_name: &str, output: &[u8], summary: &RunSummary<'_>) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(output_name, FileOptions::default())?;
    zip.write_all(output)?;

    zip.start_file::<_, ()>(SUMMARY_FILE, FileOptions::default())?;
    let json_data = serde_json::to_string_pretty(summary)?;
    zip.write_all(json_data.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
