//! Delimited report output
//!
//! Writes a finalized [`Report`] as a delimited UTF-8 file named after the
//! seed URL: `<sanitized-seed>_scraped_results.<ext>`.

use crate::config::OutputConfig;
use crate::output::aggregator::Report;
use crate::url::NormalizedUrl;
use crate::SiftError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const REPORT_SUFFIX: &str = "_scraped_results";

/// Characters that cannot appear in the report file stem
const UNSAFE_FILE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replaces path-unsafe characters and whitespace with `_`
///
/// # Examples
///
/// ```
/// use sumi_sift::output::sanitize_file_stem;
///
/// assert_eq!(sanitize_file_stem("http://example.com"), "http___example.com");
/// ```
pub fn sanitize_file_stem(seed: &str) -> String {
    seed.chars()
        .map(|c| {
            if UNSAFE_FILE_CHARS.contains(&c) || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Report file name for a seed URL
pub fn report_file_name(seed: &NormalizedUrl, extension: &str) -> String {
    format!(
        "{}{}.{}",
        sanitize_file_stem(seed.as_str()),
        REPORT_SUFFIX,
        extension
    )
}

/// Full report path for a seed URL under the configured output directory
pub fn report_path(seed: &NormalizedUrl, output: &OutputConfig) -> PathBuf {
    Path::new(&output.directory).join(report_file_name(seed, output.extension()))
}

/// Writes the header row and every data row to `writer`
pub fn write_report<W: Write>(report: &Report, writer: W, delimiter: u8) -> Result<(), SiftError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(report.header())?;
    for row in &report.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Writes the report to `path`, creating or truncating the file
pub fn write_report_file(report: &Report, path: &Path, delimiter: u8) -> Result<(), SiftError> {
    let file = File::create(path)?;
    write_report(report, file, delimiter)?;
    tracing::info!(
        "Wrote {} rows x {} columns to {}",
        report.rows.len(),
        report.columns.len(),
        path.display()
    );
    Ok(())
}
