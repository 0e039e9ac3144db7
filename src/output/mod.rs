//! Output module for assembling and writing the crawl report
//!
//! This module handles:
//! - Page records and the ordered report schema
//! - Thread-safe aggregation of records from all workers
//! - Writing the delimited report file
//! - Crawl statistics

mod aggregator;
mod csv_output;
mod record;
pub mod stats;

pub use aggregator::{Aggregator, Report};
pub use csv_output::{
    report_file_name, report_path, sanitize_file_stem, write_report, write_report_file,
};
pub use record::{Field, PageRecord};
pub use stats::{print_statistics, CrawlStatistics};
