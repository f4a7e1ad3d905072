//! Official fee tables and monthly closing reports.
//!
//! Both inputs are text extracted from the court's PDF publications, so the
//! parsers skip anything that does not look like a complete row instead of
//! failing the whole document.

mod closing;
mod table;

pub use closing::{parse_closing_report, summarize_closing_reports};
pub use table::{parse_fee_table, parse_table07, parse_table08};
