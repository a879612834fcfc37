pub mod format;

pub use format::{format_diagnostics, format_records, format_run_summary};
