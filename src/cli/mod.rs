//! Command-line parsing for the revenue log analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the extraction/reconciliation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "revlog", version, about = "OCR Revenue Log Analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze OCR'd revenue log text and print the hourly table + summary.
    Analyze(AnalyzeArgs),
    /// Generate a synthetic noisy revenue log for demos and testing.
    Sample(SampleArgs),
    /// Extract candidates from page images via the vision API, then analyze.
    ///
    /// This uses the same reconcile/validate/aggregate pipeline as `analyze`;
    /// only the candidate source differs. Requires OPENAI_API_KEY.
    Vision(VisionArgs),
}

/// Options shared by both analysis paths.
#[derive(Debug, Parser, Clone)]
pub struct CommonArgs {
    /// Lowest accepted business hour (inclusive).
    #[arg(long, default_value_t = 7)]
    pub hour_min: u8,

    /// Highest accepted business hour (inclusive).
    #[arg(long, default_value_t = 23)]
    pub hour_max: u8,

    /// First hour counted in the "after" bucket (15 = 3 PM).
    #[arg(long, default_value_t = 15)]
    pub threshold: u8,

    /// Export the record table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full run (records + stats + diagnostics) to JSON.
    #[arg(long = "export-run", value_name = "JSON")]
    pub export_run: Option<PathBuf>,
}

/// Options for analyzing OCR text.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// OCR text files, one page each, in page order. Reads stdin as a single
    /// page when no files are given.
    pub pages: Vec<PathBuf>,

    /// Extract candidates with the LLM instead of the regex passes.
    /// Requires OPENAI_API_KEY.
    #[arg(long)]
    pub llm: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options for generating a synthetic log.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Random seed for reproducible output.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Emit clean text instead of OCR-style corruption.
    #[arg(long)]
    pub clean: bool,

    /// Write to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Options for the vision extraction path.
#[derive(Debug, Parser, Clone)]
pub struct VisionArgs {
    /// Page images (JPEG), in page order.
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}
