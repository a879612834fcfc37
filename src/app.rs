//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - gathers page text (or vision candidates)
//! - runs the extraction/reconciliation pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, CommonArgs, SampleArgs, VisionArgs};
use crate::data::pages::{PageSource, TextPages, stdin_page};
use crate::data::vision::VisionClient;
use crate::domain::AnalyzeConfig;
use crate::error::AppError;

pub mod pipeline;

use pipeline::RunOutput;

/// Entry point for the `revlog` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Sample(args) => handle_sample(args),
        Command::Vision(args) => handle_vision(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = config_from_common(&args.common)?;

    let pages = if args.pages.is_empty() {
        vec![stdin_page()?]
    } else {
        TextPages::new(args.pages).pages()?
    };

    let run = if args.llm {
        let client = VisionClient::from_env()?;
        let mut candidates = Vec::new();
        for page in &pages {
            candidates.extend(client.extract_candidates_from_text(page)?);
        }
        renumber_offsets(&mut candidates);
        let joined = pages.join("\n");
        pipeline::run_from_candidates_with_text(&config, candidates, &joined)
    } else {
        pipeline::run_from_pages(&config, &pages)
    };
    finish_run(&run, &config)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let text = crate::data::sample::generate_sample_log(args.seed, !args.clean);

    match &args.out {
        Some(path) => std::fs::write(path, &text).map_err(|e| {
            AppError::usage(format!("Failed to write sample '{}': {e}", path.display()))
        })?,
        None => print!("{text}"),
    }
    Ok(())
}

fn handle_vision(args: VisionArgs) -> Result<(), AppError> {
    let config = config_from_common(&args.common)?;
    let client = VisionClient::from_env()?;

    // Pages are queried in order so candidate order stays the document order.
    let mut candidates = Vec::new();
    for path in &args.images {
        let bytes = std::fs::read(path)
            .map_err(|e| AppError::usage(format!("Failed to read image '{}': {e}", path.display())))?;
        candidates.extend(client.extract_candidates(&bytes)?);
    }
    renumber_offsets(&mut candidates);

    let run = pipeline::run_from_candidates(&config, candidates);
    finish_run(&run, &config)
}

/// LLM replies number their entries per page; rewrite offsets over the whole
/// collected sequence so same-tier tie-breaks see global document order.
fn renumber_offsets(candidates: &mut [crate::domain::RawCandidate]) {
    for (idx, candidate) in candidates.iter_mut().enumerate() {
        candidate.offset = idx;
    }
}

fn finish_run(run: &RunOutput, config: &AnalyzeConfig) -> Result<(), AppError> {
    println!("{}", crate::report::format_run_summary(run, config));
    println!("{}", crate::report::format_records(&run.records, config));
    if !run.diagnostics.is_empty() {
        println!("{}", crate::report::format_diagnostics(&run.diagnostics));
    }

    if let Some(path) = &config.export_csv {
        crate::io::export::write_records_csv(path, &run.records, config)?;
    }
    if let Some(path) = &config.export_run {
        crate::io::run_file::write_run_json(path, run, config)?;
    }

    Ok(())
}

fn config_from_common(common: &CommonArgs) -> Result<AnalyzeConfig, AppError> {
    if common.hour_min > common.hour_max {
        return Err(AppError::usage(format!(
            "--hour-min ({}) must not exceed --hour-max ({}).",
            common.hour_min, common.hour_max,
        )));
    }
    Ok(AnalyzeConfig {
        hour_min: common.hour_min,
        hour_max: common.hour_max,
        threshold_hour: common.threshold,
        export_csv: common.export.clone(),
        export_run: common.export_run.clone(),
    })
}
