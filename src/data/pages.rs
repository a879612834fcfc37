//! Page-text sources.
//!
//! The rasterizer + OCR engine combination sits behind [`PageSource`]: the
//! core only ever sees ordered per-page text, never a PDF or an image. The
//! shipped implementation reads pre-OCR'd text files (one file per page), but
//! any OCR front-end can implement the trait.

use std::io::Read;
use std::path::PathBuf;

use crate::error::AppError;

/// Anything that can supply ordered page texts for analysis.
pub trait PageSource {
    fn pages(&self) -> Result<Vec<String>, AppError>;
}

/// One text file per page, in the order given.
pub struct TextPages {
    paths: Vec<PathBuf>,
}

impl TextPages {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl PageSource for TextPages {
    fn pages(&self) -> Result<Vec<String>, AppError> {
        let mut pages = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let text = std::fs::read_to_string(path).map_err(|e| {
                AppError::usage(format!("Failed to read page '{}': {e}", path.display()))
            })?;
            pages.push(text);
        }
        Ok(pages)
    }
}

/// Read stdin as a single page.
pub fn stdin_page() -> Result<String, AppError> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| AppError::usage(format!("Failed to read stdin: {e}")))?;
    Ok(text)
}
