//! Candidate extraction: ordered pattern passes over raw OCR text.
//!
//! Three passes run in a fixed order and their matches are emitted in that
//! order (document order within each pass), so downstream tie-breaks see a
//! stable sequence:
//!
//! 1. currency-qualified lines (`$`-prefixed amount)
//! 2. currency-less lines, restricted to lines with no `$` on them
//! 3. quantity-less fallback (hour + marker + anything + `$`-amount)
//!
//! Extraction never fails on malformed text; garbage in simply yields no
//! candidates. All numeric conversion beyond the hour itself is deferred to
//! the validator.

use rayon::prelude::*;

use crate::domain::{RawCandidate, SourcePattern};

pub mod patterns;

use patterns::{ALT_NO_QUANTITY_RE, NO_CURRENCY_RE, WITH_CURRENCY_RE, quantity_backfill_re};

/// Extract candidates from a single page (or a whole single-page document).
pub fn extract_candidates(text: &str) -> Vec<RawCandidate> {
    extract_with_base_offset(text, 0)
}

/// Extract candidates from an ordered sequence of page texts.
///
/// Pages are independent, so extraction runs per-page in parallel; results
/// are stitched back in page order with byte offsets shifted as if the pages
/// had been joined with a single `\n`. The merged sequence therefore has a
/// stable global document order for the reconciler's first-match tie-break.
pub fn extract_pages(pages: &[String]) -> Vec<RawCandidate> {
    // Base offset of each page in the joined document.
    let mut bases = Vec::with_capacity(pages.len());
    let mut acc = 0usize;
    for page in pages {
        bases.push(acc);
        acc += page.len() + 1;
    }

    pages
        .par_iter()
        .zip(bases.par_iter())
        .map(|(page, &base)| extract_with_base_offset(page, base))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn extract_with_base_offset(text: &str, base: usize) -> Vec<RawCandidate> {
    let mut out = Vec::new();

    // Pass 1: currency-qualified.
    for caps in WITH_CURRENCY_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let Some(hour) = parse_hour(&caps[1]) else {
            continue;
        };
        out.push(RawCandidate {
            hour,
            quantity: caps[2].parse().ok(),
            amount_text: caps[3].to_string(),
            source: SourcePattern::WithCurrency,
            offset: base + m.start(),
        });
    }

    // Pass 2: currency-less, line by line, skipping lines pass 1 already saw.
    let mut line_start = 0usize;
    for line in text.split_inclusive('\n') {
        let offset = line_start;
        line_start += line.len();
        if line.contains('$') {
            continue;
        }
        if let Some(caps) = NO_CURRENCY_RE.captures(line) {
            let Some(m) = caps.get(0) else { continue };
            let Some(hour) = parse_hour(&caps[1]) else {
                continue;
            };
            out.push(RawCandidate {
                hour,
                quantity: caps[2].parse().ok(),
                amount_text: caps[3].to_string(),
                source: SourcePattern::NoCurrency,
                offset: base + offset + m.start(),
            });
        }
    }

    // Pass 3: quantity-less fallback, with a secondary quantity back-fill.
    for caps in ALT_NO_QUANTITY_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let Some(hour) = parse_hour(&caps[1]) else {
            continue;
        };
        let quantity = quantity_backfill_re(hour)
            .captures(text)
            .and_then(|c| c.get(1).and_then(|q| q.as_str().parse().ok()));
        out.push(RawCandidate {
            hour,
            quantity,
            amount_text: caps[2].to_string(),
            source: SourcePattern::AltNoQuantity,
            offset: base + m.start(),
        });
    }

    out
}

fn parse_hour(token: &str) -> Option<u8> {
    // The patterns only admit 1-2 digit hour tokens, so this cannot overflow,
    // but the conversion is kept fallible rather than panicking.
    token.parse().ok()
}
