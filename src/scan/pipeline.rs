//! Scan pipeline stages: crop the captured photo to the alignment guide,
//! interpret the OCR text, and resolve the (identifier, name) pair.

use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;

use crate::crop::{crop_region_for_guide, GuideRect};
use crate::extraction::{
    extract_identifier_candidates, normalize_lines, NameCandidate, NameCandidateExtractor,
};

/// One capture handed to the pipeline.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub photo_jpeg: Vec<u8>,
    /// Logical screen dimensions the guide rectangle is expressed in.
    pub screen_w: f64,
    pub screen_h: f64,
    pub guide: GuideRect,
}

/// The resolved identity for one scan. Synthetic fields are substitutes
/// generated when extraction found nothing, and a result where both fields
/// are synthetic must never reach the ledger.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub identifier: String,
    pub name: String,
    pub captured_at: DateTime<Utc>,
    pub identifier_extracted: bool,
    pub name_extracted: bool,
}

impl ScanResult {
    pub fn is_extraction_failure(&self) -> bool {
        !self.identifier_extracted && !self.name_extracted
    }
}

/// Everything the caller needs to review a scan before committing it.
#[derive(Debug, Clone)]
pub struct ScanProposal {
    pub result: ScanResult,
    pub name_candidates: Vec<NameCandidate>,
    pub identifier_candidates: Vec<String>,
}

/// Crop the captured JPEG to the pixel region covered by the on-screen
/// guide and re-encode it for the OCR request.
pub fn crop_photo_to_guide(input: &ScanInput) -> Result<Vec<u8>> {
    let photo = image::load_from_memory(&input.photo_jpeg)
        .context("failed to decode captured photo")?;

    let region = crop_region_for_guide(
        photo.width(),
        photo.height(),
        input.screen_w,
        input.screen_h,
        &input.guide,
    );

    let cropped = photo.crop_imm(region.origin_x, region.origin_y, region.width, region.height);

    let mut encoded = Vec::new();
    cropped
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Jpeg)
        .context("failed to encode cropped photo")?;
    Ok(encoded)
}

/// Interpret OCR text into a reviewed identity proposal.
///
/// Fallbacks when extraction comes up empty: the identifier degrades to the
/// capture timestamp's millisecond digits, the name to a placeholder
/// embedding the identifier. A 0-confidence top name candidate counts as no
/// usable name.
pub fn resolve_identity(
    extractor: &NameCandidateExtractor,
    ocr_text: &str,
    captured_at: DateTime<Utc>,
) -> ScanProposal {
    let lines = normalize_lines(ocr_text);
    let name_candidates = extractor.extract(&lines);
    let identifier_candidates = extract_identifier_candidates(ocr_text);

    let identifier = identifier_candidates.first().cloned();
    let identifier_extracted = identifier.is_some();
    let identifier =
        identifier.unwrap_or_else(|| captured_at.timestamp_millis().to_string());

    let accepted_name = name_candidates
        .first()
        .filter(|candidate| candidate.confidence > 0.0)
        .map(|candidate| candidate.text.clone());
    let name_extracted = accepted_name.is_some();
    let name = accepted_name.unwrap_or_else(|| format!("Visitor {identifier}"));

    if !identifier_extracted {
        warn!("no identifier candidate found, substituting {identifier}");
    }

    ScanProposal {
        result: ScanResult {
            identifier,
            name,
            captured_at,
            identifier_extracted,
            name_extracted,
        },
        name_candidates,
        identifier_candidates,
    }
}
