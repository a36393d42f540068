//! Drives one capture through crop, OCR, extraction, and the exclusion
//! check, then commits reviewed proposals to the ledger.

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::db::{AttendanceStatus, Database};
use crate::exclusion::{check_exclusion, ExclusionScope};
use crate::extraction::NameCandidateExtractor;
use crate::ledger::{AttendanceLedger, RecordReceipt};
use crate::ocr::TextRecognizer;
use crate::scan::pipeline::{crop_photo_to_guide, resolve_identity, ScanInput, ScanProposal, ScanResult};

/// Terminal branches of one scan attempt.
#[derive(Debug)]
pub enum ScanOutcome {
    /// Extraction produced a reviewable identity; nothing persisted yet.
    Proposed(ScanProposal),
    /// Neither a name nor an identifier was found. Never persisted.
    ExtractionFailed,
    /// The resolved name is on a no-entry list. Hard stop.
    Excluded { scope: ExclusionScope, name: String },
    /// The caller abandoned the scan while OCR was pending.
    Cancelled,
}

pub struct ScanController {
    recognizer: Arc<dyn TextRecognizer>,
    extractor: NameCandidateExtractor,
    ledger: AttendanceLedger,
    db: Database,
    // Held for the duration of a propose call: one photo in flight at a time.
    in_flight: Mutex<()>,
}

impl ScanController {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        extractor: NameCandidateExtractor,
        ledger: AttendanceLedger,
        db: Database,
    ) -> Self {
        Self {
            recognizer,
            extractor,
            ledger,
            db,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one capture up to (but not including) the ledger write.
    ///
    /// OCR failure degrades to zero text lines so the caller always gets a
    /// consistent "nothing extracted, try again" outcome instead of a hard
    /// error. Starting a scan while another is pending fails fast.
    pub async fn propose(
        &self,
        event_id: &str,
        input: ScanInput,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            bail!("a scan is already in flight");
        };

        let captured_at = Utc::now();
        let cropped = crop_photo_to_guide(&input)?;

        let ocr_text = tokio::select! {
            _ = cancel.cancelled() => {
                info!("scan abandoned while OCR was pending for event {event_id}");
                return Ok(ScanOutcome::Cancelled);
            }
            result = self.recognizer.recognize(&cropped) => match result {
                Ok(text) => text,
                Err(err) => {
                    // Degrade to extraction failure rather than propagating
                    // a transport error through the whole pipeline.
                    warn!("OCR call failed, treating as zero text lines: {err:?}");
                    String::new()
                }
            },
        };

        let proposal = resolve_identity(&self.extractor, &ocr_text, captured_at);
        if proposal.result.is_extraction_failure() {
            return Ok(ScanOutcome::ExtractionFailed);
        }

        let event_list = self.db.load_exclusion_list(Some(event_id.to_string())).await?;
        let global_list = self.db.load_exclusion_list(None).await?;
        if let Some(scope) = check_exclusion(&proposal.result.name, &event_list, &global_list) {
            info!(
                "exclusion match ({}) for '{}' on event {event_id}",
                scope.as_str(),
                proposal.result.name
            );
            return Ok(ScanOutcome::Excluded {
                scope,
                name: proposal.result.name,
            });
        }

        Ok(ScanOutcome::Proposed(proposal))
    }

    /// Persist a reviewed scan. Discarding a proposal is just dropping it;
    /// nothing was written during `propose`.
    pub async fn commit(
        &self,
        event_id: &str,
        recorded_by: &str,
        result: &ScanResult,
        notes: Option<String>,
        image_path: Option<String>,
    ) -> Result<RecordReceipt> {
        if result.is_extraction_failure() {
            bail!("refusing to record a scan with no extracted identity");
        }

        self.ledger
            .record(
                event_id,
                &result.identifier,
                &result.name,
                recorded_by,
                AttendanceStatus::Present,
                notes,
                image_path,
            )
            .await
    }
}
