//! Command-line harness around the scanning core: crops a captured photo,
//! runs it through the hosted OCR provider, and records the visit.
//!
//! Usage: rollcall <photo.jpg> <event-id> [recorded-by]
//!
//! The alignment guide defaults to the full frame; an integrating app
//! passes the real on-screen guide geometry instead.

use std::{env, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{bail, Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use rollcall::{
    AttendanceLedger, CapitalizedWordsDetector, Database, ExtractionConfig, GuideRect,
    NameCandidateExtractor, ScanController, ScanInput, ScanOutcome, SettingsStore,
    VisionOcrClient,
};

fn data_dir() -> PathBuf {
    env::var_os("ROLLCALL_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let mut args = env::args().skip(1);
    let (Some(photo_path), Some(event_id)) = (args.next(), args.next()) else {
        bail!("usage: rollcall <photo.jpg> <event-id> [recorded-by]");
    };
    let recorded_by = args.next().unwrap_or_else(|| "cli".to_string());

    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let settings = SettingsStore::new(data_dir.join("settings.json"))?;
    let ocr = settings.ocr();
    if ocr.api_key.is_empty() {
        bail!(
            "no OCR API key configured; set apiKey in {}",
            data_dir.join("settings.json").display()
        );
    }

    let db = Database::new(data_dir.join("rollcall.sqlite3"))?;
    let recognizer = Arc::new(VisionOcrClient::new(ocr.endpoint, ocr.api_key)?);
    let extractor = NameCandidateExtractor::new(
        Box::new(CapitalizedWordsDetector),
        ExtractionConfig::default(),
    );
    let ledger = AttendanceLedger::new(db.clone(), settings.ledger_policy());
    let controller = ScanController::new(recognizer, extractor, ledger, db.clone());

    let photo_jpeg = std::fs::read(&photo_path)
        .with_context(|| format!("failed to read photo {photo_path}"))?;
    let photo = image::load_from_memory(&photo_jpeg).context("failed to decode photo")?;
    let (width, height) = (photo.width() as f64, photo.height() as f64);
    drop(photo);

    let input = ScanInput {
        photo_jpeg,
        screen_w: width,
        screen_h: height,
        guide: GuideRect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        },
    };

    let cancel = CancellationToken::new();
    match controller.propose(&event_id, input, &cancel).await? {
        ScanOutcome::Proposed(proposal) => {
            info!(
                "proposed identity: {} ({})",
                proposal.result.name, proposal.result.identifier
            );
            let receipt = controller
                .commit(&event_id, &recorded_by, &proposal.result, None, Some(photo_path))
                .await?;
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "name": proposal.result.name,
                "identifier": proposal.result.identifier,
                "receipt": format!("{receipt:?}"),
            }))?);
            Ok(ExitCode::SUCCESS)
        }
        ScanOutcome::ExtractionFailed => {
            eprintln!("could not read a name or identifier from the card; try again");
            Ok(ExitCode::FAILURE)
        }
        ScanOutcome::Excluded { scope, name } => {
            eprintln!("'{name}' is on the {} exclusion list; entry blocked", scope.as_str());
            Ok(ExitCode::FAILURE)
        }
        ScanOutcome::Cancelled => {
            eprintln!("scan cancelled");
            Ok(ExitCode::FAILURE)
        }
    }
}
