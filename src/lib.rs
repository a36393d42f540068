pub mod crop;
pub mod db;
pub mod exclusion;
pub mod extraction;
pub mod ledger;
pub mod ocr;
pub mod scan;
pub mod settings;

pub use crop::{crop_region_for_guide, CropRegion, GuideRect};
pub use db::Database;
pub use exclusion::{check_exclusion, ExclusionList, ExclusionScope};
pub use extraction::{
    CapitalizedWordsDetector, ExtractionConfig, NameCandidateExtractor, NameEntityDetector,
};
pub use ledger::{AttendanceLedger, CounterState, LedgerPolicy, RecordReceipt};
pub use ocr::{TextRecognizer, VisionOcrClient};
pub use scan::{ScanController, ScanInput, ScanOutcome, ScanProposal, ScanResult};
pub use settings::SettingsStore;
