pub mod controller;
pub mod pipeline;

pub use controller::{ScanController, ScanOutcome};
pub use pipeline::{ScanInput, ScanProposal, ScanResult};
