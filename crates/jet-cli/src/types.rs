//! Result types shared between commands and the summary printer.

use std::path::PathBuf;

use jet_map::DetectionReport;
use jet_transform::CleanStats;
use jet_validate::BalanceReport;

/// Everything the `convert` command produces for one export.
pub struct ConvertResult {
    pub input: PathBuf,
    pub rows: usize,
    pub detection: DetectionReport,
    pub clean_stats: CleanStats,
    /// Absent when no amount-family field was mapped.
    pub balance: Option<BalanceReport>,
    /// Absent on dry runs.
    pub header_path: Option<PathBuf>,
    pub detail_path: Option<PathBuf>,
}

impl ConvertResult {
    /// True when the run produced findings a caller should treat as a
    /// failure: nothing mapped at all on a non-empty input.
    pub fn has_errors(&self) -> bool {
        self.detection.stats.total_columns > 0 && self.detection.mappings.is_empty()
    }
}
