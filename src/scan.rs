//! Forward-scanning cursor engine.
//!
//! Starts just after the last confirmed period and probes successive
//! months until one yields no data or the present calendar month is
//! reached. The source publishes sequentially, so the first gap stops the
//! scan: a missing month means nothing later exists yet. Periods are
//! probed strictly in order, one at a time — the stop condition itself is
//! decided sequentially, so concurrent or out-of-order probing would
//! change the semantics.

use tracing::{info, warn};

use crate::fetch::PeriodSource;
use crate::types::{Cursor, FetchOutcome, Period, ScanOutcome};

pub struct Scanner<'a> {
    source: &'a dyn PeriodSource,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a dyn PeriodSource) -> Self {
        Self { source }
    }

    /// Run one scan starting just after `cursor`, never probing beyond
    /// `current`. Returns the confirmed periods in ascending order; the
    /// caller owns persistence and notification.
    ///
    /// Each candidate period gets exactly one fetch, no retries. A
    /// transport failure stops the scan the same way absent data does —
    /// the next scheduled run picks up from the unchanged cursor.
    pub async fn run(&self, cursor: Cursor, current: Period) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut candidate = cursor.period().succ();

        while candidate <= current {
            match self.source.fetch_period(candidate).await {
                FetchOutcome::Data(records) => {
                    info!(
                        period = %candidate,
                        entities = records.len(),
                        "New period confirmed"
                    );
                    outcome.periods.push((candidate, records));
                    candidate = candidate.succ();
                }
                FetchOutcome::NoData => {
                    info!(period = %candidate, "No data yet, stopping scan");
                    break;
                }
                FetchOutcome::TransportError(detail) => {
                    // Same stop as NoData; the detail is diagnostics only.
                    warn!(
                        period = %candidate,
                        error = %detail,
                        "Fetch failed, stopping scan"
                    );
                    break;
                }
            }
        }

        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
