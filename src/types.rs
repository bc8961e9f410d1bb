//! Shared types for the SOFIPO monitor.
//!
//! These types form the data model used across all modules: the calendar
//! period the regulator publishes against, the persisted cursor, and the
//! per-entity portfolio records extracted from the published table.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// English month labels used in period labels and email subjects.
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// A (year, month) calendar unit the regulator publishes data for.
///
/// Ordering is lexicographic on (year, month), which the derived `Ord`
/// gives us from field order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Period {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {month}");
        Self { year, month }
    }

    /// The next calendar period, wrapping December into January.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// The present real-world calendar period (UTC).
    pub fn current() -> Self {
        let now = Utc::now();
        Self { year: now.year(), month: now.month() }
    }

    /// Human-readable label, e.g. "March 2026".
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// The persisted marker of the most recently confirmed data period.
///
/// Field names match the on-disk JSON record. The cursor only ever moves
/// forward, and only to periods positively confirmed to carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub last_year: i32,
    pub last_month: u32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self { last_year: 2025, last_month: 12 }
    }
}

impl Cursor {
    pub fn period(self) -> Period {
        Period::new(self.last_year, self.last_month)
    }

    pub fn from_period(p: Period) -> Self {
        Self { last_year: p.year, last_month: p.month }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One tracked entity's portfolio figures for a single period.
///
/// Every field degrades to zero when the source cell is malformed; a parse
/// failure never drops the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Total credit portfolio (cartera total), in pesos.
    pub total_portfolio: i64,
    /// Performing portion (cartera vigente).
    pub performing: i64,
    /// Non-performing portion (cartera vencida).
    pub non_performing: i64,
    /// Delinquency rate (IMORA), in percent.
    pub delinquency_rate: f64,
}

/// Records for all tracked entities found in one period's table, keyed by
/// short entity id. BTreeMap keeps report iteration order deterministic.
pub type PeriodResult = BTreeMap<String, EntityRecord>;

/// Everything one scan run confirmed, in ascending period order.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub periods: Vec<(Period, PeriodResult)>,
}

impl ScanOutcome {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The furthest confirmed period, i.e. the value the cursor advances to.
    pub fn latest_period(&self) -> Option<Period> {
        self.periods.last().map(|(p, _)| *p)
    }

    /// Comma-joined period labels, e.g. "January 2026, February 2026".
    pub fn period_labels(&self) -> String {
        self.periods
            .iter()
            .map(|(p, _)| p.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Fetch outcome
// ---------------------------------------------------------------------------

/// Explicit result of probing one period.
///
/// The scan engine folds `TransportError` into the same stopping behavior
/// as `NoData` (the source has no reliable "not yet published" signal), but
/// the two are kept distinct here so the distinction is loggable and
/// testable.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The period is published and at least one tracked entity was found.
    Data(PeriodResult),
    /// The period is not (yet) published, or the table held no tracked entity.
    NoData,
    /// Timeout, connection failure, or non-2xx status.
    TransportError(String),
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain errors. Cursor persistence failures are the one fatal condition:
/// data was found but could not be durably recorded, so the run must halt
/// rather than silently report success.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Failed to read cursor file {path}: {source}")]
    CursorRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cursor file {path} is corrupt: {source}")]
    CursorCorrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode cursor: {0}")]
    CursorEncode(#[source] serde_json::Error),

    #[error("Failed to write cursor file {path}: {source}")]
    CursorWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
