//! Time spans for history queries and the diagnostics produced when a span is
//! adjusted to fit exchange limits.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A possibly open-ended `[start, end]` interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl TimeSpan {
    /// Span with both bounds given.
    #[must_use]
    pub const fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Span open towards the future.
    #[must_use]
    pub const fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Span open towards the past.
    #[must_use]
    pub const fn until(end: DateTime<Utc>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Span with no bounds at all.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// True when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `start` in Unix milliseconds.
    #[must_use]
    pub fn start_millis(&self) -> Option<i64> {
        self.start.map(|t| t.timestamp_millis())
    }

    /// `end` in Unix milliseconds.
    #[must_use]
    pub fn end_millis(&self) -> Option<i64> {
        self.end.map(|t| t.timestamp_millis())
    }

    /// `start` in whole Unix seconds (truncated).
    #[must_use]
    pub fn start_secs(&self) -> Option<i64> {
        self.start.map(|t| t.timestamp())
    }

    /// `end` in whole Unix seconds (truncated).
    #[must_use]
    pub fn end_secs(&self) -> Option<i64> {
        self.end.map(|t| t.timestamp())
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |b: Option<DateTime<Utc>>| b.map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
        write!(f, "{} - {}", show(self.start), show(self.end))
    }
}

/// Why a span bound was synthesized or changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Only a start was given; an end was derived.
    EndSynthesized,
    /// The span was wider than the modern endpoint allows; the end was pulled in.
    EndClamped,
    /// Only an end was given; a start was derived.
    StartSynthesized,
    /// Neither bound was given; the most recent window was chosen.
    BothSynthesized,
}

impl AdjustmentReason {
    /// Human-readable notice for logs.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::EndSynthesized => "end time not specified",
            Self::EndClamped => "end time more than one window from start time",
            Self::StartSynthesized => "start time not specified",
            Self::BothSynthesized => "no start or end time specified",
        }
    }
}

impl fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Structured notice emitted whenever a requested span is adjusted.
///
/// Carries the exact span that will be queried so silent adjustments can be
/// audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanAdjustment {
    /// What triggered the adjustment.
    pub reason: AdjustmentReason,
    /// Span as requested.
    pub requested: TimeSpan,
    /// Span after adjustment.
    pub resolved: TimeSpan,
}

impl fmt::Display for SpanAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, adjusted to the following time span {}",
            self.reason, self.resolved
        )
    }
}

/// Which upstream endpoints to query, and with which sub-range each.
///
/// When both are present, `legacy` ends just before the cutoff and `modern`
/// starts at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    /// Range for the legacy endpoint (before the cutoff).
    pub legacy: Option<TimeSpan>,
    /// Range for the modern endpoint (at or after the cutoff).
    pub modern: Option<TimeSpan>,
}

impl QueryPlan {
    /// Number of upstream calls the plan requires.
    #[must_use]
    pub const fn call_count(&self) -> usize {
        self.legacy.is_some() as usize + self.modern.is_some() as usize
    }
}
