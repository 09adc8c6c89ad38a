//! Trade-history span resolution for exchanges that split history across a
//! legacy and a modern endpoint at a fixed cutoff.
//!
//! [`resolve`] turns a possibly partial [`TimeSpan`] into one the upstream
//! endpoints accept, reporting any change as a [`SpanAdjustment`].
//! [`plan`] then decides which endpoint(s) serve the resolved span.
//!
//! Both are pure functions over a [`HistoryWindow`]; the caller supplies
//! `now` so results are reproducible.

use agora_types::{AdjustmentReason, HistoryWindow, QueryPlan, SpanAdjustment, TimeSpan};
use chrono::{DateTime, TimeDelta, Utc};

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Span to query.
    pub span: TimeSpan,
    /// Present whenever a bound was synthesized or clamped.
    pub adjustment: Option<SpanAdjustment>,
}

fn plus(t: DateTime<Utc>, d: TimeDelta) -> DateTime<Utc> {
    t.checked_add_signed(d).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn minus(t: DateTime<Utc>, d: TimeDelta) -> DateTime<Utc> {
    t.checked_sub_signed(d).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn just_before(t: DateTime<Utc>) -> DateTime<Utc> {
    minus(t, TimeDelta::milliseconds(1))
}

/// Fill in or clamp the bounds of `requested` so the upstream endpoints accept it.
///
/// - start only: end becomes `start + max_window`, or at least `cutoff - 1ms`
///   when start is before the cutoff.
/// - both: end is clamped to `start + max_window` if it is at or after the
///   cutoff and the span is wider than `max_window`.
/// - end only: start becomes `end - max_window` if end is after the cutoff;
///   otherwise start stays open and the legacy endpoint gets an open start.
/// - neither: the most recent `max_window` ending at `now`.
///
/// Never fails. Arithmetic saturates at the representable time range. An
/// inverted span (end before start) comes back unchanged; connectors reject it
/// before resolving.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(window), fields(cutoff = %window.cutoff))
)]
#[must_use]
pub fn resolve(requested: TimeSpan, window: &HistoryWindow, now: DateTime<Utc>) -> Resolution {
    let cutoff = window.cutoff;
    let max = window.max_window_delta();

    let (span, reason) = match (requested.start, requested.end) {
        (Some(start), None) => {
            let end = if start < cutoff {
                just_before(cutoff).max(plus(start, max))
            } else {
                plus(start, max)
            };
            (
                TimeSpan::between(start, end),
                Some(AdjustmentReason::EndSynthesized),
            )
        }
        (Some(start), Some(end)) if end >= cutoff && end - start > max => (
            TimeSpan::between(start, plus(start, max)),
            Some(AdjustmentReason::EndClamped),
        ),
        (Some(_), Some(_)) => (requested, None),
        (None, Some(end)) if end > cutoff => (
            TimeSpan::between(minus(end, max), end),
            Some(AdjustmentReason::StartSynthesized),
        ),
        (None, Some(_)) => (requested, None),
        (None, None) => (
            TimeSpan::between(minus(now, max), now),
            Some(AdjustmentReason::BothSynthesized),
        ),
    };

    let adjustment = reason.map(|reason| SpanAdjustment {
        reason,
        requested,
        resolved: span,
    });

    #[cfg(feature = "tracing")]
    if let Some(adj) = &adjustment {
        tracing::warn!(
            reason = ?adj.reason,
            start = ?adj.resolved.start,
            end = ?adj.resolved.end,
            "{adj}"
        );
    }

    Resolution { span, adjustment }
}

/// Choose the endpoint(s) that serve `span`.
///
/// - start after the cutoff: modern endpoint only.
/// - end before the cutoff: legacy endpoint only.
/// - otherwise the span is split: legacy gets `[start, cutoff - 1ms]` and
///   modern gets `[cutoff, end]`. The legacy part is dropped when start equals
///   the cutoff, since it would be empty.
///
/// A fully open span queries both endpoints without bounds.
#[must_use]
pub fn plan(span: TimeSpan, window: &HistoryWindow) -> QueryPlan {
    let cutoff = window.cutoff;

    if span.is_unbounded() {
        return QueryPlan {
            legacy: Some(span),
            modern: Some(span),
        };
    }
    if span.start.is_some_and(|s| s > cutoff) {
        return QueryPlan {
            legacy: None,
            modern: Some(span),
        };
    }
    if span.end.is_some_and(|e| e < cutoff) {
        return QueryPlan {
            legacy: Some(span),
            modern: None,
        };
    }

    let legacy = (span.start != Some(cutoff)).then(|| TimeSpan {
        start: span.start,
        end: Some(just_before(cutoff)),
    });
    QueryPlan {
        legacy,
        modern: Some(TimeSpan {
            start: Some(cutoff),
            end: span.end,
        }),
    }
}
