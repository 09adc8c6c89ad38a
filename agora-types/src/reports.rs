//! Report envelopes produced by connectors.

use serde::{Deserialize, Serialize};

use crate::error::AgoraError;
use crate::span::{QueryPlan, SpanAdjustment};
use crate::trade::UserTrades;

/// Result of a trade-history request together with how it was obtained.
///
/// Carries the ordered `trades`, the span adjustment applied to the request
/// (if any), the endpoint plan that was executed, and non-fatal `warnings`
/// such as truncated pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeHistoryReport {
    /// Trades sorted ascending by timestamp.
    pub trades: UserTrades,
    /// Adjustment applied to the requested span.
    pub adjustment: Option<SpanAdjustment>,
    /// Endpoint sub-ranges that were queried.
    pub plan: QueryPlan,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<AgoraError>,
}
