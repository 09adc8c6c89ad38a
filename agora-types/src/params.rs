//! Request parameter objects for trade-service calls.
//!
//! Each is a concrete type (or a tagged enum) so connectors resolve what the
//! caller asked for once, at the boundary.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::instrument::{CurrencyPair, Instrument};
use crate::order::Order;
use crate::span::TimeSpan;

/// Filter for trade-history requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeHistoryParams {
    /// Restrict to one pair; `None` means all pairs.
    pub currency_pair: Option<CurrencyPair>,
    /// Restrict to a time span; `None` means no time constraint.
    pub time_span: Option<TimeSpan>,
}

impl TradeHistoryParams {
    /// Params restricted to `pair`.
    #[must_use]
    pub fn for_pair(pair: CurrencyPair) -> Self {
        Self {
            currency_pair: Some(pair),
            time_span: None,
        }
    }

    /// Set the time span.
    #[must_use]
    pub const fn with_span(mut self, span: TimeSpan) -> Self {
        self.time_span = Some(span);
        self
    }
}

/// Caller-supplied acceptance test for orders.
pub type OrderPredicate = Arc<dyn Fn(&Order) -> bool + Send + Sync>;

/// Filter for open-order listings.
#[derive(Clone, Default)]
pub struct OpenOrdersParams {
    /// Restrict to one instrument.
    pub instrument: Option<Instrument>,
    /// Extra acceptance test applied after adaptation.
    pub predicate: Option<OrderPredicate>,
}

impl OpenOrdersParams {
    /// Params restricted to `instrument`.
    #[must_use]
    pub fn for_instrument(instrument: Instrument) -> Self {
        Self {
            instrument: Some(instrument),
            predicate: None,
        }
    }

    /// Add an acceptance test.
    #[must_use]
    pub fn with_predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Order) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }

    /// Whether `order` passes every configured constraint.
    #[must_use]
    pub fn accepts(&self, order: &Order) -> bool {
        if let Some(inst) = &self.instrument
            && order.instrument() != inst
        {
            return false;
        }
        self.predicate.as_ref().is_none_or(|p| p(order))
    }
}

impl fmt::Debug for OpenOrdersParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOrdersParams")
            .field("instrument", &self.instrument)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Which order(s) to cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CancelOrderParams {
    /// A single order by exchange id.
    ById(String),
    /// Every open order on an instrument.
    ByInstrument(Instrument),
    /// A single order by client order id.
    ByUserReference(String),
}

impl CancelOrderParams {
    /// Short label for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ById(_) => "order id",
            Self::ByInstrument(_) => "instrument",
            Self::ByUserReference(_) => "user reference",
        }
    }
}
