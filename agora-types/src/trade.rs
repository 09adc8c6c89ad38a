//! Executed trades belonging to the account.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;
use crate::order::OrderSide;

/// One fill of one of the user's orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrade {
    /// Buy or sell from the user's perspective.
    pub side: OrderSide,
    /// Filled amount in base currency.
    pub amount: Decimal,
    /// Instrument traded.
    pub instrument: Instrument,
    /// Execution price.
    pub price: Decimal,
    /// Execution time.
    pub timestamp: DateTime<Utc>,
    /// Exchange trade identifier.
    pub id: String,
    /// Identifier of the order that produced this fill.
    pub order_id: Option<String>,
    /// Fee charged for this fill.
    pub fee_amount: Option<Decimal>,
    /// Currency the fee was charged in.
    pub fee_currency: Option<String>,
    /// Client order id of the originating order.
    pub order_user_reference: Option<String>,
}

/// Ordering guarantee of a [`UserTrades`] collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TradeSortType {
    /// Ordered by trade id (lexicographic).
    ById,
    /// Ordered by execution time, oldest first.
    #[default]
    ByTimestamp,
}

/// An ordered collection of user trades.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrades {
    trades: Vec<UserTrade>,
    sort: TradeSortType,
}

impl UserTrades {
    /// Sort `trades` according to `sort`. The sort is stable, so records with
    /// equal keys keep their input order.
    #[must_use]
    pub fn new(mut trades: Vec<UserTrade>, sort: TradeSortType) -> Self {
        match sort {
            TradeSortType::ByTimestamp => trades.sort_by_key(|t| t.timestamp),
            TradeSortType::ById => trades.sort_by(|a, b| a.id.cmp(&b.id)),
        }
        Self { trades, sort }
    }

    /// Trades in collection order.
    #[must_use]
    pub fn trades(&self) -> &[UserTrade] {
        &self.trades
    }

    /// Ordering applied to this collection.
    #[must_use]
    pub const fn sort(&self) -> TradeSortType {
        self.sort
    }

    /// Number of trades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// True when the collection holds no trades.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Consume the collection, returning the ordered trades.
    #[must_use]
    pub fn into_inner(self) -> Vec<UserTrade> {
        self.trades
    }
}

impl IntoIterator for UserTrades {
    type Item = UserTrade;
    type IntoIter = std::vec::IntoIter<UserTrade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.into_iter()
    }
}
