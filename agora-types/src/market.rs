//! Public market-data snapshots delivered by streaming connectors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;
use crate::order::OrderSide;

/// One price level of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Price in counter currency.
    pub price: Decimal,
    /// Quantity resting at `price`.
    pub amount: Decimal,
}

/// Order book snapshot. Bids are sorted best (highest) first, asks best
/// (lowest) first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Instrument the book belongs to.
    pub instrument: Instrument,
    /// Exchange event time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Buy side.
    pub bids: Vec<BookLevel>,
    /// Sell side.
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Highest bid, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    /// Lowest ask, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// True when both sides are present and the best bid is below the best ask.
    #[must_use]
    pub fn is_uncrossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(b), Some(a)) => b.price < a.price,
            _ => false,
        }
    }
}

/// Rolling 24h statistics for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    /// Instrument the ticker belongs to.
    pub instrument: Instrument,
    /// Exchange event time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Last traded price.
    pub last: Decimal,
    /// Price 24h ago.
    pub open: Option<Decimal>,
    /// 24h high.
    pub high: Option<Decimal>,
    /// 24h low.
    pub low: Option<Decimal>,
    /// 24h base volume.
    pub volume: Option<Decimal>,
    /// 24h counter volume.
    pub quote_volume: Option<Decimal>,
    /// Best bid, when the feed carries it.
    pub bid: Option<Decimal>,
    /// Best ask, when the feed carries it.
    pub ask: Option<Decimal>,
    /// 24h change in percent.
    pub percentage_change: Option<Decimal>,
}

/// A public trade print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Instrument traded.
    pub instrument: Instrument,
    /// Taker side.
    pub side: OrderSide,
    /// Execution price.
    pub price: Decimal,
    /// Executed amount.
    pub amount: Decimal,
    /// Execution time.
    pub timestamp: DateTime<Utc>,
    /// Exchange trade identifier.
    pub id: String,
}

/// Set of instruments to subscribe to, per kind of market data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSubscription {
    /// Instruments to stream order books for.
    pub order_books: Vec<Instrument>,
    /// Instruments to stream tickers for.
    pub tickers: Vec<Instrument>,
    /// Instruments to stream trades for.
    pub trades: Vec<Instrument>,
}

impl ProductSubscription {
    /// Start an empty subscription.
    #[must_use]
    pub fn create() -> Self {
        Self::default()
    }

    /// Add an order book subscription.
    #[must_use]
    pub fn add_order_book(mut self, instrument: Instrument) -> Self {
        if !self.order_books.contains(&instrument) {
            self.order_books.push(instrument);
        }
        self
    }

    /// Add a ticker subscription.
    #[must_use]
    pub fn add_ticker(mut self, instrument: Instrument) -> Self {
        if !self.tickers.contains(&instrument) {
            self.tickers.push(instrument);
        }
        self
    }

    /// Add a trades subscription.
    #[must_use]
    pub fn add_trades(mut self, instrument: Instrument) -> Self {
        if !self.trades.contains(&instrument) {
            self.trades.push(instrument);
        }
        self
    }

    /// Finish the `add_*` chain.
    #[must_use]
    pub fn build(self) -> Self {
        self
    }

    /// True when nothing was subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_books.is_empty() && self.tickers.is_empty() && self.trades.is_empty()
    }
}
