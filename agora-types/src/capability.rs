use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for errors and telemetry.
///
/// These map one-to-one with the connector role traits in `agora-core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Listing of currently open orders.
    OpenOrders,
    /// Historical user trades (fills).
    TradeHistory,

    /// Placing a limit order.
    PlaceLimitOrder,
    /// Placing a market order.
    PlaceMarketOrder,
    /// Placing a stop order.
    PlaceStopOrder,
    /// Cancelling an order.
    CancelOrder,

    /// Streaming: order book snapshots.
    StreamOrderBook,
    /// Streaming: ticker updates.
    StreamTicker,
    /// Streaming: public trades.
    StreamTrades,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenOrders => "open-orders",
            Self::TradeHistory => "trade-history",
            Self::PlaceLimitOrder => "place-limit-order",
            Self::PlaceMarketOrder => "place-market-order",
            Self::PlaceStopOrder => "place-stop-order",
            Self::CancelOrder => "cancel-order",
            Self::StreamOrderBook => "stream-order-book",
            Self::StreamTicker => "stream-ticker",
            Self::StreamTrades => "stream-trades",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
