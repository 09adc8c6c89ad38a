use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::stream::StreamHandle;
use agora_types::{
    AgoraError, CancelOrderParams, Capability, Instrument, LimitOrder, MarketOrder, OpenOrders,
    OpenOrdersParams, OrderBook, StopOrder, Ticker, Trade, TradeHistoryParams, UserTrades,
};
pub use agora_types::ConnectorKey;

/// Focused role trait for connectors that list the account's open orders.
#[async_trait]
pub trait OpenOrdersProvider: Send + Sync {
    /// Fetch open orders matching `params`, split into visible limit orders
    /// and hidden orders. `None` lists every open order.
    async fn open_orders(
        &self,
        params: Option<&OpenOrdersParams>,
    ) -> Result<OpenOrders, AgoraError>;
}

/// Focused role trait for connectors that return the account's trade history.
#[async_trait]
pub trait TradeHistoryProvider: Send + Sync {
    /// Fetch trades matching `params`, sorted by timestamp ascending.
    ///
    /// `None` means no constraint at all.
    async fn trade_history(
        &self,
        params: Option<&TradeHistoryParams>,
    ) -> Result<UserTrades, AgoraError>;

    /// Default parameter object for this connector: no pair, no span.
    fn trade_history_params(&self) -> TradeHistoryParams {
        TradeHistoryParams::default()
    }
}

/// Focused role trait for connectors that place orders.
///
/// Each method returns the exchange-assigned order id.
#[async_trait]
pub trait OrderPlacementProvider: Send + Sync {
    /// Place a limit order.
    async fn place_limit_order(&self, order: &LimitOrder) -> Result<String, AgoraError>;

    /// Place a market order.
    async fn place_market_order(&self, order: &MarketOrder) -> Result<String, AgoraError>;

    /// Place a stop order. Default returns `unsupported`.
    async fn place_stop_order(&self, order: &StopOrder) -> Result<String, AgoraError> {
        let _ = order;
        Err(AgoraError::unsupported(Capability::PlaceStopOrder.as_str()))
    }
}

/// Focused role trait for connectors that cancel orders.
#[async_trait]
pub trait CancelOrderProvider: Send + Sync {
    /// Cancel one order by exchange id.
    ///
    /// Returns `true` iff the exchange confirms `order_id` as cancelled. An id
    /// the exchange does not know yields `false`, not an error.
    async fn cancel_order(&self, order_id: &str) -> Result<bool, AgoraError>;

    /// Cancel using a parameter object.
    ///
    /// The default accepts only [`CancelOrderParams::ById`] and rejects every
    /// other variant, and empty ids, with `InvalidArg` before any network call.
    async fn cancel_order_with(&self, params: &CancelOrderParams) -> Result<bool, AgoraError> {
        match params {
            CancelOrderParams::ById(id) if !id.trim().is_empty() => self.cancel_order(id).await,
            CancelOrderParams::ById(_) => Err(AgoraError::invalid_arg("empty order id")),
            other => Err(AgoraError::invalid_arg(format!(
                "cancel by {} is not supported; only order id parameters are",
                other.kind()
            ))),
        }
    }
}

/// Receiver half plus the handle that stops it.
pub type Subscription<T> = (StreamHandle, mpsc::Receiver<T>);

/// Focused role trait for connectors that push public market data.
#[async_trait]
pub trait MarketDataStreamProvider: Send + Sync {
    /// Stream order book snapshots for `instrument`.
    async fn stream_order_book(
        &self,
        instrument: &Instrument,
    ) -> Result<Subscription<OrderBook>, AgoraError>;

    /// Stream ticker updates for `instrument`.
    async fn stream_ticker(&self, instrument: &Instrument)
    -> Result<Subscription<Ticker>, AgoraError>;

    /// Stream public trades for `instrument`.
    async fn stream_trades(&self, instrument: &Instrument)
    -> Result<Subscription<Trade>, AgoraError>;
}

/// Main connector trait implemented by exchange crates. Exposes capability discovery.
#[async_trait]
pub trait AgoraConnector: Send + Sync {
    /// A stable identifier, e.g. "agora-kucoin".
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this connector *claims* to trade or stream `instrument`.
    ///
    /// Default: `false`. Connectors must opt in explicitly.
    fn supports_instrument(&self, instrument: &Instrument) -> bool {
        let _ = instrument;
        false
    }

    /// Advertise open-order listing.
    fn as_open_orders_provider(&self) -> Option<&dyn OpenOrdersProvider> {
        None
    }

    /// Advertise trade history.
    fn as_trade_history_provider(&self) -> Option<&dyn TradeHistoryProvider> {
        None
    }

    /// Advertise order placement.
    fn as_order_placement_provider(&self) -> Option<&dyn OrderPlacementProvider> {
        None
    }

    /// Advertise order cancellation.
    fn as_cancel_order_provider(&self) -> Option<&dyn CancelOrderProvider> {
        None
    }

    /// If implemented, returns a trait object for market-data streaming.
    fn as_market_data_stream_provider(&self) -> Option<&dyn MarketDataStreamProvider> {
        None
    }
}
