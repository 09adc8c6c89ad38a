//! agora-binance
//!
//! Binance USD-M futures public market-data connector implementing
//! `MarketDataStreamProvider`: partial order book depth, 24h tickers and
//! aggregated trades over the combined-stream WebSocket endpoint.
//!
//! Every subscription runs on its own socket. Dropping or stopping the returned
//! [`StreamHandle`] closes the socket and ends delivery; the receiver then
//! yields whatever was already buffered followed by `None`.
#![warn(missing_docs)]

/// Raw WebSocket transport and the production adapter.
pub mod adapter;
/// Wire-to-domain conversions and stream naming.
pub mod convert;
#[allow(missing_docs)]
pub mod messages;

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "test-adapters")]
use adapter::CloneArcAdapters;
use adapter::{BnStream, RealAdapter};
use agora_core::{
    AgoraError, Instrument, OrderBook, ProductSubscription, StreamHandle, Ticker, Trade,
    connector::{AgoraConnector, ConnectorKey, MarketDataStreamProvider, Subscription},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use convert::Channel;
use messages::Combined;

pub(crate) const CONNECTOR: &str = "agora-binance";

/// Production WebSocket endpoint.
pub const DEFAULT_WS_BASE_URL: &str = "wss://fstream.binance.com";

/// Buffered items per receiver.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Binance refuses connections with more streams than this.
const MAX_STREAMS_PER_CONNECTION: usize = 200;

/// Connector settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinanceFuturesConfig {
    /// WebSocket base URL, without the `/stream` path.
    pub ws_base_url: String,
    /// Capacity of each subscription channel.
    pub channel_capacity: usize,
    /// Book levels per side: 5, 10 or 20.
    pub depth_levels: u16,
    /// Book update interval in ms: 100, 250 or 500.
    pub update_speed_ms: u16,
}

impl Default for BinanceFuturesConfig {
    fn default() -> Self {
        Self {
            ws_base_url: DEFAULT_WS_BASE_URL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            depth_levels: 20,
            update_speed_ms: 100,
        }
    }
}

impl BinanceFuturesConfig {
    /// Check the book settings against what the exchange offers.
    ///
    /// # Errors
    /// Returns `InvalidArg` for unsupported depth levels or update speeds.
    pub fn validate(&self) -> Result<(), AgoraError> {
        if ![5, 10, 20].contains(&self.depth_levels) {
            return Err(AgoraError::invalid_arg(format!(
                "depth levels must be 5, 10 or 20, got {}",
                self.depth_levels
            )));
        }
        if ![100, 250, 500].contains(&self.update_speed_ms) {
            return Err(AgoraError::invalid_arg(format!(
                "update speed must be 100, 250 or 500 ms, got {}",
                self.update_speed_ms
            )));
        }
        Ok(())
    }

    /// Combined-stream URL for `names`.
    #[must_use]
    pub fn stream_url(&self, names: &[String]) -> String {
        format!(
            "{}/stream?streams={}",
            self.ws_base_url.trim_end_matches('/'),
            names.join("/")
        )
    }
}

/// Receivers for one [`BinanceFuturesConnector::connect`] call, all fed by a
/// single socket.
///
/// Receivers of kinds that were not subscribed never yield anything.
#[derive(Debug)]
pub struct StreamSet {
    /// Stops the shared socket.
    pub handle: StreamHandle,
    /// Order book snapshots.
    pub order_books: mpsc::Receiver<OrderBook>,
    /// Ticker updates.
    pub tickers: mpsc::Receiver<Ticker>,
    /// Public trades.
    pub trades: mpsc::Receiver<Trade>,
}

#[cfg(feature = "test-adapters")]
type StreamAdapter = Arc<dyn BnStream>;
#[cfg(not(feature = "test-adapters"))]
type StreamAdapter = Arc<RealAdapter>;

/// Public connector type.
pub struct BinanceFuturesConnector {
    stream: StreamAdapter,
    config: BinanceFuturesConfig,
}

impl Default for BinanceFuturesConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl BinanceFuturesConnector {
    /// Static connector key.
    pub const KEY: ConnectorKey = ConnectorKey::new("agora-binance");

    /// Connector for the production endpoint with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BinanceFuturesConfig::default())
    }

    /// Connector using `config`.
    #[must_use]
    pub fn with_config(config: BinanceFuturesConfig) -> Self {
        let mut connector = Self::from_adapter(&RealAdapter::new(config.channel_capacity));
        connector.config = config;
        connector
    }

    /// For tests/injection (requires the `test-adapters` feature).
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter<A: CloneArcAdapters + 'static>(adapter: &A) -> Self {
        Self {
            stream: adapter.clone_arc_stream(),
            config: BinanceFuturesConfig::default(),
        }
    }

    #[cfg(not(feature = "test-adapters"))]
    /// Build from a concrete `RealAdapter`.
    pub fn from_adapter(adapter: &RealAdapter) -> Self {
        Self {
            stream: Arc::new(adapter.clone()),
            config: BinanceFuturesConfig::default(),
        }
    }

    /// Replace the book depth settings.
    #[must_use]
    pub const fn with_depth(mut self, levels: u16, update_speed_ms: u16) -> Self {
        self.config.depth_levels = levels;
        self.config.update_speed_ms = update_speed_ms;
        self
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &BinanceFuturesConfig {
        &self.config
    }

    /// Open every stream in `subscription` on one socket.
    ///
    /// # Errors
    /// `InvalidArg` for an empty subscription, bad book settings or too many
    /// streams; `Unsupported` for spot instruments; `Transport` when the socket
    /// cannot be opened.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "binance.subscribe", skip(self, subscription))
    )]
    pub async fn connect(
        &self,
        subscription: &ProductSubscription,
    ) -> Result<StreamSet, AgoraError> {
        if subscription.is_empty() {
            return Err(AgoraError::invalid_arg("empty product subscription"));
        }
        self.config.validate()?;

        let mut names = Vec::new();
        let mut routes = HashMap::new();
        for (channel, instruments) in [
            (Channel::OrderBook, &subscription.order_books),
            (Channel::Ticker, &subscription.tickers),
            (Channel::Trades, &subscription.trades),
        ] {
            for instrument in instruments {
                let symbol = convert::adapt_instrument(instrument, channel)?;
                let name = convert::stream_name(&symbol, channel, &self.config);
                let route = Route {
                    channel,
                    instrument: instrument.clone(),
                };
                if routes.insert(name.clone(), route).is_none() {
                    names.push(name);
                }
            }
        }
        if names.len() > MAX_STREAMS_PER_CONNECTION {
            return Err(AgoraError::invalid_arg(format!(
                "{} streams requested, at most {MAX_STREAMS_PER_CONNECTION} per connection",
                names.len()
            )));
        }

        let url = self.config.stream_url(&names);
        #[cfg(feature = "tracing")]
        tracing::debug!(%url, streams = names.len(), "opening market streams");
        let (upstream, raw) = self.stream.connect(&url).await?;

        let capacity = self.config.channel_capacity.max(1);
        let (books_tx, order_books) = mpsc::channel(capacity);
        let (tickers_tx, tickers) = mpsc::channel(capacity);
        let (trades_tx, trades) = mpsc::channel(capacity);
        let router = Router {
            routes,
            books: (!subscription.order_books.is_empty()).then_some(books_tx),
            tickers: (!subscription.tickers.is_empty()).then_some(tickers_tx),
            trades: (!subscription.trades.is_empty()).then_some(trades_tx),
        };

        Ok(StreamSet {
            handle: spawn_dispatch(upstream, raw, router),
            order_books,
            tickers,
            trades,
        })
    }
}

struct Route {
    channel: Channel,
    instrument: Instrument,
}

/// Decodes combined-stream frames and fans them out per channel.
struct Router {
    routes: HashMap<String, Route>,
    books: Option<mpsc::Sender<OrderBook>>,
    tickers: Option<mpsc::Sender<Ticker>>,
    trades: Option<mpsc::Sender<Trade>>,
}

impl Router {
    const fn is_open(&self) -> bool {
        self.books.is_some() || self.tickers.is_some() || self.trades.is_some()
    }

    async fn dispatch(&mut self, frame: &str) {
        let envelope: Combined<serde_json::Value> = match serde_json::from_str(frame) {
            Ok(e) => e,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "skipping undecodable frame");
                return;
            }
        };
        let Some(route) = self.routes.get(&envelope.stream) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(stream = %envelope.stream, "frame for unknown stream");
            return;
        };
        let instrument = &route.instrument;
        let stream = envelope.stream.as_str();
        match route.channel {
            Channel::OrderBook => {
                let book = decode(envelope.data).and_then(|d| convert::adapt_depth(d, instrument));
                forward(&mut self.books, book, stream).await;
            }
            Channel::Ticker => {
                let ticker =
                    decode(envelope.data).and_then(|t| convert::adapt_ticker(t, instrument));
                forward(&mut self.tickers, ticker, stream).await;
            }
            Channel::Trades => {
                let trade =
                    decode(envelope.data).and_then(|t| convert::adapt_agg_trade(t, instrument));
                forward(&mut self.trades, trade, stream).await;
            }
        }
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, AgoraError> {
    serde_json::from_value(data).map_err(|e| AgoraError::Data(e.to_string()))
}

/// Send `item` unless it failed to decode. A closed receiver retires its slot.
async fn forward<T>(
    slot: &mut Option<mpsc::Sender<T>>,
    item: Result<T, AgoraError>,
    _stream: &str,
) {
    let item = match item {
        Ok(v) => v,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(stream = _stream, error = %_e, "skipping malformed payload");
            return;
        }
    };
    let Some(tx) = slot.as_ref() else {
        return;
    };
    if tx.send(item).await.is_err() {
        *slot = None;
    }
}

fn spawn_dispatch(
    upstream: StreamHandle,
    mut raw: mpsc::Receiver<String>,
    mut router: Router,
) -> StreamHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                frame = raw.recv() => match frame {
                    Some(text) => {
                        tokio::select! {
                            _ = &mut stop_rx => break,
                            () = router.dispatch(&text) => {}
                        }
                        if !router.is_open() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        // Close the receivers before waiting on the socket.
        drop(router);
        upstream.stop().await;
        #[cfg(feature = "tracing")]
        tracing::debug!("market streams stopped");
    });
    StreamHandle::new(join, stop_tx)
}

#[async_trait]
impl MarketDataStreamProvider for BinanceFuturesConnector {
    async fn stream_order_book(
        &self,
        instrument: &Instrument,
    ) -> Result<Subscription<OrderBook>, AgoraError> {
        let subscription = ProductSubscription::create().add_order_book(instrument.clone());
        let set = self.connect(&subscription).await?;
        Ok((set.handle, set.order_books))
    }

    async fn stream_ticker(
        &self,
        instrument: &Instrument,
    ) -> Result<Subscription<Ticker>, AgoraError> {
        let subscription = ProductSubscription::create().add_ticker(instrument.clone());
        let set = self.connect(&subscription).await?;
        Ok((set.handle, set.tickers))
    }

    async fn stream_trades(
        &self,
        instrument: &Instrument,
    ) -> Result<Subscription<Trade>, AgoraError> {
        let subscription = ProductSubscription::create().add_trades(instrument.clone());
        let set = self.connect(&subscription).await?;
        Ok((set.handle, set.trades))
    }
}

#[async_trait]
impl AgoraConnector for BinanceFuturesConnector {
    fn name(&self) -> &'static str {
        CONNECTOR
    }

    fn vendor(&self) -> &'static str {
        "Binance"
    }

    fn supports_instrument(&self, instrument: &Instrument) -> bool {
        matches!(instrument, Instrument::Future(_))
    }

    fn as_market_data_stream_provider(&self) -> Option<&dyn MarketDataStreamProvider> {
        Some(self as &dyn MarketDataStreamProvider)
    }
}
