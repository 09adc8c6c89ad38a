//! Wire payloads of the USD-M futures market streams.
//!
//! Only the fields the connector maps are declared; everything else in a
//! frame is ignored. Prices and quantities arrive as decimal strings.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Frame shape of the combined `/stream?streams=...` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Combined<T> {
    /// Stream name the payload belongs to, e.g. `btcusdt@aggTrade`.
    pub stream: String,
    /// The payload itself.
    pub data: T,
}

/// `<symbol>@depth<levels>[@<speed>ms]` partial book depth.
#[derive(Debug, Clone, Deserialize)]
pub struct DepthUpdate {
    /// Event time (ms).
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Transaction time (ms).
    #[serde(rename = "T", default)]
    pub transaction_time: Option<i64>,
    /// Exchange symbol, upper-case.
    #[serde(rename = "s")]
    pub symbol: String,
    /// Bids as `[price, quantity]`, best first.
    #[serde(rename = "b")]
    pub bids: Vec<[Decimal; 2]>,
    /// Asks as `[price, quantity]`, best first.
    #[serde(rename = "a")]
    pub asks: Vec<[Decimal; 2]>,
}

/// `<symbol>@ticker` rolling 24h statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker24h {
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "p")]
    pub price_change: Decimal,
    #[serde(rename = "P")]
    pub price_change_percent: Decimal,
    #[serde(rename = "w")]
    pub weighted_avg_price: Decimal,
    #[serde(rename = "c")]
    pub last_price: Decimal,
    #[serde(rename = "Q")]
    pub last_quantity: Decimal,
    #[serde(rename = "o")]
    pub open_price: Decimal,
    #[serde(rename = "h")]
    pub high_price: Decimal,
    #[serde(rename = "l")]
    pub low_price: Decimal,
    #[serde(rename = "v")]
    pub volume: Decimal,
    #[serde(rename = "q")]
    pub quote_volume: Decimal,
}

/// `<symbol>@aggTrade` aggregated trade.
#[derive(Debug, Clone, Deserialize)]
pub struct AggTrade {
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Aggregate trade id.
    #[serde(rename = "a")]
    pub agg_id: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "q")]
    pub quantity: Decimal,
    /// First trade id folded into this aggregate.
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    /// Last trade id folded into this aggregate.
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    /// Trade time (ms).
    #[serde(rename = "T")]
    pub trade_time: i64,
    /// Buyer was the maker, so the taker sold.
    #[serde(rename = "m")]
    pub buyer_is_maker: bool,
}
