use chrono::{DateTime, Utc};

use agora_core::{
    AgoraError, BookLevel, Capability, FuturesContract, Instrument, OrderBook, OrderSide, Ticker,
    Trade,
};

use crate::BinanceFuturesConfig;
use crate::messages::{AggTrade, DepthUpdate, Ticker24h};

/// Which public stream a subscription targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Partial book depth.
    OrderBook,
    /// 24h ticker.
    Ticker,
    /// Aggregated trades.
    Trades,
}

impl Channel {
    /// Capability served by this channel.
    #[must_use]
    pub const fn capability(self) -> Capability {
        match self {
            Self::OrderBook => Capability::StreamOrderBook,
            Self::Ticker => Capability::StreamTicker,
            Self::Trades => Capability::StreamTrades,
        }
    }
}

/// Lower-case stream symbol: `btcusdt` for perpetuals, `btcusdt_250627` for
/// delivery contracts.
#[must_use]
pub fn adapt_contract(contract: &FuturesContract) -> String {
    let mut symbol = format!("{}{}", contract.pair.base, contract.pair.counter);
    if !contract.is_perpetual() {
        symbol.push('_');
        symbol.push_str(&contract.prompt);
    }
    symbol.to_ascii_lowercase()
}

/// Stream symbol for `instrument`.
///
/// # Errors
/// Spot instruments are `Unsupported` for `channel`'s capability.
pub fn adapt_instrument(instrument: &Instrument, channel: Channel) -> Result<String, AgoraError> {
    match instrument {
        Instrument::Future(contract) => Ok(adapt_contract(contract)),
        Instrument::Spot(_) => Err(AgoraError::unsupported(format!(
            "{}/spot",
            channel.capability().as_str()
        ))),
    }
}

/// Stream name for `symbol` on `channel`, e.g. `btcusdt@depth20@100ms`.
#[must_use]
pub fn stream_name(symbol: &str, channel: Channel, config: &BinanceFuturesConfig) -> String {
    match channel {
        Channel::OrderBook if config.update_speed_ms == 250 => {
            format!("{symbol}@depth{}", config.depth_levels)
        }
        Channel::OrderBook => format!(
            "{symbol}@depth{}@{}ms",
            config.depth_levels, config.update_speed_ms
        ),
        Channel::Ticker => format!("{symbol}@ticker"),
        Channel::Trades => format!("{symbol}@aggTrade"),
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, AgoraError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AgoraError::Data(format!("timestamp out of range: {ms}")))
}

fn levels(raw: Vec<[rust_decimal::Decimal; 2]>) -> Vec<BookLevel> {
    raw.into_iter()
        .map(|[price, amount]| BookLevel { price, amount })
        .collect()
}

/// Book snapshot for `instrument`.
///
/// # Errors
/// Returns `Data` when the event time is out of range.
pub fn adapt_depth(depth: DepthUpdate, instrument: &Instrument) -> Result<OrderBook, AgoraError> {
    let ts = depth.transaction_time.unwrap_or(depth.event_time);
    Ok(OrderBook {
        instrument: instrument.clone(),
        timestamp: Some(from_millis(ts)?),
        bids: levels(depth.bids),
        asks: levels(depth.asks),
    })
}

/// Ticker for `instrument`. The futures feed carries no best bid/ask.
///
/// # Errors
/// Returns `Data` when the event time is out of range.
pub fn adapt_ticker(t: Ticker24h, instrument: &Instrument) -> Result<Ticker, AgoraError> {
    Ok(Ticker {
        instrument: instrument.clone(),
        timestamp: Some(from_millis(t.event_time)?),
        last: t.last_price,
        open: Some(t.open_price),
        high: Some(t.high_price),
        low: Some(t.low_price),
        volume: Some(t.volume),
        quote_volume: Some(t.quote_volume),
        bid: None,
        ask: None,
        percentage_change: Some(t.price_change_percent),
    })
}

/// Public trade for `instrument`.
///
/// # Errors
/// Returns `Data` when the trade time is out of range.
pub fn adapt_agg_trade(t: AggTrade, instrument: &Instrument) -> Result<Trade, AgoraError> {
    Ok(Trade {
        instrument: instrument.clone(),
        side: if t.buyer_is_maker {
            OrderSide::Ask
        } else {
            OrderSide::Bid
        },
        price: t.price,
        amount: t.quantity,
        timestamp: from_millis(t.trade_time)?,
        id: t.agg_id.to_string(),
    })
}
