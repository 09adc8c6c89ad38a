//! Conversions between KuCoin wire shapes and the agora domain model.

use agora_core::{
    AgoraError, CurrencyPair, Instrument, LimitOrder, MarketOrder, Order, OrderBase, OrderSide,
    OrderStatus, StopOrder, UserTrade,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::dto::{HistOrderResponse, OrderCreateRequest, OrderResponse, TradeResponse};

/// `BTC/USDT` -> `BTC-USDT`.
#[must_use]
pub fn adapt_currency_pair(pair: &CurrencyPair) -> String {
    format!("{}-{}", pair.base, pair.counter)
}

/// Exchange symbol for a spot instrument.
///
/// # Errors
/// `InvalidArg` for futures contracts, which this connector does not trade.
pub fn adapt_symbol(instrument: &Instrument) -> Result<String, AgoraError> {
    instrument
        .as_spot()
        .map(adapt_currency_pair)
        .ok_or_else(|| AgoraError::invalid_arg(format!("{instrument} is not a KuCoin spot pair")))
}

/// `BTC-USDT` -> `BTC/USDT`.
///
/// # Errors
/// `Data` if the symbol is not `BASE-COUNTER`.
pub fn parse_symbol(symbol: &str) -> Result<CurrencyPair, AgoraError> {
    match symbol.split_once('-') {
        Some((base, counter)) if !base.is_empty() && !counter.is_empty() => {
            Ok(CurrencyPair::new(base, counter))
        }
        _ => Err(AgoraError::Data(format!("unexpected symbol '{symbol}'"))),
    }
}

fn parse_side(side: &str) -> Result<OrderSide, AgoraError> {
    match side {
        "buy" => Ok(OrderSide::Bid),
        "sell" => Ok(OrderSide::Ask),
        other => Err(AgoraError::Data(format!("unexpected side '{other}'"))),
    }
}

const fn side_str(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Bid => "buy",
        OrderSide::Ask => "sell",
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, AgoraError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AgoraError::Data(format!("timestamp {ms} out of range")))
}

fn from_secs(secs: i64) -> Result<DateTime<Utc>, AgoraError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AgoraError::Data(format!("timestamp {secs} out of range")))
}

fn non_empty(s: Option<&String>) -> Option<String> {
    s.filter(|s| !s.is_empty()).cloned()
}

fn adapt_status(r: &OrderResponse, is_stop: bool) -> OrderStatus {
    let filled = r.deal_size.is_some_and(|d| d > Decimal::ZERO);
    match (r.cancel_exist, r.is_active, filled) {
        (true, _, true) => OrderStatus::PartiallyCanceled,
        (true, _, false) => OrderStatus::Canceled,
        (false, true, true) => OrderStatus::PartiallyFilled,
        (false, true, false) => OrderStatus::New,
        (false, false, _) if is_stop && !r.stop_triggered => OrderStatus::New,
        (false, false, _) => OrderStatus::Filled,
    }
}

/// Map a listed order to the domain model.
///
/// Orders carrying a `stop` become [`Order::Stop`], `limit` orders become
/// [`Order::Limit`], and everything else [`Order::Market`].
///
/// # Errors
/// `Data` on an unknown symbol, side or timestamp.
pub fn adapt_order(r: &OrderResponse) -> Result<Order, AgoraError> {
    let instrument = Instrument::Spot(parse_symbol(&r.symbol)?);
    let side = parse_side(&r.side)?;
    let is_stop = r.stop.as_deref().is_some_and(|s| !s.is_empty());
    let is_limit = r.order_type == "limit";
    let deal_size = r.deal_size.unwrap_or_default();

    let mut base = OrderBase::new(side, r.size.unwrap_or_default(), instrument);
    base.id = Some(r.id.clone());
    base.timestamp = Some(from_millis(r.created_at)?);
    base.status = Some(adapt_status(r, is_stop));
    base.cumulative_amount = deal_size;
    base.average_price = r
        .deal_funds
        .filter(|_| deal_size > Decimal::ZERO)
        .and_then(|funds| funds.checked_div(deal_size));
    base.fee = r.fee;
    base.user_reference = non_empty(r.client_oid.as_ref());

    let order = if is_stop {
        Order::Stop(StopOrder {
            base,
            stop_price: r.stop_price.unwrap_or_default(),
            limit_price: if is_limit { r.price } else { None },
        })
    } else if is_limit {
        Order::Limit(LimitOrder {
            base,
            limit_price: r.price.unwrap_or_default(),
        })
    } else {
        Order::Market(MarketOrder { base })
    };
    Ok(order)
}

/// Map a fill from the modern endpoint.
///
/// # Errors
/// `Data` on an unknown symbol, side or timestamp.
pub fn adapt_user_trade(r: &TradeResponse) -> Result<UserTrade, AgoraError> {
    Ok(UserTrade {
        side: parse_side(&r.side)?,
        amount: r.size,
        instrument: Instrument::Spot(parse_symbol(&r.symbol)?),
        price: r.price,
        timestamp: from_millis(r.created_at)?,
        id: r.trade_id.clone(),
        order_id: Some(r.order_id.clone()),
        fee_amount: r.fee,
        fee_currency: non_empty(r.fee_currency.as_ref()),
        order_user_reference: None,
    })
}

/// Map a filled order from the legacy endpoint.
///
/// The legacy listing has no trade ids, so the order id doubles as both. Fees
/// are charged in the counter currency.
///
/// # Errors
/// `Data` on an unknown symbol, side or timestamp.
pub fn adapt_hist_order(r: &HistOrderResponse) -> Result<UserTrade, AgoraError> {
    let pair = parse_symbol(&r.symbol)?;
    Ok(UserTrade {
        side: parse_side(&r.side)?,
        amount: r.amount,
        fee_currency: r.fee.map(|_| pair.counter.clone()),
        instrument: Instrument::Spot(pair),
        price: r.deal_price,
        timestamp: from_secs(r.created_at)?,
        id: r.id.clone(),
        order_id: Some(r.id.clone()),
        fee_amount: r.fee,
        order_user_reference: None,
    })
}

/// Exchange order id as a single URL path segment.
///
/// # Errors
/// `InvalidArg` unless the id is non-empty and made of ASCII letters, digits,
/// `-` and `_`.
pub fn order_id_segment(order_id: &str) -> Result<&str, AgoraError> {
    let valid = !order_id.is_empty()
        && order_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(order_id)
    } else {
        Err(AgoraError::invalid_arg(format!("malformed order id '{order_id}'")))
    }
}

/// Client order id for a new order: the caller's reference, else a fresh UUID.
#[must_use]
pub fn client_oid(base: &OrderBase) -> String {
    non_empty(base.user_reference.as_ref()).unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn positive(value: Decimal, what: &str) -> Result<Decimal, AgoraError> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(AgoraError::invalid_arg(format!("{what} must be positive, got {value}")))
    }
}

fn request_base(base: &OrderBase, order_type: &str) -> Result<OrderCreateRequest, AgoraError> {
    Ok(OrderCreateRequest {
        client_oid: client_oid(base),
        side: side_str(base.side).to_string(),
        symbol: adapt_symbol(&base.instrument)?,
        order_type: order_type.to_string(),
        price: None,
        size: Some(positive(base.original_amount, "amount")?),
        stop: None,
        stop_price: None,
    })
}

/// Request body for a limit order.
///
/// # Errors
/// `InvalidArg` for non-positive amounts or prices and non-spot instruments.
pub fn adapt_limit_order(order: &LimitOrder) -> Result<OrderCreateRequest, AgoraError> {
    let mut req = request_base(&order.base, "limit")?;
    req.price = Some(positive(order.limit_price, "limit price")?);
    Ok(req)
}

/// Request body for a market order, sized in base currency.
///
/// # Errors
/// `InvalidArg` for non-positive amounts and non-spot instruments.
pub fn adapt_market_order(order: &MarketOrder) -> Result<OrderCreateRequest, AgoraError> {
    request_base(&order.base, "market")
}

/// Request body for a stop order: `loss` when selling, `entry` when buying.
/// With a limit price the triggered order is a limit order, otherwise market.
///
/// # Errors
/// `InvalidArg` for non-positive amounts or prices and non-spot instruments.
pub fn adapt_stop_order(order: &StopOrder) -> Result<OrderCreateRequest, AgoraError> {
    let mut req = match order.limit_price {
        Some(limit) => {
            let mut req = request_base(&order.base, "limit")?;
            req.price = Some(positive(limit, "limit price")?);
            req
        }
        None => request_base(&order.base, "market")?,
    };
    req.stop = Some(
        match order.base.side {
            OrderSide::Ask => "loss",
            OrderSide::Bid => "entry",
        }
        .to_string(),
    );
    req.stop_price = Some(positive(order.stop_price, "stop price")?);
    Ok(req)
}
