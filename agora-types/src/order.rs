//! Orders as seen by the generic trading model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;

/// Direction of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    /// Buying the base currency.
    Bid,
    /// Selling the base currency.
    Ask,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OrderStatus {
    /// Accepted and resting, nothing filled yet.
    New,
    /// Resting with a partial fill.
    PartiallyFilled,
    /// Completely filled.
    Filled,
    /// Cancelled before any fill.
    Canceled,
    /// Cancelled after a partial fill.
    PartiallyCanceled,
    /// State could not be determined from the exchange payload.
    Unknown,
}

impl OrderStatus {
    /// Whether the order may still trade.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::New | Self::PartiallyFilled)
    }
}

/// Fields shared by every order variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBase {
    /// Buy or sell.
    pub side: OrderSide,
    /// Requested amount in base currency.
    pub original_amount: Decimal,
    /// Instrument traded.
    pub instrument: Instrument,
    /// Exchange-assigned identifier, once known.
    pub id: Option<String>,
    /// Creation time reported by the exchange.
    pub timestamp: Option<DateTime<Utc>>,
    /// Lifecycle state reported by the exchange.
    pub status: Option<OrderStatus>,
    /// Amount already filled.
    pub cumulative_amount: Decimal,
    /// Average fill price.
    pub average_price: Option<Decimal>,
    /// Fee charged so far.
    pub fee: Option<Decimal>,
    /// Caller-chosen client order id.
    pub user_reference: Option<String>,
}

impl OrderBase {
    /// Minimal description of a new order.
    #[must_use]
    pub const fn new(side: OrderSide, original_amount: Decimal, instrument: Instrument) -> Self {
        Self {
            side,
            original_amount,
            instrument,
            id: None,
            timestamp: None,
            status: None,
            cumulative_amount: Decimal::ZERO,
            average_price: None,
            fee: None,
            user_reference: None,
        }
    }

    /// Amount not yet filled.
    #[must_use]
    pub fn remaining_amount(&self) -> Decimal {
        self.original_amount - self.cumulative_amount
    }
}

/// Order resting at a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrder {
    /// Shared order fields.
    #[serde(flatten)]
    pub base: OrderBase,
    /// Limit price in counter currency.
    pub limit_price: Decimal,
}

impl LimitOrder {
    /// New limit order, not yet placed.
    #[must_use]
    pub const fn new(
        side: OrderSide,
        original_amount: Decimal,
        instrument: Instrument,
        limit_price: Decimal,
    ) -> Self {
        Self {
            base: OrderBase::new(side, original_amount, instrument),
            limit_price,
        }
    }

    /// Attach a client order id.
    #[must_use]
    pub fn with_user_reference(mut self, reference: impl Into<String>) -> Self {
        self.base.user_reference = Some(reference.into());
        self
    }
}

/// Order executing immediately at the best available price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    /// Shared order fields.
    #[serde(flatten)]
    pub base: OrderBase,
}

impl MarketOrder {
    /// New market order, not yet placed.
    #[must_use]
    pub const fn new(side: OrderSide, original_amount: Decimal, instrument: Instrument) -> Self {
        Self {
            base: OrderBase::new(side, original_amount, instrument),
        }
    }

    /// Attach a client order id.
    #[must_use]
    pub fn with_user_reference(mut self, reference: impl Into<String>) -> Self {
        self.base.user_reference = Some(reference.into());
        self
    }
}

/// Order that activates once the market trades through `stop_price`.
///
/// With a `limit_price` it becomes a limit order on activation, otherwise a
/// market order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopOrder {
    /// Shared order fields.
    #[serde(flatten)]
    pub base: OrderBase,
    /// Trigger price.
    pub stop_price: Decimal,
    /// Limit price applied after triggering.
    pub limit_price: Option<Decimal>,
}

impl StopOrder {
    /// New stop order, not yet placed.
    #[must_use]
    pub const fn new(
        side: OrderSide,
        original_amount: Decimal,
        instrument: Instrument,
        stop_price: Decimal,
        limit_price: Option<Decimal>,
    ) -> Self {
        Self {
            base: OrderBase::new(side, original_amount, instrument),
            stop_price,
            limit_price,
        }
    }

    /// Attach a client order id.
    #[must_use]
    pub fn with_user_reference(mut self, reference: impl Into<String>) -> Self {
        self.base.user_reference = Some(reference.into());
        self
    }
}

/// Any order known to the generic model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Order {
    /// Visible limit order.
    Limit(LimitOrder),
    /// Market order.
    Market(MarketOrder),
    /// Stop-triggered order.
    Stop(StopOrder),
}

impl Order {
    /// Shared order fields.
    #[must_use]
    pub const fn base(&self) -> &OrderBase {
        match self {
            Self::Limit(o) => &o.base,
            Self::Market(o) => &o.base,
            Self::Stop(o) => &o.base,
        }
    }

    /// Instrument traded.
    #[must_use]
    pub const fn instrument(&self) -> &Instrument {
        &self.base().instrument
    }

    /// Exchange-assigned identifier, once known.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    /// True only for standard visible limit orders.
    #[must_use]
    pub const fn is_visible_limit(&self) -> bool {
        matches!(self, Self::Limit(_))
    }
}

impl From<LimitOrder> for Order {
    fn from(o: LimitOrder) -> Self {
        Self::Limit(o)
    }
}

impl From<MarketOrder> for Order {
    fn from(o: MarketOrder) -> Self {
        Self::Market(o)
    }
}

impl From<StopOrder> for Order {
    fn from(o: StopOrder) -> Self {
        Self::Stop(o)
    }
}

/// Open orders split into visible limit orders and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrders {
    /// Standard limit orders, in exchange order.
    pub open_orders: Vec<LimitOrder>,
    /// Orders with no visible book presence (stop-triggered, market), in exchange order.
    pub hidden_orders: Vec<Order>,
}

impl OpenOrders {
    /// Partition `orders`, preserving relative order inside each partition.
    pub fn partition(orders: impl IntoIterator<Item = Order>) -> Self {
        let mut out = Self::default();
        for order in orders {
            match order {
                Order::Limit(limit) => out.open_orders.push(limit),
                other => out.hidden_orders.push(other),
            }
        }
        out
    }

    /// Total number of orders across both partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open_orders.len() + self.hidden_orders.len()
    }

    /// True when there are no open orders at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open_orders.is_empty() && self.hidden_orders.is_empty()
    }
}
