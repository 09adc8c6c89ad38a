//! Agora-specific data transfer objects and configuration primitives.
//!
//! Everything here is plain data: instruments, orders, trades, market-data
//! snapshots, request parameters, configuration and the unified error type.
//! Connector traits and the policy logic operating on these types live in
//! `agora-core`.
#![warn(missing_docs)]

mod capability;
mod config;
mod connector;
/// Unified error type.
pub mod error;
mod instrument;
mod market;
mod order;
mod params;
mod reports;
mod span;
mod trade;

pub use capability::Capability;
pub use config::{HistoryPaging, HistoryWindow};
pub use connector::ConnectorKey;
pub use error::AgoraError;
pub use instrument::{CurrencyPair, FuturesContract, Instrument};
pub use market::{BookLevel, OrderBook, ProductSubscription, Ticker, Trade};
pub use order::{
    LimitOrder, MarketOrder, OpenOrders, Order, OrderBase, OrderSide, OrderStatus, StopOrder,
};
pub use params::{CancelOrderParams, OpenOrdersParams, OrderPredicate, TradeHistoryParams};
pub use reports::TradeHistoryReport;
pub use span::{AdjustmentReason, QueryPlan, SpanAdjustment, TimeSpan};
pub use trade::{TradeSortType, UserTrade, UserTrades};

pub use rust_decimal::Decimal;
