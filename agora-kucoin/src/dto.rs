//! Wire shapes of the KuCoin v1 REST API.
//!
//! Field names follow the exchange's camelCase JSON. Decimals arrive as
//! strings and are parsed with `rust_decimal`'s string deserializer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business code KuCoin returns on success.
pub const SUCCESS_CODE: &str = "200000";

/// Response envelope wrapping every REST payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// `"200000"` on success, an error code otherwise.
    pub code: String,
    /// Error description, absent on success.
    pub msg: Option<String>,
    /// Payload, absent on error.
    pub data: Option<T>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    /// 1-based page index.
    pub current_page: u32,
    /// Items per page as applied by the server.
    pub page_size: u32,
    /// Total items across all pages.
    pub total_num: u64,
    /// Total number of pages.
    pub total_page: u32,
    /// Items on this page.
    pub items: Vec<T>,
}

impl<T> Pagination<T> {
    /// True when the server reports pages after this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.total_page
    }
}

/// An order as listed by `GET /api/v1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub funds: Option<Decimal>,
    #[serde(default)]
    pub deal_funds: Option<Decimal>,
    #[serde(default)]
    pub deal_size: Option<Decimal>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub fee_currency: Option<String>,
    /// `"loss"`, `"entry"` or empty for non-stop orders.
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub stop_triggered: bool,
    #[serde(default)]
    pub time_in_force: Option<String>,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub iceberg: bool,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub cancel_exist: bool,
    /// Milliseconds since the epoch.
    pub created_at: i64,
}

/// A fill as listed by `GET /api/v1/fills`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub symbol: String,
    pub trade_id: String,
    pub order_id: String,
    pub side: String,
    pub price: Decimal,
    pub size: Decimal,
    #[serde(default)]
    pub funds: Option<Decimal>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub liquidity: Option<String>,
    /// Milliseconds since the epoch.
    pub created_at: i64,
}

/// A filled order from the legacy `GET /api/v1/hist-orders` listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistOrderResponse {
    pub id: String,
    pub symbol: String,
    pub side: String,
    pub deal_price: Decimal,
    #[serde(default)]
    pub deal_value: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default)]
    pub fee: Option<Decimal>,
    /// Seconds since the epoch.
    pub created_at: i64,
}

/// Body of `POST /api/v1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub client_oid: String,
    pub side: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
}

/// Payload of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateResponse {
    pub order_id: String,
}

/// Payload of `DELETE /api/v1/orders/{orderId}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelResponse {
    #[serde(default)]
    pub cancelled_order_ids: Vec<String>,
}

/// Filters shared by the listing endpoints.
///
/// Bounds are already in the unit the target endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Exchange symbol such as `BTC-USDT`.
    pub symbol: Option<String>,
    /// Lower bound (`startAt`).
    pub start_at: Option<i64>,
    /// Upper bound (`endAt`).
    pub end_at: Option<i64>,
    /// 1-based page to fetch.
    pub current_page: u32,
    /// Items per page.
    pub page_size: u32,
}

impl ListQuery {
    /// Query-string pairs in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(symbol) = &self.symbol {
            pairs.push(("symbol", symbol.clone()));
        }
        if let Some(s) = self.start_at {
            pairs.push(("startAt", s.to_string()));
        }
        if let Some(e) = self.end_at {
            pairs.push(("endAt", e.to_string()));
        }
        pairs.push(("currentPage", self.current_page.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));
        pairs
    }
}
