//! agora-kucoin
//!
//! KuCoin spot trade-service connector implementing `AgoraConnector`: open
//! orders, trade history across the legacy and modern history endpoints, order
//! placement and cancellation.
//!
//! Trade history requests are resolved against a [`HistoryWindow`] before any
//! call is made (see `agora_core::timespan`). By default only the first page of
//! each endpoint is fetched; further pages are reported as a
//! [`AgoraError::Truncated`] warning in [`TradeHistoryReport::warnings`].
//! Use [`HistoryPaging::AllPages`] to follow them.
#![warn(missing_docs)]

/// Endpoint adapters and the production adapter backed by [`client::KucoinClient`].
pub mod adapter;
/// Connector configuration and builder.
pub mod builder;
/// Signed REST client.
pub mod client;
/// Wire-to-domain conversions.
pub mod convert;
#[allow(missing_docs)]
pub mod dto;

use std::future::Future;
use std::sync::Arc;

#[cfg(feature = "test-adapters")]
use adapter::CloneArcAdapters;
use adapter::{KcHistory, KcOrders, RealAdapter};
use agora_core::{
    AgoraError, HistoryPaging, HistoryWindow, Instrument, LimitOrder, MarketOrder, OpenOrders,
    OpenOrdersParams, StopOrder, TimeSpan, TradeHistoryParams, TradeHistoryReport,
    TradeSortType, UserTrade, UserTrades,
    connector::{
        AgoraConnector, CancelOrderProvider, ConnectorKey, OpenOrdersProvider,
        OrderPlacementProvider, TradeHistoryProvider,
    },
};
use async_trait::async_trait;

pub use builder::{KucoinConfig, KucoinConnectorBuilder};
use client::KucoinClient;
pub use client::KucoinCredentials;
use dto::{ListQuery, Pagination};

#[cfg(feature = "test-adapters")]
type OrdersAdapter = Arc<dyn KcOrders>;
#[cfg(not(feature = "test-adapters"))]
type OrdersAdapter = Arc<RealAdapter>;

#[cfg(feature = "test-adapters")]
type HistoryAdapter = Arc<dyn KcHistory>;
#[cfg(not(feature = "test-adapters"))]
type HistoryAdapter = Arc<RealAdapter>;

/// Public connector type. Construct with [`KucoinConnector::builder`].
pub struct KucoinConnector {
    orders: OrdersAdapter,
    history: HistoryAdapter,
    config: KucoinConfig,
}

impl KucoinConnector {
    /// Static connector key.
    pub const KEY: ConnectorKey = ConnectorKey::new("agora-kucoin");

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not exist") || m.contains("not found")
    }

    fn normalize_error(e: AgoraError, what: &str) -> AgoraError {
        match e {
            AgoraError::Connector { msg, .. } if Self::looks_like_not_found(&msg) => {
                AgoraError::not_found(what.to_string())
            }
            other => other,
        }
    }

    pub(crate) fn with_client(client: KucoinClient, config: KucoinConfig) -> Self {
        let mut connector = Self::from_adapter(&RealAdapter::new(client));
        connector.config = config;
        connector
    }

    /// For tests/injection (requires the `test-adapters` feature).
    ///
    /// Uses [`KucoinConfig::default`]; adjust with the `with_*` methods.
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter<A: CloneArcAdapters + 'static>(adapter: &A) -> Self {
        Self {
            orders: adapter.clone_arc_orders(),
            history: adapter.clone_arc_history(),
            config: KucoinConfig::default(),
        }
    }

    #[cfg(not(feature = "test-adapters"))]
    /// Build from a concrete `RealAdapter` by cloning it into shared handles.
    pub fn from_adapter(adapter: &RealAdapter) -> Self {
        let shared = Arc::new(adapter.clone());
        Self {
            orders: Arc::clone(&shared),
            history: shared,
            config: KucoinConfig::default(),
        }
    }

    /// Replace the history pagination policy.
    #[must_use]
    pub const fn with_paging(mut self, paging: HistoryPaging) -> Self {
        self.config.paging = paging;
        self
    }

    /// Replace the history window.
    #[must_use]
    pub const fn with_history_window(mut self, window: HistoryWindow) -> Self {
        self.config.history_window = window;
        self
    }

    /// Replace the listing page size. Zero is bumped to one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size.max(1);
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &KucoinConfig {
        &self.config
    }

    fn list_query(&self, symbol: Option<String>, span: Option<TimeSpan>, secs: bool) -> ListQuery {
        let (start_at, end_at) = match span {
            Some(s) if secs => (s.start_secs(), s.end_secs()),
            Some(s) => (s.start_millis(), s.end_millis()),
            None => (None, None),
        };
        ListQuery {
            symbol,
            start_at,
            end_at,
            current_page: 1,
            page_size: self.config.page_size,
        }
    }

    /// Follow pages up to the configured limit, recording a truncation warning
    /// when the server reports more.
    async fn fetch_pages<T, F, Fut>(
        &self,
        what: &str,
        mut query: ListQuery,
        fetch: F,
        warnings: &mut Vec<AgoraError>,
    ) -> Result<Vec<T>, AgoraError>
    where
        F: Fn(ListQuery) -> Fut,
        Fut: Future<Output = Result<Pagination<T>, AgoraError>>,
    {
        let limit = self.config.paging.page_limit();
        let mut items = Vec::new();
        loop {
            let page = fetch(query.clone()).await?;
            let more = page.has_more();
            let total_pages = page.total_page;
            items.extend(page.items);
            if !more {
                break;
            }
            if query.current_page >= limit {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    endpoint = what,
                    fetched_pages = query.current_page,
                    total_pages,
                    "trade history truncated"
                );
                warnings.push(AgoraError::Truncated {
                    what: match &query.symbol {
                        Some(s) => format!("{what} {s}"),
                        None => what.to_string(),
                    },
                    fetched_pages: query.current_page,
                    total_pages,
                });
                break;
            }
            query.current_page += 1;
        }
        Ok(items)
    }

    /// Trade history together with the span adjustment, the executed endpoint
    /// plan, and non-fatal warnings.
    ///
    /// `None`, or params without a time span, query both endpoints without
    /// bounds. Otherwise the span is resolved against the configured
    /// [`HistoryWindow`] and split across the endpoints at the cutoff. Legacy
    /// records come first, then the result is sorted by timestamp.
    ///
    /// # Errors
    /// `InvalidArg` for a span whose end precedes its start, before any call.
    /// Transport and API failures from either endpoint, unchanged, and `Data`
    /// for records that cannot be mapped.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "kucoin.trade_history", skip(self, params))
    )]
    pub async fn trade_history_report(
        &self,
        params: Option<&TradeHistoryParams>,
    ) -> Result<TradeHistoryReport, AgoraError> {
        let window = &self.config.history_window;
        let symbol = params
            .and_then(|p| p.currency_pair.as_ref())
            .map(convert::adapt_currency_pair);

        let (adjustment, plan) = match params.and_then(|p| p.time_span) {
            None => (None, agora_core::plan(TimeSpan::unbounded(), window)),
            Some(requested) => {
                let inverted = matches!(
                    (requested.start, requested.end),
                    (Some(start), Some(end)) if end < start
                );
                if inverted {
                    return Err(AgoraError::invalid_arg(format!(
                        "time span ends before it starts: {requested}"
                    )));
                }
                let r = agora_core::resolve(requested, window, chrono::Utc::now());
                (r.adjustment, agora_core::plan(r.span, window))
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(legacy = ?plan.legacy, modern = ?plan.modern, "trade history plan");

        let mut warnings = Vec::new();
        let mut trades: Vec<UserTrade> = Vec::new();

        if let Some(range) = plan.legacy {
            let history = &self.history;
            let rows = self
                .fetch_pages(
                    "hist-orders",
                    self.list_query(symbol.clone(), Some(range), true),
                    |q| async move { history.hist_orders(&q).await },
                    &mut warnings,
                )
                .await?;
            for row in &rows {
                trades.push(convert::adapt_hist_order(row)?);
            }
        }

        if let Some(range) = plan.modern {
            let history = &self.history;
            let rows = self
                .fetch_pages(
                    "fills",
                    self.list_query(symbol, Some(range), false),
                    |q| async move { history.fills(&q).await },
                    &mut warnings,
                )
                .await?;
            for row in &rows {
                trades.push(convert::adapt_user_trade(row)?);
            }
        }

        Ok(TradeHistoryReport {
            trades: UserTrades::new(trades, TradeSortType::ByTimestamp),
            adjustment,
            plan,
            warnings,
        })
    }
}

#[async_trait]
impl OpenOrdersProvider for KucoinConnector {
    async fn open_orders(
        &self,
        params: Option<&OpenOrdersParams>,
    ) -> Result<OpenOrders, AgoraError> {
        let symbol = params
            .and_then(|p| p.instrument.as_ref())
            .map(convert::adapt_symbol)
            .transpose()?;
        let page = self
            .orders
            .active_orders(&self.list_query(symbol, None, false))
            .await?;

        #[cfg(feature = "tracing")]
        if page.has_more() {
            tracing::warn!(
                total_pages = page.total_page,
                "open orders truncated to the first page"
            );
        }

        let mut orders = Vec::with_capacity(page.items.len());
        for row in &page.items {
            let order = convert::adapt_order(row)?;
            if params.is_none_or(|p| p.accepts(&order)) {
                orders.push(order);
            }
        }
        Ok(OpenOrders::partition(orders))
    }
}

#[async_trait]
impl TradeHistoryProvider for KucoinConnector {
    async fn trade_history(
        &self,
        params: Option<&TradeHistoryParams>,
    ) -> Result<UserTrades, AgoraError> {
        Ok(self.trade_history_report(params).await?.trades)
    }
}

#[async_trait]
impl OrderPlacementProvider for KucoinConnector {
    async fn place_limit_order(&self, order: &LimitOrder) -> Result<String, AgoraError> {
        let req = convert::adapt_limit_order(order)?;
        Ok(self.orders.create_order(&req).await?.order_id)
    }

    async fn place_market_order(&self, order: &MarketOrder) -> Result<String, AgoraError> {
        let req = convert::adapt_market_order(order)?;
        Ok(self.orders.create_order(&req).await?.order_id)
    }

    async fn place_stop_order(&self, order: &StopOrder) -> Result<String, AgoraError> {
        let req = convert::adapt_stop_order(order)?;
        Ok(self.orders.create_order(&req).await?.order_id)
    }
}

#[async_trait]
impl CancelOrderProvider for KucoinConnector {
    async fn cancel_order(&self, order_id: &str) -> Result<bool, AgoraError> {
        let order_id = convert::order_id_segment(order_id)?;
        match self.orders.cancel_order(order_id).await {
            Ok(resp) => Ok(resp.cancelled_order_ids.iter().any(|id| id == order_id)),
            Err(e) => match Self::normalize_error(e, &format!("order {order_id}")) {
                AgoraError::NotFound { .. } => Ok(false),
                other => Err(other),
            },
        }
    }
}

#[async_trait]
impl AgoraConnector for KucoinConnector {
    fn name(&self) -> &'static str {
        "agora-kucoin"
    }

    fn vendor(&self) -> &'static str {
        "KuCoin"
    }

    fn supports_instrument(&self, instrument: &Instrument) -> bool {
        matches!(instrument, Instrument::Spot(_))
    }

    fn as_open_orders_provider(&self) -> Option<&dyn OpenOrdersProvider> {
        Some(self as &dyn OpenOrdersProvider)
    }

    fn as_trade_history_provider(&self) -> Option<&dyn TradeHistoryProvider> {
        Some(self as &dyn TradeHistoryProvider)
    }

    fn as_order_placement_provider(&self) -> Option<&dyn OrderPlacementProvider> {
        Some(self as &dyn OrderPlacementProvider)
    }

    fn as_cancel_order_provider(&self) -> Option<&dyn CancelOrderProvider> {
        Some(self as &dyn CancelOrderProvider)
    }
}
