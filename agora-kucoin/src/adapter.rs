#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;

use agora_core::AgoraError;

use crate::client::KucoinClient;
use crate::dto::{
    HistOrderResponse, ListQuery, OrderCancelResponse, OrderCreateRequest, OrderCreateResponse,
    OrderResponse, Pagination, TradeResponse,
};

/// Order endpoints (so we can inject mocks in tests).
#[async_trait]
pub trait KcOrders: Send + Sync {
    /// List active orders.
    async fn active_orders(
        &self,
        query: &ListQuery,
    ) -> Result<Pagination<OrderResponse>, AgoraError>;

    /// Submit a new order.
    async fn create_order(
        &self,
        req: &OrderCreateRequest,
    ) -> Result<OrderCreateResponse, AgoraError>;

    /// Cancel an order by exchange id.
    async fn cancel_order(&self, order_id: &str) -> Result<OrderCancelResponse, AgoraError>;
}

/// Trade-history endpoints (so we can inject mocks in tests).
#[async_trait]
pub trait KcHistory: Send + Sync {
    /// Modern fills listing; bounds in milliseconds.
    async fn fills(&self, query: &ListQuery) -> Result<Pagination<TradeResponse>, AgoraError>;

    /// Legacy filled-order listing; bounds in seconds.
    async fn hist_orders(
        &self,
        query: &ListQuery,
    ) -> Result<Pagination<HistOrderResponse>, AgoraError>;
}

/// Real adapter backed by a single `KucoinClient`.
/// `KucoinClient` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Debug, Clone)]
pub struct RealAdapter {
    client: KucoinClient,
}

impl RealAdapter {
    /// Wrap an existing client.
    #[must_use]
    pub const fn new(client: KucoinClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KcOrders for RealAdapter {
    async fn active_orders(
        &self,
        query: &ListQuery,
    ) -> Result<Pagination<OrderResponse>, AgoraError> {
        self.client.active_orders(query).await
    }

    async fn create_order(
        &self,
        req: &OrderCreateRequest,
    ) -> Result<OrderCreateResponse, AgoraError> {
        self.client.create_order(req).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<OrderCancelResponse, AgoraError> {
        self.client.cancel_order(order_id).await
    }
}

#[async_trait]
impl KcHistory for RealAdapter {
    async fn fills(&self, query: &ListQuery) -> Result<Pagination<TradeResponse>, AgoraError> {
        self.client.fills(query).await
    }

    async fn hist_orders(
        &self,
        query: &ListQuery,
    ) -> Result<Pagination<HistOrderResponse>, AgoraError> {
        self.client.hist_orders(query).await
    }
}

#[cfg(feature = "test-adapters")]
impl dyn KcOrders {
    /// Build a `KcOrders` from closures (tests only).
    pub fn from_fns<L, C, X>(list: L, create: C, cancel: X) -> Arc<dyn KcOrders>
    where
        L: Fn(ListQuery) -> Result<Pagination<OrderResponse>, AgoraError> + Send + Sync + 'static,
        C: Fn(OrderCreateRequest) -> Result<OrderCreateResponse, AgoraError>
            + Send
            + Sync
            + 'static,
        X: Fn(String) -> Result<OrderCancelResponse, AgoraError> + Send + Sync + 'static,
    {
        struct FnOrders<L, C, X> {
            list: L,
            create: C,
            cancel: X,
        }

        #[async_trait]
        impl<L, C, X> KcOrders for FnOrders<L, C, X>
        where
            L: Fn(ListQuery) -> Result<Pagination<OrderResponse>, AgoraError>
                + Send
                + Sync
                + 'static,
            C: Fn(OrderCreateRequest) -> Result<OrderCreateResponse, AgoraError>
                + Send
                + Sync
                + 'static,
            X: Fn(String) -> Result<OrderCancelResponse, AgoraError> + Send + Sync + 'static,
        {
            async fn active_orders(
                &self,
                query: &ListQuery,
            ) -> Result<Pagination<OrderResponse>, AgoraError> {
                (self.list)(query.clone())
            }

            async fn create_order(
                &self,
                req: &OrderCreateRequest,
            ) -> Result<OrderCreateResponse, AgoraError> {
                (self.create)(req.clone())
            }

            async fn cancel_order(
                &self,
                order_id: &str,
            ) -> Result<OrderCancelResponse, AgoraError> {
                (self.cancel)(order_id.to_string())
            }
        }

        Arc::new(FnOrders {
            list,
            create,
            cancel,
        })
    }
}

#[cfg(feature = "test-adapters")]
impl dyn KcHistory {
    /// Build a `KcHistory` from closures (tests only).
    pub fn from_fns<F, H>(fills: F, hist_orders: H) -> Arc<dyn KcHistory>
    where
        F: Fn(ListQuery) -> Result<Pagination<TradeResponse>, AgoraError> + Send + Sync + 'static,
        H: Fn(ListQuery) -> Result<Pagination<HistOrderResponse>, AgoraError>
            + Send
            + Sync
            + 'static,
    {
        struct FnHistory<F, H>(F, H);

        #[async_trait]
        impl<F, H> KcHistory for FnHistory<F, H>
        where
            F: Fn(ListQuery) -> Result<Pagination<TradeResponse>, AgoraError>
                + Send
                + Sync
                + 'static,
            H: Fn(ListQuery) -> Result<Pagination<HistOrderResponse>, AgoraError>
                + Send
                + Sync
                + 'static,
        {
            async fn fills(
                &self,
                query: &ListQuery,
            ) -> Result<Pagination<TradeResponse>, AgoraError> {
                (self.0)(query.clone())
            }

            async fn hist_orders(
                &self,
                query: &ListQuery,
            ) -> Result<Pagination<HistOrderResponse>, AgoraError> {
                (self.1)(query.clone())
            }
        }

        Arc::new(FnHistory(fills, hist_orders))
    }
}

/// Adapter injection seam for tests. Each accessor defaults to a fake that
/// answers `unsupported`, so tests override only what they exercise.
#[cfg(feature = "test-adapters")]
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn KcOrders>`.
    fn clone_arc_orders(&self) -> Arc<dyn KcOrders> {
        <dyn KcOrders>::from_fns(
            |_| Err(AgoraError::unsupported("orders/list")),
            |_| Err(AgoraError::unsupported("orders/create")),
            |_| Err(AgoraError::unsupported("orders/cancel")),
        )
    }

    /// Clone as `Arc<dyn KcHistory>`.
    fn clone_arc_history(&self) -> Arc<dyn KcHistory> {
        <dyn KcHistory>::from_fns(
            |_| Err(AgoraError::unsupported("history/fills")),
            |_| Err(AgoraError::unsupported("history/hist-orders")),
        )
    }
}

#[cfg(feature = "test-adapters")]
impl CloneArcAdapters for RealAdapter {
    fn clone_arc_orders(&self) -> Arc<dyn KcOrders> {
        Arc::new(self.clone()) as Arc<dyn KcOrders>
    }
    fn clone_arc_history(&self) -> Arc<dyn KcHistory> {
        Arc::new(self.clone()) as Arc<dyn KcHistory>
    }
}
