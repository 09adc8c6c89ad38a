//! agora-core
//!
//! Connector traits and shared algorithms for the agora exchange adapters.
//!
//! - `connector`: the `AgoraConnector` trait and capability provider traits.
//! - `stream`: `StreamHandle`, the stop/abort handle returned with every
//!   market-data subscription.
//! - `timespan`: trade-history span resolution and endpoint planning.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Streaming APIs are coupled to Tokio: `StreamHandle` wraps a
//! `tokio::task::JoinHandle<()>` and stops it through a
//! `tokio::sync::oneshot::Sender<()>`, and subscriptions deliver through
//! `tokio::sync::mpsc::Receiver`. Code that streams must run under a Tokio 1.x
//! runtime.
#![warn(missing_docs)]

/// Connector capability traits and the primary `AgoraConnector` interface.
pub mod connector;
/// Stream handle and the shutdown helpers behind it.
pub mod stream;
pub mod timespan;

pub use connector::{
    AgoraConnector, CancelOrderProvider, MarketDataStreamProvider, OpenOrdersProvider,
    OrderPlacementProvider, Subscription, TradeHistoryProvider,
};
pub use stream::StreamHandle;
pub use timespan::{Resolution, plan, resolve};

pub use agora_types::*;
