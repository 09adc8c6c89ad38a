#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use agora_core::{AgoraError, StreamHandle};

use crate::CONNECTOR;

/// Raw WebSocket transport (so we can inject mocks in tests).
///
/// Implementations deliver every text frame as-is. Decoding happens in the
/// connector.
#[async_trait]
pub trait BnStream: Send + Sync {
    /// Open `url` and forward text frames until stopped or the socket ends.
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(StreamHandle, mpsc::Receiver<String>), AgoraError>;
}

/// Real adapter backed by `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct RealAdapter {
    capacity: usize,
}

impl RealAdapter {
    /// Adapter buffering up to `capacity` undecoded frames.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }
}

impl Default for RealAdapter {
    fn default() -> Self {
        Self::new(crate::DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl BnStream for RealAdapter {
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "binance.connect", skip(self)))]
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(StreamHandle, mpsc::Receiver<String>), AgoraError> {
        let (ws, _resp) = connect_async(url)
            .await
            .map_err(|e| AgoraError::transport(CONNECTOR, format!("connect {url}: {e}")))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(url, "websocket connected");

        let (mut write, mut read) = ws.split();
        let (tx, rx) = mpsc::channel::<String>(self.capacity);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                    frame = read.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            if tx.send(text.as_str().to_owned()).await.is_err() {
                                let _ = write.send(Message::Close(None)).await;
                                break;
                            }
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            if write.send(Message::Pong(payload)).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_frame))) => {
                            #[cfg(feature = "tracing")]
                            tracing::debug!(reason = ?_frame, "websocket closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(_e)) => {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(error = %_e, "websocket error");
                            break;
                        }
                        None => break,
                    },
                }
            }
        });

        Ok((StreamHandle::new(join, stop_tx), rx))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn BnStream {
    /// Build a `BnStream` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn BnStream>
    where
        F: Fn(String) -> Result<(StreamHandle, mpsc::Receiver<String>), AgoraError>
            + Send
            + Sync
            + 'static,
    {
        struct FnStream<F>(F);

        #[async_trait]
        impl<F> BnStream for FnStream<F>
        where
            F: Fn(String) -> Result<(StreamHandle, mpsc::Receiver<String>), AgoraError>
                + Send
                + Sync
                + 'static,
        {
            async fn connect(
                &self,
                url: &str,
            ) -> Result<(StreamHandle, mpsc::Receiver<String>), AgoraError> {
                (self.0)(url.to_string())
            }
        }

        Arc::new(FnStream(f))
    }
}

/// Trait to obtain shared handles to the stream adapter (tests only).
#[cfg(feature = "test-adapters")]
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn BnStream>`.
    fn clone_arc_stream(&self) -> Arc<dyn BnStream> {
        <dyn BnStream>::from_fn(|_| Err(AgoraError::unsupported("stream/connect")))
    }
}

#[cfg(feature = "test-adapters")]
impl CloneArcAdapters for RealAdapter {
    fn clone_arc_stream(&self) -> Arc<dyn BnStream> {
        Arc::new(self.clone()) as Arc<dyn BnStream>
    }
}
