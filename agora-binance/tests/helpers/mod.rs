#![allow(dead_code)]

// In-process stand-in for the combined-stream endpoint.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

pub const BOOK_STREAM: &str = "btcusdt@depth20@100ms";
pub const TICKER_STREAM: &str = "btcusdt@ticker";
pub const TRADES_STREAM: &str = "btcusdt@aggTrade";

pub struct MockFeed {
    /// `ws://127.0.0.1:<port>`
    pub base_url: String,
    /// Request target of the handshake, e.g. `/stream?streams=...`.
    pub request_uri: oneshot::Receiver<String>,
    /// Fires once the client is gone (or the server hung up).
    pub closed: oneshot::Receiver<()>,
}

pub enum Mode {
    /// Cycle through the frames every 10 ms until the client leaves.
    Repeat,
    /// Send each frame once, then close the socket.
    OnceThenClose,
}

pub async fn serve(frames: Vec<String>, mode: Mode) -> MockFeed {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (uri_tx, request_uri) = oneshot::channel();
    let (closed_tx, closed) = oneshot::channel();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let ws = accept_hdr_async(tcp, move |req: &Request, resp: Response| {
            let _ = uri_tx.send(req.uri().to_string());
            Ok(resp)
        })
        .await
        .expect("handshake");
        let (mut write, mut read) = ws.split();

        match mode {
            Mode::OnceThenClose => {
                for frame in frames {
                    let _ = write.send(Message::Text(frame.into())).await;
                }
                let _ = write.send(Message::Close(None)).await;
            }
            Mode::Repeat => {
                let mut tick = tokio::time::interval(Duration::from_millis(10));
                let mut next = 0;
                loop {
                    tokio::select! {
                        _ = tick.tick() => {
                            let frame = frames[next % frames.len()].clone();
                            next += 1;
                            if write.send(Message::Text(frame.into())).await.is_err() {
                                break;
                            }
                        }
                        msg = read.next() => match msg {
                            Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                            Some(Ok(_)) => {}
                        },
                    }
                }
            }
        }
        let _ = closed_tx.send(());
    });

    MockFeed {
        base_url: format!("ws://{addr}"),
        request_uri,
        closed,
    }
}

pub fn depth_frame(stream: &str, bid: &str, ask: &str) -> String {
    json!({
        "stream": stream,
        "data": {
            "e": "depthUpdate",
            "E": 1_700_000_000_123_i64,
            "T": 1_700_000_000_120_i64,
            "s": "BTCUSDT",
            "U": 1, "u": 2, "pu": 0,
            "b": [[bid, "1.500"], ["0.01", "2.000"]],
            "a": [[ask, "0.750"], ["999999", "3.000"]]
        }
    })
    .to_string()
}

pub fn ticker_frame(stream: &str, last: &str) -> String {
    json!({
        "stream": stream,
        "data": {
            "e": "24hrTicker",
            "E": 1_700_000_000_000_i64,
            "s": "BTCUSDT",
            "p": "150.10", "P": "0.410", "w": "36500.00",
            "c": last, "Q": "0.010",
            "o": "36450.00", "h": "37000.00", "l": "36000.00",
            "v": "120000.5", "q": "4380000000.00",
            "O": 1_699_913_600_000_i64, "C": 1_700_000_000_000_i64,
            "F": 1, "L": 1000, "n": 1000
        }
    })
    .to_string()
}

pub fn agg_trade_frame(stream: &str, id: u64, buyer_is_maker: bool) -> String {
    json!({
        "stream": stream,
        "data": {
            "e": "aggTrade",
            "E": 1_700_000_000_500_i64,
            "a": id,
            "s": "BTCUSDT",
            "p": "36600.10",
            "q": "0.250",
            "f": 100, "l": 105,
            "T": 1_700_000_000_499_i64,
            "m": buyer_is_maker
        }
    })
    .to_string()
}
