#![cfg(feature = "test-adapters")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use agora_binance::BinanceFuturesConnector;
use agora_binance::adapter::{BnStream, CloneArcAdapters};
use agora_core::connector::{AgoraConnector, MarketDataStreamProvider};
use agora_core::{
    AgoraError, CurrencyPair, FuturesContract, Instrument, ProductSubscription, StreamHandle,
};
use tokio::sync::{mpsc, oneshot, watch};

struct Fake {
    stream: Arc<dyn BnStream>,
}

impl CloneArcAdapters for Fake {
    fn clone_arc_stream(&self) -> Arc<dyn BnStream> {
        self.stream.clone()
    }
}

fn perp() -> Instrument {
    "BTC/USDT/PERP".parse().expect("valid instrument")
}

fn depth(bid: &str, ask: &str) -> String {
    format!(
        r#"{{"stream":"btcusdt@depth20@100ms","data":{{"E":1700000000000,"s":"BTCUSDT","b":[["{bid}","1"]],"a":[["{ask}","1"]]}}}}"#
    )
}

fn refusing() -> BinanceFuturesConnector {
    BinanceFuturesConnector::from_adapter(&Fake {
        stream: <dyn BnStream>::from_fn(|url| panic!("no connection expected, got {url}")),
    })
}

/// Upstream that emits `frame` every 10 ms and flips `stopped` when told to stop.
fn ticking(frame: String, urls: Arc<Mutex<Vec<String>>>, stopped: watch::Sender<bool>) -> Fake {
    let stream = <dyn BnStream>::from_fn(move |url| {
        urls.lock().unwrap().push(url);
        let (tx, rx) = mpsc::channel(16);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let frame = frame.clone();
        let stopped = stopped.clone();
        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    res = &mut stop_rx => {
                        if res.is_ok() {
                            let _ = stopped.send(true);
                        }
                        break;
                    }
                    () = tokio::time::sleep(Duration::from_millis(10)) => {
                        if tx.send(frame.clone()).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Ok((StreamHandle::new(join, stop_tx), rx))
    });
    Fake { stream }
}

async fn wait_for(stopped: &mut watch::Receiver<bool>) -> bool {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if *stopped.borrow() {
                break true;
            }
            if stopped.changed().await.is_err() {
                break false;
            }
        }
    })
    .await
    .unwrap_or(false)
}

#[tokio::test]
async fn subscription_url_lists_every_stream() {
    let urls = Arc::new(Mutex::new(Vec::new()));
    let (stopped_tx, _stopped_rx) = watch::channel(false);
    let conn = BinanceFuturesConnector::from_adapter(&ticking(
        depth("1", "2"),
        urls.clone(),
        stopped_tx,
    ))
    .with_depth(5, 250);
    let eth: Instrument = "ETH/USDT/PERP".parse().unwrap();
    let subscription = ProductSubscription::create()
        .add_order_book(perp())
        .add_order_book(eth.clone())
        .add_trades(eth)
        .build();

    let set = conn.connect(&subscription).await.expect("subscribed");
    set.handle.stop().await;

    assert_eq!(
        urls.lock().unwrap().as_slice(),
        ["wss://fstream.binance.com/stream?streams=btcusdt@depth5/ethusdt@depth5/ethusdt@aggTrade"]
    );
}

#[tokio::test]
async fn stop_propagates_to_the_upstream_socket() {
    let (stopped_tx, mut stopped_rx) = watch::channel(false);
    let conn = BinanceFuturesConnector::from_adapter(&ticking(
        depth("1", "2"),
        Arc::default(),
        stopped_tx,
    ));

    let (handle, mut rx) = conn.stream_order_book(&perp()).await.expect("subscribed");
    let book = rx.recv().await.expect("first book");
    assert_eq!(book.instrument, perp());

    handle.stop().await;
    assert!(wait_for(&mut stopped_rx).await, "upstream was not stopped");
}

#[tokio::test]
async fn dropped_receiver_shuts_the_subscription_down() {
    let (stopped_tx, mut stopped_rx) = watch::channel(false);
    let conn = BinanceFuturesConnector::from_adapter(&ticking(
        depth("1", "2"),
        Arc::default(),
        stopped_tx,
    ));

    let (handle, rx) = conn.stream_order_book(&perp()).await.expect("subscribed");
    drop(rx);

    assert!(wait_for(&mut stopped_rx).await, "upstream was not stopped");
    tokio::time::timeout(Duration::from_secs(2), async {
        while !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("dispatch task finished");
}

#[tokio::test]
async fn spot_instruments_are_rejected_before_connecting() {
    let conn = refusing();
    let spot: Instrument = "BTC/USDT".parse().unwrap();

    for err in [
        conn.stream_order_book(&spot).await.map(drop).unwrap_err(),
        conn.stream_ticker(&spot).await.map(drop).unwrap_err(),
        conn.stream_trades(&spot).await.map(drop).unwrap_err(),
    ] {
        assert!(matches!(err, AgoraError::Unsupported { .. }), "{err:?}");
    }
}

#[tokio::test]
async fn invalid_subscriptions_fail_fast() {
    let conn = refusing();

    let empty = conn.connect(&ProductSubscription::create()).await;
    assert!(matches!(empty, Err(AgoraError::InvalidArg(_))));

    let one = ProductSubscription::create().add_order_book(perp());
    let bad_depth = refusing().with_depth(15, 100).connect(&one).await;
    assert!(matches!(bad_depth, Err(AgoraError::InvalidArg(_))));

    let too_many = (0..201).fold(ProductSubscription::create(), |s, i| {
        let pair = CurrencyPair::new(format!("C{i}"), "USDT");
        s.add_ticker(FuturesContract::perpetual(pair).into())
    });
    assert!(matches!(
        conn.connect(&too_many).await,
        Err(AgoraError::InvalidArg(_))
    ));
}

#[tokio::test]
async fn connect_failures_propagate() {
    let conn = BinanceFuturesConnector::from_adapter(&Fake {
        stream: <dyn BnStream>::from_fn(|_| {
            Err(AgoraError::transport("agora-binance", "connection refused"))
        }),
    });
    let err = conn.stream_trades(&perp()).await.map(drop).unwrap_err();
    assert!(err.is_transport());
}

#[test]
fn advertises_futures_streaming_only() {
    let conn = refusing();
    assert_eq!(conn.name(), "agora-binance");
    assert_eq!(conn.key(), BinanceFuturesConnector::KEY);
    assert_eq!(conn.vendor(), "Binance");
    assert!(conn.supports_instrument(&perp()));
    assert!(!conn.supports_instrument(&"BTC/USDT".parse().unwrap()));
    assert!(conn.as_market_data_stream_provider().is_some());
    assert!(conn.as_trade_history_provider().is_none());
}
