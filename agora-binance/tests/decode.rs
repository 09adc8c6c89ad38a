use agora_binance::convert::{self, Channel};
use agora_binance::messages::{AggTrade, Combined, DepthUpdate, Ticker24h};
use agora_binance::BinanceFuturesConfig;
use agora_core::{AgoraError, Decimal, FuturesContract, Instrument, OrderSide};
use chrono::{TimeZone, Utc};

fn perp() -> Instrument {
    "BTC/USDT/PERP".parse().expect("valid instrument")
}

#[test]
fn depth_frame_maps_to_order_book() {
    let raw = r#"{
        "stream": "btcusdt@depth5@100ms",
        "data": {"e":"depthUpdate","E":1571889248277,"T":1571889248276,"s":"BTCUSDT",
                 "U":390497796,"u":390497878,"pu":390497794,
                 "b":[["7403.89","0.002"],["7403.10","3.906"]],
                 "a":[["7405.96","3.340"],["7406.63","4.525"]]}
    }"#;
    let frame: Combined<DepthUpdate> = serde_json::from_str(raw).expect("decodes");
    assert_eq!(frame.stream, "btcusdt@depth5@100ms");
    assert_eq!(frame.data.symbol, "BTCUSDT");

    let book = convert::adapt_depth(frame.data, &perp()).expect("adapts");
    assert_eq!(book.instrument, perp());
    assert_eq!(
        book.timestamp,
        Utc.timestamp_millis_opt(1_571_889_248_276).single()
    );
    assert_eq!(book.bids.len(), 2);
    assert_eq!(book.best_bid().unwrap().price, Decimal::new(740_389, 2));
    assert_eq!(book.best_bid().unwrap().amount, Decimal::new(2, 3));
    assert_eq!(book.best_ask().unwrap().price, Decimal::new(740_596, 2));
    assert!(book.is_uncrossed());
}

#[test]
fn aggregated_trade_side_follows_the_maker_flag() {
    let raw = r#"{"e":"aggTrade","E":123456789,"s":"BTCUSDT","a":5933014,"p":"0.001",
                  "q":"100","f":100,"l":105,"T":123456785,"m":true}"#;
    let t: AggTrade = serde_json::from_str(raw).expect("decodes");
    let trade = convert::adapt_agg_trade(t.clone(), &perp()).expect("adapts");
    assert_eq!(trade.side, OrderSide::Ask);
    assert_eq!(trade.id, "5933014");
    assert_eq!(trade.price, Decimal::new(1, 3));
    assert_eq!(trade.amount, Decimal::new(100, 0));
    assert_eq!(trade.timestamp.timestamp_millis(), 123_456_785);

    let taker_bought = AggTrade {
        buyer_is_maker: false,
        ..t
    };
    let trade = convert::adapt_agg_trade(taker_bought, &perp()).expect("adapts");
    assert_eq!(trade.side, OrderSide::Bid);
}

#[test]
fn ticker_maps_rolling_statistics() {
    let raw = r#"{"e":"24hrTicker","E":123456789,"s":"BTCUSDT","p":"0.0015","P":"250.00",
                  "w":"0.0018","c":"0.0025","Q":"10","o":"0.0010","h":"0.0025","l":"0.0010",
                  "v":"10000","q":"18","O":0,"C":86400000,"F":0,"L":18150,"n":18151}"#;
    let t: Ticker24h = serde_json::from_str(raw).expect("decodes");
    let ticker = convert::adapt_ticker(t, &perp()).expect("adapts");
    assert_eq!(ticker.instrument, perp());
    assert_eq!(ticker.last, Decimal::new(25, 4));
    assert_eq!(ticker.open, Some(Decimal::new(10, 4)));
    assert_eq!(ticker.high, Some(Decimal::new(25, 4)));
    assert_eq!(ticker.volume, Some(Decimal::new(10_000, 0)));
    assert_eq!(ticker.quote_volume, Some(Decimal::new(18, 0)));
    assert_eq!(ticker.percentage_change, Some(Decimal::new(25_000, 2)));
    assert_eq!((ticker.bid, ticker.ask), (None, None));
}

#[test]
fn missing_fields_fail_to_decode() {
    let raw = r#"{"e":"aggTrade","E":1,"s":"BTCUSDT","p":"1"}"#;
    assert!(serde_json::from_str::<AggTrade>(raw).is_err());
}

#[test]
fn contracts_map_to_stream_symbols() {
    assert_eq!(convert::adapt_instrument(&perp(), Channel::Ticker).unwrap(), "btcusdt");

    let dated: Instrument = "ETH/USDT/250627".parse().unwrap();
    assert_eq!(
        convert::adapt_instrument(&dated, Channel::Trades).unwrap(),
        "ethusdt_250627"
    );

    let contract = FuturesContract::perpetual("sol/usdc".parse().unwrap());
    assert_eq!(convert::adapt_contract(&contract), "solusdc");
}

#[test]
fn spot_instruments_are_unsupported() {
    let spot: Instrument = "BTC/USDT".parse().unwrap();
    let err = convert::adapt_instrument(&spot, Channel::OrderBook).unwrap_err();
    assert_eq!(
        err,
        AgoraError::Unsupported {
            capability: "stream-order-book/spot".into()
        }
    );
}

#[test]
fn stream_names_follow_the_book_settings() {
    let mut config = BinanceFuturesConfig::default();
    assert_eq!(
        convert::stream_name("btcusdt", Channel::OrderBook, &config),
        "btcusdt@depth20@100ms"
    );
    assert_eq!(
        convert::stream_name("btcusdt", Channel::Ticker, &config),
        "btcusdt@ticker"
    );
    assert_eq!(
        convert::stream_name("btcusdt", Channel::Trades, &config),
        "btcusdt@aggTrade"
    );

    config.depth_levels = 10;
    config.update_speed_ms = 500;
    assert_eq!(
        convert::stream_name("btcusdt", Channel::OrderBook, &config),
        "btcusdt@depth10@500ms"
    );
    config.update_speed_ms = 250;
    assert_eq!(
        convert::stream_name("btcusdt", Channel::OrderBook, &config),
        "btcusdt@depth10"
    );
}

#[test]
fn combined_url_joins_stream_names() {
    let config = BinanceFuturesConfig {
        ws_base_url: "wss://fstream.binance.com/".into(),
        ..BinanceFuturesConfig::default()
    };
    let names = vec!["btcusdt@ticker".to_string(), "btcusdt@aggTrade".to_string()];
    assert_eq!(
        config.stream_url(&names),
        "wss://fstream.binance.com/stream?streams=btcusdt@ticker/btcusdt@aggTrade"
    );
}

#[test]
fn config_defaults_and_validation() {
    let config: BinanceFuturesConfig = serde_json::from_str("{}").expect("all fields default");
    assert_eq!(config, BinanceFuturesConfig::default());
    assert_eq!(config.ws_base_url, "wss://fstream.binance.com");
    assert_eq!(config.channel_capacity, 1024);
    assert!(config.validate().is_ok());

    let bad_depth = BinanceFuturesConfig {
        depth_levels: 15,
        ..config.clone()
    };
    assert!(matches!(bad_depth.validate(), Err(AgoraError::InvalidArg(_))));

    let bad_speed = BinanceFuturesConfig {
        update_speed_ms: 1000,
        ..config
    };
    assert!(matches!(bad_speed.validate(), Err(AgoraError::InvalidArg(_))));
}
