use std::time::Duration;

use agora_core::{HistoryWindow, QueryPlan, TimeSpan, plan, resolve};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn now() -> DateTime<Utc> {
    utc(2024, 6, 1, 0, 0, 0)
}

#[test]
fn start_just_before_cutoff_keeps_a_full_window() {
    let w = HistoryWindow::kucoin();
    let r = resolve(TimeSpan::since(utc(2019, 2, 10, 0, 0, 0)), &w, now());
    // start + 7d23h59m59s lands after cutoff - 1ms, so the window wins.
    assert_eq!(r.span.end, Some(utc(2019, 2, 17, 23, 59, 59)));
    let adj = r.adjustment.expect("end synthesized");
    assert_eq!(
        adj.to_string(),
        "end time not specified, adjusted to the following time span \
         2019-02-10T00:00:00+00:00 - 2019-02-17T23:59:59+00:00"
    );
}

#[test]
fn start_long_before_cutoff_extends_to_the_cutoff() {
    let w = HistoryWindow::kucoin();
    let r = resolve(TimeSpan::since(utc(2018, 6, 1, 0, 0, 0)), &w, now());
    assert_eq!(r.span.end, Some(w.cutoff - TimeDelta::milliseconds(1)));
    let p = plan(r.span, &w);
    assert_eq!(p.call_count(), 1);
    assert_eq!(p.legacy, Some(r.span));
}

#[test]
fn month_after_cutoff_is_clamped_to_one_window() {
    let w = HistoryWindow::kucoin();
    let requested = TimeSpan::between(utc(2020, 1, 1, 0, 0, 0), utc(2020, 2, 1, 0, 0, 0));
    let r = resolve(requested, &w, now());
    assert_eq!(r.span.end, Some(utc(2020, 1, 8, 23, 59, 59)));
    let adj = r.adjustment.expect("clamped");
    assert_eq!(adj.requested, requested);
    assert_eq!(adj.resolved, r.span);

    let p = plan(r.span, &w);
    assert_eq!(
        p,
        QueryPlan {
            legacy: None,
            modern: Some(r.span)
        }
    );
}

#[test]
fn wide_span_entirely_before_cutoff_is_untouched() {
    let w = HistoryWindow::kucoin();
    let requested = TimeSpan::between(utc(2018, 1, 1, 0, 0, 0), utc(2018, 12, 31, 0, 0, 0));
    let r = resolve(requested, &w, now());
    assert_eq!(r.span, requested);
    assert!(r.adjustment.is_none());
}

#[test]
fn span_across_cutoff_splits_into_two_calls() {
    let w = HistoryWindow::kucoin();
    let span = TimeSpan::between(utc(2019, 2, 15, 0, 0, 0), utc(2019, 2, 20, 0, 0, 0));
    let r = resolve(span, &w, now());
    assert_eq!(r.span, span);

    let p = plan(r.span, &w);
    assert_eq!(p.call_count(), 2);
    assert_eq!(
        p.legacy,
        Some(TimeSpan::between(
            utc(2019, 2, 15, 0, 0, 0),
            w.cutoff - TimeDelta::milliseconds(1)
        ))
    );
    assert_eq!(
        p.modern,
        Some(TimeSpan::between(w.cutoff, utc(2019, 2, 20, 0, 0, 0)))
    );
}

#[test]
fn span_starting_exactly_at_cutoff_only_hits_modern() {
    let w = HistoryWindow::kucoin();
    let span = TimeSpan::between(w.cutoff, w.cutoff + TimeDelta::days(2));
    let p = plan(span, &w);
    assert!(p.legacy.is_none());
    assert_eq!(p.modern, Some(span));
}

#[test]
fn open_span_queries_both_without_bounds() {
    let w = HistoryWindow::kucoin();
    let p = plan(TimeSpan::unbounded(), &w);
    assert_eq!(p.legacy, Some(TimeSpan::unbounded()));
    assert_eq!(p.modern, Some(TimeSpan::unbounded()));
}

#[test]
fn custom_window_is_honoured() {
    let w = HistoryWindow::new(utc(2022, 1, 1, 0, 0, 0), Duration::from_secs(86_400));
    let r = resolve(TimeSpan::since(utc(2022, 3, 1, 0, 0, 0)), &w, now());
    assert_eq!(r.span.end, Some(utc(2022, 3, 2, 0, 0, 0)));

    let r = resolve(TimeSpan::until(utc(2022, 3, 1, 0, 0, 0)), &w, now());
    assert_eq!(r.span.start, Some(utc(2022, 2, 28, 0, 0, 0)));
}
