//! Configuration types shared across connectors.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// 2019-02-18T00:00:00+08:00, the day KuCoin moved fills to a new endpoint.
const KUCOIN_CUTOFF_SECS: i64 = 1_550_419_200;

/// Eight days minus one second. KuCoin documents seven days for the fills
/// endpoint but accepts almost eight.
const KUCOIN_MAX_WINDOW: Duration = Duration::from_millis(8 * 24 * 60 * 60 * 1000 - 1000);

/// Date-range limits of an exchange whose trade history is split across a
/// legacy endpoint (before `cutoff`, wide spans allowed) and a modern endpoint
/// (capped at `max_window` per request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    /// Moment the exchange switched trade-history endpoints.
    pub cutoff: DateTime<Utc>,
    /// Widest span the modern endpoint accepts in one request.
    pub max_window: Duration,
}

impl HistoryWindow {
    /// Build a window from explicit limits.
    #[must_use]
    pub const fn new(cutoff: DateTime<Utc>, max_window: Duration) -> Self {
        Self { cutoff, max_window }
    }

    /// Limits of the KuCoin spot `hist-orders` / `fills` endpoint pair.
    #[must_use]
    pub fn kucoin() -> Self {
        let cutoff = match DateTime::from_timestamp(KUCOIN_CUTOFF_SECS, 0) {
            Some(t) => t,
            None => DateTime::UNIX_EPOCH,
        };
        Self {
            cutoff,
            max_window: KUCOIN_MAX_WINDOW,
        }
    }

    /// `max_window` as a signed chrono delta, saturating for absurd durations.
    #[must_use]
    pub fn max_window_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.max_window).unwrap_or(TimeDelta::MAX)
    }
}

/// How many pages of a paginated history endpoint a connector fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HistoryPaging {
    /// Fetch page 1 only. Further pages are ignored and reported as a
    /// truncation warning.
    #[default]
    FirstPage,
    /// Follow pages until exhausted or `max_pages` were fetched.
    AllPages {
        /// Upper bound on requests per endpoint.
        max_pages: u32,
    },
}

impl HistoryPaging {
    /// Maximum number of pages to request per endpoint.
    #[must_use]
    pub const fn page_limit(self) -> u32 {
        match self {
            Self::FirstPage => 1,
            Self::AllPages { max_pages } => {
                if max_pages == 0 {
                    1
                } else {
                    max_pages
                }
            }
        }
    }
}
