use std::time::Duration;

use agora_core::{AgoraError, HistoryPaging, HistoryWindow};
use serde::{Deserialize, Serialize};

use crate::KucoinConnector;
use crate::client::{DEFAULT_BASE_URL, KucoinClient, KucoinCredentials};

/// Rows requested per page from the listing endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Connector settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KucoinConfig {
    /// REST base URL.
    pub base_url: String,
    /// API key; private endpoints fail without it.
    #[serde(skip_serializing, default)]
    pub credentials: Option<KucoinCredentials>,
    /// Page size for order and history listings.
    pub page_size: u32,
    /// How many history pages to follow.
    pub paging: HistoryPaging,
    /// Endpoint cutoff and maximum span of the fills endpoint.
    pub history_window: HistoryWindow,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for KucoinConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            page_size: DEFAULT_PAGE_SIZE,
            paging: HistoryPaging::default(),
            history_window: HistoryWindow::kucoin(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Builder for [`KucoinConnector`].
#[derive(Debug, Clone, Default)]
pub struct KucoinConnectorBuilder {
    config: KucoinConfig,
}

impl KucoinConnectorBuilder {
    /// Override the REST base URL (e.g. the sandbox).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Authenticate with an API key.
    #[must_use]
    pub fn credentials(mut self, credentials: KucoinCredentials) -> Self {
        self.config.credentials = Some(credentials);
        self
    }

    /// Rows per page. Zero is bumped to one.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size.max(1);
        self
    }

    /// History pagination policy.
    #[must_use]
    pub const fn paging(mut self, paging: HistoryPaging) -> Self {
        self.config.paging = paging;
        self
    }

    /// Endpoint cutoff and window.
    #[must_use]
    pub const fn history_window(mut self, window: HistoryWindow) -> Self {
        self.config.history_window = window;
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build a connector from a full config.
    #[must_use]
    pub fn config(mut self, config: KucoinConfig) -> Self {
        self.config = config;
        self
    }

    /// Construct the connector and its HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(self) -> Result<KucoinConnector, AgoraError> {
        let client = KucoinClient::new(
            self.config.base_url.clone(),
            self.config.credentials.clone(),
            self.config.timeout,
        )?;
        Ok(KucoinConnector::with_client(client, self.config))
    }
}

impl KucoinConnector {
    /// Returns a builder with production defaults.
    #[must_use]
    pub fn builder() -> KucoinConnectorBuilder {
        KucoinConnectorBuilder::default()
    }
}
