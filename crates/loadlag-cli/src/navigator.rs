//! HTTP page loader standing in for a browser tab.
//!
//! A navigation is "loading" from `load_url` until the final response body
//! (after redirects) has been received, or the fetch failed. The fetch runs
//! on its own tokio task, so timer ticks keep being serviced while bytes
//! arrive.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use tokio::task::JoinHandle;
use url::Url;

use loadlag_engine::NavigationError;
use loadlag_engine::host::Navigator;

#[derive(Debug)]
pub struct HttpNavigator {
    client: Client,
    loading: Arc<AtomicBool>,
    fetch: Option<JoinHandle<()>>,
}

/// Outcome of one page fetch.
#[derive(Debug)]
struct LoadedPage {
    status: StatusCode,
    final_url: Url,
    bytes: usize,
}

impl HttpNavigator {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("loadlag/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client, loading: Arc::new(AtomicBool::new(false)), fetch: None }
    }
}

impl Navigator for HttpNavigator {
    fn load_url(&mut self, url: &str) -> Result<(), NavigationError> {
        let parsed = Url::parse(url).map_err(|e| NavigationError::new(url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NavigationError::new(
                url,
                format!("unsupported scheme `{}`", parsed.scheme()),
            ));
        }

        // A new navigation replaces whatever the view was loading.
        if let Some(previous) = self.fetch.take() {
            previous.abort();
        }

        self.loading.store(true, Ordering::SeqCst);
        let loading = Arc::clone(&self.loading);
        let client = self.client.clone();
        self.fetch = Some(tokio::spawn(async move {
            match fetch(&client, parsed.clone()).await {
                Ok(page) => {
                    if page.final_url != parsed {
                        debug!("{parsed} redirected to {}", page.final_url);
                    }
                    if page.status.is_success() {
                        info!("loaded {}: {} ({} bytes)", page.final_url, page.status, page.bytes);
                    } else {
                        warn!(
                            "{} answered {}; the measured load is of an error page",
                            page.final_url, page.status
                        );
                    }
                }
                Err(e) => warn!("load of {parsed} failed: {e}; sampling ends early"),
            }
            loading.store(false, Ordering::SeqCst);
        }));
        Ok(())
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

impl Drop for HttpNavigator {
    fn drop(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
    }
}

async fn fetch(client: &Client, url: Url) -> reqwest::Result<LoadedPage> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let final_url = response.url().clone();
    let body = response.bytes().await?;
    Ok(LoadedPage { status, final_url, bytes: body.len() })
}
