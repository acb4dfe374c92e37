// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Direct HTML retrieval over HTTP.

use super::{token_url, Fetch, FetchedDocument};
use crate::error::FetchError;
use crate::validators::Address;
use reqwest::{redirect::Policy, Client};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Clone)]
pub struct HttpFetcher {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .redirect(Policy::limited(8))
            .timeout(timeout)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    fn map_err(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(e)
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, address: &Address) -> Result<FetchedDocument, FetchError> {
        let url = token_url(&self.base_url, address);
        let started = Instant::now();
        debug!("GET {}", url);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_err(e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let html = res.text().await.map_err(|e| self.map_err(e))?;
        info!(
            "🌐 Fetched {} ({} bytes in {}ms)",
            url,
            html.len(),
            started.elapsed().as_millis()
        );

        Ok(FetchedDocument { url, html })
    }
}
