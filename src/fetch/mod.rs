// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Token page retrieval.

pub mod browser;
pub mod http;

pub use browser::{BrowserFetcher, BrowserSession};
pub use http::HttpFetcher;

use crate::config::{Config, FetchMode};
use crate::error::FetchError;
use crate::validators::Address;
use std::future::Future;

/// Page content retrieved for one address.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub url: String,
    pub html: String,
}

/// Source page for `address` under `base_url`.
pub fn token_url(base_url: &str, address: &Address) -> String {
    format!("{}/tokens/{}", base_url.trim_end_matches('/'), address)
}

/// A single-attempt page retrieval strategy.
pub trait Fetch {
    fn fetch(
        &self,
        address: &Address,
    ) -> impl Future<Output = Result<FetchedDocument, FetchError>> + Send;
}

/// Strategy selected at startup.
pub enum Fetcher {
    Http(HttpFetcher),
    Browser(BrowserFetcher),
}

impl Fetcher {
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(match config.fetch_mode {
            FetchMode::Http => Fetcher::Http(HttpFetcher::new(
                &config.base_url,
                &config.user_agent,
                config.fetch_timeout,
            )?),
            FetchMode::Browser => Fetcher::Browser(BrowserFetcher::new(
                &config.base_url,
                &config.chrome_path,
                &config.user_agent,
                config.fetch_timeout,
                config.browser_settle,
            )),
        })
    }
}

impl Fetch for Fetcher {
    async fn fetch(&self, address: &Address) -> Result<FetchedDocument, FetchError> {
        match self {
            Fetcher::Http(f) => f.fetch(address).await,
            Fetcher::Browser(f) => f.fetch(address).await,
        }
    }
}
