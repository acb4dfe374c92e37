// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request pipeline: validate, fetch, extract, format.
//!
//! Every per-request failure ends here as a reply. Nothing propagates to
//! the messaging loop.

use crate::config::{Config, InvalidInputPolicy};
use crate::extract::extract_html;
use crate::fetch::{Fetch, Fetcher};
use crate::format::{Formatter, Reply};
use crate::validators::{Address, AddressRules};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of checking an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screened {
    /// Looks like an address; go ahead and fetch.
    Accepted(Address),
    /// Not an address; answer with this.
    Rejected(Reply),
    /// Not an address; stay silent.
    Ignored,
}

pub struct Pipeline<F> {
    fetcher: F,
    formatter: Formatter,
    rules: AddressRules,
    invalid_input: InvalidInputPolicy,
}

/// The pipeline as deployed, over the configured fetch strategy.
pub type RugcheckPipeline = Pipeline<Fetcher>;

impl<F: Fetch> Pipeline<F> {
    pub fn new(fetcher: F, config: &Config) -> Self {
        Self {
            fetcher,
            formatter: Formatter::new(&config.base_url),
            rules: config.address_rules.clone(),
            invalid_input: config.invalid_input,
        }
    }

    /// Classify `text` without touching the network.
    pub fn screen(&self, text: &str) -> Screened {
        match Address::parse(text, &self.rules) {
            Ok(address) => Screened::Accepted(address),
            Err(rejected) => {
                debug!("Rejected input: {}", rejected);
                match self.invalid_input {
                    InvalidInputPolicy::Reply => Screened::Rejected(self.usage_hint()),
                    InvalidInputPolicy::Ignore => Screened::Ignored,
                }
            }
        }
    }

    /// Fetch, extract and format the report for `address`.
    pub async fn report(&self, address: &Address) -> Reply {
        let started = Instant::now();

        let doc = match self.fetcher.fetch(address).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("❌ Fetch failed for {}: {}", address, e);
                return self.formatter.failure_notice(address, &e);
            }
        };

        let attributes = extract_html(&doc.html);
        info!(
            "📊 {}: {} found, {} warnings, {} holders ({}ms)",
            address,
            attributes.found_count(),
            attributes.warnings.len(),
            attributes.top_holders.len(),
            started.elapsed().as_millis()
        );

        self.formatter.report(address, &attributes)
    }

    /// Screen and, if accepted, report. `None` means no reply.
    pub async fn handle(&self, text: &str) -> Option<Reply> {
        match self.screen(text) {
            Screened::Accepted(address) => Some(self.report(&address).await),
            Screened::Rejected(reply) => Some(reply),
            Screened::Ignored => None,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn usage_hint(&self) -> Reply {
        self.formatter.usage_hint(&self.rules)
    }

    pub fn waiting_notice(&self) -> Reply {
        self.formatter.waiting_notice()
    }
}
