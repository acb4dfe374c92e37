// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types for the rugcheck pipeline.

use std::time::Duration;
use thiserror::Error;

/// Input that does not look like a token address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a token address: {reason}")]
pub struct InputRejected {
    pub reason: String,
}

impl InputRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A failed page retrieval. Terminal for the request, never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to launch browser: {0}")]
    BrowserLaunch(#[source] std::io::Error),

    #[error("navigation failed: {0}")]
    Navigation(String),
}

impl FetchError {
    /// HTTP status code, if the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Startup configuration problems. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
