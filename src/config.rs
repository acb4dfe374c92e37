// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration module - loads settings from environment variables.

use crate::error::ConfigError;
use crate::validators::AddressRules;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://rugcheck.xyz";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 rugcheck-bot/0.1";

/// How token pages are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain HTTP GET of the server-rendered HTML.
    Http,
    /// Headless browser navigation, DOM dumped after the page settles.
    Browser,
}

impl FromStr for FetchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(FetchMode::Http),
            "browser" | "rendered" => Ok(FetchMode::Browser),
            _ => Err(()),
        }
    }
}

/// What to do with a message that is not an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputPolicy {
    /// Answer with a usage hint.
    Reply,
    /// Drop the message without answering.
    Ignore,
}

impl FromStr for InvalidInputPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reply" | "hint" => Ok(InvalidInputPolicy::Reply),
            "ignore" | "silent" => Ok(InvalidInputPolicy::Ignore),
            _ => Err(()),
        }
    }
}

/// Main configuration for the bot. Built once at startup, read-only afterwards.
#[derive(Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,

    // Fetching
    pub base_url: String,
    pub fetch_mode: FetchMode,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub chrome_path: String,
    pub browser_settle: Duration,

    // Input handling
    pub invalid_input: InvalidInputPolicy,
    pub address_rules: AddressRules,
}

// Keeps the token out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("fetch_mode", &self.fetch_mode)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("user_agent", &self.user_agent)
            .field("chrome_path", &self.chrome_path)
            .field("browser_settle", &self.browser_settle)
            .field("invalid_input", &self.invalid_input)
            .field("address_rules", &self.address_rules)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let bot_token = env
            .var("BOT_TOKEN")
            .or_else(|| env.var("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let address_rules = AddressRules {
            min_len: env.parse_or("ADDRESS_MIN_LEN", 32)?,
            max_len: env.parse_or("ADDRESS_MAX_LEN", 44)?,
            allow_evm: env.parse_or("ALLOW_EVM_ADDRESSES", true)?,
        };
        if address_rules.min_len > address_rules.max_len {
            return Err(ConfigError::Invalid {
                name: "ADDRESS_MIN_LEN",
                value: address_rules.min_len.to_string(),
            });
        }

        Ok(Self {
            bot_token,

            base_url: env
                .var_or("RUGCHECK_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            fetch_mode: env.parse_or("FETCH_MODE", FetchMode::Http)?,
            fetch_timeout: Duration::from_secs(env.positive_or("FETCH_TIMEOUT_SECS", 30)?),
            user_agent: env.var_or("USER_AGENT", DEFAULT_USER_AGENT),
            chrome_path: env.var_or("CHROME_PATH", "chromium"),
            browser_settle: Duration::from_millis(env.positive_or("BROWSER_SETTLE_MS", 5_000)?),

            invalid_input: env.parse_or("INVALID_INPUT_POLICY", InvalidInputPolicy::Reply)?,
            address_rules,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn var_or(&self, name: &str, default: &str) -> String {
        self.var(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.var(name) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name,
                value: raw,
            }),
            None => Ok(default),
        }
    }

    /// Like `parse_or`, but zero is rejected.
    fn positive_or(&self, name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match self.parse_or(name, default)? {
            0 => Err(ConfigError::Invalid {
                name,
                value: self.var(name).unwrap_or_default(),
            }),
            n => Ok(n),
        }
    }
}
