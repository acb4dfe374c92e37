// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Token address shape checks.

use crate::error::InputRejected;
use std::fmt;

/// Accepted address shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRules {
    /// Minimum length of a plain alphanumeric address (default: 32).
    pub min_len: usize,
    /// Maximum length of a plain alphanumeric address (default: 44).
    pub max_len: usize,
    /// Also accept `0x` + 40 hex digits (default: true).
    pub allow_evm: bool,
}

impl Default for AddressRules {
    fn default() -> Self {
        Self {
            min_len: 32,
            max_len: 44,
            allow_evm: true,
        }
    }
}

/// A token address that passed [`AddressRules`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Trim and classify `input`.
    pub fn parse(input: &str, rules: &AddressRules) -> Result<Self, InputRejected> {
        let candidate = input.trim();

        if candidate.is_empty() {
            return Err(InputRejected::new("empty input"));
        }

        // 0x-prefixed input is only ever an EVM address
        if candidate.starts_with("0x") {
            if rules.allow_evm && is_evm_address(candidate) {
                return Ok(Self(candidate.to_string()));
            }
            return Err(InputRejected::new("not a 0x + 40 hex address"));
        }

        if !candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InputRejected::new("contains non-alphanumeric characters"));
        }

        let len = candidate.len();
        if len < rules.min_len || len > rules.max_len {
            return Err(InputRejected::new(format!(
                "length {} outside {}..={}",
                len, rules.min_len, rules.max_len
            )));
        }

        Ok(Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `input` is a plausible token address under `rules`.
pub fn validate(input: &str, rules: &AddressRules) -> bool {
    Address::parse(input, rules).is_ok()
}

fn is_evm_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}
