// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rugcheck Bot - token risk summaries from rugcheck.xyz over Telegram.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod format;
pub mod pipeline;
pub mod telegram;
pub mod validators;
