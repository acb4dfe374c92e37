// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Input validators.

pub mod address;

pub use address::{validate, Address, AddressRules};
