// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Attribute extraction from token pages.

pub mod document;
pub mod extractor;

pub use document::{DocumentQuery, HtmlDocument};
pub use extractor::{extract, extract_html, AttributeMap, TopHolder, NOT_FOUND, NO_ANALYTICS};
