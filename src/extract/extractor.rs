// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Token risk attributes pulled out of a rugcheck page.
//!
//! Each field is looked up on its own and a miss only leaves that field
//! empty. A page with nothing recognisable still produces a map, carrying a
//! notice instead of values.

use super::document::{DocumentQuery, HtmlDocument};

/// Rendered in place of a field that was not found.
pub const NOT_FOUND: &str = "Not found";

/// Notice attached when the page yields (almost) nothing.
pub const NO_ANALYTICS: &str = "No analytics found. The token may not be indexed yet.";

/// A map with this many found items or fewer is considered empty.
const SPARSE_THRESHOLD: usize = 0;

const TOP_HOLDER_ROWS: usize = 3;
const TOP_HOLDERS_HEADING: &str = "Top Holders";
const CARD_CLASS: &str = "card";
const CARD_LABEL_CLASS: &str = "text-sm";
const ANALYTICS_CLASS: &str = "text-sm";
const ANALYTICS_BLOCKS: usize = 6;
const WARNING_CLASSES: &[&str] = &["warning", "alert", "risk-warning"];

/// Canonical fields, in output order, with the labels they appear under.
const FIELDS: &[(&str, &[&str])] = &[
    ("risk_score", &["Score", "Risk Score", "Rugcheck Score"]),
    ("supply", &["Supply", "Total Supply", "Token Supply"]),
    ("holders", &["Holders", "Total Holders"]),
    ("creator", &["Creator", "Deployer"]),
    ("market_cap", &["Market Cap", "Mkt Cap"]),
    ("lp_locked", &["LP Locked", "Liquidity Locked", "Locked LP"]),
    ("top_holder_percent", &["Top Holder", "Top Holder %"]),
];

/// One row of the top-holders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopHolder {
    pub account: String,
    pub percent: String,
}

/// Extracted attributes in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, Option<String>)>,
    pub warnings: Vec<String>,
    pub top_holders: Vec<TopHolder>,
    /// Analytics blocks that carry no `label: value` shape.
    pub notes: Vec<String>,
    pub notice: Option<String>,
}

impl AttributeMap {
    /// The found value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// `(key, value)` pairs in output order, with [`NOT_FOUND`] for misses.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref().unwrap_or(NOT_FOUND)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Found fields plus warnings, holder rows and notes.
    pub fn found_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_some()).count()
            + self.warnings.len()
            + self.top_holders.len()
            + self.notes.len()
    }

    fn has_value(&self, value: &str) -> bool {
        self.entries.iter().any(|(_, v)| v.as_deref() == Some(value))
    }

    pub fn is_sparse(&self) -> bool {
        self.found_count() <= SPARSE_THRESHOLD
    }

    /// Fill `key` if it is missing or unset; existing values win.
    fn offer(&mut self, key: &str, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => {
                if slot.is_none() {
                    *slot = value;
                }
            }
            None => self.entries.push((key.to_string(), value)),
        }
    }
}

/// Parse `html` and extract its attributes.
pub fn extract_html(html: &str) -> AttributeMap {
    extract(&HtmlDocument::parse(html))
}

/// Extract every known attribute from `doc`.
pub fn extract<D: DocumentQuery + ?Sized>(doc: &D) -> AttributeMap {
    let mut map = AttributeMap::default();

    for (key, labels) in FIELDS {
        let value = labels.iter().find_map(|label| doc.find_by_label(label));
        map.offer(key, value);
    }

    let cards = doc.find_cards(CARD_CLASS, CARD_LABEL_CLASS);
    for (label, value) in &cards {
        let key = field_key(label);
        if !key.is_empty() {
            map.offer(&key, Some(value.clone()));
        }
    }

    // Bare analytics blocks; card labels were read above.
    for block in doc
        .find_all_by_class(ANALYTICS_CLASS)
        .into_iter()
        .take(ANALYTICS_BLOCKS)
    {
        match split_block(&block) {
            Some((label, value)) => {
                let key = field_key(label);
                if !key.is_empty() {
                    map.offer(&key, Some(value.to_string()));
                }
            }
            None => {
                let seen = cards.iter().any(|(label, _)| *label == block)
                    || map.has_value(&block)
                    || map.notes.contains(&block);
                if !seen {
                    map.notes.push(block);
                }
            }
        }
    }

    map.top_holders = doc
        .find_table_after_heading(TOP_HOLDERS_HEADING, TOP_HOLDER_ROWS)
        .into_iter()
        .filter_map(holder_from_row)
        .collect();

    if let Some(first) = map.top_holders.first() {
        let percent = first.percent.clone();
        map.offer("top_holder_percent", Some(percent));
    }

    for class in WARNING_CLASSES {
        for warning in doc.find_all_by_class(class) {
            if !map.warnings.contains(&warning) {
                map.warnings.push(warning);
            }
        }
    }

    if map.is_sparse() {
        map.notice = Some(NO_ANALYTICS.to_string());
    }

    map
}

/// Canonical key for a known alias, otherwise [`key_from_label`].
pub fn field_key(label: &str) -> String {
    let label = label.trim().trim_end_matches(':').trim();
    FIELDS
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| a.eq_ignore_ascii_case(label)))
        .map(|(key, _)| key.to_string())
        .unwrap_or_else(|| key_from_label(label))
}

/// `"Mint Authority: Disabled"` -> `("Mint Authority", "Disabled")`.
fn split_block(block: &str) -> Option<(&str, &str)> {
    let (label, value) = block.split_once(':')?;
    let (label, value) = (label.trim(), value.trim());
    if value.is_empty() || !label.chars().any(char::is_alphanumeric) {
        return None;
    }
    Some((label, value))
}

/// `"LP Locked %"` -> `"lp_locked"`.
pub fn key_from_label(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    for c in label.trim().trim_end_matches(':').chars() {
        if c.is_alphanumeric() {
            key.extend(c.to_lowercase());
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}

fn holder_from_row(cells: Vec<String>) -> Option<TopHolder> {
    let account = cells.first()?.clone();
    if account.is_empty() || cells.len() < 2 {
        return None;
    }
    let percent = cells
        .iter()
        .skip(1)
        .rev()
        .find(|c| c.contains('%'))
        .or_else(|| cells.last())?
        .clone();

    Some(TopHolder { account, percent })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><body>
          <div class="score"><div>Score: 85</div><div>Good</div></div>
          <div class="card"><div class="text-sm">Supply</div><div>1,000,000</div></div>
          <div class="card"><div class="text-sm">Holders</div><div>4,210</div></div>
          <div class="card"><div class="text-sm">Mint Authority</div><div>Disabled</div></div>
          <p>Creator: 7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU</p>
          <p><span>Market Cap</span><span>$1.2M</span></p>
          <div class="warning">Low liquidity</div>
          <div class="alert">Mutable metadata</div>
          <div class="alert">Low liquidity</div>
          <h2>Top Holders</h2>
          <table>
            <tr><th>Account</th><th>Amount</th><th>Share</th></tr>
            <tr><td>AAA</td><td>5,000</td><td>18%</td></tr>
            <tr><td>BBB</td><td>2,000</td><td>7%</td></tr>
            <tr><td>CCC</td><td>1,000</td><td>3%</td></tr>
            <tr><td>DDD</td><td>500</td><td>1%</td></tr>
          </table>
        </body></html>"#;

    #[test]
    fn extracts_every_strategy() {
        let map = extract_html(FULL_PAGE);

        assert_eq!(map.get("risk_score"), Some("85"));
        assert_eq!(map.get("supply"), Some("1,000,000"));
        assert_eq!(map.get("holders"), Some("4,210"));
        assert_eq!(
            map.get("creator"),
            Some("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU")
        );
        assert_eq!(map.get("market_cap"), Some("$1.2M"));
        assert_eq!(map.get("lp_locked"), None);
        assert_eq!(map.get("top_holder_percent"), Some("18%"));
        assert_eq!(map.get("mint_authority"), Some("Disabled"));

        assert_eq!(map.warnings, vec!["Low liquidity", "Mutable metadata"]);
        assert_eq!(map.top_holders.len(), 3);
        assert_eq!(
            map.top_holders[1],
            TopHolder {
                account: "BBB".into(),
                percent: "7%".into()
            }
        );
        assert!(map.notice.is_none());
    }

    #[test]
    fn canonical_order_then_cards() {
        let map = extract_html(FULL_PAGE);
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(
            keys,
            vec![
                "risk_score",
                "supply",
                "holders",
                "creator",
                "market_cap",
                "lp_locked",
                "top_holder_percent",
                "mint_authority",
            ]
        );
    }

    #[test]
    fn misses_render_as_sentinel() {
        let map = extract_html("<div>Score: 40</div>");
        let entries: Vec<_> = map.entries().collect();
        assert_eq!(entries[0], ("risk_score", "40"));
        assert_eq!(entries[1], ("supply", NOT_FOUND));
        assert!(map.notice.is_none());
    }

    #[test]
    fn empty_page_gets_notice() {
        let map = extract_html("<html><body><p>Loading...</p></body></html>");
        assert_eq!(map.found_count(), 0);
        assert_eq!(map.notice.as_deref(), Some(NO_ANALYTICS));
        assert_eq!(map.entries().count(), FIELDS.len());
    }

    #[test]
    fn total_on_garbage() {
        for input in ["", "<<<>>>", "<table><tr><td>", "\u{0}\u{1}binary", "<div class=>"] {
            let map = extract_html(input);
            assert!(map.is_sparse());
        }
    }

    #[test]
    fn repeated_extraction_is_identical() {
        assert_eq!(extract_html(FULL_PAGE), extract_html(FULL_PAGE));
    }

    #[test]
    fn label_beats_card_for_same_key() {
        let map = extract_html(
            r#"<div>Supply: 42</div>
               <div class="card"><div class="text-sm">Supply</div><div>99</div></div>"#,
        );
        assert_eq!(map.get("supply"), Some("42"));
        assert_eq!(map.keys().filter(|k| *k == "supply").count(), 1);
    }

    #[test]
    fn bare_analytics_blocks() {
        let map = extract_html(
            r#"<div class="text-sm">Mint Authority: Disabled</div>
               <div class="text-sm">Freeze Authority: Disabled</div>
               <div class="text-sm">Total Supply: 1,000,000</div>
               <div class="text-sm">Metadata is immutable</div>
               <div class="text-sm">Metadata is immutable</div>
               <div class="text-sm">Insiders: 2</div>
               <div class="text-sm">Seventh: ignored</div>"#,
        );

        assert!(map.notice.is_none());
        assert_eq!(map.get("mint_authority"), Some("Disabled"));
        assert_eq!(map.get("freeze_authority"), Some("Disabled"));
        assert_eq!(map.get("supply"), Some("1,000,000"));
        assert_eq!(map.get("insiders"), Some("2"));
        assert_eq!(map.get("seventh"), None);
        assert_eq!(map.notes, vec!["Metadata is immutable"]);
        assert!(!map.keys().any(|k| k == "total_supply"));
    }

    #[test]
    fn card_aliases_map_to_canonical_keys() {
        let map = extract_html(
            r#"<div class="card"><div class="text-sm">Score</div><div>Good</div></div>
               <div class="card"><div class="text-sm">Top Holder</div><div>18%</div></div>
               <div class="card"><div class="text-sm">Mkt Cap</div><div>$5K</div></div>"#,
        );

        assert_eq!(map.get("risk_score"), Some("Good"));
        assert_eq!(map.get("top_holder_percent"), Some("18%"));
        assert_eq!(map.get("market_cap"), Some("$5K"));
        for stray in ["score", "top_holder", "mkt_cap"] {
            assert!(!map.keys().any(|k| k == stray), "unexpected key {}", stray);
        }
        assert_eq!(map.entries().count(), FIELDS.len());
    }

    #[test]
    fn decorated_score_line() {
        assert_eq!(extract_html("<div>🟢 Score: 85</div>").get("risk_score"), Some("85"));
        assert_eq!(
            extract_html("<div>Token Score: 85 / 100</div>").get("risk_score"),
            Some("85 / 100")
        );
    }

    #[test]
    fn field_key_routing() {
        assert_eq!(field_key("Score"), "risk_score");
        assert_eq!(field_key("top holder:"), "top_holder_percent");
        assert_eq!(field_key("Mint Authority"), "mint_authority");
    }

    #[test]
    fn key_normalization() {
        assert_eq!(key_from_label("LP Locked"), "lp_locked");
        assert_eq!(key_from_label("  Top 10 Holders (%) "), "top_10_holders");
        assert_eq!(key_from_label("Score:"), "score");
        assert_eq!(key_from_label("---"), "");
    }

    struct FixedQuery;

    impl DocumentQuery for FixedQuery {
        fn find_by_label(&self, label: &str) -> Option<String> {
            (label == "Risk Score").then(|| "Good".to_string())
        }

        fn find_all_by_class(&self, _class: &str) -> Vec<String> {
            Vec::new()
        }

        fn find_cards(&self, _card: &str, _label: &str) -> Vec<(String, String)> {
            vec![("Freeze Authority".into(), "None".into())]
        }

        fn find_table_after_heading(&self, _heading: &str, _max: usize) -> Vec<Vec<String>> {
            vec![vec!["solo".into()]]
        }
    }

    #[test]
    fn works_against_any_query_backend() {
        let map = extract(&FixedQuery);
        assert_eq!(map.get("risk_score"), Some("Good"));
        assert_eq!(map.get("freeze_authority"), Some("None"));
        // a one-cell row has no share column
        assert!(map.top_holders.is_empty());
    }
}
