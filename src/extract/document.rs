// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structural queries over a fetched page.

use scraper::{ElementRef, Html};

/// Read-only lookups the extractor needs from a document.
///
/// Every lookup is independent and reports a miss as `None` or an empty
/// list, never as an error.
pub trait DocumentQuery {
    /// Value for the first element whose own text starts with `label` or
    /// contains `label:`, either inline (`"🟢 Score: 85"`) or in the
    /// following sibling element.
    fn find_by_label(&self, label: &str) -> Option<String>;

    /// Texts of all elements carrying `class`, in document order.
    fn find_all_by_class(&self, class: &str) -> Vec<String>;

    /// `(label, value)` pairs read from every `card_class` element.
    fn find_cards(&self, card_class: &str, label_class: &str) -> Vec<(String, String)>;

    /// Up to `max_rows` body rows of the first table after `heading`.
    fn find_table_after_heading(&self, heading: &str, max_rows: usize) -> Vec<Vec<String>>;
}

/// An HTML page parsed with `scraper`.
///
/// Not `Send`: parse, query and drop it without crossing an `.await`.
pub struct HtmlDocument {
    html: Html,
}

/// Elements whose text is never page content.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "title"];

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| !SKIPPED.contains(&el.value().name()))
    }
}

impl DocumentQuery for HtmlDocument {
    fn find_by_label(&self, label: &str) -> Option<String> {
        for el in self.elements() {
            let own = own_text(el);
            let Some(rest) = strip_label(&own, label) else {
                continue;
            };
            if !rest.is_empty() {
                return Some(rest.to_string());
            }

            // <div>Score: <b>85</b></div>
            let full = text_of(el);
            if let Some(rest) = strip_label(&full, label).filter(|r| !r.is_empty()) {
                return Some(rest.to_string());
            }

            // <span>Score</span><span>85</span>
            if let Some(value) = next_element(el).map(text_of).filter(|t| !t.is_empty()) {
                return Some(value);
            }
        }
        None
    }

    fn find_all_by_class(&self, class: &str) -> Vec<String> {
        self.elements()
            .filter(|el| has_class(*el, class))
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn find_cards(&self, card_class: &str, label_class: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for card in self.elements().filter(|el| has_class(*el, card_class)) {
            let Some(label_el) = card
                .descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .find(|el| has_class(*el, label_class))
            else {
                continue;
            };

            let label = text_of(label_el);
            if label.is_empty() {
                continue;
            }

            let value = match next_element(label_el).map(text_of).filter(|t| !t.is_empty()) {
                Some(v) => v,
                None => {
                    let full = text_of(card);
                    full.strip_prefix(label.as_str())
                        .unwrap_or("")
                        .trim()
                        .to_string()
                }
            };

            if !value.is_empty() {
                pairs.push((label, value));
            }
        }

        pairs
    }

    fn find_table_after_heading(&self, heading: &str, max_rows: usize) -> Vec<Vec<String>> {
        let needle = heading.to_lowercase();
        let mut seen_heading = false;

        for el in self.elements() {
            if !seen_heading {
                seen_heading = own_text(el).to_lowercase().contains(&needle);
                continue;
            }
            if el.value().name() != "table" {
                continue;
            }

            return el
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|row| row.value().name() == "tr")
                .map(|row| {
                    row.children()
                        .filter_map(ElementRef::wrap)
                        .filter(|cell| cell.value().name() == "td")
                        .map(text_of)
                        .collect::<Vec<_>>()
                })
                .filter(|cells| !cells.is_empty())
                .take(max_rows)
                .collect();
        }

        Vec::new()
    }
}

/// Text directly inside `el`, whitespace-normalized.
fn own_text(el: ElementRef<'_>) -> String {
    let raw: String = el
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    normalize(&raw)
}

/// All text under `el`, whitespace-normalized.
fn text_of(el: ElementRef<'_>) -> String {
    normalize(&el.text().collect::<Vec<_>>().join(" "))
}

fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn next_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// Value for `label` in `text`, possibly empty. Case-insensitive on the label.
///
/// Matches `text` that starts with the bare label (`"Holders"`,
/// `"Score: 85"`), or that contains `label:` after a word boundary
/// (`"🟢 Score: 85"`).
fn strip_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    leading_label(text, label).or_else(|| inline_label(text, label))
}

fn leading_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let head = text.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }

    let rest = text[label.len()..].trim_start();
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(':').map(str::trim)
}

fn inline_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets valid for `text`
    let lowered = text.to_ascii_lowercase();
    let needle = format!("{}:", label.to_ascii_lowercase());

    lowered
        .match_indices(&needle)
        .map(|(idx, _)| idx)
        .find(|&idx| {
            text[..idx]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
        })
        .map(|idx| text[idx + needle.len()..].trim())
}
