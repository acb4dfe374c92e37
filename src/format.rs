// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Telegram replies.

use crate::error::FetchError;
use crate::extract::AttributeMap;
use crate::fetch::token_url;
use crate::validators::{Address, AddressRules};
use teloxide::utils::markdown::{code_inline, escape, link};

/// How the adapter should send a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Plain,
    MarkdownV2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: ReplyFormat,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Plain,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::MarkdownV2,
        }
    }
}

/// Renders reports and notices for one source site.
#[derive(Debug, Clone)]
pub struct Formatter {
    base_url: String,
}

impl Formatter {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full report for `address`. All extracted text is MarkdownV2-escaped.
    pub fn report(&self, address: &Address, attributes: &AttributeMap) -> Reply {
        let mut out = format!("📊 Rugcheck Results for {}\n\n", code_inline(address.as_str()));

        match &attributes.notice {
            Some(notice) => {
                out.push_str(&format!("ℹ️ {}\n", escape(notice)));
            }
            None => {
                for (key, value) in attributes.entries() {
                    out.push_str(&format!("{}: {}\n", escape(&title_case(key)), escape(value)));
                }
                for note in &attributes.notes {
                    out.push_str(&format!("{}\n", escape(note)));
                }
            }
        }

        if !attributes.warnings.is_empty() {
            out.push_str("\n⚠️ Warnings:\n");
            for warning in &attributes.warnings {
                out.push_str(&format!("• {}\n", escape(warning)));
            }
        }

        if !attributes.top_holders.is_empty() {
            out.push_str("\n👥 Top Holders:\n");
            for (i, holder) in attributes.top_holders.iter().enumerate() {
                out.push_str(&format!(
                    "{}\\. {}: {}\n",
                    i + 1,
                    escape(&holder.account),
                    escape(&holder.percent)
                ));
            }
        }

        let url = token_url(&self.base_url, address);
        out.push_str(&format!("\n🔗 {}", link(&url, &escape("View on rugcheck.xyz"))));

        Reply::markdown(out)
    }

    pub fn failure_notice(&self, address: &Address, error: &FetchError) -> Reply {
        match error.status() {
            Some(code) => Reply::plain(format!(
                "❌ Failed to fetch data for {}. Status code: {}",
                address, code
            )),
            None => Reply::plain(format!(
                "❌ Failed to fetch data for {}. Please try again later.",
                address
            )),
        }
    }

    pub fn usage_hint(&self, rules: &AddressRules) -> Reply {
        let mut hint = format!(
            "⚠️ Send a valid token contract address ({}-{} letters and digits",
            rules.min_len, rules.max_len
        );
        if rules.min_len == rules.max_len {
            hint = format!(
                "⚠️ Send a valid token contract address ({} letters and digits",
                rules.max_len
            );
        }
        if rules.allow_evm {
            hint.push_str(", or a 0x address");
        }
        hint.push_str(").");
        Reply::plain(hint)
    }

    pub fn waiting_notice(&self) -> Reply {
        Reply::plain("⏳ Checking rugcheck.xyz, please wait...")
    }
}

/// `"risk_score"` -> `"Risk Score"`.
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_html;

    const MINT: &str = "E2gYJLgwup3DPaqYDXKj4kfHb6n4PR2CQyrvt6a2bonk";

    fn address() -> Address {
        Address::parse(MINT, &AddressRules::default()).unwrap()
    }

    fn formatter() -> Formatter {
        Formatter::new("https://rugcheck.xyz/")
    }

    #[test]
    fn title_cases_keys() {
        assert_eq!(title_case("risk_score"), "Risk Score");
        assert_eq!(title_case("top_holder_percent"), "Top Holder Percent");
        assert_eq!(title_case("lp__locked_"), "Lp Locked");
    }

    #[test]
    fn report_contains_address_link_and_fields() {
        let attrs = extract_html("<div>Score: 85</div><div>Good</div>");
        let reply = formatter().report(&address(), &attrs);

        assert_eq!(reply.format, ReplyFormat::MarkdownV2);
        assert!(reply.text.contains(MINT));
        assert!(reply
            .text
            .contains(&format!("(https://rugcheck.xyz/tokens/{})", MINT)));
        assert!(reply.text.contains("Risk Score: 85\n"));
        assert!(reply.text.contains("Supply: Not found\n"));
    }

    #[test]
    fn extracted_text_is_escaped() {
        let attrs = extract_html(
            r#"<div>Creator: evil_*[link](http://x)*</div>
               <div class="warning">Mint_authority enabled!</div>"#,
        );
        let reply = formatter().report(&address(), &attrs);

        assert!(reply
            .text
            .contains(r"Creator: evil\_\*\[link\]\(http://x\)\*"));
        assert!(reply.text.contains(r"• Mint\_authority enabled\!"));
    }

    #[test]
    fn sparse_report_shows_notice_only() {
        let attrs = extract_html("<p>nothing here</p>");
        let reply = formatter().report(&address(), &attrs);

        assert!(reply.text.contains("No analytics found"));
        assert!(!reply.text.contains("Risk Score"));
        assert!(reply.text.contains(MINT));
    }

    #[test]
    fn analytics_blocks_are_listed() {
        let attrs = extract_html(
            r#"<div class="text-sm">Mint Authority: Disabled</div>
               <div class="text-sm">Metadata is immutable.</div>"#,
        );
        let reply = formatter().report(&address(), &attrs);

        assert!(!reply.text.contains("No analytics found"));
        assert!(reply.text.contains("Mint Authority: Disabled\n"));
        assert!(reply.text.contains("Metadata is immutable\\.\n"));
    }

    #[test]
    fn holders_are_numbered() {
        let attrs = extract_html(
            "<h2>Top Holders</h2><table><tr><td>AAA</td><td>18%</td></tr></table>",
        );
        let reply = formatter().report(&address(), &attrs);
        assert!(reply.text.contains("👥 Top Holders:\n1\\. AAA: 18%\n"));
        assert!(reply.text.contains("Top Holder Percent: 18%\n"));
    }

    #[test]
    fn failure_notice_quotes_address_not_cause() {
        let f = formatter();
        let status = f.failure_notice(&address(), &FetchError::Status(500));
        assert_eq!(status.format, ReplyFormat::Plain);
        assert!(status.text.contains(MINT));
        assert!(status.text.contains("500"));

        let nav = f.failure_notice(
            &address(),
            &FetchError::Navigation("chrome crashed at 0xdeadbeef".into()),
        );
        assert!(nav.text.contains(MINT));
        assert!(!nav.text.contains("0xdeadbeef"));
    }

    #[test]
    fn usage_hint_reflects_rules() {
        let f = formatter();
        assert!(f.usage_hint(&AddressRules::default()).text.contains("32-44"));

        let strict = AddressRules {
            min_len: 44,
            max_len: 44,
            allow_evm: false,
        };
        let hint = f.usage_hint(&strict).text;
        assert!(hint.contains("(44 letters"));
        assert!(!hint.contains("0x"));
    }
}
