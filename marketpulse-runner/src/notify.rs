//! Discord webhook delivery.
//!
//! Renders a formatted briefing into Discord-flavored markdown and posts it
//! to a webhook. Discord rate-limits webhooks aggressively, so consecutive
//! posts are spaced by a fixed pause.

use std::time::Duration;

use chrono::NaiveDate;
use marketpulse_core::{Report, SectionKind};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::SymbolProfile;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Request(String),

    #[error("webhook rejected message: HTTP {status}")]
    Rejected { status: u16 },
}

/// Posts rendered briefings to Discord webhooks.
pub struct DiscordNotifier {
    client: reqwest::blocking::Client,
    /// Pause between consecutive posts.
    pause: Duration,
}

impl DiscordNotifier {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            pause: Duration::from_secs(2),
        }
    }

    /// Render one briefing as a single Discord message.
    ///
    /// Section order follows the report. The header carries a green or red
    /// marker from the classifier verdict; the optional profile renders as a
    /// subtitle under the header.
    pub fn render(report: &Report, positive: bool, profile: Option<&SymbolProfile>) -> String {
        let mut blocks = Vec::with_capacity(report.sections().len() + 1);

        for section in report.sections() {
            let mut lines = section.lines.iter();
            let Some(first) = lines.next() else {
                continue;
            };

            let mut block = match section.kind {
                SectionKind::Header => {
                    let marker = if positive { "🟢" } else { "🔴" };
                    let mut head = format!("# {marker} {first}");
                    if let Some(p) = profile {
                        head.push('\n');
                        head.push_str(&format!(
                            "*{} • {} • {}*",
                            p.sector, p.industry, p.market_cap
                        ));
                    }
                    head
                }
                SectionKind::Events => format!("> *{first}*"),
                SectionKind::Signal => format!("### {first}"),
                SectionKind::Status => first.clone(),
                SectionKind::Risk => format!("- {first}"),
                SectionKind::Strategy => format!("**{first}**"),
                SectionKind::Summary => format!("📝 {first}"),
            };

            for line in lines {
                block.push('\n');
                match section.kind {
                    SectionKind::Events => block.push_str(&format!("> *{line}*")),
                    SectionKind::Risk => block.push_str(&format!("- {line}")),
                    _ => block.push_str(line),
                }
            }
            blocks.push(block);
        }

        blocks.join("\n\n")
    }

    /// Header message announcing a batch run.
    pub fn batch_header(date: NaiveDate, symbol_count: usize) -> String {
        format!(
            "# 📊 Daily briefing — {} ({symbol_count} symbols)",
            date.format("%d.%m.%Y")
        )
    }

    /// Post one message to a webhook.
    pub fn post(&self, webhook_url: &str, content: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(webhook_url)
            .json(&json!({ "content": content }))
            .send()
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "webhook rejected message");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        debug!(chars = content.len(), "posted briefing");
        Ok(())
    }

    /// Post one message, then pause to stay under the webhook rate limit.
    pub fn post_paced(&self, webhook_url: &str, content: &str) -> Result<(), NotifyError> {
        let result = self.post(webhook_url, content);
        std::thread::sleep(self.pause);
        result
    }
}

impl Default for DiscordNotifier {
    fn default() -> Self {
        Self::new()
    }
}
