//! Page fetching and lightweight text extraction.
//!
//! Fetch failures never abort an analysis: they are reported in-band as
//! sentinel strings that callers detect with [`is_fetch_failure`], so a dead
//! link degrades the report instead of failing the request.

use lumina_common::Result;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Desktop browser user agent. Plenty of news sites refuse the default
/// reqwest UA outright.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetches a page and reduces it to plain text.
pub struct ContentFetcher {
    client: reqwest::Client,
}

impl ContentFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| {
                lumina_common::LuminaError::Other(anyhow::anyhow!(
                    "Failed to create fetch client: {}",
                    e
                ))
            })?;
        Ok(Self { client })
    }

    /// Fetch `url` and return its visible text.
    ///
    /// Non-success statuses and transport errors come back as sentinel
    /// strings rather than `Err` so one bad link cannot sink a whole report.
    pub async fn fetch_text(&self, url: &str) -> String {
        tracing::debug!(target: "web.fetch", url, "fetch.start");

        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(target: "web.fetch", url, error = %e, "fetch.transport_error");
                return format!("Error scraping content: {}", e);
            }
        };

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(target: "web.fetch", url, status = %status, "fetch.bad_status");
            return format!("Failed to fetch content (status code: {})", status.as_u16());
        }

        match resp.text().await {
            Ok(html) => strip_html(&html),
            Err(e) => {
                tracing::warn!(target: "web.fetch", url, error = %e, "fetch.body_error");
                format!("Error scraping content: {}", e)
            }
        }
    }
}

/// True when `text` is one of the in-band fetch failure sentinels.
pub fn is_fetch_failure(text: &str) -> bool {
    text.starts_with("Failed to fetch content") || text.starts_with("Error scraping content")
}

/// Naive tag stripper: drops markup plus `script`/`style` bodies, then
/// collapses whitespace. Good enough for feeding prompts; not a DOM parser.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len() / 4);
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        rest = &rest[lt..];

        let skip_to = if starts_with_ignore_case(rest, "<script") {
            find_ignore_case(rest, "</script>").map(|i| i + "</script>".len())
        } else if starts_with_ignore_case(rest, "<style") {
            find_ignore_case(rest, "</style>").map(|i| i + "</style>".len())
        } else {
            rest.find('>').map(|i| i + 1)
        };

        match skip_to {
            Some(end) => {
                // Tags act as word boundaries.
                out.push(' ');
                rest = &rest[end..];
            }
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn starts_with_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}

/// Byte offset of an ASCII `needle` in `haystack`, case-insensitively.
///
/// Offsets are taken against the original string, never a case-folded
/// copy: case folding can change UTF-8 byte lengths. A match on an ASCII
/// needle always lands on a char boundary.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
