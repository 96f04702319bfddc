//! Session validity probing.
//!
//! A single text-presence probe: load the portal entry page and look for a
//! marker string that only renders inside an authenticated session. Binary
//! outcome, no retries, no refresh semantics.

use scraper::Html;
use tracing::info;

use crate::browser::{BrowserError, BrowserSession};
use crate::portal;

/// Probes whether the context's cookies still carry a live session.
///
/// # Errors
///
/// Returns [`BrowserError`] for page or protocol failures; an expired session
/// is a plain `false`, not an error.
pub async fn session_is_valid(
    session: &BrowserSession,
    url: &str,
) -> Result<bool, BrowserError> {
    let page = session.new_page().await?;
    page.goto(url).await.map_err(BrowserError::Cdp)?;
    let html = page.content().await.map_err(BrowserError::Cdp)?;
    let valid = page_shows_authenticated_marker(&html);
    if valid {
        info!("session is valid");
    } else {
        info!("session is expired");
    }
    page.close().await.map_err(BrowserError::Cdp)?;
    Ok(valid)
}

/// Whether the rendered page contains the authenticated-only marker text.
///
/// Pure function of the page content; the probe searches the document's text
/// nodes, not the raw markup, so markup inside attributes does not count.
#[must_use]
pub fn page_shows_authenticated_marker(html: &str) -> bool {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .any(|text| text.contains(portal::AUTHENTICATED_MARKER))
}
