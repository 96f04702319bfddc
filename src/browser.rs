//! Chromium session management and page interaction helpers.
//!
//! Wraps a persistent-profile Chromium launch over the DevTools protocol and
//! provides the small set of interactions the portal flow needs: bounded
//! selector waits, overlay dismissal, and clicking controls by their visible
//! text.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::session::SessionCookie;

/// Poll interval for bounded waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Bounded wait applied to ordinary element interactions, mirroring the
/// engine-default actionability timeout. Absence after this deadline is
/// fatal for the interaction; only the overlay waits are shorter.
pub const DEFAULT_ACTION_WAIT: Duration = Duration::from_secs(30);

/// Errors from the browser layer.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A DevTools protocol command failed.
    #[error("browser command failed: {0}")]
    Cdp(#[from] CdpError),

    /// An in-page script returned a malformed result.
    #[error("page script returned a malformed result: {0}")]
    Script(#[from] serde_json::Error),

    /// No Chrome or Chromium executable could be located.
    #[error("no Chrome or Chromium executable found (set CHROME to override)")]
    ChromeNotFound,

    /// The browser configuration was rejected before launch.
    #[error("invalid browser configuration: {0}")]
    Config(String),
}

/// Outcome of a bounded attempt to dismiss a page overlay.
///
/// All three outcomes are non-fatal; callers log the outcome and proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// The overlay appeared and its dismiss control was clicked.
    Dismissed,
    /// The overlay never appeared within the bounded wait.
    NotPresent,
    /// The overlay appeared but its dismiss control could not be clicked
    /// before the deadline.
    TimedOut,
}

/// A launched browser with its protocol handler running on a background task.
pub struct BrowserSession {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

impl BrowserSession {
    /// Launches Chromium with a persistent profile directory.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ChromeNotFound`] when no executable can be
    /// located, [`BrowserError::Config`] for a rejected launch configuration,
    /// and [`BrowserError::Cdp`] when the launch itself fails.
    pub async fn launch(user_data_dir: &Path, headless: bool) -> Result<Self, BrowserError> {
        let chrome_path = find_chrome().ok_or(BrowserError::ChromeNotFound)?;
        debug!(chrome = %chrome_path, headless, "launching browser");

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .viewport(None)
            .user_data_dir(user_data_dir)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::Config)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Opens a blank page in the session's context.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Cdp`] when the page cannot be created.
    pub async fn new_page(&self) -> Result<Page, BrowserError> {
        Ok(self.browser.new_page("about:blank").await?)
    }

    /// Replaces the context's cookies with the given collection, wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Cdp`] when the cookies cannot be set.
    pub async fn apply_cookies(&self, cookies: &[SessionCookie]) -> Result<(), BrowserError> {
        if cookies.is_empty() {
            return Ok(());
        }
        let page = self.new_page().await?;
        let params = cookies.iter().map(SessionCookie::to_param).collect();
        page.set_cookies(params).await?;
        page.close().await?;
        debug!(count = cookies.len(), "applied stored cookies");
        Ok(())
    }

    /// Shuts the browser down and stops the handler task.
    pub async fn close(mut self) {
        if let Err(error) = self.browser.close().await {
            warn!(%error, "browser did not close cleanly");
        }
        match self.browser.wait().await {
            Ok(status) => debug!(?status, "browser process exited"),
            Err(error) => warn!(%error, "failed waiting for browser exit"),
        }
    }
}

/// Polls `attempt` until it yields a value or the deadline passes.
async fn poll_until<T, F, Fut>(deadline: Instant, mut attempt: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    loop {
        if let Some(value) = attempt().await {
            return Some(value);
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Polls for a selector until it appears or the timeout elapses.
///
/// Absence is not an error: `Ok(None)` means the deadline passed without the
/// element appearing.
///
/// # Errors
///
/// Never fails today; the `Result` keeps the signature uniform with the other
/// page helpers.
pub async fn wait_for_selector(
    page: &Page,
    css: &str,
    timeout: Duration,
) -> Result<Option<Element>, BrowserError> {
    wait_until(page, css, Instant::now() + timeout).await
}

async fn wait_until(
    page: &Page,
    css: &str,
    deadline: Instant,
) -> Result<Option<Element>, BrowserError> {
    Ok(poll_until(deadline, || async move { page.find_element(css).await.ok() }).await)
}

/// Attempts to dismiss an overlay within a bounded wait.
///
/// Waits for `overlay_css` to appear, then clicks the control whose visible
/// text matches `button_text`. Every outcome is reported, none is fatal.
///
/// # Errors
///
/// Returns [`BrowserError`] only for protocol or script failures, never for
/// the overlay being absent.
pub async fn dismiss_overlay(
    page: &Page,
    overlay_css: &str,
    button_text: &str,
    timeout: Duration,
) -> Result<Dismissal, BrowserError> {
    let deadline = Instant::now() + timeout;

    if wait_until(page, overlay_css, deadline).await?.is_none() {
        return Ok(Dismissal::NotPresent);
    }

    loop {
        if click_by_text(page, button_text).await? {
            return Ok(Dismissal::Dismissed);
        }
        if Instant::now() >= deadline {
            return Ok(Dismissal::TimedOut);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Clicks the innermost element whose visible text contains `text`.
///
/// Returns whether a matching element was found and clicked.
///
/// # Errors
///
/// Returns [`BrowserError`] when script evaluation fails.
pub async fn click_by_text(page: &Page, text: &str) -> Result<bool, BrowserError> {
    let payload = serde_json::json!({ "text": text });
    let js = format!(
        r"(function(payload) {{
  const needle = String(payload.text || '');
  const candidates = Array.from(
    document.querySelectorAll(`button, a, [role='button'], span, div, label`)
  );
  const matches = candidates.filter(
    el => (el.innerText || el.textContent || '').trim().includes(needle)
  );
  if (matches.length === 0) return {{ clicked: false }};
  // Document order puts ancestors first; the last match is the innermost.
  matches[matches.length - 1].click();
  return {{ clicked: true }};
}})({payload})"
    );

    let value: serde_json::Value = page.evaluate(js).await?.into_value()?;
    Ok(value
        .get("clicked")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false))
}

/// Clicks the control whose visible text contains `text`, polling until a
/// match appears or the timeout elapses.
///
/// Returns whether a matching element was eventually clicked; absence after
/// the deadline is the caller's decision to treat as fatal.
///
/// # Errors
///
/// Returns [`BrowserError`] when script evaluation fails.
pub async fn click_by_text_within(
    page: &Page,
    text: &str,
    timeout: Duration,
) -> Result<bool, BrowserError> {
    let deadline = Instant::now() + timeout;
    loop {
        if click_by_text(page, text).await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Clicks every element matching `css` currently on the page.
///
/// Returns how many elements were clicked. Deliberately does not wait for any
/// resulting DOM mutation; callers own the snapshot timing.
///
/// # Errors
///
/// Returns [`BrowserError`] when script evaluation fails.
pub async fn click_all(page: &Page, css: &str) -> Result<usize, BrowserError> {
    let payload = serde_json::json!({ "css": css });
    let js = format!(
        r"(function(payload) {{
  const triggers = Array.from(document.querySelectorAll(String(payload.css)));
  for (const el of triggers) {{ el.click(); }}
  return {{ count: triggers.length }};
}})({payload})"
    );

    let value: serde_json::Value = page.evaluate(js).await?.into_value()?;
    let count = value
        .get("count")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

/// Locates a Chrome/Chromium executable.
///
/// Checks the `CHROME` environment variable, then `which`, then a fixed set
/// of conventional install paths.
fn find_chrome() -> Option<String> {
    if let Ok(path) = std::env::var("CHROME") {
        if !path.trim().is_empty() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(output) = std::process::Command::new("which").arg(name).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(path);
                }
            }
        }
    }

    [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    ]
    .iter()
    .find(|candidate| Path::new(candidate).exists())
    .map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_returns_value_that_appears_late() {
        let deadline = Instant::now() + DEFAULT_ACTION_WAIT;
        let attempts = Cell::new(0u32);

        let result = poll_until(deadline, || {
            let attempt = attempts.get() + 1;
            attempts.set(attempt);
            async move { (attempt > 3).then_some("ready") }
        })
        .await;

        assert_eq!(result, Some("ready"));
        assert_eq!(attempts.get(), 4, "should keep polling until the value appears");
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_gives_up_at_deadline() {
        let deadline = Instant::now() + Duration::from_secs(5);
        let attempts = Cell::new(0u32);

        let result: Option<&str> = poll_until(deadline, || {
            attempts.set(attempts.get() + 1);
            async { None }
        })
        .await;

        assert!(result.is_none());
        // First attempt plus one per 250ms poll across the 5s window.
        assert_eq!(attempts.get(), 21);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_immediate_value_does_not_sleep() {
        let deadline = Instant::now() + DEFAULT_ACTION_WAIT;
        let started = Instant::now();

        let result = poll_until(deadline, || async { Some(1) }).await;

        assert_eq!(result, Some(1));
        assert_eq!(Instant::now(), started, "an immediate hit should not wait");
    }
}
