//! End-to-end run: session acquisition, validation, scrape, export.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::export;
use crate::scrape;
use crate::session::{self, CookieStore};

/// Runs the full pipeline with the given configuration.
///
/// Stored cookies are reused wholesale when present, otherwise a fresh login
/// acquires them. The session is then validated once; an invalid session
/// forces a single re-login, after which scraping proceeds without a second
/// validation pass. Records are exported once at the very end.
///
/// # Errors
///
/// Any fatal step error aborts the run with no partial export.
pub async fn run(config: &Config) -> Result<()> {
    let store = CookieStore::new(&config.cookie_file);

    let browser = BrowserSession::launch(&config.user_data_dir, config.headless)
        .await
        .context("failed to launch browser")?;

    match store.load().context("failed to read cookie file")? {
        Some(cookies) => {
            info!("using stored cookies for scraping");
            browser
                .apply_cookies(&cookies)
                .await
                .context("failed to apply stored cookies")?;
        }
        None => {
            info!("no stored session, logging in");
            session::log_in(&browser, config, &store)
                .await
                .context("login failed")?;
        }
    }

    if !session::session_is_valid(&browser, &config.portal_url)
        .await
        .context("session validation failed")?
    {
        warn!("session is expired, logging in again");
        // Deliberately no second validation pass after the forced re-login.
        session::log_in(&browser, config, &store)
            .await
            .context("re-login failed")?;
    }

    let records = scrape::scrape_records(&browser, &config.portal_url)
        .await
        .context("scraping failed")?;

    export::write_csv(&config.output_file, &records).context("failed to export records")?;

    browser.close().await;
    Ok(())
}
