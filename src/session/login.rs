//! Form login and session-cookie harvesting.

use chromiumoxide::Page;
use chromiumoxide::error::CdpError;
use thiserror::Error;
use tracing::{debug, info};

use crate::browser::{self, BrowserError, BrowserSession, Dismissal};
use crate::config::Config;
use crate::portal;

use super::{CookieStore, SessionCookie, StoreError};

/// Errors during login.
///
/// A missing login control is fatal for the run: there is no fallback
/// credential prompt and no retry.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A login form control could not be located.
    #[error("login control not found: {control}")]
    LoginControlMissing {
        /// Which control was missing.
        control: &'static str,
    },

    /// The browser layer failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// A DevTools protocol command failed.
    #[error("browser command failed during login: {0}")]
    Cdp(#[from] CdpError),

    /// The harvested cookies could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives the login form and returns the resulting session cookie set.
///
/// Opens a fresh page, dismisses the cookie-consent banner if it shows up
/// within its bounded wait, fills the credentials into the inputs identified
/// by placeholder text, submits, harvests the context's cookies, and persists
/// them through `store`.
///
/// # Errors
///
/// Returns [`AuthError::LoginControlMissing`] when a form control is absent;
/// banner-dismissal timeouts are logged and skipped.
pub async fn log_in(
    session: &BrowserSession,
    config: &Config,
    store: &CookieStore,
) -> Result<Vec<SessionCookie>, AuthError> {
    let page = session.new_page().await?;
    page.goto(config.portal_url.as_str()).await?;

    match browser::dismiss_overlay(
        &page,
        portal::COOKIE_BANNER_SELECTOR,
        portal::COOKIE_ACCEPT_BUTTON,
        portal::COOKIE_BANNER_WAIT,
    )
    .await?
    {
        Dismissal::Dismissed => debug!("cookie banner dismissed"),
        outcome @ (Dismissal::NotPresent | Dismissal::TimedOut) => {
            info!(?outcome, "no cookie banner, continuing");
        }
    }

    fill_by_placeholder(
        &page,
        portal::USERNAME_PLACEHOLDER,
        &config.username,
        "username input",
    )
    .await?;
    fill_by_placeholder(
        &page,
        portal::PASSWORD_PLACEHOLDER,
        &config.password,
        "password input",
    )
    .await?;

    if !browser::click_by_text_within(&page, portal::LOGIN_BUTTON, browser::DEFAULT_ACTION_WAIT)
        .await?
    {
        return Err(AuthError::LoginControlMissing {
            control: "login button",
        });
    }
    // Let the post-login navigation land before harvesting the cookie jar.
    let _ = page.wait_for_navigation().await;

    let cookies: Vec<SessionCookie> = page
        .get_cookies()
        .await?
        .iter()
        .map(SessionCookie::from)
        .collect();
    store.save(&cookies)?;
    info!(path = %store.path().display(), count = cookies.len(), "session cookies saved");

    page.close().await?;
    Ok(cookies)
}

/// Fills the input identified by its placeholder text, waiting a bounded
/// interval for the field to render first.
async fn fill_by_placeholder(
    page: &Page,
    placeholder: &str,
    value: &str,
    control: &'static str,
) -> Result<(), AuthError> {
    let selector = format!("input[placeholder='{placeholder}']");
    let Some(field) =
        browser::wait_for_selector(page, &selector, browser::DEFAULT_ACTION_WAIT).await?
    else {
        return Err(AuthError::LoginControlMissing { control });
    };
    field.click().await?;
    field.type_str(value).await?;
    Ok(())
}
