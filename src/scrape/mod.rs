//! Records-section navigation and the pagination loop.
//!
//! Pagination is strictly sequential: each page's detail expansion and "next"
//! control depend on the prior navigation having completed. The loop runs
//! behind the [`ListingPager`] seam so its termination behavior is testable
//! against synthetic page sequences.

pub mod parse;

use chromiumoxide::Page;
use chromiumoxide::error::CdpError;
use thiserror::Error;
use tracing::{debug, info};

use crate::browser::{self, BrowserError, BrowserSession, Dismissal};
use crate::portal;
use crate::record::TestRecord;

pub use parse::{ParseError, parse_listing};

/// Errors while scraping the records listing.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The navigation control into the records section was not found.
    #[error("navigation target not found: {target}")]
    NavigationTargetMissing {
        /// Visible text of the missing control.
        target: &'static str,
    },

    /// The listing container never appeared within its bounded wait.
    #[error("records listing did not appear within the bounded wait")]
    ListingNotFound,

    /// The pagination control is absent from the page.
    #[error("pagination control not found")]
    PaginationControlMissing,

    /// A page snapshot failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The browser layer failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// A DevTools protocol command failed.
    #[error("browser command failed while scraping: {0}")]
    Cdp(#[from] CdpError),
}

/// One listing view the pagination loop drives.
///
/// The live implementation wraps a browser page; tests substitute synthetic
/// page sequences.
#[allow(async_fn_in_trait)]
pub trait ListingPager {
    /// Clicks every detail trigger currently on the page and returns how many
    /// were clicked. Does not wait for the expanded content to render; the
    /// snapshot that follows races the DOM update, matching the upstream
    /// sequencing.
    async fn expand_details(&mut self) -> Result<usize, ScrapeError>;

    /// Snapshots the full rendered HTML of the current page.
    async fn content(&mut self) -> Result<String, ScrapeError>;

    /// Returns the class attribute of the "next page" control. A missing
    /// control is fatal.
    async fn next_control_class(&mut self) -> Result<String, ScrapeError>;

    /// Clicks the "next page" control.
    async fn advance(&mut self) -> Result<(), ScrapeError>;
}

/// Whether the "next page" control's class marks it as clickable.
#[must_use]
pub fn pagination_active(class: &str) -> bool {
    class.contains(portal::NEXT_PAGE_ACTIVE_CLASS)
}

/// Runs the pagination loop, accumulating records across pages in order.
///
/// Per page: expand details, snapshot, parse, append; then stop if the next
/// control is no longer active, else advance. No page bound, no dedup.
///
/// # Errors
///
/// Propagates the first [`ScrapeError`] from the pager or the parser;
/// accumulated records are lost in that case since export happens once at
/// the end of the run.
pub async fn collect_records<P: ListingPager>(
    pager: &mut P,
) -> Result<Vec<TestRecord>, ScrapeError> {
    let mut records = Vec::new();
    let mut pages_visited = 0usize;

    loop {
        let expanded = pager.expand_details().await?;
        let html = pager.content().await?;
        let page_records = parse_listing(&html)?;
        pages_visited += 1;
        debug!(
            page = pages_visited,
            expanded,
            rows = page_records.len(),
            "parsed listing page"
        );
        records.extend(page_records);

        let class = pager.next_control_class().await?;
        if !pagination_active(&class) {
            break;
        }
        pager.advance().await?;
    }

    info!(pages = pages_visited, records = records.len(), "scrape complete");
    Ok(records)
}

/// [`ListingPager`] over a live browser page.
pub struct PortalPager<'a> {
    page: &'a Page,
}

impl<'a> PortalPager<'a> {
    /// Wraps a page already positioned on the records listing.
    #[must_use]
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    async fn next_control(&self) -> Result<chromiumoxide::Element, ScrapeError> {
        browser::wait_for_selector(
            self.page,
            portal::NEXT_PAGE_CONTROL,
            browser::DEFAULT_ACTION_WAIT,
        )
        .await?
        .ok_or(ScrapeError::PaginationControlMissing)
    }
}

impl ListingPager for PortalPager<'_> {
    async fn expand_details(&mut self) -> Result<usize, ScrapeError> {
        Ok(browser::click_all(self.page, portal::DETAIL_TRIGGER).await?)
    }

    async fn content(&mut self) -> Result<String, ScrapeError> {
        Ok(self.page.content().await?)
    }

    async fn next_control_class(&mut self) -> Result<String, ScrapeError> {
        let control = self.next_control().await?;
        Ok(control.attribute("class").await?.unwrap_or_default())
    }

    async fn advance(&mut self) -> Result<(), ScrapeError> {
        let control = self.next_control().await?;
        control.click().await?;
        Ok(())
    }
}

/// Navigates into the records section and scrapes every listing page.
///
/// # Errors
///
/// Returns [`ScrapeError::NavigationTargetMissing`] when the records link is
/// absent and [`ScrapeError::ListingNotFound`] when the listing never
/// renders; disclaimer-dismissal timeouts are logged and skipped.
pub async fn scrape_records(
    session: &BrowserSession,
    url: &str,
) -> Result<Vec<TestRecord>, ScrapeError> {
    let page = session.new_page().await?;
    page.goto(url).await?;

    if !browser::click_by_text_within(&page, portal::RECORDS_LINK, browser::DEFAULT_ACTION_WAIT)
        .await?
    {
        return Err(ScrapeError::NavigationTargetMissing {
            target: portal::RECORDS_LINK,
        });
    }

    match browser::dismiss_overlay(
        &page,
        portal::DISCLAIMER_SELECTOR,
        portal::DISCLAIMER_BUTTON,
        portal::DISCLAIMER_WAIT,
    )
    .await?
    {
        Dismissal::Dismissed => debug!("disclaimer modal dismissed"),
        outcome @ (Dismissal::NotPresent | Dismissal::TimedOut) => {
            info!(?outcome, "no disclaimer modal, continuing");
        }
    }

    if browser::wait_for_selector(&page, portal::LISTING_CONTAINER, portal::LISTING_WAIT)
        .await?
        .is_none()
    {
        return Err(ScrapeError::ListingNotFound);
    }

    let mut pager = PortalPager::new(&page);
    let records = collect_records(&mut pager).await?;

    page.close().await?;
    Ok(records)
}
