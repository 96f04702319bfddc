//! Portal Export Library
//!
//! This library logs into a hospital patient portal with stored or
//! freshly-acquired browser session cookies, paginates the medical
//! test-record listing, and exports the parsed records to CSV.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Runtime configuration from the environment
//! - [`portal`] - Upstream site contract (selectors, markers, fixed paths)
//! - [`browser`] - Chromium session and page interaction helpers
//! - [`session`] - Cookie persistence, form login, validity probing
//! - [`scrape`] - Records navigation, pagination loop, listing parser
//! - [`record`] / [`export`] - Output row shape and CSV writing
//! - [`pipeline`] - End-to-end run wiring

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod portal;
pub mod record;
pub mod scrape;
pub mod session;

// Re-export commonly used types
pub use browser::{BrowserError, BrowserSession, Dismissal};
pub use config::{Config, ConfigError};
pub use export::{ExportError, write_csv};
pub use pipeline::run;
pub use record::{COLUMNS, TestRecord};
pub use scrape::{ListingPager, ParseError, ScrapeError, collect_records, parse_listing};
pub use session::{AuthError, CookieStore, SessionCookie, StoreError};
