//! Upstream site contract.
//!
//! Every selector, marker text, and fixed path the portal exposes lives here.
//! The coupling to the portal's markup is inherent to scraping; when the site
//! changes, this is the only module that should need to change.

use std::time::Duration;

/// Origin prefixed onto relative document links found in listing rows.
pub const SITE_ORIGIN: &str = "https://www.quironsalud.com";

/// Selector for the cookie-consent banner shown on first visit.
pub const COOKIE_BANNER_SELECTOR: &str = "[aria-label='Cookie banner']";

/// Button text that accepts the cookie-consent banner.
pub const COOKIE_ACCEPT_BUTTON: &str = "Accept All Cookies";

/// How long to wait for the cookie banner before assuming it is absent.
pub const COOKIE_BANNER_WAIT: Duration = Duration::from_secs(5);

/// Placeholder text identifying the username input on the login form.
pub const USERNAME_PLACEHOLDER: &str = "Ej.: nombre@empresa.com";

/// Placeholder text identifying the password input on the login form.
pub const PASSWORD_PLACEHOLDER: &str = "*****";

/// Text of the login submit button.
pub const LOGIN_BUTTON: &str = "Entrar";

/// Text that appears only inside an authenticated session.
pub const AUTHENTICATED_MARKER: &str = "Mi próxima cita";

/// Link text that navigates to the test-records section.
pub const RECORDS_LINK: &str = "Ver pruebas e informes";

/// Selector for the informational disclaimer modal on the records section.
pub const DISCLAIMER_SELECTOR: &str = "#ModalDisclaimer";

/// Button text that dismisses the disclaimer modal.
pub const DISCLAIMER_BUTTON: &str = "Entendido";

/// How long to wait for the disclaimer modal before assuming it is absent.
pub const DISCLAIMER_WAIT: Duration = Duration::from_secs(10);

/// Container that holds the records listing once it has rendered.
pub const LISTING_CONTAINER: &str = ".pei-listado-pruebas-contenedor";

/// How long to wait for the listing container before giving up.
pub const LISTING_WAIT: Duration = Duration::from_secs(30);

/// Selector for the per-row "view detail" trigger.
pub const DETAIL_TRIGGER: &str = ".verDetalle";

/// Selector for the listing table element.
pub const LISTING_TABLE: &str = "ul.tableContent";

/// Selector for one listing row.
pub const LISTING_ROW: &str = "li.tableContentInfo";

/// Substring identifying the per-row document link anchor.
pub const DOCUMENT_LINK_MARKER: &str = "informePDF";

/// Selector for the "next page" pagination control.
pub const NEXT_PAGE_CONTROL: &str = ".siguiente";

/// Class marking the "next page" control as clickable.
pub const NEXT_PAGE_ACTIVE_CLASS: &str = "activePaso";

/// Fixed path of the persisted session cookie file.
pub const COOKIE_FILE: &str = "cookies.json";

/// Fixed path of the exported records table.
pub const OUTPUT_FILE: &str = "output.csv";

/// Fixed path of the persistent browser profile directory.
pub const USER_DATA_DIR: &str = "user_data_dir";
