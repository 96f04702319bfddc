//! Session lifecycle: cookie persistence, form login, and validity probing.

mod cookies;
mod login;
mod store;
mod validate;

pub use cookies::SessionCookie;
pub use login::{AuthError, log_in};
pub use store::{CookieStore, StoreError};
pub use validate::{page_shows_authenticated_marker, session_is_valid};
