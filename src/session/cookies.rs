//! The persisted session-cookie shape and its conversions to and from the
//! browser engine's cookie records.

use std::fmt;

use chromiumoxide::cdp::browser_protocol::network::{
    Cookie, CookieParam, CookieSameSite, TimeSinceEpoch,
};
use serde::{Deserialize, Serialize};

/// One session cookie as persisted to the cookie file.
///
/// The collection is stored and restored wholesale; there is no merging. The
/// value is redacted in Debug output to keep session tokens out of logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value (sensitive - never log).
    value: String,
    /// Domain the cookie belongs to.
    pub domain: String,
    /// URL path scope.
    pub path: String,
    /// Expiry as seconds since the Unix epoch; negative for session cookies.
    pub expires: f64,
    /// Whether the cookie is HTTPS-only.
    pub secure: bool,
    /// Whether the cookie is inaccessible to page scripts.
    pub http_only: bool,
    /// SameSite policy, when the engine reported one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub same_site: Option<String>,
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("expires", &self.expires)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .finish()
    }
}

impl SessionCookie {
    /// Creates a cookie record.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        value: String,
        domain: String,
        path: String,
        expires: f64,
        secure: bool,
        http_only: bool,
        same_site: Option<String>,
    ) -> Self {
        Self {
            name,
            value,
            domain,
            path,
            expires,
            secure,
            http_only,
            same_site,
        }
    }

    /// Returns the cookie value.
    ///
    /// Cookie values are sensitive - avoid logging the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Converts into the parameter shape the engine accepts when restoring.
    #[must_use]
    pub fn to_param(&self) -> CookieParam {
        let mut param = CookieParam::new(self.name.clone(), self.value.clone());
        param.domain = Some(self.domain.clone());
        param.path = Some(self.path.clone());
        param.secure = Some(self.secure);
        param.http_only = Some(self.http_only);
        if self.expires > 0.0 {
            param.expires = Some(TimeSinceEpoch::new(self.expires));
        }
        param.same_site = self.same_site_param();
        param
    }

    fn same_site_param(&self) -> Option<CookieSameSite> {
        match self.same_site.as_deref() {
            Some("Strict") => Some(CookieSameSite::Strict),
            Some("Lax") => Some(CookieSameSite::Lax),
            Some("None") => Some(CookieSameSite::None),
            _ => None,
        }
    }
}

impl From<&Cookie> for SessionCookie {
    fn from(cookie: &Cookie) -> Self {
        Self {
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            domain: cookie.domain.clone(),
            path: cookie.path.clone(),
            expires: cookie.expires,
            secure: cookie.secure,
            http_only: cookie.http_only,
            same_site: cookie.same_site.as_ref().map(|s| format!("{s:?}")),
        }
    }
}
