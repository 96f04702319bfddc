//! Runtime configuration, built once at startup and threaded through the
//! pipeline.
//!
//! Credentials and the portal URL come from the environment (`USERNAME`,
//! `PASSWORD`, `URL`); file paths are fixed by the output contract.

use std::env::{self, VarError};
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::portal;

/// Errors constructing a [`Config`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("required environment variable {name} is not set")]
    MissingVar {
        /// Name of the missing variable.
        name: &'static str,
    },

    /// An environment variable is present but not valid Unicode.
    #[error("environment variable {name} is not valid Unicode")]
    NotUnicode {
        /// Name of the offending variable.
        name: &'static str,
    },
}

/// Resolved runtime configuration.
#[derive(Clone)]
pub struct Config {
    /// Portal login username.
    pub username: String,
    /// Portal login password (sensitive - never log).
    pub password: String,
    /// Portal entry URL; login, validation, and scraping all start here.
    pub portal_url: String,
    /// Path of the persisted session cookie file.
    pub cookie_file: PathBuf,
    /// Path of the exported CSV table.
    pub output_file: PathBuf,
    /// Persistent browser profile directory.
    pub user_data_dir: PathBuf,
    /// Whether to run the browser headless. The portal login flow is driven
    /// headed, matching how the session profile was originally established.
    pub headless: bool,
}

// Custom Debug impl that redacts the password.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("portal_url", &self.portal_url)
            .field("cookie_file", &self.cookie_file)
            .field("output_file", &self.output_file)
            .field("user_data_dir", &self.user_data_dir)
            .field("headless", &self.headless)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when `USERNAME`, `PASSWORD`, or
    /// `URL` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: required_var("USERNAME")?,
            password: required_var("PASSWORD")?,
            portal_url: required_var("URL")?,
            cookie_file: PathBuf::from(portal::COOKIE_FILE),
            output_file: PathBuf::from(portal::OUTPUT_FILE),
            user_data_dir: PathBuf::from(portal::USER_DATA_DIR),
            headless: false,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) | Err(VarError::NotPresent) => Err(ConfigError::MissingVar { name }),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_var_missing_is_error() {
        let result = required_var("PORTAL_EXPORT_TEST_UNSET_VAR");
        assert!(matches!(
            result,
            Err(ConfigError::MissingVar {
                name: "PORTAL_EXPORT_TEST_UNSET_VAR"
            })
        ));
    }

    #[test]
    fn test_required_var_empty_is_error() {
        // SAFETY: test-only env mutation with a test-unique variable name.
        unsafe { env::set_var("PORTAL_EXPORT_TEST_EMPTY_VAR", "  ") };
        let result = required_var("PORTAL_EXPORT_TEST_EMPTY_VAR");
        assert!(matches!(result, Err(ConfigError::MissingVar { .. })));
        // SAFETY: restore prior state.
        unsafe { env::remove_var("PORTAL_EXPORT_TEST_EMPTY_VAR") };
    }

    #[test]
    fn test_required_var_present_is_returned() {
        // SAFETY: test-only env mutation with a test-unique variable name.
        unsafe { env::set_var("PORTAL_EXPORT_TEST_SET_VAR", "value") };
        let result = required_var("PORTAL_EXPORT_TEST_SET_VAR");
        assert_eq!(result.ok().as_deref(), Some("value"));
        // SAFETY: restore prior state.
        unsafe { env::remove_var("PORTAL_EXPORT_TEST_SET_VAR") };
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
            portal_url: "https://portal.example.com".to_string(),
            cookie_file: PathBuf::from("cookies.json"),
            output_file: PathBuf::from("output.csv"),
            user_data_dir: PathBuf::from("user_data_dir"),
            headless: true,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
