/// File-backed cookie jar for the backend session.
///
/// The salary endpoint answers a successful submission with `salary_id` and
/// `salary_amount` cookies; the graph endpoint and the navigation guard read
/// them back. The jar keeps them across CLI invocations in
/// `~/.sheweldo/cookies.json`. All file I/O is best-effort on load.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name → value map of stored cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    /// Load the jar from the default location, or start empty.
    pub fn load() -> Self {
        cookie_jar_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load the jar from `path`, or start empty if it is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Persist the jar to the default location.
    pub fn save(&self) -> Result<()> {
        let path = cookie_jar_path().context("could not determine home directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create cookie jar directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize cookies")?;
        fs::write(path, json).context("failed to write cookie jar")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Apply one `Set-Cookie` header value.
    ///
    /// Only the `name=value` pair and `Max-Age` are honored; a non-positive
    /// `Max-Age` deletes the cookie. Returns the cookie name when applied.
    pub fn store_set_cookie(&mut self, header: &str) -> Option<String> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let expired = parts.any(|attr| {
            attr.split_once('=').is_some_and(|(k, v)| {
                k.trim().eq_ignore_ascii_case("max-age")
                    && v.trim().parse::<i64>().is_ok_and(|age| age <= 0)
            })
        });

        if expired {
            self.cookies.remove(name);
        } else {
            self.cookies
                .insert(name.to_string(), value.trim().trim_matches('"').to_string());
        }
        Some(name.to_string())
    }

    /// Apply every `Set-Cookie` value of a response.
    pub fn store_all<'a>(&mut self, headers: impl IntoIterator<Item = &'a String>) {
        for header in headers {
            self.store_set_cookie(header);
        }
    }

    /// Render the jar as a `Cookie` request header (`a=1; b=2`).
    pub fn header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Return the path to the cookie jar file.
pub fn cookie_jar_path() -> Option<PathBuf> {
    crate::config::data_dir().map(|dir| dir.join("cookies.json"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
