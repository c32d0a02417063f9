//! Utility functions for HTTP setup, string handling and file system checks.

use crate::config::FetchConfig;
use reqwest::Client;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Build the HTTP client shared by the search and the article downloads.
///
/// Redirects are followed (reqwest's default policy of up to 10 hops); the
/// timeout applies per request.
pub fn http_client(fetch: &FetchConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(fetch.user_agent.clone())
        .timeout(fetch.timeout())
        .build()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, backing off to the nearest
/// character boundary, with an ellipsis and the remaining byte count
/// appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Collapse every run of whitespace (including newlines) to one space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Make sure the directory that will hold `file_path` exists.
///
/// Runs before logging is initialised, so failures are returned rather
/// than logged.
pub fn ensure_parent_dir(file_path: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
