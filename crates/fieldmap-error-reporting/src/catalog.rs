//! Metadata for diagnostic codes.
//!
//! Codes read `FM-<subsystem>-<n>`: `0` is the engine itself, `1` the
//! expression text and `2` the mapping behind it. The table is parsed from
//! `error_catalog.json` on first lookup.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// One entry of `error_catalog.json`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// `internal`, `expression` or `mapping`
    pub subsystem: String,
    pub title: String,
    pub message_template: String,
    #[serde(default)]
    pub docs_url: Option<String>,
    pub since_version: String,
}

/// Every known code, keyed by the code string.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../error_catalog.json"))
        .expect("embedded error_catalog.json must parse")
});

/// Catalog entry for `code`.
///
/// ```
/// use fieldmap_error_reporting::get_error_info;
///
/// assert_eq!(get_error_info("FM-1-1").unwrap().title, "Unresolved Field");
/// assert!(get_error_info("FM-9-9").is_none());
/// ```
pub fn get_error_info(code: &str) -> Option<&'static ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}
