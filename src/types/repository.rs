//! Repository records as returned by the listing endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry from the repository listing.
///
/// The full source object is kept as-is; accessors read the fields the
/// exporter projects without discarding anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryRecord(Map<String, Value>);

/// Records in page-then-within-page arrival order.
pub type RepositoryCollection = Vec<RepositoryRecord>;

impl RepositoryRecord {
    pub fn owner_login(&self) -> Option<&str> {
        self.0.get("owner")?.get("login")?.as_str()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name")?.as_str()
    }

    /// Primary language; `None` when null, absent or empty.
    pub fn language(&self) -> Option<&str> {
        self.0
            .get("language")
            .and_then(Value::as_str)
            .filter(|lang| !lang.is_empty())
    }

    pub fn stargazers_count(&self) -> Option<u64> {
        self.0.get("stargazers_count")?.as_u64()
    }

    pub fn license(&self) -> LicenseField<'_> {
        match self.0.get("license") {
            Some(Value::Object(license)) if license.is_empty() => LicenseField::Absent,
            Some(Value::Object(license)) => {
                LicenseField::Present(license.get("spdx_id").and_then(Value::as_str))
            }
            _ => LicenseField::Absent,
        }
    }

    pub fn is_private(&self) -> Option<bool> {
        self.flag("private")
    }

    pub fn is_archived(&self) -> Option<bool> {
        self.flag("archived")
    }

    pub fn is_template(&self) -> Option<bool> {
        self.flag("is_template")
    }

    pub fn is_fork(&self) -> Option<bool> {
        self.flag("fork")
    }

    /// Whether a non-empty mirror URL is present.
    pub fn has_mirror_url(&self) -> bool {
        self.0
            .get("mirror_url")
            .and_then(Value::as_str)
            .is_some_and(|url| !url.is_empty())
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key)?.as_bool()
    }
}

/// State of a record's `license` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseField<'a> {
    /// No license object (null, missing or empty).
    Absent,
    /// License object present, with its SPDX identifier if it has one.
    Present(Option<&'a str>),
}
