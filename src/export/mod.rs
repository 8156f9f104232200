//! Flattened CSV projection of the repository collection.
//!
//! Columns, in order: `owner, name, primary_language, stars, license, type,
//! archived, is_template, is_mirror, is_fork`. Booleans are written as
//! `True`/`False` and records end with CRLF.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::ExporterError;
use crate::types::repository::LicenseField;
use crate::types::RepositoryRecord;

/// Header row of the output file.
pub const COLUMNS: [&str; 10] = [
    "owner",
    "name",
    "primary_language",
    "stars",
    "license",
    "type",
    "archived",
    "is_template",
    "is_mirror",
    "is_fork",
];

/// Placeholder for a missing language or a license without an identifier.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for a repository with no license at all.
pub const NO_LICENSE: &str = "None";

/// Repository visibility as written in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Private,
}

/// One output row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub owner: String,
    pub name: String,
    pub primary_language: String,
    pub stars: u64,
    pub license: String,
    #[serde(rename = "type")]
    pub visibility: Visibility,
    #[serde(serialize_with = "title_case_bool")]
    pub archived: bool,
    #[serde(serialize_with = "title_case_bool")]
    pub is_template: bool,
    #[serde(serialize_with = "title_case_bool")]
    pub is_mirror: bool,
    #[serde(serialize_with = "title_case_bool")]
    pub is_fork: bool,
}

impl ExportRow {
    /// Project one record, applying the column defaults.
    pub fn from_record(record: &RepositoryRecord) -> Result<Self, ExporterError> {
        let name = record
            .name()
            .ok_or_else(|| missing(record, "name"))?
            .to_string();
        let owner = record
            .owner_login()
            .ok_or_else(|| missing(record, "owner.login"))?
            .to_string();
        let license = match record.license() {
            LicenseField::Absent => NO_LICENSE,
            LicenseField::Present(spdx_id) => spdx_id.unwrap_or(NOT_AVAILABLE),
        };
        let visibility = if required_flag(record, "private", RepositoryRecord::is_private)? {
            Visibility::Private
        } else {
            Visibility::Public
        };

        Ok(Self {
            owner,
            name,
            primary_language: record.language().unwrap_or(NOT_AVAILABLE).to_string(),
            stars: record
                .stargazers_count()
                .ok_or_else(|| missing(record, "stargazers_count"))?,
            license: license.to_string(),
            visibility,
            archived: required_flag(record, "archived", RepositoryRecord::is_archived)?,
            is_template: required_flag(record, "is_template", RepositoryRecord::is_template)?,
            is_mirror: record.has_mirror_url(),
            is_fork: required_flag(record, "fork", RepositoryRecord::is_fork)?,
        })
    }
}

/// Outcome of [`export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing to export; no file was touched.
    Skipped,
    Written { path: PathBuf, rows: usize },
    /// The file could not be written. Reported, not fatal.
    Failed { path: PathBuf, reason: String },
}

/// Project every record, failing on the first malformed one.
pub fn project(repos: &[RepositoryRecord]) -> Result<Vec<ExportRow>, ExporterError> {
    repos.iter().map(ExportRow::from_record).collect()
}

/// Write `repos` to `path` as CSV.
///
/// An empty collection writes nothing. Malformed records are an error and
/// are detected before the file is opened; I/O failures while writing come
/// back as [`ExportOutcome::Failed`].
pub fn export(
    repos: &[RepositoryRecord],
    path: impl AsRef<Path>,
) -> Result<ExportOutcome, ExporterError> {
    let path = path.as_ref();
    if repos.is_empty() {
        tracing::debug!("No repositories to export");
        return Ok(ExportOutcome::Skipped);
    }

    let rows = project(repos)?;
    match write_file(path, &rows) {
        Ok(()) => {
            tracing::info!(path = %path.display(), rows = rows.len(), "Export written");
            Ok(ExportOutcome::Written {
                path: path.to_path_buf(),
                rows: rows.len(),
            })
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Export failed");
            Ok(ExportOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

/// Write the header and `rows` to any writer.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExporterError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_file(path: &Path, rows: &[ExportRow]) -> Result<(), ExporterError> {
    let file = File::create(path)?;
    write_csv(rows, BufWriter::new(file))
}

fn required_flag(
    record: &RepositoryRecord,
    field: &str,
    read: fn(&RepositoryRecord) -> Option<bool>,
) -> Result<bool, ExporterError> {
    read(record).ok_or_else(|| missing(record, field))
}

fn missing(record: &RepositoryRecord, field: &str) -> ExporterError {
    let repo = record.name().unwrap_or("<unnamed>");
    ExporterError::MalformedRecord(format!("repository '{repo}' has no '{field}'"))
}

fn title_case_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn full_record() -> Value {
        json!({
            "owner": {"login": "octocat"},
            "name": "hello-world",
            "language": "Rust",
            "stargazers_count": 42,
            "license": {"key": "mit", "spdx_id": "MIT"},
            "private": false,
            "archived": false,
            "is_template": true,
            "mirror_url": null,
            "fork": true
        })
    }

    fn record(value: Value) -> RepositoryRecord {
        serde_json::from_value(value).unwrap()
    }

    fn with(mut base: Value, key: &str, value: Value) -> Value {
        base[key] = value;
        base
    }

    fn without(mut base: Value, key: &str) -> Value {
        base.as_object_mut().unwrap().remove(key);
        base
    }

    #[test]
    fn projects_a_complete_record() {
        let row = ExportRow::from_record(&record(full_record())).unwrap();
        assert_eq!(
            row,
            ExportRow {
                owner: "octocat".into(),
                name: "hello-world".into(),
                primary_language: "Rust".into(),
                stars: 42,
                license: "MIT".into(),
                visibility: Visibility::Public,
                archived: false,
                is_template: true,
                is_mirror: false,
                is_fork: true,
            }
        );
    }

    #[test]
    fn missing_license_object_maps_to_none() {
        let row = ExportRow::from_record(&record(with(full_record(), "license", Value::Null)))
            .unwrap();
        assert_eq!(row.license, "None");

        let row = ExportRow::from_record(&record(without(full_record(), "license"))).unwrap();
        assert_eq!(row.license, "None");

        let row = ExportRow::from_record(&record(with(full_record(), "license", json!({}))))
            .unwrap();
        assert_eq!(row.license, "None");
    }

    #[test]
    fn license_without_identifier_maps_to_na() {
        let row = ExportRow::from_record(&record(with(
            full_record(),
            "license",
            json!({"key": "other", "name": "Other"}),
        )))
        .unwrap();
        assert_eq!(row.license, "N/A");

        let row = ExportRow::from_record(&record(with(
            full_record(),
            "license",
            json!({"spdx_id": null}),
        )))
        .unwrap();
        assert_eq!(row.license, "N/A");
    }

    #[test]
    fn missing_language_maps_to_na() {
        let row = ExportRow::from_record(&record(with(full_record(), "language", Value::Null)))
            .unwrap();
        assert_eq!(row.primary_language, "N/A");
    }

    #[test]
    fn mirror_flag_follows_mirror_url_presence() {
        let row = ExportRow::from_record(&record(without(full_record(), "mirror_url"))).unwrap();
        assert!(!row.is_mirror);

        let row = ExportRow::from_record(&record(with(
            full_record(),
            "mirror_url",
            json!("https://mirror.example/repo.git"),
        )))
        .unwrap();
        assert!(row.is_mirror);
    }

    #[test]
    fn private_flag_maps_to_type_column() {
        let row =
            ExportRow::from_record(&record(with(full_record(), "private", json!(true)))).unwrap();
        assert_eq!(row.visibility, Visibility::Private);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let result = ExportRow::from_record(&record(without(full_record(), "stargazers_count")));
        assert!(
            matches!(result, Err(ExporterError::MalformedRecord(msg)) if msg.contains("stargazers_count"))
        );

        let result = ExportRow::from_record(&record(with(full_record(), "owner", json!({}))));
        assert!(
            matches!(result, Err(ExporterError::MalformedRecord(msg)) if msg.contains("owner.login"))
        );
    }

    #[test]
    fn writes_header_and_rows_in_column_order() {
        let rows = project(&[record(full_record())]).unwrap();
        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "owner,name,primary_language,stars,license,type,archived,is_template,is_mirror,is_fork\r\n\
             octocat,hello-world,Rust,42,MIT,Public,False,True,False,True\r\n"
        );
        assert_eq!(text.lines().next().unwrap(), COLUMNS.join(","));
    }

    #[test]
    fn quotes_fields_containing_delimiters() {
        let rows = project(&[record(with(full_record(), "name", json!("a,b")))]).unwrap();
        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("octocat,\"a,b\",Rust"));
    }
}
