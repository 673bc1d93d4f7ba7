// src/models/row.rs

use serde::Serialize;
use std::fmt;

/// A version split into at most three components. Missing components are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedVersion {
	pub major: String,
	pub minor: String,
	pub patch: String,
}

impl NormalizedVersion {
	pub fn new(major: impl Into<String>, minor: impl Into<String>, patch: impl Into<String>) -> Self {
		Self {
			major: major.into(),
			minor: minor.into(),
			patch: patch.into(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.major.is_empty() && self.minor.is_empty() && self.patch.is_empty()
	}
}

impl fmt::Display for NormalizedVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
	}
}

/// One flattened (record, version) row.
///
/// Field order matches the persisted column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
	pub version: String,
	pub major: String,
	pub minor: String,
	pub patch: String,
	pub cve_id: String,
	pub status: String,
	pub description: String,
	pub references: String,
	pub date_reserved: String,
	pub annotation: String,
	pub remark: String,
}

impl OutputRow {
	pub const HEADERS: [&'static str; 11] = [
		"version",
		"major",
		"minor",
		"patch",
		"cve_id",
		"status",
		"description",
		"references",
		"date_reserved",
		"annotation",
		"remark",
	];

	pub fn new(
		version: NormalizedVersion,
		cve_id: &str,
		status: &str,
		description: &str,
		references: &str,
		date_reserved: &str,
	) -> Self {
		Self {
			version: version.to_string(),
			major: version.major,
			minor: version.minor,
			patch: version.patch,
			cve_id: cve_id.to_string(),
			status: status.to_string(),
			description: description.to_string(),
			references: references.to_string(),
			date_reserved: date_reserved.to_string(),
			annotation: String::new(),
			remark: String::new(),
		}
	}
}
