// src/config.rs

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::path::Path;

/// Stand-in for "largest value" at a version component whose range is unknown.
pub const DEFAULT_MAX_COMPONENT: u64 = 9999;

/// Relevance and cleaning parameters for one pipeline pass.
///
/// Everything here is data, not logic: the lists can grow without touching
/// the classifier or the canonicalizer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
	/// Product-family keywords, matched case-insensitively.
	pub family_keywords: Vec<String>,
	/// Term that must appear in the description or title. `null` disables it.
	pub required_term: Option<String>,
	/// Sub-products of the family that are out of scope.
	pub excluded_sub_products: Vec<String>,
	/// Markers of rejected or disputed records.
	pub withdrawn_markers: Vec<String>,
	/// Fragments of unrelated product names that merely mention the family.
	pub unrelated_products: Vec<String>,
	/// Vendor prefixes stripped from version tokens.
	pub vendor_prefixes: Vec<String>,
	pub max_component: u64,
}

impl Default for FilterConfig {
	fn default() -> Self {
		Self {
			family_keywords: strings(&["mysql", "mariadb", "percona"]),
			required_term: Some("server".to_string()),
			excluded_sub_products: strings(&["MySQL Cluster", "MySQL Connectors"]),
			withdrawn_markers: strings(&["** REJECT **", "** DISPUTED **"]),
			unrelated_products: strings(&[
				"phpMyAdmin",
				"WordPress",
				"Joomla",
				"Drupal",
				"Zabbix",
				"Cacti",
				"Moodle",
				"osCommerce",
				"Nagios",
				"Plesk",
				"Webmin",
			]),
			vendor_prefixes: strings(&["oracle", "mysql", "mariadb", "percona"]),
			max_component: DEFAULT_MAX_COMPONENT,
		}
	}
}

impl FilterConfig {
	/// Loads a JSON config file; fields it omits keep their defaults.
	pub fn from_file(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file {:?}", path))?;
		let config = serde_json::from_str(&raw)
			.with_context(|| format!("Failed to parse config file {:?}", path))?;
		info!("Loaded filter configuration from {:?}", path);
		Ok(config)
	}

	/// `from_file` when a path is given, defaults otherwise.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(path) => Self::from_file(path),
			None => Ok(Self::default()),
		}
	}
}

fn strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|s| s.to_string()).collect()
}
