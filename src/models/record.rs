// src/models/record.rs

use serde::Deserialize;

/// A CVE JSON 5.x document, decoded leniently.
///
/// Every field is optional on the wire; missing fields decode to their
/// defaults so that absent data is resolved by the accessors below instead
/// of failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CveRecord {
	pub cve_metadata: CveMetadata,
	pub containers: Containers,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CveMetadata {
	pub cve_id: String,
	pub state: String,
	pub date_reserved: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Containers {
	pub cna: CnaContainer,
	pub adp: Vec<AdpContainer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CnaContainer {
	pub title: Option<String>,
	pub descriptions: Vec<Description>,
	pub affected: Vec<AffectedEntry>,
	pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdpContainer {
	pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Description {
	pub lang: String,
	pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AffectedEntry {
	pub product: Option<String>,
	pub versions: Vec<VersionConstraint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionConstraint {
	pub version: Option<String>,
	pub less_than: Option<String>,
	pub less_than_or_equal: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Reference {
	pub name: Option<String>,
	pub url: Option<String>,
}

impl Reference {
	/// The URL if present, otherwise the name.
	pub fn label(&self) -> Option<&str> {
		self.url
			.as_deref()
			.or(self.name.as_deref())
			.map(str::trim)
			.filter(|s| !s.is_empty())
	}
}

impl CveRecord {
	pub fn id(&self) -> &str {
		&self.cve_metadata.cve_id
	}

	pub fn status(&self) -> &str {
		&self.cve_metadata.state
	}

	pub fn date_reserved(&self) -> &str {
		self.cve_metadata.date_reserved.as_deref().unwrap_or("")
	}

	/// First description tagged with an English language code ("en", "en-US", ...).
	pub fn english_description(&self) -> &str {
		self.containers
			.cna
			.descriptions
			.iter()
			.find(|desc| desc.lang.to_lowercase().starts_with("en"))
			.map(|desc| desc.value.as_str())
			.unwrap_or("")
	}

	/// Title sources in priority order: the CNA title, then each ADP title.
	pub fn title_sources(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.containers.cna.title.as_deref())
			.chain(self.containers.adp.iter().map(|adp| adp.title.as_deref()))
			.flatten()
	}

	pub fn title(&self) -> &str {
		self.title_sources().next().unwrap_or("")
	}

	/// Product labels of the affected entries that carry one.
	pub fn product_labels(&self) -> impl Iterator<Item = &str> {
		self.containers
			.cna
			.affected
			.iter()
			.filter_map(|entry| entry.product.as_deref())
	}

	pub fn version_constraints(&self) -> impl Iterator<Item = &VersionConstraint> {
		self.containers
			.cna
			.affected
			.iter()
			.flat_map(|entry| entry.versions.iter())
	}

	pub fn references(&self) -> &[Reference] {
		&self.containers.cna.references
	}
}
