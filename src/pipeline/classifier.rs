// src/pipeline/classifier.rs

use crate::config::FilterConfig;
use crate::models::record::CveRecord;
use log::debug;

/// Product label meaning "not scoped to any product".
const UNSCOPED_PRODUCT: &str = "n/a";

/// Why a record was left out. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
	UnrelatedProduct,
	NoFamilyKeyword,
	MissingRequiredTerm,
	ExcludedSubProduct,
	Withdrawn,
	Denylisted,
}

/// Decides whether a record belongs to the target product family.
///
/// All matching is case-insensitive substring matching; the lists are
/// lowercased once at construction.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
	family_keywords: Vec<String>,
	required_term: Option<String>,
	excluded_sub_products: Vec<String>,
	withdrawn_markers: Vec<String>,
	unrelated_products: Vec<String>,
}

impl RelevanceClassifier {
	pub fn new(config: &FilterConfig) -> Self {
		Self {
			family_keywords: lowercase_all(&config.family_keywords),
			required_term: config.required_term.as_ref().map(|t| t.to_lowercase()),
			excluded_sub_products: lowercase_all(&config.excluded_sub_products),
			withdrawn_markers: lowercase_all(&config.withdrawn_markers),
			unrelated_products: lowercase_all(&config.unrelated_products),
		}
	}

	pub fn is_relevant(&self, record: &CveRecord) -> bool {
		match self.classify(record) {
			Ok(()) => true,
			Err(reason) => {
				debug!("Excluding {}: {:?}", record.id(), reason);
				false
			}
		}
	}

	/// Product-label exclusion is checked first and overrides any text match.
	pub fn classify(&self, record: &CveRecord) -> Result<(), Exclusion> {
		if record.product_labels().any(|label| self.is_unrelated_product(label)) {
			return Err(Exclusion::UnrelatedProduct);
		}

		let description = record.english_description().to_lowercase();
		let title = record.title().to_lowercase();

		if !self.mentions_family(&description) && !self.mentions_family(&title) {
			return Err(Exclusion::NoFamilyKeyword);
		}
		if let Some(term) = &self.required_term {
			if !description.contains(term.as_str()) && !title.contains(term.as_str()) {
				return Err(Exclusion::MissingRequiredTerm);
			}
		}
		if contains_any(&description, &self.excluded_sub_products) {
			return Err(Exclusion::ExcludedSubProduct);
		}
		if contains_any(&description, &self.withdrawn_markers) {
			return Err(Exclusion::Withdrawn);
		}
		if contains_any(&description, &self.unrelated_products) {
			return Err(Exclusion::Denylisted);
		}
		Ok(())
	}

	/// A label scopes the record elsewhere when it names a product outside the family.
	fn is_unrelated_product(&self, label: &str) -> bool {
		label != UNSCOPED_PRODUCT && !self.mentions_family(&label.to_lowercase())
	}

	fn mentions_family(&self, lowercase_text: &str) -> bool {
		contains_any(lowercase_text, &self.family_keywords)
	}
}

fn contains_any(lowercase_text: &str, needles: &[String]) -> bool {
	needles.iter().any(|needle| lowercase_text.contains(needle.as_str()))
}

fn lowercase_all(items: &[String]) -> Vec<String> {
	items
		.iter()
		.map(|s| s.to_lowercase())
		.filter(|s| !s.is_empty())
		.collect()
}
