// src/pipeline/extractor.rs

use crate::config::FilterConfig;
use crate::models::record::CveRecord;
use crate::pipeline::normalizer::normalize_exclusive_bound_with;
use indexmap::IndexSet;
use log::debug;
use regex::Regex;

/// Token emitted when no strategy finds anything.
pub const FALLBACK_TOKEN: &str = "n/a";

/// Exact-version values that mean "no particular version".
const UNSPECIFIED_VERSIONS: [&str; 2] = ["n/a", "*"];

/// Loose dotted version, e.g. `5.7.29`.
const DOTTED_PATTERN: &str = r"\d{1,2}\.\d+\.\d+";

/// Whole release series, e.g. `5.0.x`.
const WILDCARD_PATTERN: &str = r"\d{1,2}\.\d+\.x";

/// One way of pulling raw version tokens out of a record.
pub trait VersionStrategy: Send + Sync {
	fn name(&self) -> &'static str;

	/// Raw tokens in the order they were found. May contain duplicates.
	fn candidates(&self, record: &CveRecord) -> Vec<String>;
}

/// Reads the structured `affected[].versions[]` constraints.
pub struct StructuredStrategy {
	max_component: u64,
}

impl StructuredStrategy {
	pub fn new(max_component: u64) -> Self {
		Self { max_component }
	}
}

impl VersionStrategy for StructuredStrategy {
	fn name(&self) -> &'static str {
		"structured"
	}

	fn candidates(&self, record: &CveRecord) -> Vec<String> {
		let mut tokens = Vec::new();
		for constraint in record.version_constraints() {
			if let Some(version) = &constraint.version {
				if !UNSPECIFIED_VERSIONS.contains(&version.as_str()) {
					tokens.push(version.clone());
				}
			}
			if let Some(bound) = &constraint.less_than {
				tokens.push(normalize_exclusive_bound_with(bound, self.max_component));
			}
			if let Some(bound) = &constraint.less_than_or_equal {
				tokens.push(bound.clone());
			}
		}
		tokens
	}
}

/// Scans the English description with a list of regexes.
///
/// Matches of all patterns are concatenated in pattern order. A pattern
/// with a capture group contributes the group, otherwise the whole match.
/// When the description says "before", each candidate is an exclusive bound
/// and is normalized.
pub struct PatternStrategy {
	name: &'static str,
	patterns: Vec<Regex>,
	max_component: u64,
}

impl PatternStrategy {
	pub fn new(name: &'static str, patterns: Vec<Regex>, max_component: u64) -> Self {
		Self {
			name,
			patterns,
			max_component,
		}
	}

	/// Loose dotted versions, then versions directly following a family keyword.
	pub fn dotted(config: &FilterConfig) -> Result<Self, regex::Error> {
		let mut patterns = vec![Regex::new(DOTTED_PATTERN)?];
		let keywords: Vec<String> = config
			.family_keywords
			.iter()
			.filter(|k| !k.is_empty())
			.map(|k| regex::escape(k))
			.collect();
		if !keywords.is_empty() {
			patterns.push(Regex::new(&format!(
				r"(?i)\b(?:{})\s+(\d+\.\d+\.\d+)",
				keywords.join("|")
			))?);
		}
		Ok(Self::new("dotted", patterns, config.max_component))
	}

	pub fn wildcard(config: &FilterConfig) -> Result<Self, regex::Error> {
		Ok(Self::new("wildcard", vec![Regex::new(WILDCARD_PATTERN)?], config.max_component))
	}
}

impl VersionStrategy for PatternStrategy {
	fn name(&self) -> &'static str {
		self.name
	}

	fn candidates(&self, record: &CveRecord) -> Vec<String> {
		let description = record.english_description();
		let exclusive = description.to_lowercase().contains("before");

		self.patterns
			.iter()
			.flat_map(|pattern| pattern.captures_iter(description))
			.filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
			.map(|m| {
				if exclusive {
					normalize_exclusive_bound_with(m.as_str(), self.max_component)
				} else {
					m.as_str().to_string()
				}
			})
			.collect()
	}
}

/// Tries each strategy in order; the first non-empty result wins.
pub struct VersionExtractor {
	strategies: Vec<Box<dyn VersionStrategy>>,
}

impl VersionExtractor {
	pub fn new(config: &FilterConfig) -> Result<Self, regex::Error> {
		let strategies: Vec<Box<dyn VersionStrategy>> = vec![
			Box::new(StructuredStrategy::new(config.max_component)),
			Box::new(PatternStrategy::dotted(config)?),
			Box::new(PatternStrategy::wildcard(config)?),
		];
		Ok(Self::with_strategies(strategies))
	}

	pub fn with_strategies(strategies: Vec<Box<dyn VersionStrategy>>) -> Self {
		Self { strategies }
	}

	/// Deduplicated tokens in discovery order, or just [`FALLBACK_TOKEN`].
	pub fn extract_version_tokens(&self, record: &CveRecord) -> IndexSet<String> {
		for strategy in &self.strategies {
			let tokens: IndexSet<String> = strategy.candidates(record).into_iter().collect();
			if !tokens.is_empty() {
				debug!("{}: {} token(s) from {} strategy", record.id(), tokens.len(), strategy.name());
				return tokens;
			}
		}
		IndexSet::from([FALLBACK_TOKEN.to_string()])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{json, Value};

	fn with_versions(affected: Value, description: &str) -> CveRecord {
		serde_json::from_value(json!({
			"cveMetadata": { "cveId": "CVE-2099-0002" },
			"containers": {
				"cna": {
					"descriptions": [{ "lang": "en", "value": description }],
					"affected": affected
				}
			}
		}))
		.unwrap()
	}

	fn described(description: &str) -> CveRecord {
		with_versions(json!([]), description)
	}

	fn extractor() -> VersionExtractor {
		VersionExtractor::new(&FilterConfig::default()).unwrap()
	}

	fn tokens(record: &CveRecord) -> Vec<String> {
		extractor().extract_version_tokens(record).into_iter().collect()
	}

	#[test]
	fn test_structured_exact_and_exclusive_bound() {
		let rec = with_versions(
			json!([{ "product": "MySQL Server", "versions": [{ "version": "5.7.0" }, { "lessThan": "5.7.30" }] }]),
			"",
		);
		assert_eq!(tokens(&rec), vec!["5.7.0", "5.7.29"]);
	}

	#[test]
	fn test_structured_inclusive_bound_is_verbatim() {
		let rec = with_versions(
			json!([{ "versions": [{ "version": "8.0.0", "lessThanOrEqual": "8.0.21" }] }]),
			"",
		);
		assert_eq!(tokens(&rec), vec!["8.0.0", "8.0.21"]);
	}

	#[test]
	fn test_structured_skips_unspecified_versions() {
		let rec = with_versions(
			json!([{ "versions": [{ "version": "n/a" }, { "version": "*", "lessThan": "10.5.0" }] }]),
			"",
		);
		assert_eq!(tokens(&rec), vec!["10.4.9999"]);
	}

	#[test]
	fn test_duplicates_across_entries_collapse() {
		let rec = with_versions(
			json!([
				{ "product": "MySQL", "versions": [{ "version": "5.6.45" }] },
				{ "product": "MySQL Server", "versions": [{ "version": "5.6.45" }, { "version": "5.7.27" }] }
			]),
			"",
		);
		assert_eq!(tokens(&rec), vec!["5.6.45", "5.7.27"]);
	}

	#[test]
	fn test_structured_wins_over_free_text() {
		let rec = with_versions(json!([{ "versions": [{ "version": "5.5.1" }] }]), "MySQL 4.0.20 and earlier");
		assert_eq!(tokens(&rec), vec!["5.5.1"]);
	}

	#[test]
	fn test_free_text_and_earlier_is_verbatim() {
		assert_eq!(tokens(&described("mysql 4.0.20 and earlier")), vec!["4.0.20"]);
	}

	#[test]
	fn test_free_text_before_is_normalized() {
		let rec = described("Buffer overflow in MySQL before 4.0.21 allows remote attackers to crash the server.");
		assert_eq!(tokens(&rec), vec!["4.0.20"]);
	}

	#[test]
	fn test_free_text_before_with_borrow() {
		let rec = described("MySQL 5.0.x before 5.1.0 and 5.0.x before 5.0.60");
		assert_eq!(tokens(&rec), vec!["5.0.9999", "5.0.59"]);
	}

	#[test]
	fn test_free_text_multiple_versions_in_order() {
		let rec = described("MySQL 5.0.51a, 5.1.23 and 6.0.4 allow local users to bypass privileges");
		assert_eq!(tokens(&rec), vec!["5.0.51", "5.1.23", "6.0.4"]);
	}

	#[test]
	fn test_wildcard_only_when_dotted_is_empty() {
		assert_eq!(tokens(&described("MySQL 5.0.x and 5.1.x servers")), vec!["5.0.x", "5.1.x"]);
	}

	#[test]
	fn test_wildcard_before_leaves_token_unchanged() {
		assert_eq!(tokens(&described("MySQL 4.1.x before the fix")), vec!["4.1.x"]);
	}

	#[test]
	fn test_no_versions_yields_fallback() {
		assert_eq!(tokens(&described("The MySQL server crashes.")), vec![FALLBACK_TOKEN]);
		assert_eq!(tokens(&with_versions(json!([{ "versions": [{ "version": "n/a" }] }]), "")), vec![FALLBACK_TOKEN]);
	}

	#[test]
	fn test_anchored_pattern_captures_version_only() {
		let config = FilterConfig::default();
		let strategy = PatternStrategy::dotted(&config).unwrap();
		let rec = described("MariaDB 10.5.100 server");
		assert_eq!(strategy.candidates(&rec), vec!["10.5.100", "10.5.100"]);
	}

	#[test]
	fn test_anchored_pattern_reaches_wide_major() {
		let config = FilterConfig::default();
		let strategy = PatternStrategy::dotted(&config).unwrap();
		let rec = described("mysql 123.4.5");
		assert_eq!(strategy.candidates(&rec), vec!["23.4.5", "123.4.5"]);
	}

	#[test]
	fn test_custom_strategy_order() {
		let config = FilterConfig::default();
		let wildcard: Box<dyn VersionStrategy> = Box::new(PatternStrategy::wildcard(&config).unwrap());
		let extractor = VersionExtractor::with_strategies(vec![wildcard]);
		let rec = described("MySQL 5.0.x and 5.1.2");
		assert_eq!(extractor.extract_version_tokens(&rec).into_iter().collect::<Vec<_>>(), vec!["5.0.x"]);
	}
}
