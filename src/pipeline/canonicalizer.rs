// src/pipeline/canonicalizer.rs

use crate::config::FilterConfig;
use crate::models::row::NormalizedVersion;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref AND_EARLIER: Regex = Regex::new(r"(?i)and ?earlier").unwrap();
}

/// Cleans raw version tokens into `major.minor.patch` components.
#[derive(Debug, Clone)]
pub struct TokenCanonicalizer {
	vendor_prefixes: Vec<String>,
	max_component: u64,
}

impl TokenCanonicalizer {
	pub fn new(config: &FilterConfig) -> Self {
		Self {
			vendor_prefixes: config
				.vendor_prefixes
				.iter()
				.map(|p| p.to_lowercase())
				.filter(|p| !p.is_empty())
				.collect(),
			max_component: config.max_component,
		}
	}

	/// Returns `None` when nothing numeric survives cleaning.
	///
	/// Cleaning order: a trailing `.x` becomes `.<max>`, "and earlier" is
	/// dropped, a vendor prefix is dropped, then everything except digits
	/// and dots is removed. Only the first three dot-separated components
	/// are kept.
	pub fn canonicalize(&self, token: &str) -> Option<NormalizedVersion> {
		let mut cleaned = match token.strip_suffix(".x") {
			Some(stem) => format!("{}.{}", stem, self.max_component),
			None => token.to_string(),
		};
		cleaned = AND_EARLIER.replace_all(&cleaned, "").into_owned();
		cleaned = self.strip_vendor_prefix(&cleaned).to_string();
		cleaned.retain(|c| c.is_ascii_digit() || c == '.');

		let mut parts = cleaned.split('.').map(str::to_string);
		let version = NormalizedVersion::new(
			parts.next().unwrap_or_default(),
			parts.next().unwrap_or_default(),
			parts.next().unwrap_or_default(),
		);

		if version.is_empty() {
			None
		} else {
			Some(version)
		}
	}

	fn strip_vendor_prefix<'a>(&self, token: &'a str) -> &'a str {
		let trimmed = token.trim_start();
		self.vendor_prefixes
			.iter()
			.find_map(|prefix| {
				trimmed
					.get(..prefix.len())
					.filter(|head| head.to_lowercase() == *prefix)
					.map(|_| &trimmed[prefix.len()..])
			})
			.unwrap_or(trimmed)
	}
}
