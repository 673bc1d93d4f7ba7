// src/pipeline/normalizer.rs

use crate::config::DEFAULT_MAX_COMPONENT;

/// Converts an exclusive upper bound into the equivalent inclusive bound
/// using the default sentinel.
pub fn normalize_exclusive_bound(version: &str) -> String {
	normalize_exclusive_bound_with(version, DEFAULT_MAX_COMPONENT)
}

/// Subtracts one from `major.minor.patch`, borrowing across components.
///
/// The width of each component is unknown, so a borrowed position becomes
/// `max` rather than a true radix maximum. `5.7.0` becomes `5.6.<max>` and
/// `8.0.0` becomes `7.<max>.<max>`.
///
/// Never fails: if the patch component is missing or not a plain
/// non-negative integer the input is returned unchanged. Components past the
/// third are dropped.
pub fn normalize_exclusive_bound_with(version: &str, max: u64) -> String {
	let parts: Vec<&str> = version.split('.').collect();
	if parts.len() < 3 {
		return version.to_string();
	}

	let Some(patch) = parse_component(parts[2]) else {
		return version.to_string();
	};

	let mut major = parts[0].to_string();
	let mut minor = parts[1].to_string();
	let patch = if patch == 0 {
		if let Some(minor_value) = parse_component(parts[1]) {
			if minor_value == 0 {
				minor = max.to_string();
				if let Some(major_value) = parse_component(parts[0]).filter(|m| *m > 0) {
					major = (major_value - 1).to_string();
				}
			} else {
				minor = (minor_value - 1).to_string();
			}
		}
		max
	} else {
		patch - 1
	};

	format!("{}.{}.{}", major, minor, patch)
}

/// A component counts as numeric only if it is all ASCII digits.
fn parse_component(component: &str) -> Option<u64> {
	if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	component.parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_patch_decrement() {
		assert_eq!(normalize_exclusive_bound("5.7.12"), "5.7.11");
		assert_eq!(normalize_exclusive_bound("5.7.30"), "5.7.29");
		assert_eq!(normalize_exclusive_bound("10.4.1"), "10.4.0");
	}

	#[test]
	fn test_borrow_from_minor() {
		assert_eq!(normalize_exclusive_bound("5.7.0"), "5.6.9999");
		assert_eq!(normalize_exclusive_bound("10.1.0"), "10.0.9999");
	}

	#[test]
	fn test_borrow_from_major() {
		assert_eq!(normalize_exclusive_bound("8.0.0"), "7.9999.9999");
		assert_eq!(normalize_exclusive_bound("1.0.0"), "0.9999.9999");
	}

	#[test]
	fn test_zero_major_is_not_decremented() {
		assert_eq!(normalize_exclusive_bound("0.0.0"), "0.9999.9999");
	}

	#[test]
	fn test_non_numeric_minor_only_sets_patch() {
		assert_eq!(normalize_exclusive_bound("5.x.0"), "5.x.9999");
	}

	#[test]
	fn test_non_numeric_major_keeps_major() {
		assert_eq!(normalize_exclusive_bound("v8.0.0"), "v8.9999.9999");
	}

	#[test]
	fn test_unparseable_patch_is_unchanged() {
		assert_eq!(normalize_exclusive_bound("5.7.a"), "5.7.a");
		assert_eq!(normalize_exclusive_bound("5.0.x"), "5.0.x");
		assert_eq!(normalize_exclusive_bound("5.7."), "5.7.");
		assert_eq!(normalize_exclusive_bound("5.7"), "5.7");
		assert_eq!(normalize_exclusive_bound("5.7.+1"), "5.7.+1");
		assert_eq!(normalize_exclusive_bound(""), "");
		assert_eq!(normalize_exclusive_bound("n/a"), "n/a");
	}

	#[test]
	fn test_extra_components_are_dropped() {
		assert_eq!(normalize_exclusive_bound("5.7.30.1"), "5.7.29");
	}

	#[test]
	fn test_leading_zeros_are_not_preserved() {
		assert_eq!(normalize_exclusive_bound("5.7.030"), "5.7.29");
	}

	#[test]
	fn test_custom_sentinel() {
		assert_eq!(normalize_exclusive_bound_with("8.0.0", 99), "7.99.99");
	}
}
