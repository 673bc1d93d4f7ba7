// src/pipeline/emitter.rs

use crate::config::FilterConfig;
use crate::models::record::CveRecord;
use crate::models::row::OutputRow;
use crate::pipeline::canonicalizer::TokenCanonicalizer;
use crate::pipeline::classifier::RelevanceClassifier;
use crate::pipeline::extractor::VersionExtractor;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref LINE_BREAKS: Regex = Regex::new(r"[\r\n]+").unwrap();
}

const REFERENCE_SEPARATOR: &str = ", ";

/// Runs classification, extraction and canonicalization for one record at a time.
///
/// Holds no per-record state, so one emitter can serve a whole corpus.
pub struct RecordEmitter {
	classifier: RelevanceClassifier,
	extractor: VersionExtractor,
	canonicalizer: TokenCanonicalizer,
}

impl RecordEmitter {
	pub fn new(config: &FilterConfig) -> Result<Self, regex::Error> {
		Ok(Self {
			classifier: RelevanceClassifier::new(config),
			extractor: VersionExtractor::new(config)?,
			canonicalizer: TokenCanonicalizer::new(config),
		})
	}

	/// One row per surviving token, in token discovery order.
	///
	/// Tokens are deduplicated before canonicalization, so `5.7.29` and
	/// `5.7.029` still produce two identical rows.
	pub fn emit(&self, record: &CveRecord) -> Vec<OutputRow> {
		self.process(record).unwrap_or_default()
	}

	/// Like [`emit`](Self::emit), but `None` tells an irrelevant record apart
	/// from a relevant one that yielded no rows.
	pub fn process(&self, record: &CveRecord) -> Option<Vec<OutputRow>> {
		if !self.classifier.is_relevant(record) {
			return None;
		}

		let description = single_line(record.english_description());
		let references = single_line(&join_references(record));

		let rows: Vec<OutputRow> = self
			.extractor
			.extract_version_tokens(record)
			.iter()
			.filter_map(|token| self.canonicalizer.canonicalize(token))
			.map(|version| {
				OutputRow::new(
					version,
					record.id(),
					record.status(),
					&description,
					&references,
					record.date_reserved(),
				)
			})
			.collect();
		Some(rows)
	}
}

fn join_references(record: &CveRecord) -> String {
	record
		.references()
		.iter()
		.filter_map(|reference| reference.label())
		.collect::<Vec<_>>()
		.join(REFERENCE_SEPARATOR)
}

/// Collapses each run of line breaks into one space.
fn single_line(text: &str) -> String {
	LINE_BREAKS.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{json, Value};

	fn record(description: &str, affected: Value) -> CveRecord {
		serde_json::from_value(json!({
			"cveMetadata": {
				"cveId": "CVE-2020-2922",
				"state": "PUBLISHED",
				"dateReserved": "2019-12-10T00:00:00"
			},
			"containers": {
				"cna": {
					"descriptions": [{ "lang": "en", "value": description }],
					"affected": affected,
					"references": [
						{ "name": "oracle", "url": "https://www.oracle.com/security-alerts/cpuapr2020.html" },
						{ "name": "GLSA-202012-08" }
					]
				}
			}
		}))
		.unwrap()
	}

	fn emitter() -> RecordEmitter {
		RecordEmitter::new(&FilterConfig::default()).unwrap()
	}

	#[test]
	fn test_end_to_end_structured_record() {
		let rec = record(
			"Vulnerability in the MySQL Server product of Oracle MySQL.",
			json!([{ "product": "MySQL Server", "versions": [{ "version": "5.7.0" }, { "lessThan": "5.7.30" }] }]),
		);

		let rows = emitter().emit(&rec);
		assert_eq!(rows.len(), 2);

		assert_eq!(rows[0].version, "5.7.0");
		assert_eq!(rows[1].version, "5.7.29");
		assert_eq!((rows[1].major.as_str(), rows[1].minor.as_str(), rows[1].patch.as_str()), ("5", "7", "29"));

		let row = &rows[0];
		assert_eq!(row.cve_id, "CVE-2020-2922");
		assert_eq!(row.status, "PUBLISHED");
		assert_eq!(row.date_reserved, "2019-12-10T00:00:00");
		assert_eq!(
			row.references,
			"https://www.oracle.com/security-alerts/cpuapr2020.html, GLSA-202012-08"
		);
	}

	#[test]
	fn test_irrelevant_record_emits_nothing() {
		let rec = record(
			"** REJECT ** MySQL Server duplicate.",
			json!([{ "versions": [{ "version": "5.7.0" }] }]),
		);
		assert!(emitter().emit(&rec).is_empty());
	}

	#[test]
	fn test_fallback_token_emits_nothing() {
		let rec = record("The MySQL server crashes on malformed packets.", json!([]));
		assert!(emitter().emit(&rec).is_empty());
		assert_eq!(emitter().process(&rec), Some(Vec::new()));
	}

	#[test]
	fn test_process_reports_irrelevant_record() {
		let rec = record("PostgreSQL server 9.6.1 flaw", json!([]));
		assert_eq!(emitter().process(&rec), None);
	}

	#[test]
	fn test_line_breaks_are_collapsed() {
		let rec = record("MySQL server 5.1.2\r\nallows\n\nremote crash", json!([]));
		let rows = emitter().emit(&rec);
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].description, "MySQL server 5.1.2 allows remote crash");
	}

	#[test]
	fn test_wildcard_row() {
		let rec = record("MySQL 5.0.x server allows crashes", json!([]));
		let rows = emitter().emit(&rec);
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].version, "5.0.9999");
	}

	#[test]
	fn test_tokens_equal_after_cleaning_still_emit_twice() {
		let rec = record(
			"MySQL Server flaw.",
			json!([{ "versions": [{ "version": "5.7.29" }, { "version": "v5.7.29" }] }]),
		);
		let rows = emitter().emit(&rec);
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0], rows[1]);
	}

	#[test]
	fn test_identical_tokens_emit_once() {
		let rec = record(
			"MySQL Server flaw.",
			json!([
				{ "product": "MySQL", "versions": [{ "version": "8.0.19" }] },
				{ "product": "MySQL Server", "versions": [{ "lessThanOrEqual": "8.0.19" }] }
			]),
		);
		assert_eq!(emitter().emit(&rec).len(), 1);
	}

	#[test]
	fn test_rejected_token_is_skipped_but_others_kept() {
		let rec = record(
			"MySQL Server flaw.",
			json!([{ "versions": [{ "version": "unspecified", "lessThan": "8.0.0" }] }]),
		);
		let rows = emitter().emit(&rec);
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].version, "7.9999.9999");
	}
}
