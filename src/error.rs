use std::path::PathBuf;
use thiserror::Error;

/// Failures tied to a single corpus document. These are logged and skipped.
#[derive(Debug, Error)]
pub enum CorpusError {
	#[error("Failed to read {path:?}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to decode {path:?}: {source}")]
	Decode {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}
