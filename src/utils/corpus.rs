// src/utils/corpus.rs

use crate::error::CorpusError;
use crate::models::record::CveRecord;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSION: &str = "json";

/// Lists every `*.json` document under `root`, or `root` itself if it is a file.
///
/// Paths are sorted so that output order is reproducible between runs.
///
/// # Arguments
///
/// * `root` - A corpus directory or a single document.
///
/// # Returns
///
/// * `Result<Vec<PathBuf>>` - The document paths, or an error if `root` cannot be listed.
pub fn discover_documents(root: &Path) -> Result<Vec<PathBuf>> {
	if root.is_file() {
		return Ok(vec![root.to_path_buf()]);
	}
	if !root.is_dir() {
		return Err(anyhow::anyhow!("Corpus not found at {:?}", root));
	}

	let mut documents = Vec::new();
	let mut pending = vec![root.to_path_buf()];
	while let Some(dir) = pending.pop() {
		let entries = fs::read_dir(&dir).with_context(|| format!("Failed to list {:?}", dir))?;
		for entry in entries {
			let path = entry.with_context(|| format!("Failed to read entry in {:?}", dir))?.path();
			if path.is_dir() {
				pending.push(path);
			} else if is_document(&path) {
				documents.push(path);
			}
		}
	}

	documents.sort();
	info!("Found {} documents under {:?}", documents.len(), root);
	Ok(documents)
}

/// Reads and decodes one document.
pub fn read_document(path: &Path) -> Result<CveRecord, CorpusError> {
	let raw = fs::read(path).map_err(|source| CorpusError::Read {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_slice(&raw).map_err(|source| CorpusError::Decode {
		path: path.to_path_buf(),
		source,
	})
}

fn is_document(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.map_or(false, |ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}
