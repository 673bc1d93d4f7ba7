// src/batch.rs

use crate::config::FilterConfig;
use crate::pipeline::RecordEmitter;
use crate::utils::corpus::{discover_documents, read_document};
use crate::utils::row_writer::RowSink;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::task;

/// How often progress is logged, in documents.
const PROGRESS_INTERVAL: usize = 10_000;

/// Counters for one pass over a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
	pub documents: usize,
	pub decode_failures: usize,
	pub relevant: usize,
	pub rows: usize,
}

/// Runs the pipeline over every document under `root` and writes rows to `sink`.
///
/// A document that cannot be read or decoded is logged and skipped. Only a
/// missing corpus or a failing sink aborts the pass. The sink is handed back
/// once it has been finished.
pub async fn process_corpus<S>(root: PathBuf, config: FilterConfig, mut sink: S) -> Result<(BatchStats, S)>
where
	S: RowSink + Send + 'static,
{
	task::spawn_blocking(move || -> Result<(BatchStats, S)> {
		let emitter = RecordEmitter::new(&config).context("Failed to compile version patterns")?;
		let documents = discover_documents(&root)?;
		let stats = process_documents(&documents, &emitter, &mut sink)?;
		sink.finish()?;
		Ok((stats, sink))
	})
	.await
	.context("Failed to run corpus task")?
}

/// Processes documents in the given order; rows keep per-document order.
pub fn process_documents<P: AsRef<Path>>(
	documents: &[P],
	emitter: &RecordEmitter,
	sink: &mut dyn RowSink,
) -> Result<BatchStats> {
	let mut stats = BatchStats::default();

	for path in documents {
		stats.documents += 1;
		if stats.documents % PROGRESS_INTERVAL == 0 {
			info!("Processed {} of {} documents", stats.documents, documents.len());
		}

		let record = match read_document(path.as_ref()) {
			Ok(record) => record,
			Err(e) => {
				warn!("Skipping document: {}", e);
				stats.decode_failures += 1;
				continue;
			}
		};

		if let Some(rows) = emitter.process(&record) {
			stats.relevant += 1;
			for row in &rows {
				sink.write_row(row)?;
			}
			stats.rows += rows.len();
		}
	}

	info!(
		"Processed {} documents: {} relevant, {} rows, {} skipped",
		stats.documents, stats.relevant, stats.rows, stats.decode_failures
	);
	Ok(stats)
}
