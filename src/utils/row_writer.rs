// src/utils/row_writer.rs

use crate::models::row::OutputRow;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Write;

const DELIMITER: u8 = b';';

/// Destination for emitted rows.
pub trait RowSink {
	fn write_row(&mut self, row: &OutputRow) -> Result<()>;

	fn finish(&mut self) -> Result<()> {
		Ok(())
	}
}

impl RowSink for Vec<OutputRow> {
	fn write_row(&mut self, row: &OutputRow) -> Result<()> {
		self.push(row.clone());
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// `;`-separated, fields quoted and escaped only when needed.
	#[default]
	Csv,
	/// Description and references always wrapped in quotes, nothing escaped.
	/// A `;` or `"` inside free text is written as-is.
	Legacy,
}

enum Inner<W: Write> {
	Csv(csv::Writer<W>),
	Legacy(W),
}

/// Serializes rows as delimiter-separated lines in the fixed column order.
pub struct RowWriter<W: Write> {
	inner: Inner<W>,
}

impl<W: Write> RowWriter<W> {
	pub fn new(writer: W, format: OutputFormat) -> Self {
		let inner = match format {
			OutputFormat::Csv => Inner::Csv(
				csv::WriterBuilder::new()
					.delimiter(DELIMITER)
					.has_headers(false)
					.quote_style(csv::QuoteStyle::Necessary)
					.from_writer(writer),
			),
			OutputFormat::Legacy => Inner::Legacy(writer),
		};
		Self { inner }
	}

	pub fn write_header(&mut self) -> Result<()> {
		match &mut self.inner {
			Inner::Csv(writer) => writer
				.write_record(OutputRow::HEADERS)
				.context("Failed to write header row"),
			Inner::Legacy(writer) => writeln!(writer, "{}", OutputRow::HEADERS.join(";"))
				.context("Failed to write header row"),
		}
	}
}

impl<W: Write> RowSink for RowWriter<W> {
	fn write_row(&mut self, row: &OutputRow) -> Result<()> {
		match &mut self.inner {
			Inner::Csv(writer) => writer
				.serialize(row)
				.with_context(|| format!("Failed to write row for {}", row.cve_id)),
			Inner::Legacy(writer) => writeln!(
				writer,
				"{};{};{};{};{};{};\"{}\";\"{}\";{};{};{}",
				row.version,
				row.major,
				row.minor,
				row.patch,
				row.cve_id,
				row.status,
				row.description,
				row.references,
				row.date_reserved,
				row.annotation,
				row.remark,
			)
			.with_context(|| format!("Failed to write row for {}", row.cve_id)),
		}
	}

	fn finish(&mut self) -> Result<()> {
		let flushed = match &mut self.inner {
			Inner::Csv(writer) => writer.flush(),
			Inner::Legacy(writer) => writer.flush(),
		};
		flushed.context("Failed to flush output")
	}
}
