// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use vulnerability_version_extractor::batch::process_corpus;
use vulnerability_version_extractor::config::FilterConfig;
use vulnerability_version_extractor::utils;
use vulnerability_version_extractor::utils::row_writer::{OutputFormat, RowWriter};

/// Flattens CVE records into one row per affected product version.
#[derive(Debug, Parser)]
#[command(name = "cve-versions", version, about)]
struct Args {
	/// Directory of CVE JSON 5 documents, or a single document
	corpus: PathBuf,

	/// Output file; rows go to stdout when omitted
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// JSON file overriding the default filter configuration
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
	format: OutputFormat,

	/// Write a header row first
	#[arg(long)]
	header: bool,

	/// Log per-record decisions
	#[arg(short, long)]
	verbose: bool,
}

struct App {
	args: Args,
	config: FilterConfig,
}

impl App {
	fn new(args: Args) -> Result<Self> {
		utils::logger::init(args.verbose);
		info!("Starting version extraction over {:?}", args.corpus);

		let config = FilterConfig::load(args.config.as_deref()).context("Failed to load filter configuration")?;
		Ok(App { args, config })
	}

	fn open_output(&self) -> Result<Box<dyn Write + Send>> {
		match &self.args.output {
			Some(path) => {
				let file = File::create(path).with_context(|| format!("Failed to create output file {:?}", path))?;
				Ok(Box::new(BufWriter::new(file)))
			}
			None => Ok(Box::new(BufWriter::new(io::stdout()))),
		}
	}

	async fn run(self) -> Result<()> {
		let mut writer = RowWriter::new(self.open_output()?, self.args.format);
		if self.args.header {
			writer.write_header()?;
		}

		let (stats, _) = process_corpus(self.args.corpus.clone(), self.config, writer).await?;

		info!(
			"Wrote {} rows for {} relevant records ({} documents, {} skipped)",
			stats.rows, stats.relevant, stats.documents, stats.decode_failures
		);
		Ok(())
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let app = App::new(Args::parse())?;
	app.run().await
}
