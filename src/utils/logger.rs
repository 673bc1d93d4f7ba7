use env_logger::{Builder, Env};

/// `RUST_LOG` wins; otherwise `debug` when verbose, `info` by default.
pub fn init(verbose: bool) {
	let default_filter = if verbose { "debug" } else { "info" };
	Builder::from_env(Env::default().default_filter_or(default_filter))
		.format_timestamp_millis()
		.format_module_path(true)
		.init();
}
