/// Environment variable that overrides the log filter built from `-v` flags.
pub const LOG_ENV: &str = "TTYLINE_LOG";

/// The log filter for this binary and the `ttyline` library.
///
/// Everything else stays at `warn` so dependencies do not drown out line traffic.
pub fn filter(root_module: &str, verbosity: u8) -> String {
	let level = match verbosity {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	format!("warn,{root_module}={level},ttyline={level}")
}

pub fn init(root_module: &str, verbosity: u8) {
	use std::io::Write;

	let env = env_logger::Env::new().filter_or(LOG_ENV, filter(root_module, verbosity));
	env_logger::Builder::from_env(env)
		.format(|buffer, record| {
			// Plain output for normal messages, so `read` results can be piped.
			if record.level() <= log::Level::Warn {
				let level = buffer.default_styled_level(record.level());
				writeln!(buffer, "{}: {}", level, record.args())
			} else if record.level() == log::Level::Trace {
				writeln!(buffer, "[{}] {}", record.target(), record.args())
			} else {
				writeln!(buffer, "{}", record.args())
			}
		})
		.init();
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn verbosity_raises_both_binary_and_library() {
		assert_eq!(filter("cli", 0), "warn,cli=info,ttyline=info");
		assert_eq!(filter("cli", 1), "warn,cli=debug,ttyline=debug");
		assert_eq!(filter("cli", 2), "warn,cli=trace,ttyline=trace");
		assert_eq!(filter("cli", 9), "warn,cli=trace,ttyline=trace");
	}
}
