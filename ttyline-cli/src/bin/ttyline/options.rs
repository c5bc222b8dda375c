use std::path::PathBuf;

/// Talk to a device on a serial line.
///
/// The line is always configured for 115200 baud, 8 data bits, no parity and 1 stop bit.
#[derive(clap::Parser)]
#[command(version)]
pub struct Options {
	/// Print more verbose messages. Can be used multiple times.
	#[arg(long, short)]
	#[arg(global = true)]
	#[arg(action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// The serial port to use.
	#[arg(long, short)]
	#[arg(global = true)]
	#[arg(default_value = ttyline::DEFAULT_DEVICE)]
	pub serial_port: PathBuf,

	/// The read timeout in deciseconds (0-255), or "infinite" to wait for at least one byte.
	#[arg(long, short)]
	#[arg(global = true)]
	#[arg(value_name = "DECISECONDS|infinite")]
	pub timeout: Option<Timeout>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// Write data to the serial port.
	Write {
		/// Interpret the data as hexadecimal bytes, like "FF E0 FB 01".
		#[arg(long)]
		hex: bool,

		/// The data to write.
		#[arg(value_name = "DATA")]
		data: String,
	},

	/// Read up to COUNT bytes from the serial port.
	Read {
		/// The maximum number of bytes to read (at most 65536).
		#[arg(value_name = "COUNT")]
		#[arg(value_parser = parse_read_count)]
		count: usize,
	},

	/// Discard all data queued for input and output.
	Flush,

	/// Show the read timeout of the serial port.
	Timeout,

	/// List the available serial ports.
	List,

	/// Write shell completions to a file or stdout.
	ShellCompletion {
		/// The shell for which to generate completions.
		#[arg(long)]
		shell: clap_complete::Shell,

		/// The file to write the generated completion file to.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
}

/// A read timeout given on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Timeout(pub i32);

impl std::str::FromStr for Timeout {
	type Err = &'static str;

	fn from_str(data: &str) -> Result<Self, Self::Err> {
		if data.eq_ignore_ascii_case("infinite") {
			Ok(Self(ttyline::INFINITE))
		} else if let Ok(deciseconds) = data.parse::<u8>() {
			Ok(Self(deciseconds.into()))
		} else {
			Err("invalid timeout: expected a number in the range 0..=255 or the special value \"infinite\"")
		}
	}
}

/// The largest number of bytes a single `read` command may ask for.
pub const MAX_READ_COUNT: usize = 64 * 1024;

/// Parse the byte count of a `read` command.
pub fn parse_read_count(data: &str) -> Result<usize, String> {
	let count: usize = data.parse().map_err(|_| format!("invalid byte count: {:?}", data))?;
	if count > MAX_READ_COUNT {
		return Err(format!("byte count {} is too large, the maximum is {}", count, MAX_READ_COUNT));
	}
	Ok(count)
}

/// Parse whitespace separated or concatenated hexadecimal bytes.
pub fn parse_hex(data: &str) -> Result<Vec<u8>, String> {
	let digits: Vec<char> = data.chars().filter(|c| !c.is_whitespace()).collect();
	if digits.len() % 2 != 0 {
		return Err(format!("odd number of hexadecimal digits in {:?}", data));
	}
	digits
		.chunks(2)
		.map(|pair| {
			let pair: String = pair.iter().collect();
			u8::from_str_radix(&pair, 16).map_err(|_| format!("invalid hexadecimal byte: {:?}", pair))
		})
		.collect()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parse_timeout() {
		assert_eq!("infinite".parse(), Ok(Timeout(ttyline::INFINITE)));
		assert_eq!("INFINITE".parse(), Ok(Timeout(ttyline::INFINITE)));
		assert_eq!("0".parse(), Ok(Timeout(0)));
		assert_eq!("255".parse(), Ok(Timeout(255)));
		assert!("256".parse::<Timeout>().is_err());
		assert!("-1".parse::<Timeout>().is_err());
		assert!("forever".parse::<Timeout>().is_err());
	}

	#[test]
	fn parse_hex_bytes() {
		assert_eq!(parse_hex("FF E0 fb 01"), Ok(vec![0xFF, 0xE0, 0xFB, 0x01]));
		assert_eq!(parse_hex("ffe0"), Ok(vec![0xFF, 0xE0]));
		assert_eq!(parse_hex(""), Ok(vec![]));
		assert!(parse_hex("F").is_err());
		assert!(parse_hex("GG").is_err());
	}

	#[test]
	fn parse_read_counts() {
		assert_eq!(parse_read_count("0"), Ok(0));
		assert_eq!(parse_read_count("4"), Ok(4));
		assert_eq!(parse_read_count("65536"), Ok(MAX_READ_COUNT));
		assert!(parse_read_count("65537").is_err());
		assert!(parse_read_count("18446744073709551615").is_err());
		assert!(parse_read_count("-1").is_err());
	}

	#[test]
	fn huge_read_count_is_rejected_by_the_parser() {
		use clap::Parser;
		assert!(Options::try_parse_from(["ttyline", "read", "18446744073709551615"]).is_err());
		let options = Options::try_parse_from(["ttyline", "read", "16"]);
		assert!(matches!(options.map(|o| o.command), Ok(Command::Read { count: 16 })));
	}

	#[test]
	fn options_are_consistent() {
		use clap::CommandFactory;
		Options::command().debug_assert();
	}
}
