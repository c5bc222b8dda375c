use std::path::Path;
use std::time::Instant;

mod logging;
mod options;

use options::{Command, Options};

fn main() {
	if let Err(()) = do_main(clap::Parser::parse()) {
		std::process::exit(1);
	}
}

fn do_main(options: Options) -> Result<(), ()> {
	logging::init(module_path!(), options.verbose);
	match &options.command {
		Command::Write { hex, data } => {
			let data = if *hex {
				options::parse_hex(data).map_err(|e| log::error!("{}", e))?
			} else {
				data.as_bytes().to_vec()
			};
			let mut port = open_port(&options)?;
			log::debug!("Writing {} bytes to {}", data.len(), port);
			let start = Instant::now();
			let count = port.write(&data).map_err(|e| log::error!("Write failed: {}", e))?;
			if count < data.len() {
				log::warn!("Only {} of {} bytes were written", count, data.len());
			}
			log::info!("{:?}: wrote {} bytes", start.elapsed(), count);
		},
		Command::Read { count } => {
			let mut port = open_port(&options)?;
			log::debug!("Reading up to {} bytes from {}", count, port);
			let start = Instant::now();
			let data = port.read(*count).map_err(|e| log::error!("Read failed: {}", e))?;
			if data.is_empty() {
				log::warn!("No data received before the timeout expired");
			}
			log::info!("{:?}: {:02X?} ({:?})", start.elapsed(), data, String::from_utf8_lossy(&data));
		},
		Command::Flush => {
			let mut port = open_port(&options)?;
			port.flush().map_err(|e| log::error!("Flush failed: {}", e))?;
			log::info!("Discarded pending input and output of {}", port);
		},
		Command::Timeout => {
			let port = open_port(&options)?;
			let timeout = port.timeout().map_err(|e| log::error!("{}", e))?;
			if timeout == ttyline::INFINITE {
				log::info!("infinite");
			} else {
				log::info!("{} deciseconds", timeout);
			}
		},
		Command::List => {
			let ports = serial2::SerialPort::available_ports().map_err(|e| log::error!("Failed to enumerate serial ports: {}", e))?;
			if ports.is_empty() {
				log::warn!("No serial ports found");
			}
			for port in ports {
				log::info!("{}", port.display());
			}
		},
		Command::ShellCompletion { shell, output } => {
			write_shell_completion(*shell, output.as_deref())?;
		},
	}

	Ok(())
}

fn open_port(options: &Options) -> Result<ttyline::SerialPort, ()> {
	let mut port = ttyline::SerialPort::open(&options.serial_port)
		.map_err(|e| log::error!("{}", open_failure(&options.serial_port, &e)))?;
	if let Some(timeout) = options.timeout {
		port.set_timeout(timeout.0)
			.map_err(|e| log::error!("Failed to set read timeout: {}", e))?;
	}
	log::debug!("Using serial port {} at {} baud", options.serial_port.display(), ttyline::BAUD_RATE);
	Ok(port)
}

/// Describe a failure to open the serial port at `path`.
///
/// The error already says which step of opening the port failed.
fn open_failure(path: &Path, error: &ttyline::Error) -> String {
	format!("{}: {}", path.display(), error)
}

fn write_shell_completion(shell: clap_complete::Shell, path: Option<&Path>) -> Result<(), ()> {
	use clap::CommandFactory;
	use std::io::Write;

	let mut buffer = Vec::with_capacity(4 * 1024);

	let mut command = Options::command();
	clap_complete::generate(shell, &mut command, env!("CARGO_BIN_NAME"), &mut buffer);
	if !buffer.ends_with(b"\n") {
		buffer.push(b'\n');
	}

	let path = path.unwrap_or_else(|| Path::new("-"));
	if path == Path::new("-") {
		log::debug!("Writing shell completion for {} to stdout", shell);
		let stdout = std::io::stdout();
		stdout
			.lock()
			.write_all(&buffer)
			.map_err(|e| log::error!("Failed to write to stdout: {}", e))?;
	} else {
		log::debug!("Writing shell completion for {} to {}", shell, path.display());
		let mut output = std::fs::File::create(path).map_err(|e| log::error!("Failed to create {}: {}", path.display(), e))?;
		output
			.write_all(&buffer)
			.map_err(|e| log::error!("Failed to write to {}: {}", path.display(), e))?;
	}

	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn open_failure_mentions_path_and_reason_once() {
		let error = ttyline::Error::Open(std::io::ErrorKind::NotFound.into());
		let message = open_failure(Path::new("/dev/ttyX"), &error);
		assert!(message.starts_with("/dev/ttyX: failed to open serial port: "));
		assert_eq!(message.matches("open serial port").count(), 1);
	}
}
