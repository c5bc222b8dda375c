/// An error that can occur while using a [`SerialPort`](crate::SerialPort).
#[derive(Debug)]
pub enum Error {
	/// The serial port was already closed.
	Closed,

	/// Opening the device failed.
	Open(std::io::Error),

	/// Switching the device to non-blocking mode during open failed.
	NonBlockingMode(std::io::Error),

	/// Applying the terminal configuration failed.
	Configure(std::io::Error),

	/// Switching the device back to blocking mode during open failed.
	BlockingMode(std::io::Error),

	/// Writing to the device failed.
	Write(std::io::Error),

	/// Reading from the device failed.
	Read(std::io::Error),

	/// Discarding the input and output queues failed.
	Flush(std::io::Error),

	/// The requested read timeout can not be represented by the terminal.
	///
	/// Finite timeouts must be in the range 0..=255 deciseconds.
	InvalidTimeout(i32),
}

impl Error {
	/// Check if the error was caused by using a closed serial port.
	pub fn is_closed(&self) -> bool {
		matches!(self, Self::Closed)
	}

	/// Get the underlying I/O error, if any.
	pub fn io_error(&self) -> Option<&std::io::Error> {
		match self {
			Self::Closed => None,
			Self::Open(e) => Some(e),
			Self::NonBlockingMode(e) => Some(e),
			Self::Configure(e) => Some(e),
			Self::BlockingMode(e) => Some(e),
			Self::Write(e) => Some(e),
			Self::Read(e) => Some(e),
			Self::Flush(e) => Some(e),
			Self::InvalidTimeout(_) => None,
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.io_error().map(|e| e as &(dyn std::error::Error + 'static))
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Closed => write!(f, "serial connection is closed"),
			Self::Open(e) => write!(f, "failed to open serial port: {}", e),
			Self::NonBlockingMode(e) => write!(f, "failed to switch to non-blocking mode: {}", e),
			Self::Configure(e) => write!(f, "failed to configure serial port: {}", e),
			Self::BlockingMode(e) => write!(f, "failed to switch to blocking mode: {}", e),
			Self::Write(e) => write!(f, "failed to write to serial port: {}", e),
			Self::Read(e) => write!(f, "failed to read from serial port: {}", e),
			Self::Flush(e) => write!(f, "failed to flush serial I/O: {}", e),
			Self::InvalidTimeout(value) => write!(f, "invalid timeout value: {}, expected 0..=255 or INFINITE", value),
		}
	}
}

impl From<Error> for std::io::Error {
	fn from(other: Error) -> Self {
		match other {
			Error::Closed => std::io::Error::new(std::io::ErrorKind::NotConnected, Error::Closed),
			Error::InvalidTimeout(value) => std::io::Error::new(std::io::ErrorKind::InvalidInput, Error::InvalidTimeout(value)),
			Error::Open(e) => e,
			Error::NonBlockingMode(e) => e,
			Error::Configure(e) => e,
			Error::BlockingMode(e) => e,
			Error::Write(e) => e,
			Error::Read(e) => e,
			Error::Flush(e) => e,
		}
	}
}

/// Convert a `nix` error to a standard I/O error.
pub(crate) fn from_errno(errno: nix::errno::Errno) -> std::io::Error {
	std::io::Error::from_raw_os_error(errno as i32)
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::assert;

	#[test]
	fn closed_error_mentions_closed() {
		assert!(Error::Closed.to_string() == "serial connection is closed");
		assert!(Error::Closed.is_closed());
		assert!(Error::Closed.io_error().is_none());
	}

	#[test]
	fn system_errors_carry_the_os_reason() {
		let error = Error::Write(std::io::Error::from_raw_os_error(nix::libc::EIO));
		let io = std::io::Error::from_raw_os_error(nix::libc::EIO);
		assert!(error.to_string() == format!("failed to write to serial port: {}", io));
		assert!(std::error::Error::source(&error).is_some());
	}

	#[test]
	fn convert_to_io_error() {
		let io: std::io::Error = Error::Closed.into();
		assert!(io.kind() == std::io::ErrorKind::NotConnected);
		let io: std::io::Error = Error::InvalidTimeout(-1).into();
		assert!(io.kind() == std::io::ErrorKind::InvalidInput);
		let io: std::io::Error = Error::Read(std::io::ErrorKind::TimedOut.into()).into();
		assert!(io.kind() == std::io::ErrorKind::TimedOut);
	}
}
