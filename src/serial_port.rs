use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::termios::{self, BaudRate, ControlFlags, FlushArg, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices, Termios};
use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{AsFd, AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::error::from_errno;
use crate::timeout::ReadTimeout;
use crate::Error;

/// The device opened by [`SerialPort::open_default()`].
pub const DEFAULT_DEVICE: &str = "/dev/ttyS0";

/// The fixed line speed of every [`SerialPort`].
pub const BAUD_RATE: u32 = 115_200;

/// A blocking serial port on a POSIX terminal device.
///
/// The line is configured once when the port is opened:
/// 115200 baud, 8 data bits, no parity, 1 stop bit, modem control lines ignored and the receiver enabled.
/// Only the read timeout can be changed afterwards.
///
/// A port is either open or closed.
/// Once closed it stays closed: every I/O operation fails with [`Error::Closed`].
/// The port is closed automatically when it is dropped.
///
/// The port performs no internal locking.
/// It can be moved between threads, but concurrent access must be serialized by the caller.
pub struct SerialPort {
	/// The path of the device, kept for diagnostics.
	path: PathBuf,

	/// The open device, or `None` once closed.
	file: Option<File>,

	/// The terminal configuration as last applied to the device.
	termios: Termios,

	/// The read timeout encoded in `termios`.
	timeout: ReadTimeout,
}

impl SerialPort {
	/// Open and configure a serial port.
	///
	/// The device is opened in non-blocking mode so that the open itself can not hang
	/// when no peer asserts the modem control lines.
	/// Pending input and output is discarded and the line is configured,
	/// after which the device is switched back to blocking mode.
	///
	/// The read timeout starts at 1 decisecond.
	///
	/// If any step fails, the device is closed again before the error is returned.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
		let path = path.as_ref();
		let file = std::fs::OpenOptions::new()
			.read(true)
			.write(true)
			.custom_flags(nix::libc::O_NOCTTY | nix::libc::O_NONBLOCK)
			.open(path)
			.map_err(Error::Open)?;

		let flags = fcntl(file.as_raw_fd(), FcntlArg::F_GETFL)
			.map(OFlag::from_bits_truncate)
			.map_err(|e| Error::NonBlockingMode(from_errno(e)))?;
		fcntl(file.as_raw_fd(), FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))
			.map_err(|e| Error::NonBlockingMode(from_errno(e)))?;

		// Stale data from a previous user of the device is of no interest.
		let _ = termios::tcflush(file.as_fd(), FlushArg::TCIOFLUSH);

		let timeout = ReadTimeout::DEFAULT;
		let mut config = termios::tcgetattr(file.as_fd()).map_err(|e| Error::Configure(from_errno(e)))?;
		raw_line_config(&mut config, timeout).map_err(|e| Error::Configure(from_errno(e)))?;
		termios::tcsetattr(file.as_fd(), SetArg::TCSANOW, &config).map_err(|e| Error::Configure(from_errno(e)))?;

		fcntl(file.as_raw_fd(), FcntlArg::F_SETFL(flags & !OFlag::O_NONBLOCK))
			.map_err(|e| Error::BlockingMode(from_errno(e)))?;

		debug!("opened serial port {} at {} baud", path.display(), BAUD_RATE);
		Ok(Self {
			path: path.to_owned(),
			file: Some(file),
			termios: config,
			timeout,
		})
	}

	/// Open the default serial port ([`DEFAULT_DEVICE`]).
	pub fn open_default() -> Result<Self, Error> {
		Self::open(DEFAULT_DEVICE)
	}

	/// Get the path of the device.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Check if the port is still open.
	pub fn is_open(&self) -> bool {
		self.file.is_some()
	}

	/// Get the raw file descriptor of the device, or `None` if the port is closed.
	pub fn raw_fd(&self) -> Option<RawFd> {
		self.file.as_ref().map(|file| file.as_raw_fd())
	}

	/// Close the port.
	///
	/// Closing an already closed port does nothing.
	pub fn close(&mut self) {
		if let Some(file) = self.file.take() {
			drop(file);
			debug!("closed serial port {}", self.path.display());
		}
	}

	/// Write data to the port.
	///
	/// This performs a single write on the device and returns the number of bytes written,
	/// which may be less than `data.len()`.
	pub fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
		let file = self.file_mut()?;
		let count = file.write(data).map_err(Error::Write)?;
		trace!("wrote {} of {} bytes: {:02X?}", count, data.len(), &data[..count]);
		Ok(count)
	}

	/// Read up to `max_bytes` bytes from the port.
	///
	/// This performs a single read on the device, blocking according to the current [timeout](Self::timeout).
	/// The result may hold fewer bytes than requested,
	/// including none at all if the timeout expired without data arriving.
	pub fn read(&mut self, max_bytes: usize) -> Result<Vec<u8>, Error> {
		let mut buffer = vec![0; max_bytes];
		let count = self.read_into(&mut buffer)?;
		buffer.truncate(count);
		Ok(buffer)
	}

	/// Read from the port into an existing buffer.
	///
	/// Behaves like [`Self::read()`] but returns the number of bytes stored at the start of `buffer`.
	pub fn read_into(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
		let file = self.file_mut()?;
		let count = file.read(buffer).map_err(Error::Read)?;
		trace!("read {} of {} bytes: {:02X?}", count, buffer.len(), &buffer[..count]);
		Ok(count)
	}

	/// Discard all data queued for input and output.
	pub fn flush(&mut self) -> Result<(), Error> {
		let file = self.file_mut()?;
		termios::tcflush(file.as_fd(), FlushArg::TCIOFLUSH).map_err(|e| Error::Flush(from_errno(e)))?;
		trace!("discarded input and output queues of {}", self.path.display());
		Ok(())
	}

	/// Get the read timeout in deciseconds, or [`INFINITE`](crate::INFINITE).
	pub fn timeout(&self) -> Result<i32, Error> {
		if self.file.is_none() {
			return Err(Error::Closed);
		}
		Ok(self.timeout.value())
	}

	/// Set the read timeout.
	///
	/// A finite `value` in deciseconds makes reads return as soon as any data is available,
	/// or after `value` tenths of a second with no data.
	/// Finite values must be in the range 0..=255.
	///
	/// [`INFINITE`](crate::INFINITE) makes reads block until at least one byte is available.
	///
	/// The new setting is applied to the device immediately.
	/// If that fails, the port still reports the new value from [`Self::timeout()`],
	/// but the device may be left with the previous setting.
	pub fn set_timeout(&mut self, value: i32) -> Result<(), Error> {
		if self.file.is_none() {
			return Err(Error::Closed);
		}
		let timeout = ReadTimeout::from_value(value)?;
		self.apply_timeout(timeout)?;
		debug!("read timeout of {} set to {:?}", self.path.display(), timeout.as_duration());
		Ok(())
	}

	/// Run a function with a temporary read timeout.
	///
	/// The previous timeout is restored afterwards, unless the function closed the port.
	pub fn with_timeout<F, T>(&mut self, value: i32, f: F) -> Result<T, Error>
	where
		F: FnOnce(&mut Self) -> T,
	{
		let previous = self.timeout;
		self.set_timeout(value)?;
		let result = f(self);
		if self.is_open() {
			self.apply_timeout(previous)?;
		}
		Ok(result)
	}

	fn file_mut(&mut self) -> Result<&mut File, Error> {
		self.file.as_mut().ok_or(Error::Closed)
	}

	fn apply_timeout(&mut self, timeout: ReadTimeout) -> Result<(), Error> {
		self.timeout = timeout;
		set_read_timeout(&mut self.termios, timeout);
		let file = self.file.as_ref().ok_or(Error::Closed)?;
		termios::tcsetattr(file.as_fd(), SetArg::TCSANOW, &self.termios).map_err(|e| Error::Configure(from_errno(e)))
	}
}

/// Reset the whole configuration and set up a raw 8N1 line.
fn raw_line_config(config: &mut Termios, timeout: ReadTimeout) -> nix::Result<()> {
	config.input_flags = InputFlags::empty();
	config.output_flags = OutputFlags::empty();
	config.local_flags = LocalFlags::empty();
	config.control_flags = ControlFlags::CS8 | ControlFlags::CLOCAL | ControlFlags::CREAD;
	config.control_chars.fill(0);

	#[cfg(feature = "software-flow-control")]
	{
		config.input_flags = InputFlags::IXON | InputFlags::IXOFF;
		config.control_chars[SpecialCharacterIndices::VSTART as usize] = 0x11;
		config.control_chars[SpecialCharacterIndices::VSTOP as usize] = 0x13;
	}

	#[cfg(feature = "hardware-flow-control")]
	{
		config.control_flags |= ControlFlags::CRTSCTS;
		config.control_chars[SpecialCharacterIndices::VSTART as usize] = nix::libc::_POSIX_VDISABLE;
		config.control_chars[SpecialCharacterIndices::VSTOP as usize] = nix::libc::_POSIX_VDISABLE;
	}

	termios::cfsetspeed(config, BaudRate::B115200)?;
	set_read_timeout(config, timeout);
	Ok(())
}

fn set_read_timeout(config: &mut Termios, timeout: ReadTimeout) {
	config.control_chars[SpecialCharacterIndices::VMIN as usize] = timeout.min_bytes();
	config.control_chars[SpecialCharacterIndices::VTIME as usize] = timeout.deciseconds();
}

impl Drop for SerialPort {
	fn drop(&mut self) {
		self.close();
	}
}

impl std::fmt::Display for SerialPort {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "SerialPort({:?})", self.path.display().to_string())
	}
}

impl std::fmt::Debug for SerialPort {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SerialPort")
			.field("path", &self.path)
			.field("fd", &self.raw_fd())
			.field("timeout", &self.timeout.as_duration())
			.finish_non_exhaustive()
	}
}

impl std::io::Read for SerialPort {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		Ok(self.read_into(buf)?)
	}
}

/// Byte stream access to the port.
///
/// [`std::io::Write::flush()`] has nothing to do since writes are not buffered.
/// It does not discard the terminal queues like [`SerialPort::flush()`] does.
impl std::io::Write for SerialPort {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		Ok(SerialPort::write(self, buf)?)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		self.file_mut()?;
		Ok(())
	}
}
