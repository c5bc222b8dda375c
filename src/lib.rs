//! A minimal blocking serial line for POSIX terminals.
//!
//! The [`SerialPort`] type opens a terminal device, configures it for raw 8N1 communication at 115200 baud,
//! and exposes single-call [`read`](SerialPort::read) and [`write`](SerialPort::write) operations.
//!
//! Reads block according to the configured read timeout.
//! The timeout is expressed in tenths of a second,
//! or as the special value [`INFINITE`] to block until at least one byte is available.
//!
//! ```no_run
//! # fn main() -> Result<(), ttyline::Error> {
//! let mut port = ttyline::SerialPort::open("/dev/ttyUSB0")?;
//! port.write(b"PING")?;
//! port.set_timeout(5)?;
//! let response = port.read(4)?;
//! println!("{:02X?}", response);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod log;

mod error;
mod serial_port;
mod timeout;

pub use error::Error;
pub use serial_port::SerialPort;
pub use serial_port::BAUD_RATE;
pub use serial_port::DEFAULT_DEVICE;
pub use timeout::INFINITE;
