use std::time::Duration;

use crate::Error;

/// Timeout value that makes reads block until at least one byte is available.
pub const INFINITE: i32 = i32::MAX;

/// The read timeout as stored in the `VMIN` and `VTIME` terminal control characters.
///
/// Only two combinations are ever produced:
/// * `min_bytes == 0`: a read returns as soon as any data is available,
///   or after `deciseconds` tenths of a second with no data at all.
/// * `min_bytes == 1, deciseconds == 0`: a read blocks until at least one byte is available.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct ReadTimeout {
	min_bytes: u8,
	deciseconds: u8,
}

impl ReadTimeout {
	/// The timeout applied when a port is opened: return after 0.1 seconds.
	pub const DEFAULT: Self = Self {
		min_bytes: 0,
		deciseconds: 1,
	};

	const BLOCK_FOREVER: Self = Self {
		min_bytes: 1,
		deciseconds: 0,
	};

	/// Decode a public timeout value.
	///
	/// [`INFINITE`] selects blocking mode, anything else is a timeout in deciseconds.
	pub fn from_value(value: i32) -> Result<Self, Error> {
		if value == INFINITE {
			return Ok(Self::BLOCK_FOREVER);
		}
		let deciseconds = u8::try_from(value).map_err(|_| Error::InvalidTimeout(value))?;
		Ok(Self {
			min_bytes: 0,
			deciseconds,
		})
	}

	/// Encode the timeout as a public value.
	pub fn value(self) -> i32 {
		if self.min_bytes == 0 {
			self.deciseconds.into()
		} else {
			INFINITE
		}
	}

	/// The timeout as duration, or `None` if reads block until data arrives.
	pub fn as_duration(self) -> Option<Duration> {
		if self.min_bytes == 0 {
			Some(Duration::from_millis(u64::from(self.deciseconds) * 100))
		} else {
			None
		}
	}

	/// The value for the `VMIN` control character.
	pub fn min_bytes(self) -> u8 {
		self.min_bytes
	}

	/// The value for the `VTIME` control character.
	pub fn deciseconds(self) -> u8 {
		self.deciseconds
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::{assert, let_assert};

	#[test]
	fn default_is_one_decisecond() {
		assert!(ReadTimeout::DEFAULT.min_bytes() == 0);
		assert!(ReadTimeout::DEFAULT.deciseconds() == 1);
		assert!(ReadTimeout::DEFAULT.value() == 1);
		assert!(ReadTimeout::DEFAULT.as_duration() == Some(Duration::from_millis(100)));
	}

	#[test]
	fn infinite_selects_minimum_bytes_mode() {
		let_assert!(Ok(timeout) = ReadTimeout::from_value(INFINITE));
		assert!(timeout.min_bytes() == 1);
		assert!(timeout.deciseconds() == 0);
		assert!(timeout.value() == INFINITE);
		assert!(timeout.as_duration() == None);
	}

	#[test]
	fn finite_values_survive_encoding() {
		for value in [0, 1, 7, 100, 255] {
			let_assert!(Ok(timeout) = ReadTimeout::from_value(value));
			assert!(timeout.min_bytes() == 0);
			assert!(timeout.value() == value);
		}
	}

	#[test]
	fn zero_is_a_poll_not_infinite() {
		let_assert!(Ok(timeout) = ReadTimeout::from_value(0));
		assert!(timeout.as_duration() == Some(Duration::ZERO));
	}

	#[test]
	fn reject_unrepresentable_values() {
		let_assert!(Err(Error::InvalidTimeout(-1)) = ReadTimeout::from_value(-1));
		let_assert!(Err(Error::InvalidTimeout(256)) = ReadTimeout::from_value(256));
		let_assert!(Err(Error::InvalidTimeout(_)) = ReadTimeout::from_value(INFINITE - 1));
	}
}
