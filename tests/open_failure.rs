//! Kept in its own test binary: counting open descriptors is only reliable
//! when no other test opens files concurrently.

use assert2::{assert, let_assert};
use test_log::test;
use ttyline::{Error, SerialPort};

fn open_descriptors() -> usize {
	let_assert!(Ok(entries) = std::fs::read_dir("/proc/self/fd"));
	entries.count()
}

#[test]
fn failed_open_leaves_no_descriptor_behind() {
	let before = open_descriptors();
	for _ in 0..32 {
		let_assert!(Err(Error::Configure(_)) = SerialPort::open("/dev/null"));
		let_assert!(Err(Error::Open(_)) = SerialPort::open("/dev/this-serial-port-does-not-exist"));
	}
	assert!(open_descriptors() == before);
}
