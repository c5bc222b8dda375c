use assert2::let_assert;
use nix::fcntl::OFlag;
use nix::pty::{grantpt, posix_openpt, ptsname_r, unlockpt, PtyMaster};

/// A pseudo-terminal pair: tests talk to the master, the serial port opens the slave by path.
pub struct Pty {
	pub master: PtyMaster,
	pub slave_path: String,
}

pub fn open_pty() -> Pty {
	let_assert!(Ok(master) = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY));
	let_assert!(Ok(()) = grantpt(&master));
	let_assert!(Ok(()) = unlockpt(&master));
	let_assert!(Ok(slave_path) = ptsname_r(&master));
	Pty { master, slave_path }
}

/// Open a pseudo-terminal and a serial port on its slave side.
pub fn open_port() -> (Pty, ttyline::SerialPort) {
	let pty = open_pty();
	let_assert!(Ok(port) = ttyline::SerialPort::open(&pty.slave_path));
	(pty, port)
}
