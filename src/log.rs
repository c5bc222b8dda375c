#[cfg(feature = "log")]
#[allow(unused)]
#[macro_use]
mod log {
	macro_rules! trace {
		($($args:tt)*) => { ::log::trace!($($args)*) }
	}

	macro_rules! debug {
		($($args:tt)*) => { ::log::debug!($($args)*) }
	}

	macro_rules! warn {
		($($args:tt)*) => { ::log::warn!($($args)*) }
	}
}

#[cfg(not(feature = "log"))]
#[allow(unused)]
#[macro_use]
mod log {
	macro_rules! trace {
		($($args:tt)*) => {{ let _ = format_args!($($args)*); }}
	}

	macro_rules! debug {
		($($args:tt)*) => {{ let _ = format_args!($($args)*); }}
	}

	macro_rules! warn {
		($($args:tt)*) => {{ let _ = format_args!($($args)*); }}
	}
}
