//! Wall clock used to time search debouncing

use std::time::Duration;

/// Time since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now() -> Duration {
	Duration::from_secs_f64(js_sys::Date::now() / 1000.0)
}

/// Time since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> Duration {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.unwrap_or_default()
}
