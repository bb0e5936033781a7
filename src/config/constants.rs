//! Configuration keys and defaults.

//---------------------------------------------------------------------------------------------------- Keys
/// Name of the backend to select.
pub const ENV_DRIVER: &str = "AUDIODEV_DRIVER";
/// Desired sample rate.
pub const ENV_FREQUENCY: &str = "AUDIODEV_FREQUENCY";
/// Desired sample format, `[U|S]<8|16>[LSB|MSB|SYS]`.
pub const ENV_FORMAT: &str = "AUDIODEV_FORMAT";
/// Desired channel count.
pub const ENV_CHANNELS: &str = "AUDIODEV_CHANNELS";
/// Desired frames per buffer.
pub const ENV_SAMPLES: &str = "AUDIODEV_SAMPLES";
/// Output file of the `disk` backend.
pub const ENV_DISK_FILE: &str = "AUDIODEV_DISK_FILE";
/// Milliseconds the `disk` backend waits per buffer.
pub const ENV_DISK_DELAY: &str = "AUDIODEV_DISK_DELAY";

//---------------------------------------------------------------------------------------------------- Defaults
/// How many consecutive `play()`/`wait()` failures
/// the mixing thread tolerates before it stops.
pub const DEFAULT_MAX_BACKEND_FAILURES: u32 = 16;

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keys_share_prefix() {
		for key in [
			ENV_DRIVER, ENV_FREQUENCY, ENV_FORMAT, ENV_CHANNELS,
			ENV_SAMPLES, ENV_DISK_FILE, ENV_DISK_DELAY,
		] {
			assert!(key.starts_with("AUDIODEV_"), "{key}");
		}
	}
}
