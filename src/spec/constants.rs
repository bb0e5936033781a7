//! Defaults picked for unset [`DesiredSpec`](crate::spec::DesiredSpec) fields.

//---------------------------------------------------------------------------------------------------- Constants
/// Sample rate used when none was requested.
pub const DEFAULT_FREQUENCY: u32 = 22_050;

/// Channel count used when none was requested.
pub const DEFAULT_CHANNELS: u8 = 2;

/// The buffer length (in milliseconds) the default sample count aims for.
pub const DEFAULT_BUFFER_MILLISECONDS: u32 = 46;

/// The largest default sample count.
///
/// This is the largest power of two that fits in a `u16`.
pub const MAX_SAMPLES: u16 = 32_768;

/// The channel counts that can be opened.
///
/// Mono, stereo, quad, and 5.1.
pub const SUPPORTED_CHANNELS: [u8; 4] = [1, 2, 4, 6];

//---------------------------------------------------------------------------------------------------- Free functions
/// The default sample count for `frequency`.
///
/// This is the next power of two that holds
/// [`DEFAULT_BUFFER_MILLISECONDS`] of audio.
pub(crate) const fn default_samples(frequency: u32) -> u16 {
	let samples = (frequency / 1000) * DEFAULT_BUFFER_MILLISECONDS;
	let mut power2: u32 = 1;
	while power2 < samples && power2 < MAX_SAMPLES as u32 {
		power2 *= 2;
	}
	power2 as u16
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn default_samples_is_power_of_two() {
		for f in [0, 1, 999, 8_000, 11_025, 22_050, 44_100, 48_000, 96_000, 192_000, u32::MAX] {
			let s = default_samples(f);
			assert!(s.is_power_of_two(), "{f} -> {s}");
			assert!(s <= MAX_SAMPLES);
		}
	}

	#[test]
	fn default_samples_46ms() {
		// 22 * 46 = 1012
		assert_eq!(default_samples(22_050), 1024);
		// 44 * 46 = 2024
		assert_eq!(default_samples(44_100), 2048);
		// 48 * 46 = 2208
		assert_eq!(default_samples(48_000), 4096);
		// 8 * 46 = 368
		assert_eq!(default_samples(8_000), 512);
		assert_eq!(default_samples(500), 1);
		assert_eq!(default_samples(u32::MAX), MAX_SAMPLES);
	}
}
