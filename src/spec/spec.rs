//! The negotiated audio specification.

//---------------------------------------------------------------------------------------------------- Use
use crate::format::AudioFormat;
use std::time::Duration;

//---------------------------------------------------------------------------------------------------- AudioSpec
/// The negotiated contract between the application and the backend.
///
/// This is returned from [`Audio::open`](crate::Audio::open) and
/// stays fixed for as long as the device is open.
///
/// `size` and `silence` are derived from the other fields,
/// see [`AudioSpec::calculate`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
pub struct AudioSpec {
	/// Samples per second.
	pub frequency: u32,
	/// Sample format.
	pub format: AudioFormat,
	/// `1`, `2`, `4`, or `6`.
	pub channels: u8,
	/// Frames per buffer.
	pub samples: u16,
	/// Byte size of one buffer.
	pub size: u32,
	/// Byte value of silence.
	pub silence: u8,
}

impl AudioSpec {
	#[must_use]
	/// Create a spec and [`calculate`](Self::calculate) its derived fields.
	///
	/// ```rust
	/// # use hwaudio::{spec::*,format::*};
	/// let spec = AudioSpec::new(44_100, AudioFormat::S16LSB, 2, 1024);
	/// assert_eq!(spec.size, 4096);
	/// assert_eq!(spec.silence, 0);
	/// ```
	pub fn new(frequency: u32, format: AudioFormat, channels: u8, samples: u16) -> Self {
		let mut this = Self {
			frequency,
			format,
			channels,
			samples,
			size: 0,
			silence: 0,
		};
		this.calculate();
		this
	}

	/// Recompute `silence` and `size` from the other fields.
	///
	/// - `silence` is `0x80` for [`AudioFormat::U8`], else `0x00`
	/// - `size` is `bytes per sample * channels * samples`
	///
	/// This is idempotent, and is called again
	/// when a backend changes the sample count.
	pub fn calculate(&mut self) {
		self.silence = self.format.silence();
		self.size = (self.format.bit_width() as u32 / 8)
			* self.channels as u32
			* self.samples as u32;
	}

	#[inline]
	#[must_use]
	/// Bytes in a single frame (one sample per channel).
	pub const fn frame_size(&self) -> usize {
		self.format.bytes() * self.channels as usize
	}

	#[must_use]
	/// How long one buffer of this spec plays for, in whole milliseconds.
	///
	/// This is the pacing used when the backend has no buffer available.
	///
	/// ```rust
	/// # use hwaudio::{spec::*,format::*};
	/// let spec = AudioSpec::new(22_050, AudioFormat::U8, 1, 1024);
	/// assert_eq!(spec.buffer_duration().as_millis(), 46);
	/// ```
	pub fn buffer_duration(&self) -> Duration {
		if self.frequency == 0 {
			return Duration::ZERO;
		}
		Duration::from_millis(u64::from(self.samples) * 1000 / u64::from(self.frequency))
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use strum::IntoEnumIterator;

	#[test]
	fn calculate_idempotent() {
		for format in AudioFormat::iter() {
			for channels in [1, 2, 4, 6] {
				for samples in [1, 512, 1024, 4096, 32_768] {
					let mut spec = AudioSpec::new(44_100, format, channels, samples);
					let first = spec;
					spec.calculate();
					assert_eq!(spec, first);
					spec.calculate();
					assert_eq!(spec, first);
				}
			}
		}
	}

	#[test]
	fn silence() {
		for format in AudioFormat::iter() {
			let spec = AudioSpec::new(22_050, format, 2, 1024);
			if format == AudioFormat::U8 {
				assert_eq!(spec.silence, 0x80);
			} else {
				assert_eq!(spec.silence, 0x00);
			}
		}
	}

	#[test]
	fn size() {
		assert_eq!(AudioSpec::new(22_050, AudioFormat::U8,     1, 1024).size, 1024);
		assert_eq!(AudioSpec::new(22_050, AudioFormat::S8,     2, 1024).size, 2048);
		assert_eq!(AudioSpec::new(22_050, AudioFormat::S16MSB, 2, 1024).size, 4096);
		assert_eq!(AudioSpec::new(22_050, AudioFormat::U16LSB, 6, 4096).size, 49_152);
	}

	#[test]
	fn calculate_after_samples_change() {
		let mut spec = AudioSpec::new(48_000, AudioFormat::S16LSB, 2, 4096);
		spec.samples = 512;
		spec.calculate();
		assert_eq!(spec.size, 2048);
	}
}
