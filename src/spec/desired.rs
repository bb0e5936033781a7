//! The application's requested specification.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	format::AudioFormat,
	spec::AudioCallback,
};
use std::fmt;

//---------------------------------------------------------------------------------------------------- DesiredSpec
/// What the application wants the device to be opened with.
///
/// Every `None` field is filled in when the device is opened,
/// first from [`Config`](crate::config::Config), then from defaults:
///
/// | Field       | Default |
/// |-------------|---------|
/// | `frequency` | [`DEFAULT_FREQUENCY`](crate::spec::DEFAULT_FREQUENCY)
/// | `format`    | [`AudioFormat::S16SYS`]
/// | `channels`  | [`DEFAULT_CHANNELS`](crate::spec::DEFAULT_CHANNELS)
/// | `samples`   | next power of two holding ~46ms of audio
///
/// The `callback` has no default, opening without one fails.
///
/// ```rust
/// # use hwaudio::{spec::*,format::*};
/// let desired = DesiredSpec::new()
///     .frequency(44_100)
///     .format(AudioFormat::S16LSB)
///     .channels(2)
///     .callback(|stream: &mut [u8]| stream.fill(0));
/// ```
#[derive(Default)]
pub struct DesiredSpec {
	/// Samples per second.
	pub frequency: Option<u32>,
	/// Sample format.
	pub format: Option<AudioFormat>,
	/// Channel count.
	pub channels: Option<u8>,
	/// Frames per buffer.
	pub samples: Option<u16>,
	/// The fill callback.
	pub callback: Option<Box<dyn AudioCallback>>,
}

impl DesiredSpec {
	#[must_use]
	/// A spec with every field unset.
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	/// Set the sample rate.
	pub fn frequency(mut self, frequency: u32) -> Self {
		self.frequency = Some(frequency);
		self
	}

	#[must_use]
	/// Set the sample format.
	pub fn format(mut self, format: AudioFormat) -> Self {
		self.format = Some(format);
		self
	}

	#[must_use]
	/// Set the channel count.
	pub fn channels(mut self, channels: u8) -> Self {
		self.channels = Some(channels);
		self
	}

	#[must_use]
	/// Set the frames per buffer.
	pub fn samples(mut self, samples: u16) -> Self {
		self.samples = Some(samples);
		self
	}

	#[must_use]
	/// Set the fill callback.
	pub fn callback<C: AudioCallback>(mut self, callback: C) -> Self {
		self.callback = Some(Box::new(callback));
		self
	}
}

impl fmt::Debug for DesiredSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DesiredSpec")
			.field("frequency", &self.frequency)
			.field("format", &self.format)
			.field("channels", &self.channels)
			.field("samples", &self.samples)
			.field("callback", &self.callback.as_ref().map(|_| "AudioCallback"))
			.finish()
	}
}
