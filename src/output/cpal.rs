//! `cpal` audio output.
//!
//! The system's default output device through `cpal`.
//!
//! `cpal` calls us from its own audio callback, so this backend is
//! [`Drive::SelfDriven`]: the mixing thread is never started and the
//! [`Fill`] pipeline is called from inside `cpal`'s data callback.
//!
//! `cpal::Stream` is not `Send` on every platform, so the stream
//! lives on its own small thread for as long as the device is open.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	error::OutputError,
	format::AudioFormat,
	macros::{debug2,error2,info2,warn2},
	output::{Backend,DeviceBuffer,Drive,Fill},
	spec::{AudioSpec,SUPPORTED_CHANNELS},
};
use cpal::{
	traits::{DeviceTrait,HostTrait,StreamTrait},
	BufferSize,SampleFormat,StreamConfig,SupportedBufferSize,SupportedStreamConfigRange,
};
use crossbeam::channel::Sender;
use std::{
	borrow::Cow,
	thread::JoinHandle,
};

//---------------------------------------------------------------------------------------------------- Cpal
#[derive(Debug)]
pub(crate) struct Cpal {
	/// What `open()` negotiated.
	config: Option<(StreamConfig, SampleFormat)>,
	/// Dropping/sending tells the stream thread to exit.
	close: Option<Sender<()>>,
	/// The thread holding the `cpal::Stream`.
	thread: Option<JoinHandle<()>>,
}

impl Cpal {
	pub(crate) const fn new() -> Self {
		Self {
			config: None,
			close: None,
			thread: None,
		}
	}

	/// Is there a default output device?
	pub(crate) fn available() -> bool {
		cpal::default_host().default_output_device().is_some()
	}
}

/// `cpal` samples are always native endian.
const fn sample_format(format: AudioFormat) -> Option<SampleFormat> {
	if !format.is_native_endian() {
		return None;
	}

	Some(match format {
		AudioFormat::U8 => SampleFormat::U8,
		AudioFormat::S8 => SampleFormat::I8,
		AudioFormat::S16LSB | AudioFormat::S16MSB => SampleFormat::I16,
		AudioFormat::U16LSB | AudioFormat::U16MSB => SampleFormat::U16,
	})
}

/// Walk the format candidates against what the device supports.
///
/// The exact channel count is preferred, any other supported
/// channel count is accepted. The sample rate is clamped into
/// the supported range.
fn negotiate(
	ranges: &[SupportedStreamConfigRange],
	spec: &mut AudioSpec,
) -> Result<(StreamConfig, SampleFormat), OutputError> {
	// Some format was there, only with channel counts we can't do.
	let mut format_matched = false;

	for format in spec.format.candidates() {
		let Some(sample_format) = sample_format(format) else {
			continue;
		};

		let mut matching = ranges.iter().filter(|r| r.sample_format() == sample_format);
		format_matched |= matching.clone().next().is_some();
		let exact = matching.clone().find(|r| r.channels() == u16::from(spec.channels));
		let Some(range) = exact.or_else(|| matching.find(|r| {
			u8::try_from(r.channels()).is_ok_and(|c| SUPPORTED_CHANNELS.contains(&c))
		})) else {
			continue;
		};

		spec.format = format;
		spec.channels = range.channels() as u8;
		spec.frequency = spec.frequency.clamp(range.min_sample_rate().0, range.max_sample_rate().0);

		let buffer_size = match range.buffer_size() {
			SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&u32::from(spec.samples)) => {
				BufferSize::Fixed(u32::from(spec.samples))
			},
			_ => BufferSize::Default,
		};

		let config = StreamConfig {
			channels: range.channels(),
			sample_rate: cpal::SampleRate(spec.frequency),
			buffer_size,
		};

		return Ok((config, sample_format));
	}

	if format_matched {
		Err(OutputError::InvalidChannels)
	} else {
		Err(OutputError::InvalidFormat)
	}
}

//---------------------------------------------------------------------------------------------------- `Backend` Impl
impl Backend for Cpal {
	#[cold]
	#[inline(never)]
	fn open(&mut self, spec: &mut AudioSpec) -> Result<Drive, OutputError> {
		debug2!("Cpal - open(), desired: {spec:?}");

		let device = cpal::default_host()
			.default_output_device()
			.ok_or(OutputError::DeviceUnavailable)?;

		let ranges: Vec<SupportedStreamConfigRange> = device.supported_output_configs()?.collect();
		let negotiated = negotiate(&ranges, spec)?;

		debug2!("Cpal - open(), obtained: {spec:?}, config: {negotiated:?}");
		self.config = Some(negotiated);
		Ok(Drive::SelfDriven)
	}

	fn buffer(&mut self) -> DeviceBuffer<'_> {
		DeviceBuffer::Fallback
	}

	fn play(&mut self) -> Result<(), OutputError> {
		Ok(())
	}

	fn wait(&mut self) -> Result<(), OutputError> {
		Ok(())
	}

	#[cold]
	#[inline(never)]
	fn start(&mut self, mut fill: Fill) -> Result<(), OutputError> {
		let Some((config, sample_format)) = self.config.clone() else {
			return Err(OutputError::DeviceUnavailable);
		};

		let (ready_send, ready_recv) = crossbeam::channel::bounded::<Result<(), OutputError>>(1);
		let (close_send, close_recv) = crossbeam::channel::bounded::<()>(1);

		let thread = std::thread::Builder::new()
			.name("Cpal".into())
			.spawn(move || {
				let stream = (|| {
					let device = cpal::default_host()
						.default_output_device()
						.ok_or(OutputError::DeviceUnavailable)?;

					let stream = device.build_output_stream_raw(
						&config,
						sample_format,
						move |data: &mut cpal::Data, _: &cpal::OutputCallbackInfo| fill.fill(data.bytes_mut()),
						|error| error2!("Cpal - stream error: {error}"),
						None,
					)?;
					stream.play()?;
					Ok::<_, OutputError>(stream)
				})();

				match stream {
					Ok(stream) => {
						let _ = ready_send.send(Ok(()));
						// Hold the stream until closed.
						let _ = close_recv.recv();
						drop(stream);
					},
					Err(e) => {
						let _ = ready_send.send(Err(e));
					},
				}
			})?;

		match ready_recv.recv() {
			Ok(Ok(())) => {
				info2!("Cpal - stream started");
				self.close = Some(close_send);
				self.thread = Some(thread);
				Ok(())
			},
			Ok(Err(e)) => {
				let _ = thread.join();
				Err(e)
			},
			Err(_) => {
				let _ = thread.join();
				Err(OutputError::DeviceUnavailable)
			},
		}
	}

	#[cold]
	#[inline(never)]
	fn close(&mut self) {
		debug2!("Cpal - close()");

		if let Some(close) = self.close.take() {
			let _ = close.send(());
		}
		if let Some(thread) = self.thread.take() {
			if thread.join().is_err() {
				warn2!("Cpal - stream thread panicked");
			}
		}
		self.config = None;
	}
}

impl Drop for Cpal {
	fn drop(&mut self) {
		self.close();
	}
}

//---------------------------------------------------------------------------------------------------- Error re-map
impl From<cpal::SupportedStreamConfigsError> for OutputError {
	fn from(error: cpal::SupportedStreamConfigsError) -> Self {
		use cpal::SupportedStreamConfigsError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::InvalidArgument => Self::InvalidFormat,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::BuildStreamError> for OutputError {
	fn from(error: cpal::BuildStreamError) -> Self {
		use cpal::BuildStreamError as E;
		match error {
			E::DeviceNotAvailable | E::InvalidArgument | E::StreamIdOverflow => Self::DeviceUnavailable,
			E::StreamConfigNotSupported => Self::InvalidFormat,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::PlayStreamError> for OutputError {
	fn from(error: cpal::PlayStreamError) -> Self {
		use cpal::PlayStreamError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn range(channels: u16, format: SampleFormat) -> SupportedStreamConfigRange {
		SupportedStreamConfigRange::new(
			channels,
			cpal::SampleRate(8_000),
			cpal::SampleRate(48_000),
			SupportedBufferSize::Range { min: 64, max: 4096 },
			format,
		)
	}

	#[test]
	fn exact_match() {
		let ranges = [range(2, SampleFormat::I16)];
		let mut spec = AudioSpec::new(44_100, AudioFormat::S16SYS, 2, 1024);
		let (config, format) = negotiate(&ranges, &mut spec).unwrap();
		assert_eq!(format, SampleFormat::I16);
		assert_eq!(config.channels, 2);
		assert_eq!(config.buffer_size, BufferSize::Fixed(1024));
		assert_eq!(spec.format, AudioFormat::S16SYS);
	}

	#[test]
	fn falls_back_through_candidates() {
		// U8 asked for, only 16-bit signed available.
		let ranges = [range(2, SampleFormat::I16), range(2, SampleFormat::F32)];
		let mut spec = AudioSpec::new(22_050, AudioFormat::U8, 2, 1024);
		let (_, format) = negotiate(&ranges, &mut spec).unwrap();
		assert_eq!(format, SampleFormat::I16);
		assert_eq!(spec.format, AudioFormat::S16SYS);
	}

	#[test]
	fn channels_and_rate_adjusted() {
		let ranges = [range(6, SampleFormat::I16), range(3, SampleFormat::I16)];
		let mut spec = AudioSpec::new(96_000, AudioFormat::S16SYS, 2, 8192);
		let (config, _) = negotiate(&ranges, &mut spec).unwrap();
		assert_eq!(spec.channels, 6);
		assert_eq!(spec.frequency, 48_000);
		assert_eq!(config.buffer_size, BufferSize::Default);
	}

	#[test]
	fn nothing_usable() {
		let ranges = [range(2, SampleFormat::F32)];
		let mut spec = AudioSpec::new(44_100, AudioFormat::S16SYS, 2, 1024);
		assert!(matches!(negotiate(&ranges, &mut spec), Err(OutputError::InvalidFormat)));
	}

	#[test]
	fn no_usable_channels() {
		let ranges = [range(3, SampleFormat::I16), range(8, SampleFormat::I16)];
		let mut spec = AudioSpec::new(44_100, AudioFormat::S16SYS, 2, 1024);
		assert!(matches!(negotiate(&ranges, &mut spec), Err(OutputError::InvalidChannels)));
	}
}
