//! The conversion context.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	convert::sample::{decode,encode},
	error::OpenError,
	format::AudioFormat,
	macros::{debug2,error2},
	spec::AudioSpec,
};
use rubato::{FftFixedOut,Resampler};
use std::fmt;

//---------------------------------------------------------------------------------------------------- AudioCvt
/// Converts the callback's format into one buffer of the device's.
///
/// The callback is always handed exactly [`AudioCvt::len`] bytes, and
/// every [`AudioCvt::convert_with`] produces exactly [`AudioCvt::len_cvt`]
/// bytes, the device spec's `size`.
///
/// Formats are widened to signed 16-bit and channel-mapped. If the sample
/// rates differ the frames are queued and resampled with `rubato`, the
/// callback is then called as often as the resampler needs input, which
/// is once per device buffer on average.
///
/// ```rust
/// # use hwaudio::{convert::*,spec::*,format::*};
/// let src = AudioSpec::new(44_100, AudioFormat::U8, 1, 512);
/// let dst = AudioSpec::new(44_100, AudioFormat::S16LSB, 2, 1024);
///
/// let mut cvt = AudioCvt::build(&src, &dst).unwrap();
/// assert!(cvt.needed());
/// cvt.allocate().unwrap();
///
/// // The callback writes 1024 mono U8 frames...
/// assert_eq!(cvt.len(), 1024);
/// assert!(cvt.convert_with(|stream| stream.fill(0x80)));
///
/// // ...and the device gets 1024 stereo S16 frames.
/// assert_eq!(cvt.len_cvt(), 4096);
/// assert!(cvt.converted().iter().all(|b| *b == 0));
/// ```
pub struct AudioCvt {
	needed: bool,
	src: AudioSpec,
	dst: AudioSpec,

	/// Source frames per callback.
	src_frames: usize,
	len: usize,
	len_cvt: usize,
	len_ratio: f64,
	len_mult: usize,

	/// `len * len_mult` bytes, empty until [`AudioCvt::allocate`].
	buf: Vec<u8>,
	/// Decoded source samples.
	decoded: Vec<i16>,
	/// Decoded samples after channel mapping.
	mapped: Vec<i16>,
	/// `Some` if the sample rates differ.
	rate: Option<Rate>,
}

/// Sample rate conversion state.
struct Rate {
	resampler: FftFixedOut<f32>,
	/// Channel-mapped frames waiting for the resampler, one queue per channel.
	queue: Vec<Vec<f32>>,
	wave_in: Vec<Vec<f32>>,
	wave_out: Vec<Vec<f32>>,
}

impl AudioCvt {
	#[cold]
	#[inline(never)]
	/// Plan a conversion from `src` (what the callback produces)
	/// to `dst` (what the device was opened with).
	///
	/// Only `dst.samples` and `dst.size` matter for buffer geometry,
	/// `src.samples` is ignored.
	///
	/// # Errors
	/// [`OpenError::UnsupportedFormat`] if either side has a zero
	/// frequency or zero channels, or the resampler can't be built.
	pub fn build(src: &AudioSpec, dst: &AudioSpec) -> Result<Self, OpenError> {
		if src.frequency == 0 || dst.frequency == 0 || src.channels == 0 || dst.channels == 0 {
			return Err(OpenError::UnsupportedFormat(format!(
				"cannot convert {}Hz/{}ch {} into {}Hz/{}ch {}",
				src.frequency, src.channels, src.format,
				dst.frequency, dst.channels, dst.format,
			)));
		}

		let needed = src.format != dst.format
			|| src.channels != dst.channels
			|| src.frequency != dst.frequency;

		// Enough source frames to cover every device frame.
		let dst_frames = u64::from(dst.samples);
		let dst_rate = u64::from(dst.frequency);
		let src_frames = ((dst_frames * u64::from(src.frequency) + dst_rate - 1) / dst_rate).max(1) as usize;

		let len = src_frames * src.frame_size();
		let len_cvt = dst.samples as usize * dst.frame_size();
		let len_ratio = len_cvt as f64 / len as f64;
		let len_mult = ((len_cvt + len - 1) / len).max(1);

		let rate = if src.frequency == dst.frequency {
			None
		} else {
			let resampler = FftFixedOut::<f32>::new(
				src.frequency as usize,
				dst.frequency as usize,
				dst.samples as usize,
				1,
				dst.channels as usize,
			).map_err(|e| OpenError::UnsupportedFormat(e.to_string()))?;

			Some(Rate {
				resampler,
				queue: Vec::new(),
				wave_in: Vec::new(),
				wave_out: Vec::new(),
			})
		};

		debug2!("AudioCvt - {} -> {}, len: {len}, len_cvt: {len_cvt}, len_mult: {len_mult}, needed: {needed}, resample: {}", src.format, dst.format, rate.is_some());

		Ok(Self {
			needed,
			src: *src,
			dst: *dst,
			src_frames,
			len,
			len_cvt,
			len_ratio,
			len_mult,
			buf: Vec::new(),
			decoded: Vec::new(),
			mapped: Vec::new(),
			rate,
		})
	}

	#[cold]
	#[inline(never)]
	/// Allocate the conversion buffers, `len * len_mult` bytes for the callback.
	///
	/// Calling this again after a successful allocation does nothing.
	///
	/// # Errors
	/// [`OpenError::OutOfMemory`] if any buffer can't be reserved.
	pub fn allocate(&mut self) -> Result<(), OpenError> {
		if !self.buf.is_empty() {
			return Ok(());
		}

		let bytes = self.len * self.len_mult;
		let src_samples = self.src_frames * self.src.channels as usize;
		let mapped_samples = self.src_frames * self.dst.channels as usize;

		self.buf.try_reserve_exact(bytes).map_err(|_| OpenError::OutOfMemory)?;
		self.decoded.try_reserve_exact(src_samples).map_err(|_| OpenError::OutOfMemory)?;
		self.mapped.try_reserve_exact(mapped_samples).map_err(|_| OpenError::OutOfMemory)?;

		if let Some(rate) = self.rate.as_mut() {
			// The queue is topped up by whole callbacks while
			// it holds less than the resampler's next chunk.
			let capacity = rate.resampler.input_frames_max() + self.src_frames;
			let mut queue = Vec::new();
			queue.try_reserve_exact(self.dst.channels as usize).map_err(|_| OpenError::OutOfMemory)?;
			for _ in 0..self.dst.channels {
				let mut channel = Vec::new();
				channel.try_reserve_exact(capacity).map_err(|_| OpenError::OutOfMemory)?;
				queue.push(channel);
			}
			rate.queue = queue;
			rate.wave_in = rate.resampler.input_buffer_allocate(true);
			rate.wave_out = rate.resampler.output_buffer_allocate(true);
		}

		self.buf.resize(bytes, self.src.silence);
		self.decoded.resize(src_samples, 0);
		self.mapped.resize(mapped_samples, 0);
		Ok(())
	}

	#[inline]
	#[must_use]
	/// Does anything actually differ between the two sides?
	pub const fn needed(&self) -> bool {
		self.needed
	}

	#[inline]
	#[must_use]
	/// The callback's format.
	pub const fn src_format(&self) -> AudioFormat {
		self.src.format
	}

	#[inline]
	#[must_use]
	/// Silence in the callback's format.
	pub const fn src_silence(&self) -> u8 {
		self.src.silence
	}

	#[inline]
	#[must_use]
	#[allow(clippy::len_without_is_empty)]
	/// Bytes handed to the callback per call.
	pub const fn len(&self) -> usize {
		self.len
	}

	#[inline]
	#[must_use]
	/// Bytes produced per conversion, the device spec's `size`.
	pub const fn len_cvt(&self) -> usize {
		self.len_cvt
	}

	#[inline]
	#[must_use]
	/// `len_cvt / len`.
	pub const fn len_ratio(&self) -> f64 {
		self.len_ratio
	}

	#[inline]
	#[must_use]
	/// How many times larger than `len` the buffer is.
	pub const fn len_mult(&self) -> usize {
		self.len_mult
	}

	#[inline]
	#[must_use]
	/// The output of the last [`AudioCvt::convert_with`], [`AudioCvt::len_cvt`] bytes.
	pub fn converted(&self) -> &[u8] {
		&self.buf[..self.len_cvt.min(self.buf.len())]
	}

	/// Produce and convert one device buffer.
	///
	/// `produce` is handed the first [`AudioCvt::len`] bytes of the buffer
	/// to fill in the callback's format. It is called exactly once unless
	/// the sample rates differ, then it is called as many times as the
	/// resampler needs (zero or more).
	///
	/// Returns `false` without calling `produce` if the
	/// buffer isn't allocated, [`AudioCvt::converted`] is empty then.
	pub fn convert_with(&mut self, mut produce: impl FnMut(&mut [u8])) -> bool {
		if self.buf.is_empty() {
			return false;
		}

		let Self { needed, src, dst, len, len_cvt, buf, decoded, mapped, rate, .. } = self;

		if !*needed {
			produce(&mut buf[..*len]);
			return true;
		}

		let dst_format = dst.format;
		let dst_width  = dst_format.bytes();
		let dst_ch     = dst.channels as usize;

		let Some(rate) = rate.as_mut() else {
			produce(&mut buf[..*len]);
			decode_mapped(src, dst_ch, &buf[..*len], decoded, mapped);

			for (sample, bytes) in mapped.iter().zip(buf[..*len_cvt].chunks_exact_mut(dst_width)) {
				encode(dst_format, *sample, bytes);
			}
			return true;
		};

		// Queue callbacks until the resampler has a chunk.
		let need = rate.resampler.input_frames_next();
		while rate.queue.first().map_or(0, Vec::len) < need {
			produce(&mut buf[..*len]);
			decode_mapped(src, dst_ch, &buf[..*len], decoded, mapped);

			for frame in mapped.chunks_exact(dst_ch) {
				for (queue, sample) in rate.queue.iter_mut().zip(frame) {
					queue.push(f32::from(*sample) / 32768.0);
				}
			}
		}

		for (wave, queue) in rate.wave_in.iter_mut().zip(rate.queue.iter_mut()) {
			wave[..need].copy_from_slice(&queue[..need]);
			queue.drain(..need);
		}

		let written = match rate.resampler.process_into_buffer(&rate.wave_in, &mut rate.wave_out, None) {
			Ok((_, written)) => written,
			Err(e) => {
				error2!("AudioCvt - resampling failed: {e}");
				0
			},
		};

		// Anything the resampler didn't write is silence.
		for (frame, out) in buf[..*len_cvt].chunks_exact_mut(dst_ch * dst_width).enumerate() {
			for (ch, bytes) in out.chunks_exact_mut(dst_width).enumerate() {
				let sample = if frame < written { rate.wave_out[ch][frame] } else { 0.0 };
				encode(dst_format, to_i16(sample), bytes);
			}
		}

		true
	}
}

impl fmt::Debug for AudioCvt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AudioCvt")
			.field("needed", &self.needed)
			.field("src", &self.src)
			.field("dst", &self.dst)
			.field("len", &self.len)
			.field("len_cvt", &self.len_cvt)
			.field("len_mult", &self.len_mult)
			.field("allocated", &!self.buf.is_empty())
			.field("resample", &self.rate.is_some())
			.finish_non_exhaustive()
	}
}

//---------------------------------------------------------------------------------------------------- Free functions
/// Decode the callback's `stream` and map it to `dst_ch` channels.
fn decode_mapped(src: &AudioSpec, dst_ch: usize, stream: &[u8], decoded: &mut [i16], mapped: &mut [i16]) {
	let format = src.format;
	for (sample, bytes) in decoded.iter_mut().zip(stream.chunks_exact(format.bytes())) {
		*sample = decode(format, bytes);
	}

	for (from, to) in decoded.chunks_exact(src.channels as usize).zip(mapped.chunks_exact_mut(dst_ch)) {
		map_channels(from, to);
	}
}

#[inline]
fn to_i16(sample: f32) -> i16 {
	(sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

//---------------------------------------------------------------------------------------------------- Channel mapping
/// Map one frame across channel counts.
///
/// Growing repeats the source channels in order (mono fills every
/// channel, stereo becomes L R L R ...). Shrinking averages every
/// source channel that lands on the same output channel.
fn map_channels(src: &[i16], dst: &mut [i16]) {
	if src.len() == dst.len() {
		dst.copy_from_slice(src);
	} else if src.len() < dst.len() {
		for (i, out) in dst.iter_mut().enumerate() {
			*out = src[i % src.len()];
		}
	} else {
		let step = dst.len();
		for (i, out) in dst.iter_mut().enumerate() {
			let (sum, count) = src
				.iter()
				.skip(i)
				.step_by(step)
				.fold((0_i32, 0_i32), |(sum, count), s| (sum + i32::from(*s), count + 1));
			*out = (sum / count.max(1)) as i16;
		}
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn spec(frequency: u32, format: AudioFormat, channels: u8, samples: u16) -> AudioSpec {
		AudioSpec::new(frequency, format, channels, samples)
	}

	fn samples(bytes: &[u8]) -> Vec<i16> {
		bytes.chunks_exact(2).map(|b| i16::from_le_bytes([b[0], b[1]])).collect()
	}

	#[test]
	fn identical_is_not_needed() {
		let a = spec(44_100, AudioFormat::S16LSB, 2, 1024);
		let mut cvt = AudioCvt::build(&a, &a).unwrap();
		assert!(!cvt.needed());
		assert_eq!(cvt.len(), cvt.len_cvt());
		assert_eq!(cvt.len_mult(), 1);

		// Whatever the callback writes is passed through.
		cvt.allocate().unwrap();
		assert!(cvt.convert_with(|stream| stream.fill(3)));
		assert!(cvt.converted().iter().all(|b| *b == 3));
	}

	#[test]
	fn zero_frequency_is_rejected() {
		let a = spec(0, AudioFormat::S16LSB, 2, 1024);
		let b = spec(44_100, AudioFormat::S16LSB, 2, 1024);
		assert!(matches!(AudioCvt::build(&a, &b), Err(OpenError::UnsupportedFormat(_))));
	}

	#[test]
	fn geometry() {
		// Doubling rate and channels, widening 8 -> 16.
		let src = spec(22_050, AudioFormat::U8, 1, 0);
		let dst = spec(44_100, AudioFormat::S16MSB, 2, 1024);
		let cvt = AudioCvt::build(&src, &dst).unwrap();
		assert_eq!(cvt.len(), 512);
		assert_eq!(cvt.len_cvt(), 4096);
		assert_eq!(cvt.len_mult(), 8);
		assert_eq!(cvt.len_ratio(), 8.0);

		// Shrinking, the buffer never needs to grow.
		let cvt = AudioCvt::build(&dst, &src).unwrap();
		assert_eq!(cvt.len_mult(), 1);

		// Non-integer rate ratios round the source up.
		let src = spec(44_100, AudioFormat::S16LSB, 2, 0);
		let dst = spec(48_000, AudioFormat::S16LSB, 2, 1024);
		let cvt = AudioCvt::build(&src, &dst).unwrap();
		assert_eq!(cvt.len(), 941 * 4);
		assert_eq!(cvt.len_cvt(), 4096);
	}

	#[test]
	fn needs_allocation() {
		let src = spec(44_100, AudioFormat::U8, 2, 0);
		let dst = spec(44_100, AudioFormat::S16LSB, 2, 256);
		let mut cvt = AudioCvt::build(&src, &dst).unwrap();

		let mut calls = 0;
		assert!(!cvt.convert_with(|_| calls += 1));
		assert_eq!(calls, 0);
		assert!(cvt.converted().is_empty());

		cvt.allocate().unwrap();
		assert!(cvt.convert_with(|stream| {
			calls += 1;
			assert_eq!(stream.len(), 512);
			// Silence of the source format.
			assert!(stream.iter().all(|b| *b == 0x80));
		}));
		assert_eq!(calls, 1);
	}

	#[test]
	fn sign_and_endian() {
		let src = spec(8_000, AudioFormat::S16LSB, 1, 0);
		let dst = spec(8_000, AudioFormat::U16MSB, 1, 2);
		let mut cvt = AudioCvt::build(&src, &dst).unwrap();
		cvt.allocate().unwrap();

		cvt.convert_with(|stream| {
			stream[..2].copy_from_slice(&0_i16.to_le_bytes());
			stream[2..4].copy_from_slice(&0x1234_i16.to_le_bytes());
		});

		assert_eq!(cvt.converted(), &[0x80, 0x00, 0x92, 0x34]);
	}

	#[test]
	fn stereo_to_mono_averages() {
		let src = spec(8_000, AudioFormat::S16LSB, 2, 0);
		let dst = spec(8_000, AudioFormat::S16LSB, 1, 1);
		let mut cvt = AudioCvt::build(&src, &dst).unwrap();
		cvt.allocate().unwrap();

		cvt.convert_with(|stream| {
			stream[..2].copy_from_slice(&1000_i16.to_le_bytes());
			stream[2..4].copy_from_slice(&3000_i16.to_le_bytes());
		});

		assert_eq!(cvt.converted(), &2000_i16.to_le_bytes());
	}

	#[test]
	fn map_channels_grow_and_shrink() {
		let mut quad = [0; 4];
		map_channels(&[1, 2], &mut quad);
		assert_eq!(quad, [1, 2, 1, 2]);

		let mut six = [0; 6];
		map_channels(&[7], &mut six);
		assert_eq!(six, [7; 6]);

		let mut stereo = [0; 2];
		map_channels(&[10, 20, 30, 40], &mut stereo);
		assert_eq!(stereo, [20, 30]);
	}

	#[test]
	fn resamples() {
		let src = spec(16_000, AudioFormat::S16LSB, 1, 0);
		let dst = spec(8_000, AudioFormat::S16LSB, 1, 256);
		let mut cvt = AudioCvt::build(&src, &dst).unwrap();
		cvt.allocate().unwrap();
		assert_eq!(cvt.len(), 1024);
		assert_eq!(cvt.len_cvt(), 512);

		let mut frames = 0;
		for _ in 0..32 {
			assert!(cvt.convert_with(|stream| {
				// Always the full callback buffer.
				assert_eq!(stream.len(), 1024);
				frames += stream.len() / 2;
				for sample in stream.chunks_exact_mut(2) {
					sample.copy_from_slice(&8000_i16.to_le_bytes());
				}
			}));
			assert_eq!(cvt.converted().len(), 512);
		}

		// One callback per device buffer on average, plus what the resampler holds.
		assert!((31 * 512..=36 * 512).contains(&frames), "{frames}");

		// A constant level settles at the same level.
		for sample in samples(cvt.converted()) {
			assert!((i32::from(sample) - 8000).abs() < 400, "{sample}");
		}
	}

	#[test]
	fn resample_silence_stays_silent() {
		let src = spec(44_100, AudioFormat::U8, 2, 0);
		let dst = spec(48_000, AudioFormat::S16LSB, 2, 512);
		let mut cvt = AudioCvt::build(&src, &dst).unwrap();
		cvt.allocate().unwrap();

		for _ in 0..8 {
			// Left as handed over, U8 silence.
			assert!(cvt.convert_with(|stream| stream.fill(0x80)));
			assert!(samples(cvt.converted()).iter().all(|s| *s == 0));
		}
	}
}
