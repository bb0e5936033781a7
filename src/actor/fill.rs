//! The fill pipeline.
//!
//! Everything needed to turn "the device wants a buffer" into
//! a buffer of audio: silence, the pause check, the mixer lock
//! around the callback, and the optional conversion.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	convert::AudioCvt,
	lock::AudioLock,
	macros::trace2,
	spec::{AudioCallback,AudioSpec},
	state::DeviceState,
};
use std::{fmt, sync::Arc};

//---------------------------------------------------------------------------------------------------- Producer
/// Runs the callback under the device's rules.
pub(crate) struct Producer {
	callback: Box<dyn AudioCallback>,
	lock: Arc<AudioLock>,
	state: Arc<DeviceState>,
	/// Silence of the callback's format.
	silence: u8,
	/// Bytes per callback.
	len: usize,
}

impl Producer {
	/// Fill up to `len` bytes of `stream`.
	///
	/// The bytes are always silenced first. If the device isn't
	/// paused the callback then runs, holding the mixer lock for
	/// exactly that one call.
	pub(crate) fn produce(&mut self, stream: &mut [u8]) {
		let len = self.len.min(stream.len());
		let stream = &mut stream[..len];
		stream.fill(self.silence);

		if self.state.paused() {
			return;
		}

		let callback = &mut self.callback;
		self.lock.mix(|| callback.fill(stream));
	}

	#[inline]
	pub(crate) fn enabled(&self) -> bool {
		self.state.enabled()
	}

	#[inline]
	pub(crate) fn disable(&self) {
		self.state.disable();
	}
}

//---------------------------------------------------------------------------------------------------- Fill
/// The audio source handed to self-driven backends.
///
/// Call [`Fill::fill`] from the backend's audio callback with
/// however many bytes the device wants, in the obtained format.
/// Internally this runs the application's callback one whole
/// buffer at a time, so the application always sees its own
/// buffer size no matter how the device slices its requests.
///
/// Dropping the `Fill` drops the application's callback.
pub struct Fill {
	pub(crate) producer: Producer,
	/// One device buffer, either where the callback
	/// writes when nothing else is available or the
	/// staging buffer for [`Fill::fill`].
	pub(crate) fallback: Vec<u8>,
	pub(crate) cvt: Option<AudioCvt>,
	/// Silence of the device's format.
	silence: u8,
	/// How much of `fallback` [`Fill::fill`] already handed out.
	cursor: usize,
}

impl Fill {
	/// `fallback` must be `spec.size` bytes, where `spec` is the obtained spec.
	pub(crate) fn new(
		callback: Box<dyn AudioCallback>,
		lock: Arc<AudioLock>,
		state: Arc<DeviceState>,
		spec: &AudioSpec,
		fallback: Vec<u8>,
		cvt: Option<AudioCvt>,
	) -> Self {
		let (silence, len) = match cvt.as_ref() {
			Some(cvt) => (cvt.src_silence(), cvt.len()),
			None => (spec.silence, spec.size as usize),
		};

		trace2!("Fill - silence: {silence}, len: {len}, convert: {}", cvt.is_some());

		Self {
			producer: Producer { callback, lock, state, silence, len },
			silence: spec.silence,
			cursor: fallback.len(),
			fallback,
			cvt,
		}
	}

	/// Render one whole device buffer into the fallback buffer.
	fn refill(&mut self) {
		match self.cvt.as_mut() {
			Some(cvt) => {
				let producer = &mut self.producer;
				if cvt.convert_with(|stream| producer.produce(stream)) {
					copy_converted(&mut self.fallback, cvt.converted());
				} else {
					// Never replay a stale buffer.
					self.fallback.fill(self.silence);
				}
			},
			None => self.producer.produce(&mut self.fallback),
		}
		self.cursor = 0;
	}

	/// Write `out.len()` bytes of audio into `out`.
	///
	/// Once the device is closing this only writes silence.
	pub fn fill(&mut self, out: &mut [u8]) {
		if !self.producer.enabled() {
			out.fill(self.silence);
			return;
		}

		let mut written = 0;
		while written < out.len() {
			if self.cursor >= self.fallback.len() {
				if self.fallback.is_empty() {
					out[written..].fill(self.silence);
					return;
				}
				self.refill();
			}

			let n = (out.len() - written).min(self.fallback.len() - self.cursor);
			out[written..written + n].copy_from_slice(&self.fallback[self.cursor..self.cursor + n]);
			written += n;
			self.cursor += n;
		}
	}
}

impl fmt::Debug for Fill {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Fill")
			.field("silence", &self.producer.silence)
			.field("len", &self.producer.len)
			.field("fallback", &self.fallback.len())
			.field("cvt", &self.cvt)
			.field("cursor", &self.cursor)
			.finish_non_exhaustive()
	}
}

//---------------------------------------------------------------------------------------------------- Free functions
/// Copy a converted buffer to a device buffer.
///
/// Anything past the converted bytes is left alone.
pub(crate) fn copy_converted(device: &mut [u8], converted: &[u8]) {
	let n = device.len().min(converted.len());
	device[..n].copy_from_slice(&converted[..n]);
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::format::AudioFormat;
	use pretty_assertions::assert_eq;
	use std::sync::atomic::{AtomicU8,AtomicUsize,Ordering};

	/// A callback writing an increasing counter, one value per call.
	fn counting(calls: Arc<AtomicUsize>) -> Box<dyn AudioCallback> {
		let value = AtomicU8::new(1);
		Box::new(move |stream: &mut [u8]| {
			calls.fetch_add(1, Ordering::SeqCst);
			stream.fill(value.fetch_add(1, Ordering::SeqCst));
		})
	}

	fn fill(spec: &AudioSpec, calls: Arc<AtomicUsize>, paused: bool) -> Fill {
		let state = Arc::new(DeviceState::DEFAULT);
		state.enable();
		state.set_paused(paused);
		Fill::new(
			counting(calls),
			Arc::new(AudioLock::new(None)),
			state,
			spec,
			vec![spec.silence; spec.size as usize],
			None,
		)
	}

	#[test]
	fn paused_is_silence() {
		let spec = AudioSpec::new(8_000, AudioFormat::U8, 1, 4);
		let calls = Arc::new(AtomicUsize::new(0));
		let mut fill = fill(&spec, Arc::clone(&calls), true);

		let mut out = [0; 10];
		fill.fill(&mut out);
		assert_eq!(out, [0x80; 10]);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn slices_across_buffers() {
		// 4 byte buffers.
		let spec = AudioSpec::new(8_000, AudioFormat::U8, 1, 4);
		let calls = Arc::new(AtomicUsize::new(0));
		let mut fill = fill(&spec, Arc::clone(&calls), false);

		let mut out = [0; 6];
		fill.fill(&mut out);
		assert_eq!(out, [1, 1, 1, 1, 2, 2]);

		let mut out = [0; 3];
		fill.fill(&mut out);
		assert_eq!(out, [2, 2, 3]);
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[test]
	fn disabled_is_silence() {
		let spec = AudioSpec::new(8_000, AudioFormat::S8, 1, 4);
		let calls = Arc::new(AtomicUsize::new(0));
		let mut fill = fill(&spec, Arc::clone(&calls), false);
		fill.producer.disable();

		let mut out = [7; 5];
		fill.fill(&mut out);
		assert_eq!(out, [0; 5]);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn converts() {
		let desired = AudioSpec::new(8_000, AudioFormat::U8, 1, 4);
		let obtained = AudioSpec::new(8_000, AudioFormat::S16LSB, 1, 4);
		let mut cvt = AudioCvt::build(&desired, &obtained).unwrap();
		cvt.allocate().unwrap();

		let state = Arc::new(DeviceState::DEFAULT);
		state.enable();
		state.set_paused(false);

		let mut fill = Fill::new(
			Box::new(|stream: &mut [u8]| {
				// The callback sees its own format and size.
				assert_eq!(stream.len(), 4);
				assert!(stream.iter().all(|b| *b == 0x80));
				stream.fill(0xFF);
			}),
			Arc::new(AudioLock::new(None)),
			state,
			&obtained,
			vec![0; obtained.size as usize],
			Some(cvt),
		);

		let mut out = [0; 8];
		fill.fill(&mut out);
		assert_eq!(out, [0x00, 0x7F, 0x00, 0x7F, 0x00, 0x7F, 0x00, 0x7F]);
	}

	#[test]
	fn unallocated_conversion_is_silence() {
		let desired = AudioSpec::new(8_000, AudioFormat::U8, 1, 4);
		let obtained = AudioSpec::new(8_000, AudioFormat::S16LSB, 1, 4);
		// Never allocated.
		let cvt = AudioCvt::build(&desired, &obtained).unwrap();

		let state = Arc::new(DeviceState::DEFAULT);
		state.enable();
		state.set_paused(false);

		let calls = Arc::new(AtomicUsize::new(0));
		let mut fill = Fill::new(
			counting(Arc::clone(&calls)),
			Arc::new(AudioLock::new(None)),
			state,
			&obtained,
			vec![0x55; obtained.size as usize],
			Some(cvt),
		);

		// Twice, so a stale buffer would show up on the second pass.
		for _ in 0..2 {
			let mut out = [7; 8];
			fill.fill(&mut out);
			assert_eq!(out, [0; 8]);
		}
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn produce_respects_len() {
		let spec = AudioSpec::new(8_000, AudioFormat::U8, 1, 4);
		let calls = Arc::new(AtomicUsize::new(0));
		let mut fill = fill(&spec, Arc::clone(&calls), false);

		// A larger device buffer only gets `len` bytes written.
		let mut big = [9; 6];
		fill.producer.produce(&mut big);
		assert_eq!(big, [1, 1, 1, 1, 9, 9]);
	}

	#[test]
	fn copy_converted_truncates() {
		let mut device = [0; 3];
		copy_converted(&mut device, &[1, 2, 3, 4]);
		assert_eq!(device, [1, 2, 3]);

		let mut device = [0; 3];
		copy_converted(&mut device, &[5]);
		assert_eq!(device, [5, 0, 0]);
	}
}
