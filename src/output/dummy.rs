//! Dummy audio output.
//!
//! Behaves like a real device from the mixing thread's point
//! of view (it hands out buffers and blocks in `wait()` for one
//! buffer's worth of time) but the audio goes nowhere.
//!
//! This is the lowest priority driver, so applications
//! still run on machines without any audio hardware.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	error::OutputError,
	macros::{debug2,trace2},
	output::{Backend,DeviceBuffer,Drive,constants::WAIT_TIMEOUT},
	spec::AudioSpec,
};
use crossbeam::channel::{Receiver,RecvTimeoutError};
use std::time::{Duration,Instant};

//---------------------------------------------------------------------------------------------------- Dummy
/// A timer pretending to be a sound card.
#[derive(Debug)]
pub(crate) struct Dummy {
	/// The mix buffer handed out by `buffer()`.
	buf: Vec<u8>,
	/// Ticks once per buffer period while open.
	ticker: Option<Receiver<Instant>>,
}

impl Dummy {
	pub(crate) const fn new() -> Self {
		Self {
			buf: Vec::new(),
			ticker: None,
		}
	}
}

/// One buffer's playback time, in nanosecond precision.
///
/// Never zero, a zero period would have the mixing thread spin.
fn period(spec: &AudioSpec) -> Duration {
	let nanos = u64::from(spec.samples) * 1_000_000_000 / u64::from(spec.frequency.max(1));
	Duration::from_nanos(nanos.max(1_000_000))
}

//---------------------------------------------------------------------------------------------------- `Backend` Impl
impl Backend for Dummy {
	#[cold]
	#[inline(never)]
	fn open(&mut self, spec: &mut AudioSpec) -> Result<Drive, OutputError> {
		debug2!("Dummy - open(), spec: {spec:?}");

		if spec.frequency == 0 {
			return Err(OutputError::InvalidSampleRate);
		}

		// Any spec is fine, there's nothing to negotiate with.
		let size = spec.size as usize;
		let mut buf = Vec::new();
		buf.try_reserve_exact(size).map_err(|_| OutputError::Unknown("out of memory".into()))?;
		buf.resize(size, spec.silence);

		self.buf = buf;
		self.ticker = Some(crossbeam::channel::tick(period(spec)));
		Ok(Drive::Thread)
	}

	fn buffer(&mut self) -> DeviceBuffer<'_> {
		DeviceBuffer::Real(&mut self.buf)
	}

	fn play(&mut self) -> Result<(), OutputError> {
		trace2!("Dummy - play(), discarding {} bytes", self.buf.len());
		Ok(())
	}

	fn wait(&mut self) -> Result<(), OutputError> {
		let Some(ticker) = self.ticker.as_ref() else {
			return Err(OutputError::DeviceUnavailable);
		};

		match ticker.recv_timeout(WAIT_TIMEOUT) {
			Ok(_) | Err(RecvTimeoutError::Timeout) => Ok(()),
			Err(RecvTimeoutError::Disconnected) => Err(OutputError::DeviceUnavailable),
		}
	}

	#[cold]
	#[inline(never)]
	fn close(&mut self) {
		debug2!("Dummy - close()");
		self.ticker = None;
		self.buf = Vec::new();
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::format::AudioFormat;
	use pretty_assertions::assert_eq;

	#[test]
	fn open_accepts_anything() {
		let mut dummy = Dummy::new();
		let mut spec = AudioSpec::new(22_050, AudioFormat::U8, 6, 512);
		let before = spec;

		assert_eq!(dummy.open(&mut spec).unwrap(), Drive::Thread);
		assert_eq!(spec, before);

		match dummy.buffer() {
			DeviceBuffer::Real(buf) => {
				assert_eq!(buf.len(), spec.size as usize);
				assert!(buf.iter().all(|b| *b == 0x80));
			},
			DeviceBuffer::Fallback => panic!("dummy always has a buffer"),
		}
		dummy.close();
	}

	#[test]
	fn wait_paces() {
		let mut dummy = Dummy::new();
		// 20ms buffers.
		let mut spec = AudioSpec::new(10_000, AudioFormat::S16LSB, 1, 200);
		dummy.open(&mut spec).unwrap();

		let now = Instant::now();
		for _ in 0..5 {
			dummy.wait().unwrap();
		}
		let elapsed = now.elapsed();
		assert!(elapsed >= Duration::from_millis(80), "{elapsed:?}");
		assert!(elapsed < WAIT_TIMEOUT, "{elapsed:?}");
		dummy.close();
	}

	#[test]
	fn closed_wait_errors() {
		let mut dummy = Dummy::new();
		assert!(matches!(dummy.wait(), Err(OutputError::DeviceUnavailable)));
	}

	#[test]
	fn period_never_zero() {
		let spec = AudioSpec::new(96_000, AudioFormat::S16LSB, 2, 1);
		assert_eq!(period(&spec), Duration::from_millis(1));
		let spec = AudioSpec::new(22_050, AudioFormat::S16LSB, 2, 1024);
		assert_eq!(period(&spec).as_millis(), 46);
	}
}
