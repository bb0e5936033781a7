//! The mixing thread.
//!
//! Drives a [`Drive::Thread`](crate::output::Drive::Thread) backend:
//! get a buffer, fill it, play it, wait, repeat, until the device is
//! closed (or the backend gives up).

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	actor::fill::{Fill,copy_converted},
	error::OutputError,
	macros::{debug2,error2,info2,trace2,warn2},
	output::{Backend,DeviceBuffer},
	spec::AudioSpec,
};
use std::{
	thread::JoinHandle,
	time::Duration,
};

//---------------------------------------------------------------------------------------------------- Mixer
/// The mixing thread's state.
pub(crate) struct Mixer {
	backend: Box<dyn Backend>,
	fill: Fill,
	/// Slept when the backend had no buffer.
	pace: Duration,
	/// Consecutive `play()`/`wait()` failures.
	failures: u32,
	/// Give up after this many consecutive failures.
	max_failures: u32,
}

#[allow(clippy::missing_docs_in_private_items)]
pub(crate) struct InitArgs {
	pub(crate) backend:      Box<dyn Backend>,
	pub(crate) fill:         Fill,
	pub(crate) spec:         AudioSpec,
	pub(crate) realtime:     bool,
	pub(crate) max_failures: u32,
}

/// What the thread hands back when it exits.
pub(crate) type MixerHandle = JoinHandle<Option<Box<dyn Backend>>>;

//---------------------------------------------------------------------------------------------------- Mixer Impl
impl Mixer {
	//---------------------------------------------------------------------------------------------------- Init
	#[cold]
	#[inline(never)]
	/// Spawn the mixing thread.
	///
	/// The thread is spawned first and only then handed its arguments,
	/// so if spawning fails the caller gets the backend back to close it.
	pub(crate) fn init(args: InitArgs) -> Result<MixerHandle, (std::io::Error, InitArgs)> {
		let (send, recv) = crossbeam::channel::bounded::<InitArgs>(1);

		let spawned = std::thread::Builder::new()
			.name("Mixer".into())
			.spawn(move || {
				let Ok(args) = recv.recv() else {
					return None;
				};
				Some(Self::main(args))
			});

		match spawned {
			Ok(handle) => match send.send(args) {
				Ok(()) => Ok(handle),
				// The thread is gone already, get the arguments back out.
				Err(crossbeam::channel::SendError(args)) => Err((
					std::io::Error::new(std::io::ErrorKind::Other, "mixing thread exited before starting"),
					args,
				)),
			},
			Err(e) => Err((e, args)),
		}
	}

	//---------------------------------------------------------------------------------------------------- Main
	#[cold]
	#[inline(never)]
	/// The thread's body, returns the backend for closing.
	fn main(args: InitArgs) -> Box<dyn Backend> {
		let InitArgs {
			mut backend,
			fill,
			spec,
			realtime,
			max_failures,
		} = args;

		debug2!("Mixer - init, spec: {spec:?}, realtime: {realtime}");

		backend.thread_init();

		#[cfg(feature = "realtime")]
		let promoted = if realtime { promote(&spec) } else { None };
		#[cfg(not(feature = "realtime"))]
		if realtime {
			warn2!("Mixer - real-time priority requested but the `realtime` feature is disabled");
		}

		// Never sleep 0, that would spin.
		let pace = spec.buffer_duration().max(Duration::from_millis(1));

		let mut this = Self {
			backend,
			fill,
			pace,
			failures: 0,
			max_failures: max_failures.max(1),
		};

		this.run();

		debug2!("Mixer - draining");
		this.backend.wait_done();

		#[cfg(feature = "realtime")]
		if let Some(handle) = promoted {
			if let Err(e) = audio_thread_priority::demote_current_thread_from_real_time(handle) {
				warn2!("Mixer - real-time demotion failed: {e}");
			}
		}

		debug2!("Mixer - exit");
		this.backend
	}

	//---------------------------------------------------------------------------------------------------- Loop
	/// Loop until the device is disabled.
	fn run(&mut self) {
		info2!("Mixer - running");

		while self.fill.producer.enabled() {
			let Some((fallback, played)) = self.iteration() else {
				std::thread::sleep(self.pace);
				continue;
			};

			let waited = if fallback {
				trace2!("Mixer - no device buffer, sleeping {:?}", self.pace);
				std::thread::sleep(self.pace);
				true
			} else {
				let result = self.backend.wait();
				self.check("wait", result)
			};

			if played && waited {
				self.failures = 0;
			}
		}
	}

	/// Produce and play one buffer.
	///
	/// Returns whether the fallback buffer was used and whether
	/// playing succeeded, or `None` if there was nothing to produce into.
	fn iteration(&mut self) -> Option<(bool, bool)> {
		let Fill { producer, fallback, cvt, .. } = &mut self.fill;

		let used_fallback = match cvt.as_mut() {
			Some(cvt) => {
				if !cvt.convert_with(|stream| producer.produce(stream)) {
					return None;
				}

				match self.backend.buffer() {
					DeviceBuffer::Real(buf) => {
						copy_converted(buf, cvt.converted());
						false
					},
					DeviceBuffer::Fallback => {
						copy_converted(fallback, cvt.converted());
						true
					},
				}
			},
			None => match self.backend.buffer() {
				DeviceBuffer::Real(buf) => {
					producer.produce(buf);
					false
				},
				DeviceBuffer::Fallback => {
					producer.produce(fallback);
					true
				},
			},
		};

		let played = if used_fallback {
			true
		} else {
			let result = self.backend.play();
			self.check("play", result)
		};

		Some((used_fallback, played))
	}

	/// Apply the failure policy to a backend result, `true` if it was `Ok`.
	///
	/// The failure count is reset by the caller once
	/// a whole iteration goes through cleanly.
	fn check(&mut self, what: &str, result: Result<(), OutputError>) -> bool {
		match result {
			Ok(()) => return true,

			Err(OutputError::DeviceUnavailable) => {
				error2!("Mixer - {what}(): device unavailable, stopping");
				self.fill.producer.disable();
			},

			Err(e) => {
				self.failures += 1;
				warn2!("Mixer - {what}() failed ({}/{}): {e}", self.failures, self.max_failures);

				if self.failures >= self.max_failures {
					error2!("Mixer - too many backend failures, stopping");
					self.fill.producer.disable();
				}
			},
		}

		false
	}
}

//---------------------------------------------------------------------------------------------------- Real-time
#[cfg(feature = "realtime")]
/// Promote the calling thread for a device playing `spec`.
fn promote(spec: &AudioSpec) -> Option<audio_thread_priority::RtPriorityHandle> {
	match audio_thread_priority::promote_current_thread_to_real_time(u32::from(spec.samples), spec.frequency) {
		Ok(handle) => {
			debug2!("Mixer - promoted to real-time priority");
			Some(handle)
		},
		Err(e) => {
			warn2!("Mixer - real-time promotion failed: {e}");
			None
		},
	}
}
