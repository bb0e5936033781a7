//! The backend interface.
//!
//! A [`Backend`] is a single audio output, e.g. a sound server
//! connection, a device node, a file. Everything else in the crate
//! only talks to backends through this trait.
//!
//! Backends come in two shapes, decided by [`Backend::open`]:
//!
//! - [`Drive::Thread`]: the crate's mixing thread drives the backend with
//!   [`Backend::buffer`], [`Backend::play`] and [`Backend::wait`]
//! - [`Drive::SelfDriven`]: the backend has its own callback context
//!   and pulls audio through the [`Fill`] handed to [`Backend::start`]

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	error::OutputError,
	lock::DeviceLock,
	output::Fill,
	spec::AudioSpec,
};
use std::sync::Arc;

//---------------------------------------------------------------------------------------------------- Drive
/// How an opened backend gets its audio.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
#[derive(strum::AsRefStr,strum::Display,strum::IntoStaticStr)]
pub enum Drive {
	/// The mixing thread writes into the backend's buffers.
	Thread,
	/// The backend calls [`Fill::fill`] from its own context.
	SelfDriven,
}

//---------------------------------------------------------------------------------------------------- DeviceBuffer
/// The buffer a [`Drive::Thread`] backend hands to the mixing thread.
#[derive(Debug)]
pub enum DeviceBuffer<'a> {
	/// Write the next buffer of audio here, then [`Backend::play`] it.
	Real(&'a mut [u8]),
	/// No buffer is available right now.
	///
	/// The mixing thread renders into its own fallback buffer
	/// instead (so the callback keeps its timing) and sleeps one
	/// buffer's duration rather than calling [`Backend::play`].
	Fallback,
}

//---------------------------------------------------------------------------------------------------- Backend
/// An audio output backend.
///
/// Instances are created by a [`Driver`](crate::output::Driver) and
/// are destroyed by dropping them. Between [`Backend::open`] and
/// [`Backend::close`] a [`Drive::Thread`] backend is owned by the
/// mixing thread, so every method here is only ever called from one
/// thread at a time.
///
/// # Invariants
/// - [`Backend::wait`] must return within a bounded time (around 1 second)
///   even if the device never becomes ready, closing the device waits on it
/// - [`Backend::buffer`] must return a buffer of at least `spec.size` bytes
pub trait Backend: Send {
	/// Open the device.
	///
	/// `spec` is what the application asked for (with every field filled in).
	/// The backend changes `spec` to what it actually opened, walking
	/// [`AudioFormat::candidates`](crate::format::AudioFormat::candidates)
	/// when the hardware doesn't take the exact format.
	///
	/// Changing `spec.samples` is allowed, the derived fields are
	/// recalculated afterwards.
	///
	/// # Errors
	/// Any error here fails [`Audio::open`](crate::Audio::open) with
	/// [`OpenError::BackendRejected`](crate::error::OpenError::BackendRejected).
	fn open(&mut self, spec: &mut AudioSpec) -> Result<Drive, OutputError>;

	/// Get the next buffer to write into.
	fn buffer(&mut self) -> DeviceBuffer<'_>;

	/// Submit the buffer last returned by [`Backend::buffer`].
	///
	/// # Errors
	/// Errors are retried by the mixing thread up to
	/// [`Config::max_backend_failures`](crate::config::Config::max_backend_failures)
	/// consecutive times, except [`OutputError::DeviceUnavailable`]
	/// which stops the mixing thread immediately.
	fn play(&mut self) -> Result<(), OutputError>;

	/// Block until the device wants another buffer.
	///
	/// # Errors
	/// Same as [`Backend::play`].
	fn wait(&mut self) -> Result<(), OutputError>;

	/// Called once after the mixing thread's last buffer,
	/// e.g. to let queued audio drain.
	fn wait_done(&mut self) {}

	/// Close the device.
	///
	/// The backend may be opened again afterwards.
	fn close(&mut self);

	/// A lock the backend wants used instead of the default mixer mutex.
	///
	/// See [`DeviceLock`].
	fn device_lock(&self) -> Option<Arc<dyn DeviceLock>> {
		None
	}

	/// Called first thing on the mixing thread.
	fn thread_init(&mut self) {}

	/// Start pulling audio from `fill`.
	///
	/// Only called when [`Backend::open`] returned [`Drive::SelfDriven`].
	///
	/// # Errors
	/// The default returns [`OutputError::NotSelfDriven`].
	fn start(&mut self, fill: Fill) -> Result<(), OutputError> {
		drop(fill);
		Err(OutputError::NotSelfDriven)
	}
}
