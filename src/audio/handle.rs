//! A `Send + Sync` handle to an [`Audio`](crate::Audio)'s device state.

//---------------------------------------------------------------------------------------------------- Use
use crate::state::{AudioStatus,DeviceState};
use std::sync::Arc;

//---------------------------------------------------------------------------------------------------- AudioHandle
/// Pause and inspect a device from any thread.
///
/// Created with [`Audio::handle`](crate::Audio::handle). The handle
/// follows the `Audio` across opens and closes, with no device open
/// [`AudioHandle::status`] is [`AudioStatus::Stopped`] and
/// [`AudioHandle::pause`] has no effect.
///
/// For mutual exclusion with the callback from another
/// thread, share [`Audio::audio_lock`](crate::Audio::audio_lock).
#[derive(Clone,Debug)]
pub struct AudioHandle {
	pub(super) state: Arc<DeviceState>,
}

impl AudioHandle {
	#[inline]
	/// Pause or resume the callback.
	pub fn pause(&self, pause: bool) {
		if self.state.enabled() {
			self.state.set_paused(pause);
		}
	}

	#[inline]
	#[must_use]
	/// The device's current status.
	pub fn status(&self) -> AudioStatus {
		self.state.status()
	}
}
