//! Atomic device state.

//---------------------------------------------------------------------------------------------------- Use
use crate::state::AudioStatus;
use std::sync::atomic::{AtomicBool,Ordering};

//---------------------------------------------------------------------------------------------------- DeviceState
/// The two flags the application thread mutates
/// while the mixing thread is running.
///
/// Everything else about an open device is written once
/// during `open()` and is read-only afterwards.
#[derive(Debug)]
pub(crate) struct DeviceState {
	/// Set at open, cleared at close.
	///
	/// INVARIANT: this is the only way the mixing thread
	/// is told to exit, and once cleared it is never set
	/// again for the same open device.
	enabled: AtomicBool,
	/// Freely toggled by the application.
	paused: AtomicBool,
}

impl DeviceState {
	#[allow(clippy::declare_interior_mutable_const)]
	/// Closed, paused.
	pub(crate) const DEFAULT: Self = Self {
		enabled: AtomicBool::new(false),
		paused: AtomicBool::new(true),
	};

	#[inline]
	pub(crate) fn enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire)
	}

	#[inline]
	pub(crate) fn paused(&self) -> bool {
		self.paused.load(Ordering::Acquire)
	}

	#[inline]
	/// Called once per open, before the mixing thread exists.
	pub(crate) fn enable(&self) {
		self.paused.store(true, Ordering::Release);
		self.enabled.store(true, Ordering::Release);
	}

	#[inline]
	/// Tell the mixing thread to exit its loop.
	pub(crate) fn disable(&self) {
		self.enabled.store(false, Ordering::Release);
	}

	#[inline]
	pub(crate) fn set_paused(&self, paused: bool) {
		self.paused.store(paused, Ordering::Release);
	}

	/// Derive the public status from both flags.
	pub(crate) fn status(&self) -> AudioStatus {
		match (self.enabled(), self.paused()) {
			(true, false) => AudioStatus::Playing,
			(true, true)  => AudioStatus::Paused,
			(false, _)    => AudioStatus::Stopped,
		}
	}
}

impl Default for DeviceState {
	fn default() -> Self {
		Self::DEFAULT
	}
}
