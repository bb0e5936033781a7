//! The audio context.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	actor::mixer::MixerHandle,
	audio::AudioHandle,
	config::Config,
	lock::{AudioGuard,AudioLock},
	output::{Backend,Drive,Driver,Registry},
	spec::AudioSpec,
	state::{AudioStatus,DeviceState},
};
use std::{fmt, sync::Arc};

//---------------------------------------------------------------------------------------------------- Audio
/// The main handle to an audio output device.
///
/// An `Audio` owns (at most) one selected backend and
/// (at most) one open device on that backend.
///
/// ```rust,no_run
/// # use hwaudio::{*,config::*,spec::*};
/// let mut audio = Audio::init(Config::from_env());
///
/// let mut phase = 0_u8;
/// let desired = DesiredSpec::new()
///     .channels(1)
///     .callback(move |stream: &mut [u8]| {
///         for byte in stream {
///             *byte = phase;
///             phase = phase.wrapping_add(4);
///         }
///     });
///
/// let spec = audio.open(desired).unwrap();
/// println!("opened: {spec:?}");
///
/// // Devices open paused.
/// audio.pause(false);
/// std::thread::sleep(std::time::Duration::from_secs(1));
///
/// // Or just drop `audio`.
/// audio.close();
/// ```
pub struct Audio {
	pub(super) registry: Registry,
	pub(super) config: Config,
	pub(super) state: Arc<DeviceState>,

	/// The selected driver's name.
	pub(super) driver: Option<String>,
	/// The selected backend, `None` while the mixing thread owns it.
	pub(super) backend: Option<Box<dyn Backend>>,

	/// The open device.
	pub(super) device: Option<OpenDevice>,
}

/// Everything that only exists while a device is open.
pub(super) struct OpenDevice {
	pub(super) drive: Drive,
	/// What the backend actually opened.
	pub(super) obtained: AudioSpec,
	/// What the callback sees.
	pub(super) spec: AudioSpec,
	pub(super) lock: Arc<AudioLock>,
	/// `Some` for [`Drive::Thread`].
	pub(super) mixer: Option<MixerHandle>,
}

impl Audio {
	#[inline]
	#[must_use]
	/// The selected driver, if any.
	pub fn driver_name(&self) -> Option<&str> {
		self.driver.as_deref()
	}

	#[inline]
	#[must_use]
	/// Every driver this `Audio` can select from.
	pub fn drivers(&self) -> &[Driver] {
		self.registry.drivers()
	}

	#[inline]
	#[must_use]
	/// The configuration this `Audio` was created with.
	pub const fn config(&self) -> &Config {
		&self.config
	}

	#[inline]
	#[must_use]
	/// Is a device currently open?
	pub const fn is_open(&self) -> bool {
		self.device.is_some()
	}

	#[inline]
	#[must_use]
	/// The spec the callback sees, if a device is open.
	///
	/// This is what [`Audio::open`] returned.
	pub fn spec(&self) -> Option<AudioSpec> {
		self.device.as_ref().map(|d| d.spec)
	}

	#[inline]
	#[must_use]
	/// The spec the backend actually opened, if a device is open.
	///
	/// Differs from [`Audio::spec`] when a conversion is running.
	pub fn obtained_spec(&self) -> Option<AudioSpec> {
		self.device.as_ref().map(|d| d.obtained)
	}

	#[inline]
	/// Pause or resume the callback.
	///
	/// While paused the device keeps playing, silence.
	/// This does nothing when no device is open.
	pub fn pause(&self, pause: bool) {
		if self.device.is_some() {
			self.state.set_paused(pause);
		}
	}

	#[inline]
	#[must_use]
	/// The device's current status.
	pub fn status(&self) -> AudioStatus {
		self.state.status()
	}

	#[must_use]
	/// Lock out the callback.
	///
	/// While the returned guard lives the callback isn't running and
	/// won't be started. Called from inside the callback this returns
	/// immediately without blocking.
	///
	/// With no device open there is nothing to lock
	/// and an empty guard is returned.
	pub fn lock(&self) -> AudioGuard<'_> {
		match self.device.as_ref() {
			Some(device) => device.lock.lock(),
			None => AudioGuard::empty(),
		}
	}

	#[must_use]
	/// The open device's lock, for locking from other threads.
	///
	/// The lock belongs to this one open device, after
	/// [`Audio::close`] it no longer excludes anything.
	pub fn audio_lock(&self) -> Option<Arc<AudioLock>> {
		self.device.as_ref().map(|d| Arc::clone(&d.lock))
	}

	#[must_use]
	/// A handle for pausing and inspecting the device from other threads.
	pub fn handle(&self) -> AudioHandle {
		AudioHandle {
			state: Arc::clone(&self.state),
		}
	}
}

impl fmt::Debug for Audio {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Audio")
			.field("driver", &self.driver)
			.field("config", &self.config)
			.field("state", &self.state)
			.field("backend", &self.backend.is_some())
			.field("drive", &self.device.as_ref().map(|d| d.drive))
			.field("spec", &self.spec())
			.finish_non_exhaustive()
	}
}
