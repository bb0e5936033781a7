//! The mixer lock.
//!
//! [`AudioLock`] provides mutual exclusion between the fill
//! callback and the application. While an application thread
//! holds an [`AudioGuard`], the callback is not running and
//! won't start running until the guard is dropped.
//!
//! Locking from inside the callback is a no-op, so the callback
//! can call into code that locks the device without deadlocking
//! against itself. This holds on the mixing thread and on whatever
//! thread a self-driven backend runs the callback on.

//---------------------------------------------------------------------------------------------------- Use
use parking_lot::{Mutex,MutexGuard};
use std::{
	cell::Cell,
	fmt,
	sync::Arc,
};

//---------------------------------------------------------------------------------------------------- In callback
thread_local! {
	/// Address of the [`AudioLock`] whose callback this thread is running, 0 if none.
	static IN_CALLBACK: Cell<usize> = const { Cell::new(0) };
}

/// Marks the current thread as running a callback until dropped.
struct InCallback {
	/// What was marked before, restored on drop.
	previous: usize,
}

impl InCallback {
	fn enter(lock: usize) -> Self {
		Self { previous: IN_CALLBACK.with(|c| c.replace(lock)) }
	}
}

impl Drop for InCallback {
	fn drop(&mut self) {
		IN_CALLBACK.with(|c| c.set(self.previous));
	}
}

//---------------------------------------------------------------------------------------------------- DeviceLock
/// A backend-provided lock.
///
/// Backends whose callback runs in a context a mutex can't protect
/// (e.g. an interrupt handler) provide their own locking primitive.
/// When a backend does, [`AudioLock::lock`] uses it instead of the
/// default mutex.
pub trait DeviceLock: Send + Sync {
	/// Keep the backend from calling the fill callback.
	fn lock(&self);
	/// Undo a previous [`DeviceLock::lock`].
	fn unlock(&self);
}

//---------------------------------------------------------------------------------------------------- AudioLock
/// The lock shared between the application and the fill callback.
///
/// Created when the device is opened, dropped when it is closed.
pub struct AudioLock {
	/// The mixer mutex. Held for exactly one
	/// callback invocation at a time.
	mixer: Mutex<()>,
	/// Used instead of `mixer` for the application's locks, if the backend has one.
	device: Option<Arc<dyn DeviceLock>>,
}

impl AudioLock {
	#[must_use]
	pub(crate) fn new(device: Option<Arc<dyn DeviceLock>>) -> Self {
		Self {
			mixer: Mutex::new(()),
			device,
		}
	}

	fn addr(&self) -> usize {
		std::ptr::addr_of!(*self) as usize
	}

	#[must_use]
	/// Is the calling thread inside this lock's callback right now?
	pub fn in_callback(&self) -> bool {
		IN_CALLBACK.with(Cell::get) == self.addr()
	}

	/// Hold the mixer mutex while calling `f`, the callback's side of the exclusion.
	///
	/// For the duration of `f` the calling thread is marked as
	/// running the callback, [`AudioLock::lock`] from it is skipped.
	pub(crate) fn mix<T>(&self, f: impl FnOnce() -> T) -> T {
		let _guard = self.mixer.lock();
		let _marked = InCallback::enter(self.addr());
		f()
	}

	#[must_use]
	/// Lock the device.
	///
	/// The fill callback is guaranteed to not be running
	/// until the returned [`AudioGuard`] is dropped.
	///
	/// Called from inside the callback, on whatever thread
	/// runs it, this does nothing and returns immediately.
	pub fn lock(&self) -> AudioGuard<'_> {
		let inner = if self.in_callback() {
			Guard::Skipped
		} else if let Some(device) = self.device.as_deref() {
			device.lock();
			Guard::Device(device)
		} else {
			Guard::Mixer(self.mixer.lock())
		};
		AudioGuard { inner }
	}
}

impl fmt::Debug for AudioLock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AudioLock")
			.field("locked", &self.mixer.is_locked())
			.field("in_callback", &self.in_callback())
			.field("device", &self.device.is_some())
			.finish()
	}
}

//---------------------------------------------------------------------------------------------------- AudioGuard
/// Holds the device locked, dropping it unlocks.
///
/// See [`AudioLock::lock`].
#[must_use = "the device is unlocked as soon as the guard is dropped"]
pub struct AudioGuard<'a> {
	inner: Guard<'a>,
}

/// What an [`AudioGuard`] actually holds.
enum Guard<'a> {
	/// Taken inside the callback (or with no device), nothing is held.
	Skipped,
	/// The default mixer mutex.
	Mixer(MutexGuard<'a, ()>),
	/// The backend's lock, unlocked on drop.
	Device(&'a dyn DeviceLock),
}

impl AudioGuard<'_> {
	/// A guard holding nothing.
	pub(crate) const fn empty() -> Self {
		Self { inner: Guard::Skipped }
	}

	#[must_use]
	/// Was locking skipped?
	///
	/// This is the case inside the callback, and
	/// when there was no open device to lock.
	pub const fn is_skipped(&self) -> bool {
		matches!(self.inner, Guard::Skipped)
	}
}

impl Drop for AudioGuard<'_> {
	fn drop(&mut self) {
		if let Guard::Device(device) = self.inner {
			device.unlock();
		}
	}
}

impl fmt::Debug for AudioGuard<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self.inner {
			Guard::Skipped   => "AudioGuard::Skipped",
			Guard::Mixer(_)  => "AudioGuard::Mixer",
			Guard::Device(_) => "AudioGuard::Device",
		})
	}
}
