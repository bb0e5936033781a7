//! The application's fill callback.

//---------------------------------------------------------------------------------------------------- AudioCallback
/// Fills audio buffers.
///
/// This is called from the mixing thread (or the backend's own
/// callback context) every time a new buffer of audio is needed.
///
/// `stream` has already been filled with silence and is exactly
/// as long as one buffer in the format the application asked for.
///
/// Any state the callback needs (the "user data") is simply
/// owned by the implementor, e.g. captured by a closure:
///
/// ```rust
/// # use hwaudio::spec::*;
/// let mut phase = 0_u8;
/// let callback = move |stream: &mut [u8]| {
///     for byte in stream {
///         *byte = phase;
///         phase = phase.wrapping_add(1);
///     }
/// };
/// let desired = DesiredSpec::new().callback(callback);
/// ```
///
/// The callback is never called while the device is paused,
/// and never called while another thread holds the [`AudioGuard`](crate::lock::AudioGuard).
pub trait AudioCallback: Send + 'static {
	/// Write audio into `stream`.
	fn fill(&mut self, stream: &mut [u8]);
}

impl<F> AudioCallback for F
where
	F: FnMut(&mut [u8]) + Send + 'static,
{
	#[inline]
	fn fill(&mut self, stream: &mut [u8]) {
		self(stream);
	}
}
