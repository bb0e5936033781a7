//! Backend errors.

//----------------------------------------------------------------------------------------------- AudioOutput Errors
/// Error that occurs inside an audio backend.
///
/// This can be due to many reasons, e.g:
/// - Audio device was unplugged
/// - Audio server disconnected/killed
/// - The requested spec is not something the hardware/server can do
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
	#[error("audio hardware/server is unavailable")]
	/// The audio hardware/server is unavailable.
	///
	/// Returned from the playback path, this stops the mixing thread.
	DeviceUnavailable,

	#[error("audio format is invalid or unsupported")]
	/// None of the candidate formats were accepted.
	InvalidFormat,

	#[error("audio specification contains an invalid/unsupported channel count")]
	/// The channel count is not something the backend can do.
	InvalidChannels,

	#[error("audio sample rate is invalid")]
	/// The sample rate was `0` or something the backend can't do.
	InvalidSampleRate,

	#[error("failed to write bytes to the audio stream")]
	/// Failed to write bytes to the audio stream.
	Write,

	#[error("backend is not self-driven")]
	/// `Backend::start` was called on a backend that
	/// expects the mixing thread to drive it.
	NotSelfDriven,

	#[error("audio backend io error: {0}")]
	/// An IO error from a file or device node.
	Io(#[from] std::io::Error),

	#[error("unknown error: {0}")]
	/// An unknown or very specific error occurred.
	///
	/// The `str` will contain more information.
	Unknown(std::borrow::Cow<'static, str>),
}
