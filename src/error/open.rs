//---------------------------------------------------------------------------------------------------- Use
use crate::error::OutputError;

#[allow(unused_imports)] // docs
use crate::{Audio,spec::DesiredSpec};

//---------------------------------------------------------------------------------------------------- OpenError
#[derive(thiserror::Error, Debug)]
/// Errors when opening the audio device.
///
/// Validation failures on the [`DesiredSpec`] are reported
/// before any backend or resource allocation happens.
///
/// Any other failure rolls back everything [`Audio::open`]
/// allocated so far before it is returned.
pub enum OpenError {
	#[error("no available audio device")]
	/// No backend probed successfully.
	///
	/// This is not fatal when creating [`Audio`], selection
	/// is retried when the device is actually opened.
	NoAvailableDevice,

	#[error("audio driver `{0}` is not available")]
	/// A backend was requested by name, but it
	/// either does not exist or is not available.
	NoSuchDevice(String),

	#[error("audio device is already opened")]
	/// A device is already open in this [`Audio`].
	AlreadyOpen,

	#[error("{0} channels is unsupported, only 1, 2, 4, and 6 channels are supported")]
	/// The requested channel count is not one of `1`, `2`, `4`, `6`.
	UnsupportedChannels(u8),

	#[error("no callback was provided")]
	/// The [`DesiredSpec`] had no callback, nothing could produce audio.
	MissingCallback,

	#[error("unsupported audio format: {0}")]
	/// The configured format string was malformed, or no
	/// conversion exists between the desired and obtained format.
	UnsupportedFormat(String),

	#[error("audio backend rejected the device: {0}")]
	/// The backend's own open operation failed.
	BackendRejected(#[from] OutputError),

	#[error("out of memory")]
	/// An allocation failed (fallback buffer, conversion buffer, mixing thread).
	OutOfMemory,
}

impl OpenError {
	#[must_use]
	/// Returns `true` if this error came from the backend.
	pub const fn is_backend(&self) -> bool {
		matches!(self, Self::BackendRejected(_))
	}
}
