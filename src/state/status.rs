//---------------------------------------------------------------------------------------------------- Use
use strum::{
	AsRefStr,
	Display,
	EnumCount,
	EnumIter,
	IntoStaticStr,
};

//---------------------------------------------------------------------------------------------------- AudioStatus
/// Playback status of the device.
///
/// ```rust
/// # use hwaudio::state::*;
/// assert_eq!(AudioStatus::Playing.to_string(), "playing");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Debug,Default,PartialEq,Eq,PartialOrd,Ord,Hash)]
#[derive(AsRefStr,Display,EnumCount,EnumIter,IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum AudioStatus {
	#[default]
	/// No device is open (or it was disabled).
	Stopped,
	/// The device is open and the callback is being called.
	Playing,
	/// The device is open but the callback is not being called.
	Paused,
}

impl AudioStatus {
	#[must_use]
	/// Returns `true` if `self == AudioStatus::Playing`
	pub const fn is_playing(self) -> bool {
		matches!(self, Self::Playing)
	}

	#[must_use]
	/// Returns `true` if `self == AudioStatus::Paused`
	pub const fn is_paused(self) -> bool {
		matches!(self, Self::Paused)
	}

	#[must_use]
	/// Returns `true` if `self == AudioStatus::Stopped`
	pub const fn is_stopped(self) -> bool {
		matches!(self, Self::Stopped)
	}
}
