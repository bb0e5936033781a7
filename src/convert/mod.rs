//! Conversion between the callback's format and the device's.
//!
//! When a backend grants something other than what the application
//! asked for, [`AudioCvt`] sits between the two: the callback writes
//! into the converter's buffer in the format it asked for, and the
//! converted bytes are what the device receives.

mod cvt;
pub use cvt::AudioCvt;

mod sample;
