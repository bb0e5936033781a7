//! Per-sample decode/encode.
//!
//! Every format is widened to a signed 16-bit sample
//! while it is channel-mapped and resampled.

//---------------------------------------------------------------------------------------------------- Use
use crate::format::AudioFormat;

//---------------------------------------------------------------------------------------------------- Free functions
#[inline]
/// Read one sample from the start of `bytes`.
///
/// `bytes` must hold at least `format.bytes()` bytes.
pub(super) fn decode(format: AudioFormat, bytes: &[u8]) -> i16 {
	use AudioFormat as F;
	match format {
		F::U8     => (i16::from(bytes[0]) - 0x80) << 8,
		F::S8     => i16::from(bytes[0] as i8) << 8,
		F::S16LSB => i16::from_le_bytes([bytes[0], bytes[1]]),
		F::S16MSB => i16::from_be_bytes([bytes[0], bytes[1]]),
		F::U16LSB => (u16::from_le_bytes([bytes[0], bytes[1]]) ^ 0x8000) as i16,
		F::U16MSB => (u16::from_be_bytes([bytes[0], bytes[1]]) ^ 0x8000) as i16,
	}
}

#[inline]
/// Write one sample to the start of `bytes`.
pub(super) fn encode(format: AudioFormat, sample: i16, bytes: &mut [u8]) {
	use AudioFormat as F;
	let unsigned = (sample as u16) ^ 0x8000;
	match format {
		F::U8     => bytes[0] = (unsigned >> 8) as u8,
		F::S8     => bytes[0] = (sample >> 8) as u8,
		F::S16LSB => bytes[..2].copy_from_slice(&sample.to_le_bytes()),
		F::S16MSB => bytes[..2].copy_from_slice(&sample.to_be_bytes()),
		F::U16LSB => bytes[..2].copy_from_slice(&unsigned.to_le_bytes()),
		F::U16MSB => bytes[..2].copy_from_slice(&unsigned.to_be_bytes()),
	}
}
