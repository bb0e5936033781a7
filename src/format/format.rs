//! Audio sample format.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	error::ParseFormatError,
	format::FormatCandidates,
};
use strum::{
	AsRefStr,
	Display,
	EnumCount,
	EnumIter,
	IntoStaticStr,
};

//---------------------------------------------------------------------------------------------------- Constants
/// Bit set in the raw code of signed formats.
const RAW_SIGNED: u16 = 0x8000;
/// Bit set in the raw code of big endian formats.
const RAW_BIG_ENDIAN: u16 = 0x1000;
/// Mask for the bit width of the raw code.
const RAW_BITS: u16 = 0x00FF;

//---------------------------------------------------------------------------------------------------- AudioFormat
/// PCM sample format.
///
/// Each format is a combination of:
/// - sign (`U`nsigned or `S`igned)
/// - bit width (`8` or `16`)
/// - endianness (`LSB` little endian or `MSB` big endian, 16-bit only)
///
/// The `Display` implementation prints the canonical
/// string form which [`AudioFormat::parse`] accepts back.
///
/// ```rust
/// # use hwaudio::format::*;
/// assert_eq!(AudioFormat::S16LSB.to_string(), "S16LSB");
/// assert_eq!(AudioFormat::parse("S16LSB"), Some(AudioFormat::S16LSB));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
#[derive(AsRefStr,Display,EnumCount,EnumIter,IntoStaticStr)]
pub enum AudioFormat {
	/// Unsigned 8-bit samples.
	U8,
	/// Signed 8-bit samples.
	S8,
	/// Unsigned 16-bit samples, little endian.
	U16LSB,
	/// Signed 16-bit samples, little endian.
	S16LSB,
	/// Unsigned 16-bit samples, big endian.
	U16MSB,
	/// Signed 16-bit samples, big endian.
	S16MSB,
}

impl AudioFormat {
	/// Signed 16-bit samples in the host's native byte order.
	pub const S16SYS: Self = if cfg!(target_endian = "big") { Self::S16MSB } else { Self::S16LSB };

	/// Unsigned 16-bit samples in the host's native byte order.
	pub const U16SYS: Self = if cfg!(target_endian = "big") { Self::U16MSB } else { Self::U16LSB };

	/// The default format picked when nothing was requested.
	pub const DEFAULT: Self = Self::S16SYS;

	#[inline]
	#[must_use]
	/// How many bits a single sample takes.
	pub const fn bit_width(self) -> u8 {
		match self {
			Self::U8 | Self::S8 => 8,
			_ => 16,
		}
	}

	#[inline]
	#[must_use]
	/// How many bytes a single sample takes.
	pub const fn bytes(self) -> usize {
		self.bit_width() as usize / 8
	}

	#[inline]
	#[must_use]
	/// Is this a signed format?
	pub const fn is_signed(self) -> bool {
		matches!(self, Self::S8 | Self::S16LSB | Self::S16MSB)
	}

	#[inline]
	#[must_use]
	/// Is this a big endian format?
	///
	/// 8-bit formats are never big endian.
	pub const fn is_big_endian(self) -> bool {
		matches!(self, Self::U16MSB | Self::S16MSB)
	}

	#[inline]
	#[must_use]
	/// Is this format in the host's native byte order?
	///
	/// 8-bit formats always are.
	pub const fn is_native_endian(self) -> bool {
		self.bit_width() == 8 || self.is_big_endian() == cfg!(target_endian = "big")
	}

	#[inline]
	#[must_use]
	/// The byte value of a silent sample in this format.
	///
	/// ```rust
	/// # use hwaudio::format::*;
	/// assert_eq!(AudioFormat::U8.silence(), 0x80);
	/// assert_eq!(AudioFormat::S16LSB.silence(), 0x00);
	/// ```
	///
	/// Unsigned 16-bit silence is `0x8000` which can't be expressed
	/// as a repeated byte, it is `0x00` here as well.
	pub const fn silence(self) -> u8 {
		match self {
			Self::U8 => 0x80,
			_ => 0x00,
		}
	}

	#[inline]
	#[must_use]
	/// Returns the same format with the opposite sign.
	pub const fn flip_sign(self) -> Self {
		match self {
			Self::U8     => Self::S8,
			Self::S8     => Self::U8,
			Self::U16LSB => Self::S16LSB,
			Self::S16LSB => Self::U16LSB,
			Self::U16MSB => Self::S16MSB,
			Self::S16MSB => Self::U16MSB,
		}
	}

	#[inline]
	#[must_use]
	/// Returns the same format with the opposite byte order.
	///
	/// 8-bit formats are returned as-is.
	pub const fn swap_endian(self) -> Self {
		match self {
			Self::U16LSB => Self::U16MSB,
			Self::U16MSB => Self::U16LSB,
			Self::S16LSB => Self::S16MSB,
			Self::S16MSB => Self::S16LSB,
			x => x,
		}
	}

	#[inline]
	#[must_use]
	/// The raw 16-bit format code.
	///
	/// Bit 15 is the sign, bit 12 is big endian, the low byte is the bit width.
	///
	/// ```rust
	/// # use hwaudio::format::*;
	/// assert_eq!(AudioFormat::U8.to_raw(),     0x0008);
	/// assert_eq!(AudioFormat::S16MSB.to_raw(), 0x9010);
	/// ```
	pub const fn to_raw(self) -> u16 {
		let mut raw = self.bit_width() as u16;
		if self.is_signed() {
			raw |= RAW_SIGNED;
		}
		if self.is_big_endian() {
			raw |= RAW_BIG_ENDIAN;
		}
		raw
	}

	#[must_use]
	/// Parse a raw 16-bit format code.
	///
	/// Returns `None` for codes that aren't one of the 6 base formats.
	pub const fn from_raw(raw: u16) -> Option<Self> {
		let signed = raw & RAW_SIGNED != 0;
		let big    = raw & RAW_BIG_ENDIAN != 0;
		if raw & !(RAW_SIGNED | RAW_BIG_ENDIAN | RAW_BITS) != 0 {
			return None;
		}
		match (raw & RAW_BITS, signed, big) {
			(8,  false, false) => Some(Self::U8),
			(8,  true,  false) => Some(Self::S8),
			(16, false, false) => Some(Self::U16LSB),
			(16, true,  false) => Some(Self::S16LSB),
			(16, false, true)  => Some(Self::U16MSB),
			(16, true,  true)  => Some(Self::S16MSB),
			_ => None,
		}
	}

	#[inline]
	#[must_use]
	/// The ordered fallback sequence starting at this format.
	///
	/// See [`FormatCandidates`].
	pub const fn candidates(self) -> FormatCandidates {
		FormatCandidates::new(self)
	}

	#[must_use]
	/// Parse a format string.
	///
	/// The grammar is `[U|S]<8|16>[LSB|MSB|SYS]`:
	/// - 8-bit formats take no suffix
	/// - 16-bit formats need one, `SYS` is the host byte order
	///
	/// Anything else returns `None`, there are no partial matches.
	///
	/// ```rust
	/// # use hwaudio::format::*;
	/// assert_eq!(AudioFormat::parse("U8"),      Some(AudioFormat::U8));
	/// assert_eq!(AudioFormat::parse("S16MSB"),  Some(AudioFormat::S16MSB));
	/// assert_eq!(AudioFormat::parse("S16SYS"),  Some(AudioFormat::S16SYS));
	/// assert_eq!(AudioFormat::parse("S"),       None);
	/// assert_eq!(AudioFormat::parse("U7"),      None);
	/// assert_eq!(AudioFormat::parse("S16"),     None);
	/// assert_eq!(AudioFormat::parse("u8"),      None);
	/// ```
	pub fn parse(s: &str) -> Option<Self> {
		let (signed, rest) = if let Some(rest) = s.strip_prefix('S') {
			(true, rest)
		} else if let Some(rest) = s.strip_prefix('U') {
			(false, rest)
		} else {
			return None;
		};

		if rest == "8" {
			return Some(if signed { Self::S8 } else { Self::U8 });
		}

		let big = match rest.strip_prefix("16")? {
			"LSB" => false,
			"MSB" => true,
			"SYS" => cfg!(target_endian = "big"),
			_ => return None,
		};

		Some(match (signed, big) {
			(false, false) => Self::U16LSB,
			(true,  false) => Self::S16LSB,
			(false, true)  => Self::U16MSB,
			(true,  true)  => Self::S16MSB,
		})
	}
}

impl Default for AudioFormat {
	#[inline]
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl std::str::FromStr for AudioFormat {
	type Err = ParseFormatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s).ok_or_else(|| ParseFormatError(s.to_string()))
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use strum::IntoEnumIterator;

	#[test]
	fn parse_display_roundtrip() {
		for f in AudioFormat::iter() {
			assert_eq!(AudioFormat::parse(&f.to_string()), Some(f));
			assert_eq!(f.to_string().parse::<AudioFormat>(), Ok(f));
		}
	}

	#[test]
	fn parse_sys() {
		assert_eq!(AudioFormat::parse("S16SYS"), Some(AudioFormat::S16SYS));
		assert_eq!(AudioFormat::parse("U16SYS"), Some(AudioFormat::U16SYS));
		assert!(AudioFormat::S16SYS.is_native_endian());
		assert!(AudioFormat::U16SYS.is_native_endian());
	}

	#[test]
	fn parse_garbage() {
		for s in [
			"", "XYZ", "S", "U", "U7", "S9", "S16", "U16", "S8LSB", "U8MSB",
			"S16LSBX", "S16lsb", "s16LSB", " S16LSB", "S16LSB ", "S32LSB", "S016LSB",
			"16LSB", "S1", "U816",
		] {
			assert_eq!(AudioFormat::parse(s), None, "{s:?}");
			assert_eq!(s.parse::<AudioFormat>(), Err(ParseFormatError(s.to_string())));
		}
	}

	#[test]
	fn raw_roundtrip() {
		for f in AudioFormat::iter() {
			assert_eq!(AudioFormat::from_raw(f.to_raw()), Some(f));
		}
		assert_eq!(AudioFormat::U16LSB.to_raw(), 0x0010);
		assert_eq!(AudioFormat::S16LSB.to_raw(), 0x8010);
		assert_eq!(AudioFormat::U16MSB.to_raw(), 0x1010);
		assert_eq!(AudioFormat::S8.to_raw(),     0x8008);
	}

	#[test]
	fn raw_unknown() {
		for raw in [0, 0x0020, 0x8020, 0x1008, 0x0108, 0x4010, 0xFFFF] {
			assert_eq!(AudioFormat::from_raw(raw), None, "{raw:#06x}");
		}
	}

	#[test]
	fn silence() {
		for f in AudioFormat::iter() {
			let expected = if f == AudioFormat::U8 { 0x80 } else { 0x00 };
			assert_eq!(f.silence(), expected, "{f}");
		}
	}

	#[test]
	fn flip_and_swap_are_involutions() {
		for f in AudioFormat::iter() {
			assert_eq!(f.flip_sign().flip_sign(), f);
			assert_eq!(f.swap_endian().swap_endian(), f);
			assert_ne!(f.flip_sign().is_signed(), f.is_signed());
			assert_eq!(f.swap_endian().bit_width(), f.bit_width());
		}
	}
}
