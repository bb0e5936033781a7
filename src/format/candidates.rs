//! Format fallback sequence.

//---------------------------------------------------------------------------------------------------- Use
use crate::format::AudioFormat;
use strum::EnumCount;

//---------------------------------------------------------------------------------------------------- Constants
/// How many candidates each row of [`FORMAT_TABLE`] has.
const FORMAT_COUNT: usize = AudioFormat::COUNT;

/// The fallback table.
///
/// The first column is the preferred format, each row continues
/// with the formats closest to it: same width and sign first,
/// then the byte-swapped/sign-flipped variants, then the other width.
const FORMAT_TABLE: [[AudioFormat; FORMAT_COUNT]; FORMAT_COUNT] = {
	use AudioFormat as F;
	[
		[F::U8,     F::S8,     F::S16LSB, F::S16MSB, F::U16LSB, F::U16MSB],
		[F::S8,     F::U8,     F::S16LSB, F::S16MSB, F::U16LSB, F::U16MSB],
		[F::S16LSB, F::S16MSB, F::U16LSB, F::U16MSB, F::U8,     F::S8    ],
		[F::S16MSB, F::S16LSB, F::U16MSB, F::U16LSB, F::U8,     F::S8    ],
		[F::U16LSB, F::U16MSB, F::S16LSB, F::S16MSB, F::U8,     F::S8    ],
		[F::U16MSB, F::U16LSB, F::S16MSB, F::S16LSB, F::U8,     F::S8    ],
	]
};

//---------------------------------------------------------------------------------------------------- FormatCandidates
/// An ordered sequence of formats to offer a backend.
///
/// Created with [`AudioFormat::candidates`], this yields the
/// preferred format first, then the formats most similar to it.
///
/// The sequence is finite (always `6` formats, or `0` if created
/// from an unknown raw code) and can be restarted with [`Self::restart`].
///
/// ```rust
/// # use hwaudio::format::*;
/// let mut c = AudioFormat::U8.candidates();
/// assert_eq!(c.next(), Some(AudioFormat::U8));
/// assert_eq!(c.next(), Some(AudioFormat::S8));
/// assert_eq!(c.next(), Some(AudioFormat::S16LSB));
/// assert_eq!(c.next(), Some(AudioFormat::S16MSB));
/// assert_eq!(c.next(), Some(AudioFormat::U16LSB));
/// assert_eq!(c.next(), Some(AudioFormat::U16MSB));
/// assert_eq!(c.next(), None);
/// ```
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
pub struct FormatCandidates {
	/// Row in [`FORMAT_TABLE`], `None` if the preferred format was unknown.
	row: Option<usize>,
	/// Next column to yield.
	index: usize,
}

impl FormatCandidates {
	#[inline]
	#[must_use]
	/// Start a sequence at `preferred`.
	pub const fn new(preferred: AudioFormat) -> Self {
		let mut row = 0;
		while row < FORMAT_COUNT {
			if FORMAT_TABLE[row][0] as u8 == preferred as u8 {
				break;
			}
			row += 1;
		}
		Self { row: Some(row), index: 0 }
	}

	#[inline]
	#[must_use]
	/// Start a sequence at a raw format code.
	///
	/// If `raw` isn't one of the 6 base formats, the sequence is empty.
	///
	/// ```rust
	/// # use hwaudio::format::*;
	/// assert_eq!(FormatCandidates::from_raw(0x8010).next(), Some(AudioFormat::S16LSB));
	/// assert_eq!(FormatCandidates::from_raw(0x0020).next(), None);
	/// ```
	pub const fn from_raw(raw: u16) -> Self {
		match AudioFormat::from_raw(raw) {
			Some(format) => Self::new(format),
			None => Self { row: None, index: 0 },
		}
	}

	#[inline]
	/// Start the sequence over from the preferred format.
	pub fn restart(&mut self) {
		self.index = 0;
	}

	#[inline]
	#[must_use]
	/// The preferred format, if any.
	pub fn preferred(&self) -> Option<AudioFormat> {
		self.row.map(|row| FORMAT_TABLE[row][0])
	}
}

impl Iterator for FormatCandidates {
	type Item = AudioFormat;

	fn next(&mut self) -> Option<AudioFormat> {
		let row = self.row?;
		let format = FORMAT_TABLE[row].get(self.index).copied()?;
		self.index += 1;
		Some(format)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = match self.row {
			Some(_) => FORMAT_COUNT.saturating_sub(self.index),
			None => 0,
		};
		(len, Some(len))
	}
}

impl ExactSizeIterator for FormatCandidates {}
impl std::iter::FusedIterator for FormatCandidates {}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use strum::IntoEnumIterator;

	#[test]
	fn six_then_none() {
		for f in AudioFormat::iter() {
			let mut c = f.candidates();
			assert_eq!(c.len(), 6);
			let v: Vec<AudioFormat> = c.by_ref().collect();
			assert_eq!(v.len(), 6);
			assert_eq!(v[0], f);
			// 7th and beyond.
			assert_eq!(c.next(), None);
			assert_eq!(c.next(), None);
		}
	}

	#[test]
	fn each_row_is_a_permutation() {
		for f in AudioFormat::iter() {
			let mut v: Vec<AudioFormat> = f.candidates().collect();
			v.sort();
			let mut all: Vec<AudioFormat> = AudioFormat::iter().collect();
			all.sort();
			assert_eq!(v, all);
		}
	}

	#[test]
	fn row_order() {
		use AudioFormat as F;
		assert_eq!(
			F::S16MSB.candidates().collect::<Vec<_>>(),
			[F::S16MSB, F::S16LSB, F::U16MSB, F::U16LSB, F::U8, F::S8],
		);
		assert_eq!(
			F::U16LSB.candidates().collect::<Vec<_>>(),
			[F::U16LSB, F::U16MSB, F::S16LSB, F::S16MSB, F::U8, F::S8],
		);
	}

	#[test]
	fn restart() {
		let mut c = AudioFormat::S8.candidates();
		let first: Vec<AudioFormat> = c.by_ref().collect();
		assert_eq!(c.next(), None);
		c.restart();
		let second: Vec<AudioFormat> = c.collect();
		assert_eq!(first, second);
	}

	#[test]
	fn unknown_raw_is_empty() {
		let mut c = FormatCandidates::from_raw(0x0018);
		assert_eq!(c.preferred(), None);
		assert_eq!(c.len(), 0);
		assert_eq!(c.next(), None);
		c.restart();
		assert_eq!(c.next(), None);
	}
}
