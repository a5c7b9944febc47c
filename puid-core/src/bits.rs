use std::fmt;

use log::trace;

use crate::error::Result;
use crate::source::EntropySource;

/// Bits needed to index `n_chars` values: `ceil(log2(n_chars))`.
pub fn bits_per_index(n_chars: usize) -> u32 {
	usize::BITS - (n_chars.max(2) - 1).leading_zeros()
}

/// Bit-width ladder for a character count.
///
/// A window of `width` bits is sliced for each index. Values below the
/// character count are accepted. Any other value is rejected, and the
/// ladder tells how many leading bits of the window to drop: only the
/// prefix that already proves the value out of range is consumed, the
/// rest of the window is reused by the next slice.
///
/// ## Invariants
/// - Steps are sorted by `max_value`; widths strictly decrease
/// - The first step has the full `width`
/// - The last step covers `2^width - 1`
/// - A power-of-two count has a single step `(n - 1, log2(n))`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ladder {
	/// Number of characters indexed.
	n_chars: usize,
	/// Full slice width in bits.
	width: u32,
	/// `(max_value, width)` steps.
	steps: Vec<(usize, u32)>,
}

impl Ladder {
	/// Derives the ladder for `n_chars` (at least 2).
	pub fn new(n_chars: usize) -> Self {
		let n_chars = n_chars.max(2);
		let width = bits_per_index(n_chars);

		let base_value = if n_chars % 2 == 0 { n_chars - 1 } else { n_chars };
		let mut steps = vec![(base_value, width)];

		if !n_chars.is_power_of_two() {
			// Every zero bit of the base value opens a range of values whose
			// common prefix is already above it.
			for bit in 2..width {
				if base_value & (1 << (bit - 1)) == 0 {
					steps.push((base_value | ((1 << bit) - 1), width - bit + 1));
				}
			}
		}

		Self { n_chars, width, steps }
	}

	pub fn n_chars(&self) -> usize {
		self.n_chars
	}

	/// Full slice width in bits.
	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn steps(&self) -> &[(usize, u32)] {
		&self.steps
	}

	/// Bits consumed when `value` is sliced.
	///
	/// Accepted values consume the full width; rejected values consume
	/// the width of the first step covering them.
	pub fn shift(&self, value: usize) -> u32 {
		if value < self.n_chars {
			return self.width;
		}
		self.steps
			.iter()
			.find(|(max_value, _)| value <= *max_value)
			.map_or(self.width, |(_, width)| *width)
	}

	/// Expected bits consumed per accepted index.
	///
	/// Every window value is equally likely; attempts repeat until one is
	/// accepted, so the expectation is the total shift over all window
	/// values divided by the number of accepted values.
	pub fn expected_bits(&self) -> f64 {
		let total: u64 = (0..1usize << self.width).map(|value| self.shift(value) as u64).sum();
		total as f64 / self.n_chars as f64
	}
}

/// Slices random bytes into uniformly distributed indices.
///
/// The muncher owns a reservoir of fetched bytes and a bit offset into it.
/// Bytes are read most significant bit first and each bit is used at most
/// once; leftover bits carry over to the next slice, across byte and call
/// boundaries.
pub struct Muncher {
	ladder: Ladder,
	source: Box<dyn EntropySource>,
	/// Fetched bytes not yet fully consumed.
	reservoir: Vec<u8>,
	/// Offset of the next unconsumed bit in `reservoir`.
	offset: usize,
}

impl Muncher {
	pub fn new(n_chars: usize, source: Box<dyn EntropySource>) -> Self {
		Self {
			ladder: Ladder::new(n_chars),
			source,
			reservoir: Vec::new(),
			offset: 0,
		}
	}

	pub fn ladder(&self) -> &Ladder {
		&self.ladder
	}

	/// Next index in `[0, n_chars)`.
	///
	/// # Errors
	/// Propagates any failure of the entropy source.
	pub fn next_index(&mut self) -> Result<usize> {
		let width = self.ladder.width();
		loop {
			let value = self.peek(width)?;
			self.offset += self.ladder.shift(value) as usize;
			if value < self.ladder.n_chars() {
				return Ok(value);
			}
		}
	}

	/// Fills `indices` with consecutive indices.
	pub fn fill(&mut self, indices: &mut [usize]) -> Result<()> {
		for index in indices.iter_mut() {
			*index = self.next_index()?;
		}
		Ok(())
	}

	/// Reads `width` bits at the current offset without consuming them.
	fn peek(&mut self, width: u32) -> Result<usize> {
		self.refill(width as usize)?;

		let mut value = 0;
		for bit in self.offset..self.offset + width as usize {
			let byte = self.reservoir[bit / 8];
			value = (value << 1) | ((byte >> (7 - bit % 8)) & 1) as usize;
		}
		Ok(value)
	}

	/// Makes sure at least `bits` unconsumed bits are buffered.
	///
	/// Fetches exactly the missing number of bytes. A failed fetch leaves
	/// the reservoir untouched.
	fn refill(&mut self, bits: usize) -> Result<()> {
		if self.available() >= bits {
			return Ok(());
		}

		// Drop fully consumed bytes
		let consumed = self.offset / 8;
		self.reservoir.drain(..consumed);
		self.offset -= consumed * 8;

		let n_bytes = (bits - self.available()).div_ceil(8);
		let start = self.reservoir.len();
		self.reservoir.resize(start + n_bytes, 0);
		if let Err(e) = self.source.fill_bytes(&mut self.reservoir[start..]) {
			self.reservoir.truncate(start);
			return Err(e);
		}
		trace!("fetched {n_bytes} random bytes");
		Ok(())
	}

	/// Unconsumed bits in the reservoir.
	fn available(&self) -> usize {
		self.reservoir.len() * 8 - self.offset
	}
}

impl fmt::Debug for Muncher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Muncher")
			.field("ladder", &self.ladder)
			.field("buffered_bits", &self.available())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chars::Charsets;
	use crate::source::FixedBytes;
	use test_case::test_case;

	fn muncher(n_chars: usize, hex: &str) -> Muncher {
		Muncher::new(n_chars, Box::new(FixedBytes::from_hex(hex).unwrap()))
	}

	#[test_case(2, 1)]
	#[test_case(3, 2)]
	#[test_case(8, 3)]
	#[test_case(10, 4)]
	#[test_case(64, 6)]
	#[test_case(65, 7)]
	#[test_case(256, 8)]
	fn index_width(n_chars: usize, width: u32) {
		assert_eq!(bits_per_index(n_chars), width);
	}

	#[test_case(8, &[(7, 3)]; "dingosky")]
	#[test_case(Charsets::Hex.len(), &[(15, 4)]; "hex")]
	#[test_case(Charsets::Base32HexUpper.len(), &[(31, 5)]; "base32 hex upper")]
	#[test_case(Charsets::Safe64.len(), &[(63, 6)]; "safe64")]
	#[test_case(256, &[(255, 8)]; "full byte")]
	fn ladder_pow_2(n_chars: usize, steps: &[(usize, u32)]) {
		assert_eq!(Ladder::new(n_chars).steps(), steps);
	}

	#[test_case(Charsets::Alpha.len(), &[(51, 6), (55, 4), (63, 3)]; "alpha")]
	#[test_case(Charsets::AlphaLower.len(), &[(25, 5), (27, 4), (31, 3)]; "alpha lower")]
	#[test_case(Charsets::AlphaNum.len(), &[(61, 6), (63, 5)]; "alphanum")]
	#[test_case(Charsets::AlphaNumLower.len(), &[(35, 6), (39, 4), (47, 3), (63, 2)]; "alphanum lower")]
	#[test_case(Charsets::SafeAscii.len(), &[(89, 7), (91, 6), (95, 5), (127, 2)]; "safe ascii")]
	#[test_case(5, &[(5, 3), (7, 2)]; "odd")]
	#[test_case(3, &[(3, 2)]; "three")]
	fn ladder_non_pow_2(n_chars: usize, steps: &[(usize, u32)]) {
		assert_eq!(Ladder::new(n_chars).steps(), steps);
	}

	#[test]
	fn ladder_invariants() {
		for n_chars in 2..=256 {
			let ladder = Ladder::new(n_chars);
			let steps = ladder.steps();
			assert_eq!(steps[0].1, ladder.width());
			assert_eq!(steps.last().unwrap().0, (1 << ladder.width()) - 1, "n = {n_chars}");
			for pair in steps.windows(2) {
				assert!(pair[0].0 <= pair[1].0);
				assert!(pair[0].1 > pair[1].1);
			}
		}
	}

	#[test]
	fn rejected_prefix_is_out_of_range() {
		// Every completion of the consumed prefix must be rejected too,
		// otherwise reusing the trailing bits would bias the output.
		for n_chars in 2..=256 {
			let ladder = Ladder::new(n_chars);
			let width = ladder.width();
			for value in n_chars..1 << width {
				let dropped = width - ladder.shift(value);
				let prefix = value >> dropped;
				let lowest = prefix << dropped;
				assert!(lowest >= n_chars, "n = {n_chars}, value = {value}");
			}
		}
	}

	#[test]
	fn expected_bits() {
		for n_chars in 2..=256 {
			let ladder = Ladder::new(n_chars);
			let expected = ladder.expected_bits();
			let rejection_only = ladder.width() as f64 * (1 << ladder.width()) as f64 / n_chars as f64;
			assert!(expected >= (n_chars as f64).log2());
			if n_chars.is_power_of_two() {
				assert_eq!(expected, ladder.width() as f64);
			} else if n_chars == (1 << ladder.width()) - 1 {
				// the only rejected value is all ones, nothing to reuse
				assert_eq!(expected, rejection_only);
			} else {
				assert!(expected < rejection_only, "n = {n_chars}");
			}
		}
	}

	#[test]
	fn byte_aligned() {
		let mut muncher = muncher(16, "99 b4");
		let mut indices = [0; 4];
		muncher.fill(&mut indices).unwrap();
		assert_eq!(indices, [9, 9, 11, 4]);
	}

	#[test]
	fn carry_across_bytes() {
		// 110 001 111 100 100 100 000 000
		let mut muncher = muncher(8, "c7 c9 00");
		let mut indices = [0; 8];
		muncher.fill(&mut indices).unwrap();
		assert_eq!(indices, [6, 1, 7, 4, 4, 4, 0, 0]);
	}

	#[test]
	fn rejections_reuse_bits() {
		// 01010 01111 00100 01000 1101 111 00110
		//                         xxxx xxx
		let mut muncher = muncher(26, "53 c8 8d e6 3e");
		let mut indices = [0; 5];
		muncher.fill(&mut indices).unwrap();
		assert_eq!(indices, [10, 15, 4, 8, 6]);
	}

	#[test]
	fn fetches_only_missing_bytes() {
		let mut muncher = muncher(8, "c7 c9");
		let mut indices = [0; 5];
		muncher.fill(&mut indices).unwrap();
		assert_eq!(indices, [6, 1, 7, 4, 4]);
		assert!(muncher.next_index().is_err());
	}

	#[test]
	fn failed_refill_keeps_state() {
		let mut muncher = muncher(16, "ab");
		assert_eq!(muncher.next_index().unwrap(), 10);
		assert_eq!(muncher.next_index().unwrap(), 11);
		assert!(muncher.next_index().is_err());
		assert_eq!(muncher.available(), 0);
	}
}
