use crate::chars::{Charset, Charsets};

/// Runs of consecutive ASCII characters: `(first index, first character)`.
///
/// The character for index `i` is found in the last run starting at or
/// before `i`, offset by the distance from the run start.
type Runs = &'static [(usize, u8)];

const ALPHA: Runs = &[(0, b'A'), (26, b'a')];
const ALPHA_LOWER: Runs = &[(0, b'a')];
const ALPHA_UPPER: Runs = &[(0, b'A')];
const ALPHANUM: Runs = &[(0, b'A'), (26, b'a'), (52, b'0')];
const ALPHANUM_LOWER: Runs = &[(0, b'a'), (26, b'0')];
const ALPHANUM_UPPER: Runs = &[(0, b'A'), (26, b'0')];
const BASE32: Runs = &[(0, b'A'), (26, b'2')];
const CROCKFORD32: Runs = &[(0, b'0'), (10, b'A'), (18, b'J'), (20, b'M'), (22, b'P'), (27, b'V')];
const DECIMAL: Runs = &[(0, b'0')];
const HEX_LOWER: Runs = &[(0, b'0'), (10, b'a')];
const HEX_UPPER: Runs = &[(0, b'0'), (10, b'A')];
const SAFE_ASCII: Runs = &[(0, b'!'), (1, b'#'), (5, b'('), (57, b']'), (60, b'a')];
const SAFE32: Runs = &[
	(0, b'2'),
	(3, b'6'),
	(7, b'b'),
	(8, b'd'),
	(9, b'f'),
	(12, b'j'),
	(13, b'm'),
	(15, b'p'),
	(18, b't'),
	(19, b'B'),
	(20, b'D'),
	(21, b'F'),
	(24, b'J'),
	(25, b'L'),
	(28, b'P'),
	(31, b'T'),
];
const SAFE64: Runs = &[(0, b'A'), (26, b'a'), (52, b'0'), (62, b'-'), (63, b'_')];
const SYMBOL: Runs = &[(0, b'!'), (1, b'#'), (5, b'('), (13, b':'), (20, b'['), (21, b']'), (24, b'{')];
const WORD_SAFE32: Runs = &[
	(0, b'2'),
	(8, b'C'),
	(9, b'F'),
	(12, b'J'),
	(13, b'M'),
	(14, b'P'),
	(17, b'V'),
	(20, b'c'),
	(21, b'f'),
	(24, b'j'),
	(25, b'm'),
	(26, b'p'),
	(29, b'v'),
];

fn runs(kind: Charsets) -> Runs {
	match kind {
		Charsets::Alpha => ALPHA,
		Charsets::AlphaLower => ALPHA_LOWER,
		Charsets::AlphaUpper => ALPHA_UPPER,
		Charsets::AlphaNum => ALPHANUM,
		Charsets::AlphaNumLower => ALPHANUM_LOWER,
		Charsets::AlphaNumUpper => ALPHANUM_UPPER,
		Charsets::Base16 | Charsets::HexUpper => HEX_UPPER,
		Charsets::Base32 => BASE32,
		Charsets::Base32Hex | Charsets::Hex => HEX_LOWER,
		Charsets::Base32HexUpper => HEX_UPPER,
		Charsets::Crockford32 => CROCKFORD32,
		Charsets::Decimal => DECIMAL,
		Charsets::SafeAscii => SAFE_ASCII,
		Charsets::Safe32 => SAFE32,
		Charsets::Safe64 => SAFE64,
		Charsets::Symbol => SYMBOL,
		Charsets::WordSafe32 => WORD_SAFE32,
	}
}

/// Maps muncher indices to characters.
///
/// Predefined sets compute the character from their runs, custom sets
/// look it up by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Encoder {
	Runs(Runs),
	Lookup(Vec<char>),
}

impl Encoder {
	pub fn new(charset: &Charset) -> Self {
		match charset.kind() {
			Some(kind) => Encoder::Runs(runs(kind)),
			None => Encoder::Lookup(charset.chars().to_vec()),
		}
	}

	/// Character for `index`.
	///
	/// `index` must be below the character count; the muncher never
	/// produces anything else.
	pub fn encode(&self, index: usize) -> char {
		match self {
			Encoder::Runs(runs) => {
				let (start, first) = runs
					.iter()
					.rev()
					.find(|(start, _)| *start <= index)
					.copied()
					.unwrap_or(runs[0]);
				char::from(first + (index - start) as u8)
			}
			Encoder::Lookup(chars) => chars[index],
		}
	}
}
