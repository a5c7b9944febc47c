use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CharsError, Error};

/// Smallest allowed character set.
pub const MIN_CHARS: usize = 2;

/// Largest allowed character set (8 bits per character).
pub const MAX_CHARS: usize = 256;

/// Predefined character sets.
///
/// Each variant maps to a literal, order-significant string: the index
/// produced by the muncher selects the character at that position.
///
/// Names are snake_case (`"alpha_lower"`) for serde, `Display` and
/// `FromStr`. Parsing ignores ASCII case.
#[derive(
	Serialize,
	Deserialize,
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	strum::Display,
	strum::EnumString,
	strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(
	serialize_all = "snake_case",
	ascii_case_insensitive,
	parse_err_ty = Error,
	parse_err_fn = unknown_charset
)]
pub enum Charsets {
	Alpha,
	AlphaLower,
	AlphaUpper,
	#[serde(rename = "alphanum")]
	#[strum(serialize = "alphanum")]
	AlphaNum,
	#[serde(rename = "alphanum_lower")]
	#[strum(serialize = "alphanum_lower")]
	AlphaNumLower,
	#[serde(rename = "alphanum_upper")]
	#[strum(serialize = "alphanum_upper")]
	AlphaNumUpper,
	Base16,
	Base32,
	Base32Hex,
	Base32HexUpper,
	Crockford32,
	Decimal,
	Hex,
	HexUpper,
	SafeAscii,
	Safe32,
	Safe64,
	Symbol,
	WordSafe32,
}

impl Charsets {
	/// The whole catalogue, in a stable order.
	pub const ALL: [Charsets; 19] = [
		Charsets::Alpha,
		Charsets::AlphaLower,
		Charsets::AlphaUpper,
		Charsets::AlphaNum,
		Charsets::AlphaNumLower,
		Charsets::AlphaNumUpper,
		Charsets::Base16,
		Charsets::Base32,
		Charsets::Base32Hex,
		Charsets::Base32HexUpper,
		Charsets::Crockford32,
		Charsets::Decimal,
		Charsets::Hex,
		Charsets::HexUpper,
		Charsets::SafeAscii,
		Charsets::Safe32,
		Charsets::Safe64,
		Charsets::Symbol,
		Charsets::WordSafe32,
	];

	/// Returns the characters of this set, in index order.
	pub const fn as_str(self) -> &'static str {
		match self {
			Charsets::Alpha => "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
			Charsets::AlphaLower => "abcdefghijklmnopqrstuvwxyz",
			Charsets::AlphaUpper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
			Charsets::AlphaNum => "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
			Charsets::AlphaNumLower => "abcdefghijklmnopqrstuvwxyz0123456789",
			Charsets::AlphaNumUpper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
			Charsets::Base16 => "0123456789ABCDEF",
			Charsets::Base32 => "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567",
			Charsets::Base32Hex => "0123456789abcdefghijklmnopqrstuv",
			Charsets::Base32HexUpper => "0123456789ABCDEFGHIJKLMNOPQRSTUV",
			Charsets::Crockford32 => "0123456789ABCDEFGHJKMNPQRSTVWXYZ",
			Charsets::Decimal => "0123456789",
			Charsets::Hex => "0123456789abcdef",
			Charsets::HexUpper => "0123456789ABCDEF",
			Charsets::SafeAscii => {
				"!#$%&()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[]^_abcdefghijklmnopqrstuvwxyz{|}~"
			}
			Charsets::Safe32 => "2346789bdfghjmnpqrtBDFGHJLMNPQRT",
			Charsets::Safe64 => "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_",
			Charsets::Symbol => "!#$%&()*+,-./:;<=>?@[]^_{|}~",
			Charsets::WordSafe32 => "23456789CFGHJMPQRVWXcfghjmpqrvwx",
		}
	}

	/// Number of characters in this set. All predefined sets are ASCII.
	pub const fn len(self) -> usize {
		self.as_str().len()
	}

	/// The snake_case name of this set.
	pub fn name(self) -> &'static str {
		self.into()
	}
}

fn unknown_charset(name: &str) -> Error {
	Error::UnknownCharset(name.to_owned())
}

/// Character set selector given to a generator.
///
/// Resolved once, at construction, into a validated `Charset`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Chars {
	Predefined(Charsets),
	Custom(String),
}

impl From<Charsets> for Chars {
	fn from(kind: Charsets) -> Self {
		Chars::Predefined(kind)
	}
}

impl From<&str> for Chars {
	fn from(chars: &str) -> Self {
		Chars::Custom(chars.to_owned())
	}
}

impl From<String> for Chars {
	fn from(chars: String) -> Self {
		Chars::Custom(chars)
	}
}

/// A validated character set.
///
/// ## Invariants
/// - Between `MIN_CHARS` and `MAX_CHARS` characters
/// - No character repeats
/// - Every character passes `is_valid_char`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Charset {
	/// Catalogue tag, `None` for custom sets.
	kind: Option<Charsets>,
	/// Characters in index order.
	chars: Vec<char>,
}

impl Charset {
	/// Builds a character set from the catalogue.
	pub fn predefined(kind: Charsets) -> Self {
		Self {
			kind: Some(kind),
			chars: kind.as_str().chars().collect(),
		}
	}

	/// Builds a character set from caller supplied text.
	///
	/// # Errors
	/// Returns the first validation failure, checked in order:
	/// length bounds, repeated characters, invalid characters.
	pub fn custom(chars: &str) -> Result<Self, CharsError> {
		validate(chars)?;
		Ok(Self {
			kind: None,
			chars: chars.chars().collect(),
		})
	}

	/// Resolves a selector into a character set.
	pub fn resolve(chars: &Chars) -> Result<Self, CharsError> {
		match chars {
			Chars::Predefined(kind) => Ok(Self::predefined(*kind)),
			Chars::Custom(text) => Self::custom(text),
		}
	}

	/// Catalogue tag, or `None` for a custom set.
	pub fn kind(&self) -> Option<Charsets> {
		self.kind
	}

	/// Number of characters.
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	/// Always false: a valid set has at least two characters.
	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	pub fn contains(&self, c: char) -> bool {
		self.chars.contains(&c)
	}

	/// Characters in index order.
	pub fn chars(&self) -> &[char] {
		&self.chars
	}

	pub fn as_string(&self) -> String {
		self.chars.iter().collect()
	}

	/// Size of the set encoded as UTF-8, in bytes.
	pub fn utf8_len(&self) -> usize {
		self.chars.iter().map(|c| c.len_utf8()).sum()
	}
}

impl fmt::Display for Charset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind {
			Some(kind) => write!(f, "{kind}"),
			None => write!(f, "custom({})", self.as_string()),
		}
	}
}

/// Validates a candidate character set.
pub fn validate(chars: &str) -> Result<(), CharsError> {
	let len = chars.chars().count();
	if !(MIN_CHARS..=MAX_CHARS).contains(&len) {
		return Err(CharsError::LengthOutOfBounds(len));
	}

	let mut seen = HashSet::with_capacity(len);
	if let Some(repeated) = chars.chars().find(|c| !seen.insert(*c)) {
		return Err(CharsError::NonUniqueChars(repeated));
	}

	match chars.chars().find(|c| !is_valid_char(*c)) {
		Some(invalid) => Err(CharsError::InvalidChars(invalid as u32)),
		None => Ok(()),
	}
}

/// Whether a character may appear in a character set.
///
/// Everything above code point 160 is allowed. Below that, only printable
/// ASCII from `!` to `~` is allowed, minus space, `"`, `'`, `\` and `` ` ``.
pub fn is_valid_char(c: char) -> bool {
	let code_point = c as u32;

	if code_point > 160 {
		return true;
	}
	if c == '!' {
		return true;
	}
	if code_point < '#' as u32 {
		return false;
	}
	if matches!(c, '\'' | '\\' | '`') {
		return false;
	}
	code_point <= '~' as u32
}

#[cfg(test)]
mod tests {
	use super::*;
	use test_case::test_case;

	#[test]
	fn predefined_sets_are_valid() {
		for kind in Charsets::ALL {
			assert_eq!(validate(kind.as_str()), Ok(()), "{kind}");
			assert_eq!(Charset::predefined(kind).len(), kind.len());
		}
	}

	#[test_case(Charsets::Alpha, 52)]
	#[test_case(Charsets::AlphaNum, 62)]
	#[test_case(Charsets::AlphaNumLower, 36)]
	#[test_case(Charsets::Decimal, 10)]
	#[test_case(Charsets::SafeAscii, 90)]
	#[test_case(Charsets::Safe64, 64)]
	#[test_case(Charsets::Symbol, 28)]
	#[test_case(Charsets::WordSafe32, 32)]
	fn predefined_sizes(kind: Charsets, size: usize) {
		assert_eq!(Charset::predefined(kind).len(), size);
	}

	#[test]
	fn names_round_trip() {
		for kind in Charsets::ALL {
			assert_eq!(kind.name().parse::<Charsets>().unwrap(), kind);
			assert_eq!(kind.to_string(), kind.name());
			let json = format!("\"{}\"", kind.name());
			assert_eq!(serde_json::from_str::<Charsets>(&json).unwrap(), kind);
		}
		assert_eq!(Charsets::Base32HexUpper.name(), "base32_hex_upper");
		assert_eq!(Charsets::AlphaNum.name(), "alphanum");
		assert_eq!("Alpha_Lower".parse::<Charsets>().unwrap(), Charsets::AlphaLower);
		assert!(matches!("alpha-lower".parse::<Charsets>(), Err(Error::UnknownCharset(_))));
		assert!(matches!("base64".parse::<Charsets>(), Err(Error::UnknownCharset(_))));
	}

	#[test]
	fn custom_set_keeps_order() {
		let charset = Charset::custom("dîngøsky").unwrap();
		assert_eq!(charset.len(), 8);
		assert_eq!(charset.kind(), None);
		assert_eq!(charset.chars()[1], 'î');
		assert!(charset.contains('ø'));
		assert!(!charset.contains('o'));
		assert_eq!(charset.utf8_len(), 10);
	}

	#[test]
	fn non_unique() {
		assert_eq!(Charset::custom("non-unique"), Err(CharsError::NonUniqueChars('n')));
		assert_eq!(Charset::custom("unique"), Err(CharsError::NonUniqueChars('u')));
	}

	#[test]
	fn length_bounds() {
		assert_eq!(Charset::custom("1"), Err(CharsError::LengthOutOfBounds(1)));
		assert_eq!(Charset::custom(""), Err(CharsError::LengthOutOfBounds(0)));

		let too_long: String = (0..257).map(|n| char::from_u32(0x100 + n).unwrap()).collect();
		assert_eq!(Charset::custom(&too_long), Err(CharsError::LengthOutOfBounds(257)));

		let max: String = too_long.chars().take(256).collect();
		assert!(Charset::custom(&max).is_ok());
	}

	#[test_case("dingo sky", ' '; "space")]
	#[test_case("dingo\nsky", '\n'; "newline")]
	#[test_case("dingo\\sky", '\\'; "backslash")]
	#[test_case("dingo`sky", '`'; "backtick")]
	#[test_case("dingo'sky", '\''; "single quote")]
	#[test_case("dingo\"sky", '"'; "double quote")]
	#[test_case("dingo\u{7f}sky", '\u{7f}'; "delete")]
	#[test_case("dingo\u{a0}sky", '\u{a0}'; "no-break space")]
	fn invalid_chars(chars: &str, invalid: char) {
		assert_eq!(Charset::custom(chars), Err(CharsError::InvalidChars(invalid as u32)));
	}

	#[test]
	fn only_invalid_chars() {
		assert_eq!(Charset::custom("'\\`"), Err(CharsError::InvalidChars('\'' as u32)));
	}

	#[test]
	fn extended_chars_are_valid() {
		assert!(is_valid_char('¡'));
		assert!(is_valid_char('￦'));
		assert!(is_valid_char('!'));
		assert!(is_valid_char('~'));
		assert!(!is_valid_char('"'));
	}

	#[test]
	fn selector_resolution() {
		let predefined = Charset::resolve(&Chars::from(Charsets::Hex)).unwrap();
		assert_eq!(predefined.kind(), Some(Charsets::Hex));
		assert_eq!(predefined.to_string(), "hex");

		let custom = Charset::resolve(&Chars::from("dingosky")).unwrap();
		assert_eq!(custom.to_string(), "custom(dingosky)");
	}
}
