//! Error types for the puid library.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Character set validation failures.
///
/// Each variant carries the detail needed to act on it: the offending
/// length, the first repeated character or the first invalid code point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharsError {
	/// The character set is shorter than 2 or longer than 256 characters.
	#[error("character sets must be [2-256] characters long, got {0}")]
	LengthOutOfBounds(usize),
	/// A character appears more than once.
	#[error("character '{0}' repeats in the character set")]
	NonUniqueChars(char),
	/// A character is not allowed in a character set.
	#[error("invalid character with code point {0}")]
	InvalidChars(u32),
}

/// Errors raised while configuring a generator or drawing random bytes.
///
/// Configuration errors (`is_config_error`) surface at construction; once a
/// generator exists, only entropy source failures remain.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The requested entropy is not a positive, finite number of bits no
	/// larger than `MAX_BITS`.
	#[error("bits must be a positive number up to {max}, got {0}", max = crate::puid::MAX_BITS)]
	Bits(f64),
	/// Negative total or risk passed to the risk based sizing.
	#[error("total and risk must be non-negative, got total {total} and risk {risk}")]
	TotalRisk { total: f64, risk: f64 },
	/// The character set failed validation.
	#[error(transparent)]
	Chars(#[from] CharsError),
	/// A name does not match any predefined character set.
	#[error("unknown character set: {0}")]
	UnknownCharset(String),
	/// The random byte source reported a failure.
	#[error("entropy source failed: {0}")]
	EntropySource(#[source] Box<dyn std::error::Error + Send + Sync>),
	/// A fixed byte source ran out of bytes.
	#[error("entropy exhausted: requested {requested} bytes, {available} available")]
	EntropyExhausted { requested: usize, available: usize },
	/// Hex text given to a fixed byte source could not be parsed.
	#[error("invalid hex byte string: {0}")]
	InvalidHex(String),
	/// A recorded entropy file could not be read.
	#[error("could not read entropy file {1}: {0}")]
	Io(#[source] std::io::Error, PathBuf),
}

impl Error {
	/// Returns true for errors raised while validating a configuration,
	/// as opposed to failures of the random byte source.
	pub fn is_config_error(&self) -> bool {
		matches!(
			self,
			Error::Bits(_) | Error::TotalRisk { .. } | Error::Chars(_) | Error::UnknownCharset(_)
		)
	}
}
