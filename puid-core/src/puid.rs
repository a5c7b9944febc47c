use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bits::Muncher;
use crate::chars::{Chars, Charset, Charsets};
use crate::encoder::Encoder;
use crate::entropy;
use crate::error::{Error, Result};
use crate::source::{EntropySource, OsEntropy};

/// Largest entropy budget accepted for one identifier, in bits.
///
/// Far beyond any useful collision resistance; keeps identifier length,
/// and the buffers sized from it, bounded.
pub const MAX_BITS: f64 = 8192.0;

/// Entropy requested for each identifier.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EntropyBudget {
	/// Explicit number of bits.
	Bits(f64),
	/// Enough bits for `total` identifiers with a `1 / risk` chance of a repeat.
	TotalRisk { total: f64, risk: f64 },
}

impl EntropyBudget {
	/// Resolves the budget to a number of bits.
	///
	/// # Errors
	/// - `Error::TotalRisk` for a negative total or risk
	/// - `Error::Bits` if the resulting bits are not positive, or above `MAX_BITS`
	pub fn bits(&self) -> Result<f64> {
		let bits = match *self {
			EntropyBudget::Bits(bits) => bits,
			EntropyBudget::TotalRisk { total, risk } => entropy::bits_for_total_risk(total, risk)?,
		};
		if !bits.is_finite() || bits <= 0.0 || bits > MAX_BITS {
			return Err(Error::Bits(bits));
		}
		Ok(bits)
	}
}

impl Default for EntropyBudget {
	fn default() -> Self {
		EntropyBudget::Bits(128.0)
	}
}

/// Generator configuration.
///
/// Defaults to 128 bits over `Charsets::Safe64`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PuidConfig {
	pub entropy: EntropyBudget,
	pub chars: Chars,
}

impl Default for PuidConfig {
	fn default() -> Self {
		Self {
			entropy: EntropyBudget::default(),
			chars: Chars::Predefined(Charsets::Safe64),
		}
	}
}

impl PuidConfig {
	pub fn bits(bits: f64, chars: impl Into<Chars>) -> Self {
		Self {
			entropy: EntropyBudget::Bits(bits),
			chars: chars.into(),
		}
	}

	pub fn total_risk(total: f64, risk: f64, chars: impl Into<Chars>) -> Self {
		Self {
			entropy: EntropyBudget::TotalRisk { total, risk },
			chars: chars.into(),
		}
	}
}

/// Probably unique identifier generator.
///
/// # Responsibilities
/// - Size identifiers once, from the configured entropy and character set
/// - Slice random bytes into character indices (`Muncher`)
/// - Encode indices into characters (`Encoder`)
///
/// Each `generate` call advances the muncher: the generator is a stream of
/// identifiers, not a pure function. It needs `&mut self`, so sharing one
/// across threads takes a lock held for the whole call.
pub struct Puid {
	/// Validated character set.
	charset: Charset,
	/// Realized entropy bits (`len * bits_per_char`).
	bits: f64,
	bits_per_char: f64,
	/// Characters per identifier.
	len: usize,
	muncher: Muncher,
	encoder: Encoder,
	/// Reused index buffer.
	indices: Vec<usize>,
}

impl Puid {
	/// Creates a generator backed by the operating system CSPRNG.
	///
	/// # Errors
	/// Returns an error if the entropy budget or the character set is invalid.
	pub fn new(config: &PuidConfig) -> Result<Self> {
		Self::with_source(config, OsEntropy)
	}

	/// Creates a generator backed by `source`.
	///
	/// # Errors
	/// Returns an error if the entropy budget or the character set is invalid.
	pub fn with_source(config: &PuidConfig, source: impl EntropySource + 'static) -> Result<Self> {
		let bits = config.entropy.bits()?;
		let charset = Charset::resolve(&config.chars)?;

		let bits_per_char = entropy::bits_per_char(&charset);
		let len = entropy::len_for_bits(&charset, bits);
		let muncher = Muncher::new(charset.len(), Box::new(source));
		let encoder = Encoder::new(&charset);

		let puid = Self {
			bits: len as f64 * bits_per_char,
			bits_per_char,
			len,
			muncher,
			encoder,
			indices: vec![0; len],
			charset,
		};
		debug!(
			"puid configured: {} chars of {} ({:.2} bits, ladder {:?})",
			puid.len,
			puid.charset,
			puid.bits,
			puid.muncher.ladder().steps()
		);
		Ok(puid)
	}

	/// Generator with an explicit number of bits, backed by the OS CSPRNG.
	pub fn from_bits(bits: f64, chars: impl Into<Chars>) -> Result<Self> {
		Self::new(&PuidConfig::bits(bits, chars))
	}

	/// Generator sized for `total` identifiers with a `1 / risk` chance of
	/// a repeat, backed by the OS CSPRNG.
	pub fn from_risk(total: f64, risk: f64, chars: impl Into<Chars>) -> Result<Self> {
		Self::new(&PuidConfig::total_risk(total, risk, chars))
	}

	/// Generates the next identifier.
	///
	/// # Errors
	/// Only failures of the entropy source, propagated unchanged.
	pub fn generate(&mut self) -> Result<String> {
		self.muncher.fill(&mut self.indices)?;
		Ok(self.indices.iter().map(|index| self.encoder.encode(*index)).collect())
	}

	/// Characters per identifier.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Always false: identifiers have at least one character.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Realized entropy bits per identifier.
	///
	/// At least the requested bits, rounded up to whole characters.
	pub fn bits(&self) -> f64 {
		self.bits
	}

	pub fn bits_per_char(&self) -> f64 {
		self.bits_per_char
	}

	pub fn charset(&self) -> &Charset {
		&self.charset
	}

	/// Effective randomness efficiency of the character set: entropy bits
	/// of all its characters over the bits needed to store it as UTF-8.
	pub fn ere(&self) -> f64 {
		self.bits_per_char * self.charset.len() as f64 / (8 * self.charset.utf8_len()) as f64
	}
}

impl fmt::Debug for Puid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Puid")
			.field("charset", &self.charset.to_string())
			.field("bits", &self.bits)
			.field("bits_per_char", &self.bits_per_char)
			.field("len", &self.len)
			.field("muncher", &self.muncher)
			.finish()
	}
}
