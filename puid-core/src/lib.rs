//! Probably-unique identifier generation library.
//!
//! This crate turns a stream of secure random bytes into short identifiers
//! drawn from an arbitrary alphabet, sized from an entropy budget:
//! - Predefined and custom character sets, validated once
//! - Entropy sizing from explicit bits or a total/risk pair
//! - Bit-slicing with a rejection ladder that recycles unused bits
//! - Pluggable random byte sources (OS default, seeded PRNG, fixed bytes)
//!
//! The generator (`Puid`) is the main entry point; the lower-level pieces
//! are exposed for inspection and testing.

/// Character sets: the predefined catalogue and custom validation.
pub mod chars;

/// Entropy math (bits for a total/risk pair, bits/length conversions).
pub mod entropy;

/// Bit-width ladder and the entropy muncher that slices random bytes
/// into uniform character indices.
pub mod bits;

/// Index to character encoders for each character set.
pub mod encoder;

/// Random byte sources fed to the muncher.
pub mod source;

/// High-level identifier generator and its configuration.
pub mod puid;

/// Error types shared by the whole crate.
pub mod error;

/// I/O utilities (reading recorded entropy files).
///
/// Not exposed
pub(crate) mod io;

pub use chars::{Chars, Charset, Charsets};
pub use error::{CharsError, Error, Result};
pub use puid::{EntropyBudget, MAX_BITS, Puid, PuidConfig};
pub use source::{EntropySource, FixedBytes, OsEntropy, RngEntropy};
