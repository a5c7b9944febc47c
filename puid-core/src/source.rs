//! Random byte sources.
//!
//! The muncher pulls bytes on demand through `EntropySource`. The default
//! source is the operating system CSPRNG; deterministic sources exist for
//! reproducible runs and tests.

use std::path::Path;

use rand::rngs::OsRng;
use rand::{RngCore, TryRngCore};

use crate::error::{Error, Result};
use crate::io;

/// A supplier of random bytes.
///
/// Implementations must fill the whole buffer or fail. Failures are
/// propagated by the generator unchanged, never retried.
pub trait EntropySource: Send {
	fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG (`getrandom`).
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
	fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
		OsRng.try_fill_bytes(dest).map_err(|e| Error::EntropySource(Box::new(e)))
	}
}

/// Adapts any `rand` generator.
///
/// Meant for seeded, reproducible runs. A PRNG is only as unpredictable as
/// its seed.
#[derive(Clone, Debug)]
pub struct RngEntropy<R>(pub R);

impl<R: RngCore + Send> EntropySource for RngEntropy<R> {
	fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
		self.0.fill_bytes(dest);
		Ok(())
	}
}

/// Replays a fixed sequence of bytes.
///
/// Bytes are handed out in order and never twice. Asking for more bytes
/// than remain fails with `Error::EntropyExhausted`.
#[derive(Clone, Debug)]
pub struct FixedBytes {
	bytes: Vec<u8>,
	offset: usize,
}

impl FixedBytes {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self { bytes: bytes.into(), offset: 0 }
	}

	/// Parses hex text such as `"99 b4 4f 80 c8 89"`.
	pub fn from_hex(hex: &str) -> Result<Self> {
		Ok(Self::new(io::parse_hex(hex)?))
	}

	/// Loads recorded random bytes from a binary file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::new(io::read_bytes(path)?))
	}

	/// Bytes not handed out yet.
	pub fn remaining(&self) -> usize {
		self.bytes.len() - self.offset
	}
}

impl EntropySource for FixedBytes {
	fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
		if dest.len() > self.remaining() {
			return Err(Error::EntropyExhausted {
				requested: dest.len(),
				available: self.remaining(),
			});
		}
		dest.copy_from_slice(&self.bytes[self.offset..self.offset + dest.len()]);
		self.offset += dest.len();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn fixed_bytes_in_order() {
		let mut source = FixedBytes::from_hex("c7 c9 00 2a").unwrap();
		let mut buf = [0u8; 3];
		source.fill_bytes(&mut buf).unwrap();
		assert_eq!(buf, [0xc7, 0xc9, 0x00]);
		assert_eq!(source.remaining(), 1);

		let mut buf = [0u8; 2];
		assert!(matches!(
			source.fill_bytes(&mut buf),
			Err(Error::EntropyExhausted { requested: 2, available: 1 })
		));

		let mut buf = [0u8; 1];
		source.fill_bytes(&mut buf).unwrap();
		assert_eq!(buf, [0x2a]);
	}

	#[test]
	fn seeded_rng_is_reproducible() {
		let mut a = RngEntropy(StdRng::seed_from_u64(7));
		let mut b = RngEntropy(StdRng::seed_from_u64(7));
		let (mut x, mut y) = ([0u8; 32], [0u8; 32]);
		a.fill_bytes(&mut x).unwrap();
		b.fill_bytes(&mut y).unwrap();
		assert_eq!(x, y);
	}

	#[test]
	fn os_entropy_fills() {
		let mut buf = [0u8; 64];
		OsEntropy.fill_bytes(&mut buf).unwrap();
		// 64 zero bytes from a working CSPRNG is not a realistic outcome
		assert!(buf.iter().any(|b| *b != 0));
	}
}
