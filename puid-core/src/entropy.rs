use crate::chars::Charset;
use crate::error::{Error, Result};

/// Entropy bits needed to generate `total` identifiers with a `1 / risk`
/// probability of a repeat.
///
/// Uses the birthday-bound approximation. Below 1000 identifiers the exact
/// `total * (total - 1)` term is kept; above it is approximated by `total^2`.
///
/// # Errors
/// Returns `Error::TotalRisk` if `total` or `risk` is negative (or NaN).
///
/// # Notes
/// A `total` or `risk` of at most 1 leaves no collision space and yields 0.
pub fn bits_for_total_risk(total: f64, risk: f64) -> Result<f64> {
	if total.is_nan() || risk.is_nan() || total < 0.0 || risk < 0.0 {
		return Err(Error::TotalRisk { total, risk });
	}

	if total <= 1.0 || risk <= 1.0 {
		return Ok(0.0);
	}

	let bits = if total < 1000.0 {
		total.log2() + (total - 1.0).log2() + risk.log2() - 1.0
	} else {
		2.0 * total.log2() + risk.log2() - 1.0
	};
	Ok(bits)
}

/// Entropy bits carried by each character of `charset`.
pub fn bits_per_char(charset: &Charset) -> f64 {
	(charset.len() as f64).log2()
}

/// Whole bits of entropy in an identifier of `len` characters.
pub fn bits_for_len(charset: &Charset, len: usize) -> usize {
	(len as f64 * bits_per_char(charset)).trunc() as usize
}

/// Characters needed to carry at least `bits` of entropy.
pub fn len_for_bits(charset: &Charset, bits: f64) -> usize {
	(bits / bits_per_char(charset)).ceil() as usize
}
