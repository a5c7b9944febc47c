use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads a binary file and returns all its bytes.
///
/// Used to replay recorded random bytes.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> Result<Vec<u8>> {
	let path = filename.as_ref();
	let mut contents = Vec::new();
	File::open(path)
		.and_then(|mut file| file.read_to_end(&mut contents))
		.map_err(|e| Error::Io(e, path.to_path_buf()))?;
	Ok(contents)
}

/// Parses whitespace separated hex text into bytes.
///
/// Example: `"99 b4 4f"` → `[0x99, 0xb4, 0x4f]`. Whitespace is optional,
/// `"99b44f"` gives the same bytes.
pub(crate) fn parse_hex(text: &str) -> Result<Vec<u8>> {
	let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
	hex::decode(digits).map_err(|_| Error::InvalidHex(text.to_owned()))
}
