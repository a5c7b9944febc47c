use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use puid_core::{Chars, Charsets, FixedBytes, Puid, PuidConfig};

/// Generates probably unique identifiers.
///
/// Size ids for TOTAL identifiers with a 1 in RISK chance of a repeat, or
/// give the entropy directly with `--bits`. Defaults to 128 bits.
#[derive(Parser, Debug)]
#[command(name = "puid", version)]
struct Cli {
	/// Expected number of identifiers.
	#[arg(requires = "risk")]
	total: Option<f64>,

	/// Accepted 1 in RISK chance of a repeat.
	risk: Option<f64>,

	/// Entropy bits per identifier.
	#[arg(long, short, conflicts_with_all = ["total", "risk"])]
	bits: Option<f64>,

	/// Predefined character set.
	#[arg(long, short, default_value = "safe64")]
	charset: Charsets,

	/// Custom characters, overrides `--charset`.
	#[arg(long)]
	chars: Option<String>,

	/// Number of identifiers to print.
	#[arg(long, short = 'n', default_value_t = 1)]
	count: usize,

	/// Replay random bytes recorded in a file instead of the OS source.
	#[arg(long, env = "PUID_ENTROPY_FILE")]
	entropy_file: Option<PathBuf>,
}

impl Cli {
	fn puid_config(&self) -> PuidConfig {
		let chars: Chars = match &self.chars {
			Some(chars) => chars.as_str().into(),
			None => self.charset.into(),
		};
		match (self.total, self.risk, self.bits) {
			(Some(total), Some(risk), _) => PuidConfig::total_risk(total, risk, chars),
			(_, _, Some(bits)) => PuidConfig::bits(bits, chars),
			_ => PuidConfig {
				chars,
				..Default::default()
			},
		}
	}
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
	let config = cli.puid_config();
	let mut puid = match &cli.entropy_file {
		Some(path) => Puid::with_source(&config, FixedBytes::from_file(path)?)?,
		None => Puid::new(&config)?,
	};
	debug!("{puid:?}");

	for _ in 0..cli.count {
		writeln!(out, "{}", puid.generate()?)?;
	}
	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	let cli = Cli::parse();

	match run(&cli, &mut io::stdout().lock()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("puid: {e}");
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn output(args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
		let cli = Cli::try_parse_from(std::iter::once("puid").chain(args.iter().copied()))?;
		let mut out = Vec::new();
		run(&cli, &mut out)?;
		Ok(String::from_utf8(out)?)
	}

	#[test]
	fn total_risk_args() {
		let cli = Cli::parse_from(["puid", "100000", "1e12", "--charset", "alpha"]);
		assert_eq!(cli.puid_config(), PuidConfig::total_risk(100_000.0, 1e12, Charsets::Alpha));
	}

	#[test]
	fn default_args() {
		let cli = Cli::parse_from(["puid"]);
		assert_eq!(cli.puid_config(), PuidConfig::default());
	}

	#[test]
	fn total_needs_risk() {
		assert!(Cli::try_parse_from(["puid", "100000"]).is_err());
		assert!(Cli::try_parse_from(["puid", "100000", "1e12", "--bits", "64"]).is_err());
	}

	#[test]
	fn prints_count_ids() {
		let ids = output(&["--bits", "64", "--charset", "hex", "-n", "3"]).unwrap();
		let ids: Vec<&str> = ids.lines().collect();
		assert_eq!(ids.len(), 3);
		assert!(ids.iter().all(|id| id.len() == 16));
	}

	#[test]
	fn replays_entropy_file() {
		let path = std::env::temp_dir().join(format!("puid-cli-{}.bin", std::process::id()));
		std::fs::write(&path, [0xc7, 0xc9, 0x00, 0x2a, 0xbd, 0x72]).unwrap();

		let ids = output(&["--bits", "9", "--chars", "dingosky", "-n", "5", "--entropy-file", path.to_str().unwrap()]);
		std::fs::remove_file(&path).unwrap();
		assert_eq!(ids.unwrap(), "kiy\nooo\nddi\nnsg\nksk\n");
	}

	#[test]
	fn invalid_chars() {
		let error = output(&["--chars", "unique"]).unwrap_err();
		assert!(error.to_string().contains("repeats"));
	}
}
