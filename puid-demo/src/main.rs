use puid_core::bits::Ladder;
use puid_core::{entropy, Charset, Charsets, Error, FixedBytes, Puid, PuidConfig, RngEntropy};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug to see how each generator is sized
    env_logger::init();

    // Default generator: 128 bits over the URL and file safe 64 characters,
    // backed by the operating system CSPRNG
    let mut default_id = Puid::new(&PuidConfig::default())?;
    println!("default ({} chars, {:.2} bits): {}", default_id.len(), default_id.bits(), default_id.generate()?);

    // Size ids for 10 million identifiers with a 1 in a trillion chance of a repeat
    let mut session_id = Puid::from_risk(10e6, 1e12, Charsets::AlphaNum)?;
    println!("session ({} chars, {:.2} bits): {}", session_id.len(), session_id.bits(), session_id.generate()?);

    // Custom characters, including non-ASCII ones
    let mut dingosky_id = Puid::from_bits(64.0, "dîngøsky")?;
    println!("custom ({} chars): {}", dingosky_id.len(), dingosky_id.generate()?);

    // Invalid character sets are rejected at construction
    match Puid::from_bits(64.0, "unique") {
        Ok(_) => println!("Should not happen"),
        Err(Error::Chars(e)) => println!("'unique' is not a valid character set: {e}"),
        Err(e) => return Err(e.into()),
    }
    match Puid::from_bits(-1.0, Charsets::Hex) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("-1 bits is invalid: {e}"),
    }

    // A seeded PRNG gives reproducible ids (never use it for real identifiers)
    let config = PuidConfig::bits(40.0, Charsets::WordSafe32);
    let mut seeded_id = Puid::with_source(&config, RngEntropy(StdRng::seed_from_u64(42)))?;
    for i in 0..3 {
        println!("seeded {}: {}", i + 1, seeded_id.generate()?);
    }

    // Fixed bytes show how bits carry across byte boundaries:
    // 110 001 111 | 100 100 100 | 000 000 001 ...
    let source = FixedBytes::from_hex("c7 c9 00 2a bd 72")?;
    let mut fixed_id = Puid::with_source(&PuidConfig::bits(9.0, "dingosky"), source)?;
    for _ in 0..5 {
        print!("{} ", fixed_id.generate()?);
    }
    println!();

    // Entropy math and the bit-width ladder behind non power of two sets
    let safe_ascii = Charset::predefined(Charsets::SafeAscii);
    println!("safe_ascii: {:.2} bits/char, 97 bits need {} chars", entropy::bits_per_char(&safe_ascii), entropy::len_for_bits(&safe_ascii, 97.0));
    for kind in [Charsets::Alpha, Charsets::AlphaNumLower, Charsets::Decimal] {
        let ladder = Ladder::new(kind.len());
        println!("{kind}: ladder {:?}, {:.3} bits per char", ladder.steps(), ladder.expected_bits());
    }

    Ok(())
}
