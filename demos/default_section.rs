//! Writing one section without a header and reading hand-edited files.
//!
//! Run with: cargo run --example default_section

use serde::Deserialize;
use serde_ini_codec::{decode, encode, Error};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct Settings {
    mode: String,
    workers: u8,
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut doc: BTreeMap<&str, BTreeMap<&str, &str>> = BTreeMap::new();
    doc.insert("general", BTreeMap::from([("mode", "prod"), ("workers", "4")]));
    doc.insert("logging", BTreeMap::from([("level", "info")]));

    let ini = encode(&doc, Some("general"))?;
    println!("With `general` as the default section:\n{}", String::from_utf8_lossy(&ini));

    // Values are plain text; the target type decides how they are read.
    let edited = b"mode = staging\nworkers = 8\nverbose = on\n";
    let settings: Settings = decode(edited)?;
    println!(
        "Decoded: mode={} workers={} verbose={}",
        settings.mode, settings.workers, settings.verbose
    );

    match decode::<Settings>(b"mode = dev\nworkers = many\nverbose = no\n") {
        Err(err @ Error::Decode { .. }) => println!("Rejected: {}", err),
        other => println!("Unexpected: {:?}", other),
    }

    Ok(())
}
