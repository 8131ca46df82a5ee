//! Encoding a config struct to INI and reading it back.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_ini_codec::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Database {
    host: String,
    port: u16,
    replicas: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Config {
    name: String,
    debug: bool,
    database: Database,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "inventory".to_string(),
        debug: true,
        database: Database {
            host: "db.internal".to_string(),
            port: 5432,
            replicas: vec!["replica-a".to_string(), "replica-b".to_string()],
        },
    };

    let ini = to_string(&config)?;
    println!("INI output:\n{}", ini);

    let config_back: Config = from_str(&ini)?;
    assert_eq!(config, config_back);
    println!("✓ Round-trip successful");

    Ok(())
}
