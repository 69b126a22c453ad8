//! Postman Collection Generator - Command-line tool for building Postman collections.
//!
//! This binary scans a directory of Spring API sources, extracts the endpoints declared by
//! mapping annotations and writes a Postman Collection v2.1.0 file. When an API key and a
//! collection UID are configured, the collection is also pushed to the Postman API.
//!
//! # Usage
//!
//! ```bash
//! postman-from-source [OPTIONS] <JAVA_DIRECTORY>
//! ```
//!
//! # Examples
//!
//! Scan API interfaces and write a timestamped file into `./collections`:
//! ```bash
//! postman-from-source ./apis -o ./collections
//! ```
//!
//! Scan `@RestController` classes instead:
//! ```bash
//! postman-from-source ./apis --mode controllers --output collection.json
//! ```
//!
//! Generate and publish:
//! ```bash
//! POSTMAN_API_KEY=... POSTMAN_COLLECTION_UID=... postman-from-source ./apis
//! ```
//!
//! Any of these variables can also be set in a `.env` file in the working directory.

use anyhow::Result;
use clap::Parser;
use log::info;
use postman_from_source::cli;

fn main() -> Result<()> {
    // Values from a local .env file feed clap's environment fallbacks
    dotenvy::dotenv().ok();

    // Parse once to read the verbose flag, validate after the logger is up
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Postman Collection Generator starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    let output_path = cli::run(args)?;

    info!("Postman collection written to {}", output_path.display());

    Ok(())
}
