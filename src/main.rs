//! `beanpath <file.json> <pattern> [config]`
//!
//! Loads a JSON object into a bean and prints every path matching the
//! wildcard pattern as `path = json`.

use std::process::ExitCode;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use beanpath::{Bean, BeanError, Result, Settings, Value};

fn run(file: &str, pattern: &str, settings: Settings) -> Result<()> {
    let started = Instant::now();
    let text = std::fs::read_to_string(file)
        .map_err(|e| BeanError::Serialization(format!("unable to read '{}': {}", file, e)))?;
    let Value::Map(document) = Value::from_json_str(&text)? else {
        return Err(BeanError::Serialization(format!("'{}' does not hold a JSON object", file)));
    };
    let mut bean = Bean::with_settings(settings);
    bean.set_from_array(&document, None)?;
    let matches = bean.resolve_wildcards(pattern);
    for (path, value) in &matches {
        println!("{} = {}", path, value.to_json_string()?);
    }
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(ms = elapsed_ms, names = bean.len(), matches = matches.len(), "pattern resolved");
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let (file, pattern) = match (args.get(1), args.get(2)) {
        (Some(file), Some(pattern)) => (file, pattern),
        _ => {
            eprintln!("usage: beanpath <file.json> <pattern> [config]");
            return ExitCode::from(2);
        }
    };
    let settings = match Settings::load(args.get(3).map(String::as_str)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(file, pattern, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!(error = %e, "resolution failed");
            ExitCode::FAILURE
        }
    }
}
