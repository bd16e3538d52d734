// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use hash_pipeline::config::{load_and_validate_config, PipelineConfig, RuntimeBuilder};
use hash_pipeline::observability::init_tracing;

/// Split the command line into an optional config path and item overrides.
///
/// The first argument is a config file when it names a YAML file; every other
/// argument is an item.
fn parse_args(args: &[String]) -> Result<(Option<&str>, Vec<i64>), String> {
    let (config, rest) = match args.first() {
        Some(first) if is_config_path(first) => (Some(first.as_str()), &args[1..]),
        _ => (None, args),
    };

    let items = rest
        .iter()
        .map(|arg| {
            arg.parse::<i64>()
                .map_err(|_| format!("'{}' is not an integer item", arg))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((config, items))
}

fn is_config_path(arg: &str) -> bool {
    matches!(
        Path::new(arg).extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

async fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let (config_file, items) = parse_args(args)?;

    let mut config = match config_file {
        Some(path) => load_and_validate_config(path)?,
        None => PipelineConfig::default(),
    };
    if !items.is_empty() {
        config.items = items;
    }

    let pipeline = RuntimeBuilder::from_config(&config)?;

    let started = Instant::now();
    let report = pipeline.execute().await?;
    let elapsed = started.elapsed();

    for item in &report.output {
        println!("{}", item);
    }
    println!("Exec time {:?}", elapsed);

    if let Some(expected_ms) = config.expected_duration_ms {
        let expected = Duration::from_millis(expected_ms);
        if elapsed > expected {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                expected_ms,
                "Run took {:?}, longer than the expected {:?}",
                elapsed,
                expected
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("info");

    let args: Vec<String> = env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("-h") | Some("--help")) {
        println!("Usage: hash-pipeline [CONFIG.yaml] [ITEM ...]");
        println!("Example: hash-pipeline configs/hash-pipeline.yaml 0 1 1 2 3 5 8");
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hash-pipeline failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn config_path_then_items() {
        let args = args(&["configs/run.yaml", "4", "7"]);
        let (config, items) = parse_args(&args).unwrap();
        assert_eq!(config, Some("configs/run.yaml"));
        assert_eq!(items, vec![4, 7]);
    }

    #[test]
    fn items_only() {
        let args = args(&["1", "2"]);
        let (config, items) = parse_args(&args).unwrap();
        assert_eq!(config, None);
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn non_integer_item_is_rejected() {
        let args = args(&["one"]);
        assert!(parse_args(&args).is_err());
    }
}
