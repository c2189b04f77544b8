//! Algoviz Visualization Server
//!
//! Serve the playback API, or print a run's step stream with `trace`.

use std::env;

use algoviz_steps::{
    generate_random, generate_seeded, parse_target, select, Advance, AlgorithmKind,
};
use algoviz_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoviz_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line args
    let args: Vec<String> = env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("trace") {
        return trace(&args[1..]);
    }

    let config = VisConfig::from_env_and_args(&args);

    println!("Algoviz Playback Server");
    println!("=======================");
    println!();
    println!("Array length: {}", config.array.len);
    println!("Initial speed: {}", config.speed.value());
    println!("Starting server on http://localhost:{}", config.port);
    println!();

    let server = VisServer::new(&config);
    server.serve(config.port).await?;

    Ok(())
}

/// `trace <algorithm> [target]`: print every step of one run and exit.
fn trace(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let Some(name) = args.first() else {
        let names: Vec<_> = AlgorithmKind::ALL.iter().map(|k| k.name()).collect();
        return Err(format!("usage: algoviz-vis trace <{}> [target]", names.join("|")).into());
    };
    let kind: AlgorithmKind = name.parse()?;
    let target = args.get(1).and_then(|s| parse_target(s));

    let config = VisConfig::from_env_and_args(&[]);
    let mut values = match config.seed {
        Some(seed) => generate_seeded(&config.array, seed),
        None => generate_random(&config.array),
    };
    if kind == AlgorithmKind::BinarySearch {
        values.sort_unstable();
    }

    println!("input: {:?}", values);
    let mut run = select(kind, &values, target)?.launch(values);
    loop {
        match run.advance() {
            Advance::Step(step) => {
                let n = run.steps_taken();
                let highlighted = step.highlighted().indices();
                match step.snapshot() {
                    Some(snapshot) => println!("{n:>5} {highlighted:?} {snapshot:?}"),
                    None => println!("{n:>5} {highlighted:?}"),
                }
            }
            Advance::Finished(outcome) => {
                println!("outcome: {:?}", outcome);
                return Ok(());
            }
        }
    }
}
