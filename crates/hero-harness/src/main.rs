#![forbid(unsafe_code)]

//! Resize storm runner.
//!
//! Plays one seeded resize storm against the default carousel and prints the
//! JSONL log to stdout. Engine logs go to stderr, filtered by `RUST_LOG`.
//!
//! # Running
//!
//! ```sh
//! cargo run -p hero-harness --bin hero-storm -- mixed 200
//! STORM_SEED=42 RUST_LOG=hero_carousel=debug cargo run -p hero-harness --bin hero-storm -- burst
//! cargo run -p hero-harness --bin hero-storm -- pathological 64 --out storm.jsonl
//! cargo run -p hero-harness --bin hero-storm -- burst 40 --between-frames --decisions decisions.jsonl
//! ```
//!
//! Exits non-zero if the storm fails.

use std::path::PathBuf;
use std::process::ExitCode;

use hero_carousel::{CarouselConfig, hero_cards};
use hero_harness::ResizeDelivery;
use hero_harness::resize_storm::{ResizeStorm, StormConfig, StormPattern, get_storm_seed, run_storm};
use tracing_subscriber::EnvFilter;

struct Args {
    pattern: StormPattern,
    out: Option<PathBuf>,
    decisions: Option<PathBuf>,
    delivery: ResizeDelivery,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut out = None;
    let mut decisions = None;
    let mut delivery = ResizeDelivery::OnFrame;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(args.next().ok_or("--out needs a path")?)),
            "--decisions" => decisions = Some(PathBuf::from(args.next().ok_or("--decisions needs a path")?)),
            "--between-frames" => delivery = ResizeDelivery::BetweenFrames,
            "-h" | "--help" => {
                return Err("usage: hero-storm [burst|sweep|oscillate|pathological|mixed] [count] \
                            [--out FILE] [--decisions FILE] [--between-frames]"
                    .into());
            }
            _ => positional.push(arg),
        }
    }
    let count = match positional.get(1) {
        Some(raw) => raw.parse::<usize>().map_err(|e| format!("bad count {raw:?}: {e}"))?,
        None => 50,
    };
    let pattern = match positional.first().map(String::as_str).unwrap_or("mixed") {
        "burst" => StormPattern::Burst { count },
        "sweep" => StormPattern::Sweep {
            start_width: 320,
            end_width: 2560,
            steps: count,
        },
        "oscillate" => StormPattern::Oscillate {
            width_a: 728,
            width_b: 808,
            cycles: count / 2,
        },
        "pathological" => StormPattern::Pathological { count },
        "mixed" => StormPattern::Mixed { count },
        other => return Err(format!("unknown pattern {other:?}")),
    };
    Ok(Args {
        pattern,
        out,
        decisions,
        delivery,
    })
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let seed = get_storm_seed();
    let storm = ResizeStorm::new(
        StormConfig::default()
            .with_seed(seed)
            .with_case_name(format!("{}_{}", args.pattern.name(), args.pattern.event_count()))
            .with_pattern(args.pattern)
            .with_resize_delivery(args.delivery),
    );

    let result = match run_storm(&storm, CarouselConfig::default(), hero_cards()) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("invalid carousel config: {err}");
            return ExitCode::from(2);
        }
    };

    match &args.out {
        Some(path) => {
            if let Err(err) = std::fs::write(path, format!("{}\n", result.jsonl)) {
                eprintln!("cannot write {}: {err}", path.display());
                return ExitCode::from(2);
            }
        }
        None => println!("{}", result.jsonl),
    }
    if let Some(path) = &args.decisions {
        if let Err(err) = std::fs::write(path, format!("{}\n", result.decisions_jsonl)) {
            eprintln!("cannot write {}: {err}", path.display());
            return ExitCode::from(2);
        }
    }

    if result.passed {
        ExitCode::SUCCESS
    } else {
        for err in &result.errors {
            eprintln!("storm failure: {err}");
        }
        ExitCode::FAILURE
    }
}
