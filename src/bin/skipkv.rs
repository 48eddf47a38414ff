//! SkipKV command-line tool
//!
//! Walkthrough, throughput check and dump inspection for the engine.

use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use skipkv::{Config, Engine, InsertStatus};
use tracing_subscriber::{fmt, EnvFilter};

/// SkipKV CLI
#[derive(Parser, Debug)]
#[command(name = "skipkv")]
#[command(about = "Skip list key-value index with an LRU/TTL read cache")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a short insert/search/delete walkthrough and dump the result
    Demo {
        /// Highest skip list level
        #[arg(short, long, default_value = "6")]
        max_level: usize,

        /// Dump file path
        #[arg(short, long, default_value = "store/dumpFile")]
        store: PathBuf,
    },

    /// Measure multi-threaded insert and search throughput
    Stress {
        /// Worker threads
        #[arg(short, long, default_value = "4")]
        threads: usize,

        /// Highest skip list level
        #[arg(short, long, default_value = "18")]
        max_level: usize,

        /// Largest data set; runs at 10%, 50% and 100% of it
        #[arg(short, long, default_value = "100000")]
        count: usize,
    },

    /// Load a dump file and print its levels
    Inspect {
        /// Dump file path
        #[arg(short, long, default_value = "store/dumpFile")]
        store: PathBuf,

        /// Highest skip list level
        #[arg(short, long, default_value = "12")]
        max_level: usize,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,skipkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SkipKV v{}", skipkv::VERSION);

    let result = match args.command {
        Commands::Demo { max_level, store } => run_demo(max_level, store),
        Commands::Stress {
            threads,
            max_level,
            count,
        } => run_stress(threads, max_level, count),
        Commands::Inspect { store, max_level } => run_inspect(store, max_level),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run_demo(max_level: usize, store: PathBuf) -> skipkv::Result<()> {
    let config = Config::builder()
        .max_level(max_level)
        .store_path(store)
        .build();
    let engine: Engine<i64, String> = Engine::open(config)?;

    let entries = [
        (1, "this is"),
        (3, "a"),
        (7, "simple"),
        (8, "skip list"),
        (9, "a starting point"),
        (19, "----"),
        (20, "lift off"),
        (9, "duplicate insert"),
    ];
    for (key, value) in entries {
        if engine.insert(key, value.to_string()) == InsertStatus::AlreadyExists {
            println!("Key {} already exists", key);
        }
    }

    println!("size: {}", engine.size());
    engine.dump()?;

    for key in [9, 18] {
        match engine.search(&key) {
            Some(value) => println!("Found {}: {}", key, value),
            None => println!("Not found: {}", key),
        }
    }

    print!("{}", engine.display());

    engine.delete(&3);
    engine.delete(&7);

    println!("size: {}", engine.size());
    print!("{}", engine.display());

    Ok(())
}

fn run_stress(threads: usize, max_level: usize, count: usize) -> skipkv::Result<()> {
    let threads = threads.max(1);
    let sizes = [count / 10, count / 2, count];

    println!("max level: {}, threads: {}", max_level, threads);

    println!("\ninsert entries\tseconds\tops/sec");
    let mut insert_rates = Vec::new();
    for &size in &sizes {
        let engine = stress_engine(max_level)?;
        let elapsed = run_in_chunks(threads, size, |key| {
            engine.insert(key, format!("value_{}", key));
        });
        insert_rates.push(rate(size, elapsed));
        println!("{}\t{:.5}\t{:.0}", size, elapsed.as_secs_f64(), rate(size, elapsed));
    }
    println!("average insert ops/sec: {:.0}", average(&insert_rates));

    println!("\nsearch entries\tseconds\tops/sec");
    let mut search_rates = Vec::new();
    for &size in &sizes {
        let engine = stress_engine(max_level)?;
        for key in 0..size as i64 {
            engine.insert(key, format!("value_{}", key));
        }
        let elapsed = run_in_chunks(threads, size, |key| {
            engine.search(&key);
        });
        search_rates.push(rate(size, elapsed));
        println!("{}\t{:.5}\t{:.0}", size, elapsed.as_secs_f64(), rate(size, elapsed));
    }
    println!("average search ops/sec: {:.0}", average(&search_rates));

    Ok(())
}

fn run_inspect(store: PathBuf, max_level: usize) -> skipkv::Result<()> {
    let config = Config::builder()
        .max_level(max_level)
        .store_path(store)
        .build();
    let engine: Engine<i64, String> = Engine::open(config)?;

    let stats = engine.load()?;
    println!(
        "lines: {}, inserted: {}, duplicates: {}, skipped: {}",
        stats.lines_read, stats.inserted, stats.duplicates, stats.skipped
    );
    println!("size: {}, level: {}", engine.size(), engine.level());
    print!("{}", engine.display());

    Ok(())
}

// =============================================================================
// Stress Helpers
// =============================================================================

fn stress_engine(max_level: usize) -> skipkv::Result<Engine<i64, String>> {
    Engine::open(Config::builder().max_level(max_level).build())
}

/// Split `0..size` into one contiguous range per thread and time the run
fn run_in_chunks<F>(threads: usize, size: usize, op: F) -> Duration
where
    F: Fn(i64) + Sync,
{
    let chunk = size / threads;
    let start = Instant::now();

    let scoped = crossbeam::scope(|scope| {
        for t in 0..threads {
            let begin = t * chunk;
            let end = if t == threads - 1 { size } else { (t + 1) * chunk };
            let op = &op;
            scope.spawn(move |_| {
                for key in begin..end {
                    op(key as i64);
                }
            });
        }
    });
    if scoped.is_err() {
        tracing::error!("A stress worker panicked");
    }

    start.elapsed()
}

fn rate(ops: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        ops as f64 / secs
    } else {
        0.0
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
