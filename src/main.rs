use anyhow::Result;
use clap::Parser;
use tracing::info;

use bffsoup::arena::Arena;
use bffsoup::cli::{Cli, RunConfig};
use bffsoup::epoch;
use bffsoup::pool::Pool;
use bffsoup::runlog::RunLog;
use bffsoup::stats;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// `seed == 0` derives a value from a stack address XOR a fixed salt,
/// mirroring the reference driver's pointer-based fallback: ASLR makes it
/// vary run to run without reaching for a wall-clock source.
fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    let probe = 0u8;
    (&probe as *const u8 as u64) ^ 0xdead_beef_cafe_1234u64
}

fn run(config: RunConfig) -> Result<()> {
    let seed = resolve_seed(config.seed);
    eprintln!(
        "bffsoup: {} tapes x 64 bytes, {} epochs, {} threads, stats every {}, mutation rate {:.2e}, arena ~{} MiB",
        config.soup_size,
        config.epochs,
        config.threads,
        config.stats_interval,
        config.mutation_rate,
        config.memory_footprint_bytes() / (1024 * 1024)
    );
    eprintln!("Seed: {seed}");
    info!(
        target: "bffsoup.startup",
        soup_size = config.soup_size,
        epochs = config.epochs,
        threads = config.threads,
        stats_interval = config.stats_interval,
        mutation_rate = config.mutation_rate,
        seed,
        "starting run"
    );

    let mut arena = Arena::new(config.soup_size, seed);
    let pool = Pool::new(config.threads, arena.pair_steps.len());

    let mut runlog = match &config.runlog {
        Some(path) => {
            eprintln!("Run-length log: {}", path.display());
            Some(RunLog::create(path)?)
        }
        None => None,
    };

    println!("epoch\tmean_ops\tmedian_ops\tmean_steps\tmax_steps\tunique_ids\tmodal_id\trepresentative_tape (modal_count)");

    let report = |epoch: u64, snapshot: &stats::Stats| {
        let mean_steps = snapshot.mean_steps.unwrap_or(0.0);
        let max_steps = snapshot.max_steps.unwrap_or(0);
        println!(
            "{}\t{:.4}\t{:.1}\t{:.1}\t{}\t{}\t{}\t|{}| ({})",
            epoch,
            snapshot.mean_ops,
            snapshot.median_ops,
            mean_steps,
            max_steps,
            snapshot.unique_ids,
            snapshot.modal_id,
            snapshot.representative,
            snapshot.modal_count
        );
    };

    report(0, &stats::compute(&arena.soup, None));

    for e in 1..=config.epochs {
        let epoch_tag = (e % (u16::MAX as u64 + 1)) as u16;
        epoch::run_epoch(&mut arena, &pool, config.mutation_rate, epoch_tag);

        if let Some(log) = runlog.as_mut() {
            log.append_epoch(&arena.pair_steps)?;
        }

        if e % config.stats_interval == 0 {
            let snapshot = stats::compute(&arena.soup, Some(&arena.pair_steps));
            report(e, &snapshot);
        }
    }

    if let Some(log) = runlog.as_mut() {
        log.flush()?;
    }

    pool.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(config) {
        eprintln!("{err}");
        std::process::exit(1);
    }

    Ok(())
}
