//! Command-line flags and the config error taxonomy.

use clap::Parser;
use thiserror::Error;

use crate::consts::{MAX_THREADS, SOUP_SIZE};

/// `bffsoup` flags; every default matches the original driver's.
#[derive(Parser, Debug)]
#[command(name = "bffsoup", about = "BFF primordial-soup research harness")]
pub struct Cli {
    /// Number of epochs to run.
    #[arg(long, default_value_t = 10_000)]
    pub epochs: u64,

    /// Worker thread count. 0 detects available CPUs, clamped to MAX_THREADS.
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// RNG seed. 0 derives one from a stable process-local value.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Emit a stats row every N epochs (plus epoch 0).
    #[arg(long, default_value_t = 100)]
    pub stats: u64,

    /// Per-cell mutation probability applied once per epoch.
    #[arg(long, default_value_t = 0.0)]
    pub mutation: f64,

    /// Append per-pair step counts to this binary run-length log.
    #[arg(long)]
    pub runlog: Option<std::path::PathBuf>,

    /// Population size (half-tapes). Must be even and a power of two.
    #[arg(long, default_value_t = SOUP_SIZE)]
    pub soup_size: usize,
}

/// Everything that can go wrong turning flags into a runnable config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--soup-size must be a nonzero power of two and even, got {0}")]
    InvalidSoupSize(usize),
    #[error("could not open run-length log at {path}: {source}")]
    RunlogOpen {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fully resolved, validated configuration for one run.
pub struct RunConfig {
    pub epochs: u64,
    pub threads: usize,
    pub seed: u64,
    pub stats_interval: u64,
    pub mutation_rate: f64,
    pub runlog: Option<std::path::PathBuf>,
    pub soup_size: usize,
}

impl RunConfig {
    /// Expected resident size of the soup arena's cell storage, in bytes
    /// (`soup_size * HALF_LEN * size_of::<Token>()`). Rust has no portable
    /// way to catch allocator failure for a `Vec` this large, so callers
    /// who want to guard against OOM should check available memory against
    /// this figure before constructing the arena.
    pub fn memory_footprint_bytes(&self) -> u64 {
        (self.soup_size as u64) * (crate::consts::HALF_LEN as u64) * 8
    }
}

impl Cli {
    /// Validate and lower parsed flags into a `RunConfig`.
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        if self.soup_size == 0 || !self.soup_size.is_power_of_two() || self.soup_size % 2 != 0 {
            return Err(ConfigError::InvalidSoupSize(self.soup_size));
        }

        let threads = if self.threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.threads
        }
        .clamp(1, MAX_THREADS);

        Ok(RunConfig {
            epochs: self.epochs,
            threads,
            seed: self.seed,
            stats_interval: self.stats.max(1),
            mutation_rate: self.mutation,
            runlog: self.runlog,
            soup_size: self.soup_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            epochs: 10,
            threads: 0,
            seed: 1,
            stats: 5,
            mutation: 0.0,
            runlog: None,
            soup_size: 64,
        }
    }

    #[test]
    fn rejects_non_power_of_two_soup_size() {
        let mut cli = base_cli();
        cli.soup_size = 6;
        assert!(matches!(cli.into_config(), Err(ConfigError::InvalidSoupSize(6))));
    }

    #[test]
    fn rejects_zero_soup_size() {
        let mut cli = base_cli();
        cli.soup_size = 0;
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn zero_threads_resolves_to_at_least_one() {
        let cli = base_cli();
        let config = cli.into_config().unwrap();
        assert!(config.threads >= 1);
        assert!(config.threads <= MAX_THREADS);
    }

    #[test]
    fn explicit_thread_count_is_clamped_to_max() {
        let mut cli = base_cli();
        cli.threads = MAX_THREADS + 50;
        let config = cli.into_config().unwrap();
        assert_eq!(config.threads, MAX_THREADS);
    }

    #[test]
    fn memory_footprint_matches_cell_count_times_token_size() {
        let mut cli = base_cli();
        cli.soup_size = 1024;
        let config = cli.into_config().unwrap();
        assert_eq!(config.memory_footprint_bytes(), 1024 * 64 * 8);
    }

    #[test]
    fn stats_interval_is_never_zero() {
        let mut cli = base_cli();
        cli.stats = 0;
        let config = cli.into_config().unwrap();
        assert_eq!(config.stats_interval, 1);
    }
}
