pub mod arena;
pub mod bff;
pub mod cli;
pub mod consts;
pub mod epoch;
pub mod metrics;
pub mod mutation;
pub mod pool;
pub mod rng;
pub mod runlog;
pub mod stats;
pub mod token;
