//! pairsubrs - depth-targeted paired-end subsampling of BAM files
//!
//! Given a BAM and a target depth, this library computes the read count
//! that depth requires, collects the unique query name universe in one
//! streaming pass, draws a uniform random subset of names, then rewrites
//! the BAM keeping only sampled fragments with stale duplicate flags
//! cleared. The driver then hands the result to GATK for duplicate
//! marking and WGS metrics collection.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use pairsubrs::{Args, Config, pipeline};
//!
//! let args = Args::parse();
//! let config = Config::from_args(&args);
//! pipeline::run(&args, &config)?;
//! ```

pub mod args;
pub mod config;
pub mod depth;
pub mod error;
pub mod gatk;
pub mod identity;
pub mod io;
pub mod pipeline;
pub mod sample;
pub mod utils;

// Re-export commonly used items
pub use args::Args;
pub use config::Config;
pub use depth::target_read_count;
pub use error::SubsampleError;
pub use identity::IdentitySet;
pub use io::{DUPLICATE_FLAG, FLAG_OFFSET, clear_duplicate_flag};
pub use sample::{SampledSet, sample};
