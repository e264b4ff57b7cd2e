//! Run configuration
//!
//! Everything environment-specific lives here and is passed into the
//! pipeline at construction, so the depth computation and the external
//! tool runners stay independently testable.

use crate::args::Args;
use std::path::PathBuf;

/// Number of bases in the human genome (hg38).
pub const HG38_BASES: f64 = 3.1e9;

#[derive(Debug, Clone)]
pub struct Config {
    /// Genome size used for the depth-to-read-count conversion
    pub genome_base_size: f64,
    /// Singularity image providing the gatk executable
    pub gatk_image: PathBuf,
    /// Reference FASTA for CollectWgsMetrics
    pub reference_fasta: PathBuf,
    /// Thread count forwarded to the GATK tools
    pub threads: usize,
    /// Paths bind-mounted into the container
    pub bind_paths: Vec<String>,
    /// Scratch directory for Spark and the JVM
    pub tmp_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            genome_base_size: HG38_BASES,
            gatk_image: PathBuf::from("/storage/images/gatk-4.6.0.0.sif"),
            reference_fasta: PathBuf::from(
                "/storage/references_and_index/hg38/fasta/Homo_sapiens_assembly38.fasta",
            ),
            threads: 4,
            bind_paths: vec!["/storage".to_string(), "/data".to_string()],
            tmp_dir: PathBuf::from("/data/tmp"),
        }
    }
}

impl Config {
    /// Defaults overridden by whatever the command line supplied.
    pub fn from_args(args: &Args) -> Self {
        let mut config = Self::default();
        if let Some(image) = &args.gatk_image {
            config.gatk_image = image.clone();
        }
        if let Some(reference) = &args.reference {
            config.reference_fasta = reference.clone();
        }
        if let Some(threads) = args.threads {
            config.threads = threads;
        }
        if let Some(bind) = &args.bind {
            config.bind_paths = bind.split(',').map(str::to_string).collect();
        }
        config
    }
}
