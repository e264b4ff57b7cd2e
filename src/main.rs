use anyhow::Result;
use clap::Parser;

use pairsubrs::pipeline;
use pairsubrs::{Args, Config};

#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args);

    let paths = pipeline::run(&args, &config)?;
    eprintln!("subsampled bam: {}", paths.subsampled_bam.display());

    Ok(())
}
