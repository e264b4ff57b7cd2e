//! Pipeline driver
//!
//! Sequences the run: target read count, query name collection (pass 1),
//! sampling, filtered rewrite (pass 2), then the external GATK steps. Any
//! stage failure aborts the run; the subsampled BAM reaches its final path
//! only through a rename after the writer finished cleanly.

use anyhow::{Context, Result};
use noodles::bam;
use noodles::bgzf::io::Writer as BgzfWriter;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::Builder;

use crate::args::Args;
use crate::config::Config;
use crate::depth::target_read_count;
use crate::error::SubsampleError;
use crate::gatk::GatkRunner;
use crate::identity::collect_query_names;
use crate::io::{SubsetCounts, write_header, write_subset};
use crate::sample::{SampledSet, sample};
use crate::utils::{format_duration, sample_id};

/// Pipeline stages, in execution order. Used to name the failing stage in
/// error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DepthComputed,
    IdentitiesCollected,
    Sampled,
    Written,
    DuplicatesMarked,
    MetricsCollected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DepthComputed => "depth computation",
            Stage::IdentitiesCollected => "query name collection",
            Stage::Sampled => "sampling",
            Stage::Written => "subset writing",
            Stage::DuplicatesMarked => "duplicate marking",
            Stage::MetricsCollected => "wgs metrics collection",
        };
        f.write_str(name)
    }
}

/// Artifact paths for one sample, all inside `<output_dir>/<sample_id>/`.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub sample_dir: PathBuf,
    pub subsampled_bam: PathBuf,
    pub deduped_bam: PathBuf,
    pub dedup_metrics: PathBuf,
    pub wgs_metrics: PathBuf,
}

impl RunPaths {
    pub fn new(output_dir: &Path, sample_id: &str) -> Self {
        let sample_dir = output_dir.join(sample_id);
        let stem = format!("{sample_id}.paired-subsampled");
        Self {
            subsampled_bam: sample_dir.join(format!("{stem}.bam")),
            deduped_bam: sample_dir.join(format!("{stem}.deduped.bam")),
            dedup_metrics: sample_dir.join(format!("{stem}.deduped.bam.metrics.txt")),
            wgs_metrics: sample_dir.join(format!("{stem}.deduped.bam.wgs-metrics.txt")),
            sample_dir,
        }
    }
}

/// Subsampling stages only: everything up to and including the filtered
/// rewrite. Returns the artifact paths with the subsampled BAM in place.
pub fn run_core(args: &Args, config: &Config) -> Result<RunPaths> {
    let id = sample_id(&args.input);
    let paths = RunPaths::new(&args.output_dir, &id);
    std::fs::create_dir_all(&paths.sample_dir)
        .map_err(|e| SubsampleError::stream(&paths.sample_dir, e))?;

    eprintln!("sample: {id}");
    eprintln!("target depth: {}", args.target_depth);
    let target = target_read_count(
        config.genome_base_size,
        args.read_len,
        args.adjust_val,
        args.target_depth,
        args.paired,
    )
    .with_context(|| format!("{} failed", Stage::DepthComputed))?;
    eprintln!("target read count: {target}");

    eprintln!("collecting query names...");
    let pass_start = Instant::now();
    let (ids, records) = collect_query_names(&args.input)
        .with_context(|| format!("{} failed", Stage::IdentitiesCollected))?;
    let (m, s) = format_duration(pass_start.elapsed());
    eprintln!(
        "  scanned {} records, {} unique query names in {} min {} sec",
        records,
        ids.len(),
        m,
        s
    );

    // Aborts here, before any output is written, when the universe is
    // smaller than the target.
    let sampled = sample(ids, target).with_context(|| format!("{} failed", Stage::Sampled))?;
    eprintln!("sampled {} query names", sampled.len());

    eprintln!("writing subsampled bam...");
    let pass_start = Instant::now();
    let counts = write_subset_to(&args.input, &paths.subsampled_bam, &sampled)
        .with_context(|| format!("{} failed", Stage::Written))?;
    let (m, s) = format_duration(pass_start.elapsed());
    eprintln!(
        "  kept {} of {} records ({} stale duplicate flags cleared) in {} min {} sec",
        counts.retained, counts.scanned, counts.cleared, m, s
    );

    Ok(paths)
}

/// Full run: subsampling followed by the external GATK collaborators.
pub fn run(args: &Args, config: &Config) -> Result<RunPaths> {
    let total_start = Instant::now();
    let paths = run_core(args, config)?;

    let runner = GatkRunner::new(config);

    eprintln!("marking duplicates...");
    runner
        .mark_duplicates(
            &paths.subsampled_bam,
            &paths.deduped_bam,
            &paths.dedup_metrics,
        )
        .with_context(|| format!("{} failed", Stage::DuplicatesMarked))?;

    eprintln!("collecting wgs metrics...");
    runner
        .collect_wgs_metrics(&paths.deduped_bam, &paths.wgs_metrics)
        .with_context(|| format!("{} failed", Stage::MetricsCollected))?;

    let (m, s) = format_duration(total_start.elapsed());
    eprintln!("done in {} min {} sec", m, s);
    Ok(paths)
}

/// Second pass over the input, written through a temp file in the target
/// directory and renamed into place only on success.
fn write_subset_to(
    input: &Path,
    final_path: &Path,
    sampled: &SampledSet,
) -> Result<SubsetCounts> {
    let mut reader = bam::io::reader::Builder::default()
        .build_from_path(input)
        .map_err(|e| SubsampleError::stream(input, e))?;
    let header = reader
        .read_header()
        .map_err(|e| SubsampleError::stream(input, e))?;

    let dir = final_path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = Builder::new()
        .prefix(".pairsub-")
        .suffix(".bam.tmp")
        .tempfile_in(dir)
        .map_err(|e| SubsampleError::stream(dir, e))?;
    let (file, tmp_path) = tmp.into_parts();
    let mut writer = BgzfWriter::new(file);

    write_header(&mut writer, &header)?;
    let counts = write_subset(&mut reader, &mut writer, &header, sampled)?;
    writer.finish()?;

    tmp_path
        .persist(final_path)
        .map_err(|e| SubsampleError::stream(final_path, e.error))?;
    Ok(counts)
}
