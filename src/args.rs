// Command-line argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pairsubrs",
    about = "Depth-targeted paired-end BAM subsampling (Rust)"
)]
pub struct Args {
    /// Input BAM file
    #[arg(short, long)]
    pub input: PathBuf,
    /// Output directory; a per-sample subdirectory is created inside it
    #[arg(short, long)]
    pub output_dir: PathBuf,
    /// Read length in base pairs
    #[arg(long, default_value_t = 150)]
    pub read_len: u32,
    /// Oversampling adjustment factor
    #[arg(long, default_value_t = 1.2)]
    pub adjust_val: f64,
    /// Target depth of coverage (e.g. 30 for 30X)
    #[arg(long)]
    pub target_depth: f64,
    /// Treat the input as paired-end (halves the target read count)
    #[arg(long)]
    pub paired: bool,
    /// Singularity image providing gatk
    #[arg(long)]
    pub gatk_image: Option<PathBuf>,
    /// Reference FASTA for CollectWgsMetrics
    #[arg(long)]
    pub reference: Option<PathBuf>,
    /// Thread count forwarded to the gatk tools
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
    /// Comma-separated paths to bind-mount into the container
    #[arg(long)]
    pub bind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from([
            "pairsubrs",
            "--input",
            "in.bam",
            "--output-dir",
            "out",
            "--target-depth",
            "0.5",
        ]);
        assert_eq!(args.read_len, 150);
        assert_eq!(args.adjust_val, 1.2);
        assert_eq!(args.target_depth, 0.5);
        assert!(!args.paired);
        assert!(args.gatk_image.is_none());
    }

    #[test]
    fn test_target_depth_required() {
        let result =
            Args::try_parse_from(["pairsubrs", "--input", "in.bam", "--output-dir", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_paired_flag() {
        let args = Args::parse_from([
            "pairsubrs",
            "--input",
            "in.bam",
            "--output-dir",
            "out",
            "--target-depth",
            "30",
            "--paired",
        ]);
        assert!(args.paired);
        assert_eq!(args.target_depth, 30.0);
    }
}
