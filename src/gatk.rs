//! External GATK collaborators
//!
//! Duplicate marking and WGS metrics collection run as subprocesses inside
//! a Singularity container. Commands are built as argv vectors and executed
//! with captured output; a non-zero exit becomes a
//! [`SubsampleError::Collaborator`] carrying stdout/stderr verbatim.

use crate::config::Config;
use crate::error::SubsampleError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of a successful tool invocation
#[derive(Debug)]
pub struct ToolOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs gatk tools through `singularity exec`
#[derive(Debug, Clone)]
pub struct GatkRunner {
    image: PathBuf,
    reference: PathBuf,
    threads: usize,
    bind_paths: Vec<String>,
    tmp_dir: PathBuf,
}

impl GatkRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            image: config.gatk_image.clone(),
            reference: config.reference_fasta.clone(),
            threads: config.threads,
            bind_paths: config.bind_paths.clone(),
            tmp_dir: config.tmp_dir.clone(),
        }
    }

    fn container_prefix(&self) -> Vec<String> {
        vec![
            "exec".to_string(),
            "-B".to_string(),
            self.bind_paths.join(","),
            self.image.display().to_string(),
            "gatk".to_string(),
        ]
    }

    /// Argv for MarkDuplicatesSpark (without the `singularity` program name).
    pub fn mark_duplicates_args(
        &self,
        input: &Path,
        output: &Path,
        metrics: &Path,
    ) -> Vec<String> {
        let mut args = self.container_prefix();
        args.extend(
            [
                "MarkDuplicatesSpark",
                "--remove-sequencing-duplicates",
                "-I",
            ]
            .map(String::from),
        );
        args.push(input.display().to_string());
        args.push("-O".to_string());
        args.push(output.display().to_string());
        args.push("-M".to_string());
        args.push(metrics.display().to_string());
        args.extend(
            [
                "--",
                "--spark-master",
                &format!("local[{}]", self.threads),
                "--conf",
                "spark.executor.memory=8G",
                "--conf",
                &format!("spark.local.dir={}", self.tmp_dir.display()),
            ]
            .map(String::from),
        );
        args
    }

    /// Argv for CollectWgsMetrics.
    pub fn collect_wgs_metrics_args(&self, input: &Path, metrics: &Path) -> Vec<String> {
        let mut args = self.container_prefix();
        args.push("--java-options".to_string());
        args.push(format!(
            "-Xmx16G -XX:ConcGCThreads={} -Djava.io.tmpdir={}",
            self.threads,
            self.tmp_dir.display()
        ));
        args.extend(["CollectWgsMetrics", "-R"].map(String::from));
        args.push(self.reference.display().to_string());
        args.push("-I".to_string());
        args.push(input.display().to_string());
        args.push("-O".to_string());
        args.push(metrics.display().to_string());
        args
    }

    /// Mark duplicates in the subsampled BAM with MarkDuplicatesSpark.
    pub fn mark_duplicates(
        &self,
        input: &Path,
        output: &Path,
        metrics: &Path,
    ) -> Result<ToolOutput, SubsampleError> {
        run_tool("singularity", &self.mark_duplicates_args(input, output, metrics))
    }

    /// Collect WGS metrics from the deduplicated BAM.
    pub fn collect_wgs_metrics(
        &self,
        input: &Path,
        metrics: &Path,
    ) -> Result<ToolOutput, SubsampleError> {
        run_tool("singularity", &self.collect_wgs_metrics_args(input, metrics))
    }
}

/// Run a command with captured output.
///
/// Spawn failures and non-zero exits both surface as
/// [`SubsampleError::Collaborator`] with the rendered command attached.
pub fn run_tool(program: &str, args: &[String]) -> Result<ToolOutput, SubsampleError> {
    let rendered = std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    eprintln!("running: {rendered}");

    let output = Command::new(program).args(args).output().map_err(|e| {
        SubsampleError::Collaborator {
            command: rendered.clone(),
            status: -1,
            stdout: String::new(),
            stderr: format!("failed to spawn: {e}"),
        }
    })?;

    let result = ToolOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if output.status.success() {
        Ok(result)
    } else {
        Err(SubsampleError::Collaborator {
            command: rendered,
            status: result.status,
            stdout: result.stdout,
            stderr: result.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> GatkRunner {
        GatkRunner::new(&Config::default())
    }

    #[test]
    fn test_mark_duplicates_args() {
        let args = runner().mark_duplicates_args(
            Path::new("/data/s1.bam"),
            Path::new("/data/s1.deduped.bam"),
            Path::new("/data/s1.metrics.txt"),
        );
        assert_eq!(args[0], "exec");
        assert_eq!(args[1], "-B");
        assert_eq!(args[2], "/storage,/data");
        assert!(args.contains(&"MarkDuplicatesSpark".to_string()));
        assert!(args.contains(&"--remove-sequencing-duplicates".to_string()));
        assert!(args.contains(&"/data/s1.bam".to_string()));
        assert!(args.contains(&"local[4]".to_string()));

        // -I precedes the input path
        let i_pos = args.iter().position(|a| a == "-I").unwrap();
        assert_eq!(args[i_pos + 1], "/data/s1.bam");
    }

    #[test]
    fn test_collect_wgs_metrics_args() {
        let args = runner().collect_wgs_metrics_args(
            Path::new("/data/s1.deduped.bam"),
            Path::new("/data/s1.wgs-metrics.txt"),
        );
        assert!(args.contains(&"CollectWgsMetrics".to_string()));
        let r_pos = args.iter().position(|a| a == "-R").unwrap();
        assert!(args[r_pos + 1].ends_with("Homo_sapiens_assembly38.fasta"));
        let java_pos = args.iter().position(|a| a == "--java-options").unwrap();
        assert!(args[java_pos + 1].contains("-Xmx16G"));
        assert!(args[java_pos + 1].contains("ConcGCThreads=4"));
    }

    #[test]
    fn test_run_tool_captures_success() {
        let out = run_tool("sh", &["-c".to_string(), "printf hello".to_string()]).unwrap();
        assert_eq!(out.status, 0);
        assert_eq!(out.stdout, "hello");
    }

    #[test]
    fn test_run_tool_nonzero_exit_attaches_output() {
        let err = run_tool(
            "sh",
            &[
                "-c".to_string(),
                "echo out; echo err >&2; exit 3".to_string(),
            ],
        )
        .unwrap_err();
        match err {
            SubsampleError::Collaborator {
                status,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(status, 3);
                assert!(stdout.contains("out"));
                assert!(stderr.contains("err"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_tool_spawn_failure() {
        let err = run_tool("/nonexistent/program", &[]).unwrap_err();
        assert!(matches!(err, SubsampleError::Collaborator { .. }));
    }
}
