//! Error taxonomy for the subsampling pipeline
//!
//! Every error here is fatal to the run: the pipeline is single-shot and
//! performs no local recovery.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubsampleError {
    /// Malformed numeric input to the depth computation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The computed target read count exceeds the number of unique query
    /// names in the input. Reported before any output is written.
    #[error(
        "insufficient unique query names ({available}) for target read count ({requested})"
    )]
    InsufficientPopulation { requested: u64, available: u64 },

    /// Failure opening, reading, or writing an alignment file.
    #[error("I/O failure on {path}: {source}")]
    Stream {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited non-zero. Captured output is attached verbatim.
    #[error(
        "external tool failed with exit status {status}: {command}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}"
    )]
    Collaborator {
        command: String,
        status: i32,
        stdout: String,
        stderr: String,
    },
}

impl SubsampleError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn stream(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stream {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_population_names_both_numbers() {
        let err = SubsampleError::InsufficientPopulation {
            requested: 100,
            available: 50,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn test_collaborator_message_carries_captured_output() {
        let err = SubsampleError::Collaborator {
            command: "gatk MarkDuplicatesSpark".to_string(),
            status: 2,
            stdout: "spark log".to_string(),
            stderr: "OOM".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status 2"));
        assert!(msg.contains("spark log"));
        assert!(msg.contains("OOM"));
    }

    #[test]
    fn test_stream_error_names_path() {
        let err = SubsampleError::stream(
            "/data/in.bam",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("/data/in.bam"));
    }
}
