//! Target read count computation
//!
//! Converts a desired sequencing depth into the number of reads (or read
//! pairs) to draw, given genome size and read length.

use crate::error::SubsampleError;

/// Compute the number of reads needed to reach `target_depth`.
///
/// `base_reads = round(genome_base_size / read_len)` is the read count for
/// 1X coverage; the result scales it by the oversampling adjustment and the
/// target depth, halved for paired-end data since both mates of a sampled
/// fragment are kept.
///
/// Rounding uses `f64::round` (half away from zero) at both steps.
pub fn target_read_count(
    genome_base_size: f64,
    read_len: u32,
    adjust_val: f64,
    target_depth: f64,
    paired: bool,
) -> Result<u64, SubsampleError> {
    if !genome_base_size.is_finite() || genome_base_size <= 0.0 {
        return Err(SubsampleError::InvalidArgument(format!(
            "genome base size must be positive, got {genome_base_size}"
        )));
    }
    if read_len == 0 {
        return Err(SubsampleError::InvalidArgument(
            "read length must be positive".to_string(),
        ));
    }
    if !adjust_val.is_finite() || adjust_val <= 0.0 {
        return Err(SubsampleError::InvalidArgument(format!(
            "adjust value must be positive, got {adjust_val}"
        )));
    }
    if !target_depth.is_finite() || target_depth < 0.0 {
        return Err(SubsampleError::InvalidArgument(format!(
            "target depth must be non-negative, got {target_depth}"
        )));
    }

    let divisor = if paired { 2.0 } else { 1.0 };
    let base_reads = (genome_base_size / f64::from(read_len)).round();
    let count = (base_reads * adjust_val * target_depth / divisor).round();
    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HG38_BASES: f64 = 3.1e9;

    #[test]
    fn test_worked_example() {
        // round(3.1e9 / 150) = 20_666_667
        // round(20_666_667 * 1.2 * 0.5) = 12_400_000, halved for paired
        let single = target_read_count(HG38_BASES, 150, 1.2, 0.5, false).unwrap();
        assert_eq!(single, 12_400_000);
        let paired = target_read_count(HG38_BASES, 150, 1.2, 0.5, true).unwrap();
        assert_eq!(paired, 6_200_000);
    }

    #[test]
    fn test_unpaired_is_twice_paired() {
        let paired = target_read_count(HG38_BASES, 150, 1.2, 0.5, true).unwrap();
        let single = target_read_count(HG38_BASES, 150, 1.2, 0.5, false).unwrap();
        // Halving then rounding can differ from the exact half by at most 1.
        let diff = (single as i64 - 2 * paired as i64).abs();
        assert!(diff <= 1, "single={single} paired={paired}");
    }

    #[test]
    fn test_zero_depth_gives_zero_reads() {
        let count = target_read_count(HG38_BASES, 150, 1.2, 0.0, true).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_deterministic() {
        let a = target_read_count(HG38_BASES, 135, 1.2, 30.0, true).unwrap();
        let b = target_read_count(HG38_BASES, 135, 1.2, 30.0, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_read_len_rejected() {
        let err = target_read_count(HG38_BASES, 0, 1.2, 0.5, true).unwrap_err();
        assert!(matches!(err, SubsampleError::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_depth_rejected() {
        let err = target_read_count(HG38_BASES, 150, 1.2, -1.0, true).unwrap_err();
        assert!(matches!(err, SubsampleError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_positive_adjust_rejected() {
        let err = target_read_count(HG38_BASES, 150, 0.0, 0.5, true).unwrap_err();
        assert!(matches!(err, SubsampleError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_finite_genome_rejected() {
        let err = target_read_count(f64::NAN, 150, 1.2, 0.5, true).unwrap_err();
        assert!(matches!(err, SubsampleError::InvalidArgument(_)));
    }
}
