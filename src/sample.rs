//! Uniform subsampling of the query name universe

use crate::error::SubsampleError;
use crate::identity::IdentitySet;
use std::collections::HashSet;

/// Membership-only set of sampled query names.
pub type SampledSet = HashSet<Vec<u8>>;

/// Draw `k` query names uniformly at random without replacement.
///
/// Consumes the identity set; everything downstream only needs membership
/// tests. Errors with [`SubsampleError::InsufficientPopulation`] when `k`
/// exceeds the number of unique names.
pub fn sample(ids: IdentitySet, k: u64) -> Result<SampledSet, SubsampleError> {
    sample_with_rng(ids, k, &mut fastrand::Rng::new())
}

/// Same as [`sample`] with an explicit RNG, so tests can seed it.
///
/// Partial Fisher-Yates: after `k` swap steps the first `k` slots hold a
/// uniform random subset, so every subset of size `k` is equally likely.
pub fn sample_with_rng(
    ids: IdentitySet,
    k: u64,
    rng: &mut fastrand::Rng,
) -> Result<SampledSet, SubsampleError> {
    let available = ids.len() as u64;
    if k > available {
        return Err(SubsampleError::InsufficientPopulation {
            requested: k,
            available,
        });
    }

    let mut pool = ids.into_names();
    let k = k as usize;
    for i in 0..k {
        let j = i + rng.usize(..pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(k);
    Ok(pool.into_iter().collect())
}
