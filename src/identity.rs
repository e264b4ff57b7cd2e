//! First streaming pass: unique query name collection
//!
//! Only query names are retained, never record bodies, so memory scales
//! with the number of distinct fragments rather than the file size.

use crate::error::SubsampleError;
use indexmap::IndexSet;
use noodles::bam;
use std::io::{Error as IoError, ErrorKind};
use std::path::Path;

/// Insertion-ordered set of distinct query names.
///
/// Order equals first-occurrence order in the source stream. Both mates of
/// a pair share one query name, so each fragment contributes one entry.
#[derive(Debug, Default)]
pub struct IdentitySet {
    names: IndexSet<Vec<u8>>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one query name; returns true if it was not seen before.
    pub fn observe(&mut self, name: &[u8]) -> bool {
        if self.names.contains(name) {
            false
        } else {
            self.names.insert(name.to_vec())
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.names.iter().map(Vec::as_slice)
    }

    /// Consume the set, yielding the names in first-occurrence order.
    pub fn into_names(self) -> Vec<Vec<u8>> {
        self.names.into_iter().collect()
    }
}

/// Stream the BAM once, collecting unique query names.
///
/// Returns the identity set and the total record count scanned. An empty
/// file yields an empty set. The reader is fully consumed; the caller must
/// reopen the path for the filtering pass.
pub fn collect_query_names(path: &Path) -> Result<(IdentitySet, u64), SubsampleError> {
    let mut reader = bam::io::reader::Builder::default()
        .build_from_path(path)
        .map_err(|e| SubsampleError::stream(path, e))?;
    reader
        .read_header()
        .map_err(|e| SubsampleError::stream(path, e))?;

    let mut ids = IdentitySet::new();
    let mut records: u64 = 0;
    for result in reader.records() {
        let record = result.map_err(|e| SubsampleError::stream(path, e))?;
        let name = record.name().ok_or_else(|| {
            SubsampleError::stream(
                path,
                IoError::new(
                    ErrorKind::InvalidData,
                    format!("record {records} has no query name"),
                ),
            )
        })?;
        ids.observe(name);
        records += 1;
    }

    Ok((ids, records))
}
