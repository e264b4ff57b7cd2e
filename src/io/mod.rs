//! BAM file I/O utilities
//!
//! Reading goes through noodles' BAM reader; the subsampled output is
//! written as raw record bytes through a BGZF writer, with the duplicate
//! flag cleared directly in the serialized bytes.

use anyhow::{Context, Result};
use noodles::bam;
use noodles::bgzf::io::Writer as BgzfWriter;
use noodles::sam::alignment::io::Write as SamWrite;
use noodles::sam::header::Header as SamHeader;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};

/// Offset of the flag field in a serialized BAM record
///
/// [`record_to_bytes`] includes the leading block_size, so the flag sits
/// after block_size=4 + ref_id=4 + pos=4 + bin_mq_nl=4 + n_cigar_op=2.
pub const FLAG_OFFSET: usize = 18;

/// The DUPLICATE flag bit in SAM/BAM format
pub const DUPLICATE_FLAG: u16 = 0x400;

/// Clear the DUPLICATE flag in raw BAM record bytes
///
/// All other flag bits are preserved. Returns the flag value found before
/// clearing, or `None` if the buffer is too short to hold a flag field.
#[inline]
pub fn clear_duplicate_flag(data: &mut [u8]) -> Option<u16> {
    if data.len() < FLAG_OFFSET + 2 {
        return None;
    }

    let flag = u16::from_le_bytes([data[FLAG_OFFSET], data[FLAG_OFFSET + 1]]);
    let new_flag = flag & !DUPLICATE_FLAG;

    data[FLAG_OFFSET] = new_flag as u8;
    data[FLAG_OFFSET + 1] = (new_flag >> 8) as u8;

    Some(flag)
}

/// Write header to BGZF-compressed BAM file
pub fn write_header(writer: &mut BgzfWriter<File>, header: &SamHeader) -> Result<()> {
    let mut header_buf = Vec::new();
    {
        let mut writer = bam::io::Writer::from(&mut header_buf);
        writer.write_header(header)?;
    }
    writer.write_all(&header_buf)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a BAM record to raw bytes (block_size prefix included)
pub fn record_to_bytes(header: &SamHeader, record: &bam::Record) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    {
        let mut writer = bam::io::Writer::from(&mut data);
        writer.write_alignment_record(header, record)?;
    }
    Ok(data)
}

/// Counters from the filtering pass
#[derive(Debug, Default, Clone, Copy)]
pub struct SubsetCounts {
    /// Records scanned in the source stream
    pub scanned: u64,
    /// Records written to the output
    pub retained: u64,
    /// Retained records whose duplicate flag had to be cleared
    pub cleared: u64,
}

/// Second streaming pass: keep records whose query name was sampled.
///
/// Retained records are written in their original stream order with the
/// duplicate flag cleared; everything else is dropped silently. Records are
/// handled one at a time, the stream is never buffered whole.
pub fn write_subset<R: Read>(
    reader: &mut bam::io::Reader<R>,
    writer: &mut BgzfWriter<File>,
    header: &SamHeader,
    sampled: &HashSet<Vec<u8>>,
) -> Result<SubsetCounts> {
    let mut counts = SubsetCounts::default();

    for result in reader.records() {
        let record = result?;
        counts.scanned += 1;

        let name: &[u8] = record
            .name()
            .with_context(|| format!("record {} has no query name", counts.scanned))?
            .as_ref();
        if !sampled.contains(name) {
            continue;
        }

        let mut data = record_to_bytes(header, &record)?;
        if let Some(old_flag) = clear_duplicate_flag(&mut data) {
            if old_flag & DUPLICATE_FLAG != 0 {
                counts.cleared += 1;
            }
        }
        writer.write_all(&data)?;
        counts.retained += 1;
    }

    Ok(counts)
}
