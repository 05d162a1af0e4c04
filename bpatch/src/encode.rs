use crate::container;
use crate::dict::BlockDictionary;
use crate::error::{PatchError, Result};
use crate::record::Record;
use crate::rle;

/// Smallest accepted block size.
pub const MIN_BLOCK_SIZE: usize = 8;
/// Largest block size the one-byte header can carry as a multiple of 8.
pub const MAX_BLOCK_SIZE: usize = 248;
/// Block size used when the caller expresses no preference.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Check that `block_size` fits the wire format: a multiple of 8 in
/// 8..=248. Returns the validated header byte.
pub fn validate_block_size(block_size: usize) -> Result<u8> {
    if block_size < MIN_BLOCK_SIZE || block_size % 8 != 0 || block_size > MAX_BLOCK_SIZE {
        return Err(PatchError::InvalidBlockSize { got: block_size });
    }
    Ok(block_size as u8)
}

/// Build the raw patch stream (header byte plus records, without the
/// container trailer) that rewrites `reference` into `target`.
///
/// The stream is deterministic: the same inputs always produce identical
/// bytes.
pub fn generate_patch(reference: &[u8], target: &[u8], block_size: usize) -> Result<Vec<u8>> {
    let header = validate_block_size(block_size)?;
    let dict = BlockDictionary::build(reference, block_size);

    let full_blocks = target.len() / block_size;
    let remainder = target.len() % block_size;

    let mut records = Vec::with_capacity(full_blocks);
    for idx in 0..full_blocks {
        let pos = idx * block_size;
        let block = &target[pos..pos + block_size];
        records.push(classify_block(reference, &dict, block, pos));
    }

    let mut out = vec![header];
    collapse_match_runs(&records, &mut out);

    if remainder != 0 {
        Record::Tail(target[full_blocks * block_size..].to_vec()).write_to(&mut out);
    }

    Ok(out)
}

/// Generate a complete patch container for `target` against `reference`:
/// the raw patch stream followed by the big-endian CRC-32 of `target`.
pub fn create_patch(reference: &[u8], target: &[u8], block_size: usize) -> Result<Vec<u8>> {
    let raw = generate_patch(reference, target, block_size)?;
    Ok(container::write_container(&raw, target))
}

/// Choose the record for one full target block.
///
/// Preference order: exact same-offset match, then a dictionary hit anywhere
/// in the reference, then an XOR delta when its run-length encoding is
/// strictly shorter than the block, then a raw copy of the block. The
/// decision is purely local.
fn classify_block(
    reference: &[u8],
    dict: &BlockDictionary<'_>,
    block: &[u8],
    pos: usize,
) -> Record {
    let ref_block = reference.get(pos..pos + block.len());

    if ref_block == Some(block) {
        return Record::Match;
    }

    if let Some(offset) = dict.lookup(block) {
        return Record::Relocate { offset };
    }

    if let Some(ref_block) = ref_block {
        let delta: Vec<u8> = block.iter().zip(ref_block).map(|(t, r)| t ^ r).collect();
        let encoded = rle::rle_encode(&delta);
        if encoded.len() < block.len() {
            return Record::Delta(encoded);
        }
    }

    Record::Insert(block.to_vec())
}

/// Serialise the classified records, rewriting each maximal run of two or
/// more consecutive same-position matches into run records of up to 256
/// blocks. When the remainder after the 256-block chunks is exactly one
/// block it falls through as a plain match record; a lone match stays a
/// match record.
fn collapse_match_runs(records: &[Record], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < records.len() {
        if records[i] != Record::Match {
            records[i].write_to(out);
            i += 1;
            continue;
        }

        let run = records[i..]
            .iter()
            .take_while(|r| **r == Record::Match)
            .count();
        if run == 1 {
            Record::Match.write_to(out);
        } else {
            let mut remaining = run;
            while remaining > 1 {
                let n = remaining.min(256);
                Record::MatchRun { count: n as u16 }.write_to(out);
                remaining -= n;
            }
            if remaining == 1 {
                Record::Match.write_to(out);
            }
        }
        i += run;
    }
}
