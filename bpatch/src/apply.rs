use crate::container;
use crate::encode::validate_block_size;
use crate::error::{PatchError, Result};
use crate::record::{self, Record};
use crate::rle;

/// Parse a raw patch stream and reconstruct the target against `reference`.
///
/// The stream's first byte is the block size; records follow until the end
/// of the stream or a zero padding byte. Same-position reads use a logical
/// reference extended by one block of zeros, so matches near the tail of the
/// reference degrade to zero fill instead of going out of bounds.
///
/// This does not verify the container checksum; see [`rebuild`] for the
/// whole-container path.
pub fn apply_patch(patch: &[u8], reference: &[u8]) -> Result<Vec<u8>> {
    let Some(&header) = patch.first() else {
        return Err(PatchError::ContainerTooShort { len: 0 });
    };
    let block_size = usize::from(validate_block_size(usize::from(header))?);

    let mut padded = Vec::with_capacity(reference.len() + block_size);
    padded.extend_from_slice(reference);
    padded.resize(reference.len() + block_size, 0);

    let mut out = Vec::new();
    // The write cursor advances one block per full-block record. It is kept
    // separately from `out.len()` so a malformed relocation that reads past
    // the reference cannot drag later same-position reads out of step.
    let mut write_pos = 0usize;
    let mut pos = 1;

    while let Some((rec, next)) = record::read_record(patch, pos, block_size)? {
        apply_record(&rec, &padded, &mut out, &mut write_pos, block_size, pos)?;
        pos = next;
    }

    Ok(out)
}

/// Open a patch container, rebuild the target against `reference`, and
/// verify the reconstruction against the stored CRC-32.
pub fn rebuild(container_bytes: &[u8], reference: &[u8]) -> Result<Vec<u8>> {
    let (raw_patch, stored) = container::read_container(container_bytes)?;
    let out = apply_patch(raw_patch, reference)?;

    let computed = container::crc32(&out);
    if computed != stored {
        return Err(PatchError::ChecksumMismatch { stored, computed });
    }
    Ok(out)
}

/// Append the bytes described by one record.
fn apply_record(
    rec: &Record,
    padded_ref: &[u8],
    out: &mut Vec<u8>,
    write_pos: &mut usize,
    block_size: usize,
    pos: usize,
) -> Result<()> {
    match rec {
        Record::Match => {
            out.extend_from_slice(ref_window(padded_ref, *write_pos, block_size));
            *write_pos += block_size;
        }

        Record::MatchRun { count } => {
            for _ in 0..*count {
                out.extend_from_slice(ref_window(padded_ref, *write_pos, block_size));
                *write_pos += block_size;
            }
        }

        Record::Relocate { offset } => {
            out.extend_from_slice(ref_window(padded_ref, *offset as usize, block_size));
            *write_pos += block_size;
        }

        Record::Insert(data) => {
            out.extend_from_slice(data);
            *write_pos += block_size;
        }

        Record::Delta(encoded) => {
            let delta = rle::rle_decode(encoded)?;
            if delta.len() != block_size {
                return Err(PatchError::DeltaLengthMismatch {
                    offset: pos,
                    expected: block_size,
                    got: delta.len(),
                });
            }
            let ref_block = ref_window(padded_ref, *write_pos, block_size);
            out.extend(delta.iter().zip(ref_block).map(|(d, r)| d ^ r));
            *write_pos += block_size;
        }

        Record::Tail(data) => {
            out.extend_from_slice(data);
        }
    }
    Ok(())
}

/// One block-sized window of the padded reference starting at `start`.
///
/// A window that begins at or before the original reference length is always
/// full thanks to the zero padding. A window past it (only reachable through
/// a corrupt relocation offset) comes back short; the resulting output length
/// change is caught by checksum verification.
fn ref_window(padded: &[u8], start: usize, block_size: usize) -> &[u8] {
    let lo = start.min(padded.len());
    let hi = (start + block_size).min(padded.len());
    &padded[lo..hi]
}
