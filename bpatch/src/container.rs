use crate::error::{PatchError, Result};

/// Bytes occupied by the CRC-32 trailer.
const TRAILER_LEN: usize = 4;

/// CRC-32 of a byte buffer (IEEE polynomial, as used by zlib and PNG).
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Wrap a raw patch stream into its container: the stream followed by the
/// big-endian CRC-32 of the target file it reconstructs.
pub fn write_container(raw_patch: &[u8], target: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw_patch.len() + TRAILER_LEN);
    out.extend_from_slice(raw_patch);
    out.extend_from_slice(&crc32(target).to_be_bytes());
    out
}

/// Split a container into the raw patch stream and the stored CRC-32.
///
/// Validation of the stored value is deferred to the caller, after the
/// target has been reconstructed.
pub fn read_container(container: &[u8]) -> Result<(&[u8], u32)> {
    if container.len() < TRAILER_LEN + 1 {
        return Err(PatchError::ContainerTooShort {
            len: container.len(),
        });
    }
    let (raw, trailer) = container.split_at(container.len() - TRAILER_LEN);
    let stored = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    Ok((raw, stored))
}
