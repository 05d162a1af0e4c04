use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("patch container too short: {len} bytes (need at least 5)")]
    ContainerTooShort { len: usize },

    #[error("invalid block size {got} (must be a positive multiple of 8, at most 248)")]
    InvalidBlockSize { got: usize },

    #[error("truncated 0x{tag:02X} record at patch offset {offset}")]
    TruncatedRecord { tag: u8, offset: usize },

    #[error("run-length data truncated: control byte at offset {offset} declares {declared} data bytes, {got} remain")]
    TruncatedRun {
        offset: usize,
        declared: usize,
        got: usize,
    },

    #[error("unknown record tag 0x{got:02X} at patch offset {offset}")]
    UnknownTag { offset: usize, got: u8 },

    #[error("XOR delta at patch offset {offset} decoded to {got} bytes, expected {expected}")]
    DeltaLengthMismatch {
        offset: usize,
        expected: usize,
        got: usize,
    },

    #[error("CRC-32 mismatch: stored 0x{stored:08X}, reconstructed file has 0x{computed:08X}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}

pub type Result<T> = std::result::Result<T, PatchError>;
