use std::collections::HashMap;

/// Largest reference offset a relocated-match record can carry (24-bit field).
pub const MAX_REF_OFFSET: usize = 0xFF_FFFF;

/// Content-addressed index of every block-sized window in the reference.
///
/// Windows are keyed by their raw bytes and mapped to a single preferred
/// offset. Aligned windows (offsets that are multiples of the block size) are
/// indexed in a first pass, so when the same bytes occur both aligned and
/// unaligned the aligned offset wins even when the unaligned one is
/// numerically smaller. Within a pass the earliest offset wins.
///
/// Only the first 16 MiB of the reference is indexed; windows beyond that
/// cannot be named by the wire format's offset field.
pub struct BlockDictionary<'a> {
    offsets: HashMap<&'a [u8], u32>,
}

impl<'a> BlockDictionary<'a> {
    /// Index `reference` in block-sized windows.
    pub fn build(reference: &'a [u8], block_size: usize) -> Self {
        let cap = reference.len().min(MAX_REF_OFFSET + 1);
        let mut offsets: HashMap<&[u8], u32> = HashMap::new();

        if cap >= block_size && block_size > 0 {
            // Pass 1: aligned windows
            for j in (0..=cap - block_size).step_by(block_size) {
                offsets
                    .entry(&reference[j..j + block_size])
                    .or_insert(j as u32);
            }
            // Pass 2: everything else
            for j in 0..=cap - block_size {
                if j % block_size != 0 {
                    offsets
                        .entry(&reference[j..j + block_size])
                        .or_insert(j as u32);
                }
            }
        }

        BlockDictionary { offsets }
    }

    /// Preferred reference offset for `block`, if its bytes occur anywhere in
    /// the indexed prefix of the reference.
    pub fn lookup(&self, block: &[u8]) -> Option<u32> {
        self.offsets.get(block).copied()
    }

    /// Number of distinct windows indexed.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
