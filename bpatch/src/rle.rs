use crate::error::{PatchError, Result};

/// Longest literal run a single control byte can describe.
pub const MAX_LITERAL_RUN: usize = 128;
/// Longest repeat run a single control byte can describe.
pub const MAX_REPEAT_RUN: usize = 129;
/// High bit of the control byte: set = repeat run, clear = literal run.
const REPEAT_FLAG: u8 = 0x80;

/// Run-length encode a byte sequence.
///
/// The stream is a series of runs, each introduced by one control byte:
///
/// - high bit clear: literal run of `(ctrl & 0x7F) + 1` bytes (1..=128),
///   followed by that many literal bytes
/// - high bit set: repeat run of `(ctrl & 0x7F) + 2` copies (2..=129) of the
///   single byte that follows
///
/// Repeat runs are taken greedily whenever two or more identical bytes are
/// adjacent; literal runs accumulate until the next repeat starts or the
/// 128-byte cap is hit. The empty input encodes to an empty stream.
pub fn rle_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let run_byte = data[i];
        let mut run_len = 1;
        while i + run_len < data.len() && data[i + run_len] == run_byte && run_len < MAX_REPEAT_RUN
        {
            run_len += 1;
        }

        if run_len >= 2 {
            out.push(REPEAT_FLAG | (run_len - 2) as u8);
            out.push(run_byte);
            i += run_len;
        } else {
            let lit_start = i;
            let mut lit_len = 1;
            i += 1;
            while lit_len < MAX_LITERAL_RUN && i < data.len() {
                // A pair of equal bytes starts the next repeat run.
                if i + 1 < data.len() && data[i] == data[i + 1] {
                    break;
                }
                lit_len += 1;
                i += 1;
            }
            out.push((lit_len - 1) as u8);
            out.extend_from_slice(&data[lit_start..lit_start + lit_len]);
        }
    }

    out
}

/// Decode a run-length encoded byte sequence.
///
/// Strict: a control byte whose declared data extends past the end of the
/// input is an error, never a short read.
pub fn rle_decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let ctrl = data[i];
        let ctrl_offset = i;
        i += 1;

        if ctrl & REPEAT_FLAG != 0 {
            let count = (ctrl & 0x7F) as usize + 2;
            let Some(&value) = data.get(i) else {
                return Err(PatchError::TruncatedRun {
                    offset: ctrl_offset,
                    declared: 1,
                    got: 0,
                });
            };
            out.resize(out.len() + count, value);
            i += 1;
        } else {
            let count = (ctrl & 0x7F) as usize + 1;
            let Some(run) = data.get(i..i + count) else {
                return Err(PatchError::TruncatedRun {
                    offset: ctrl_offset,
                    declared: count,
                    got: data.len() - i,
                });
            };
            out.extend_from_slice(run);
            i += count;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) {
        let encoded = rle_encode(data);
        let decoded = rle_decode(&encoded).unwrap();
        assert_eq!(decoded, data, "round trip failed for {:02X?}", data);
    }

    #[test]
    fn test_empty_input() {
        assert!(rle_encode(&[]).is_empty());
        assert!(rle_decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_byte_is_literal_run() {
        // count-1 = 0, then the byte itself
        assert_eq!(rle_encode(&[0x5A]), vec![0x00, 0x5A]);
    }

    #[test]
    fn test_pair_becomes_repeat_run() {
        // Two identical bytes already pay for a repeat run.
        assert_eq!(rle_encode(&[7, 7]), vec![0x80, 7]);
    }

    #[test]
    fn test_literal_run_stops_at_repeat_start() {
        // 1 2 3 3 3: literal [1, 2] then repeat 3x3
        assert_eq!(rle_encode(&[1, 2, 3, 3, 3]), vec![0x01, 1, 2, 0x81, 3]);
    }

    #[test]
    fn test_repeat_run_cap() {
        // 129 is the longest repeat a control byte can carry; 130 overflows
        // into a second run.
        assert_eq!(rle_encode(&[9u8; 129]), vec![0xFF, 9]);
        assert_eq!(rle_encode(&[9u8; 130]), vec![0xFF, 9, 0x00, 9]);
        assert_eq!(rle_encode(&[9u8; 131]), vec![0xFF, 9, 0x80, 9]);
    }

    #[test]
    fn test_literal_run_cap() {
        // 129 strictly distinct pairs force a literal split at 128.
        let data: Vec<u8> = (0..=128u8).collect();
        let encoded = rle_encode(&data);
        assert_eq!(encoded[0], 0x7F); // 128-byte literal run
        assert_eq!(encoded[129], 0x00); // then a 1-byte literal run
        roundtrip(&data);
    }

    #[test]
    fn test_mixed_content_roundtrip() {
        roundtrip(&[0, 0, 0, 0, 1, 2, 3, 4, 4, 5, 5, 5, 5, 5, 6]);
        roundtrip(&[0xFF; 1000]);
        roundtrip(b"abcdefgh");
        roundtrip(&[1, 1, 2, 2, 3, 3, 4, 4]);
    }

    #[test]
    fn test_decode_literal_run() {
        assert_eq!(rle_decode(&[0x02, 10, 20, 30]).unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn test_decode_repeat_run() {
        // ctrl 0x83 = repeat count 5
        assert_eq!(rle_decode(&[0x83, 0xAB]).unwrap(), vec![0xAB; 5]);
    }

    #[test]
    fn test_decode_truncated_literal_run() {
        // ctrl declares 3 literal bytes, only 1 present
        let err = rle_decode(&[0x02, 10]).unwrap_err();
        assert!(matches!(
            err,
            PatchError::TruncatedRun {
                offset: 0,
                declared: 3,
                got: 1
            }
        ));
    }

    #[test]
    fn test_decode_truncated_repeat_run() {
        // repeat control byte with no value byte after it
        let err = rle_decode(&[0x80]).unwrap_err();
        assert!(matches!(err, PatchError::TruncatedRun { offset: 0, .. }));
    }

    #[test]
    fn test_decode_trailing_control_byte() {
        // valid run followed by a dangling literal control byte
        let err = rle_decode(&[0x80, 1, 0x00]).unwrap_err();
        assert!(matches!(err, PatchError::TruncatedRun { offset: 2, .. }));
    }
}
