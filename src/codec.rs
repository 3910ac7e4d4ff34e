//! Base-128 length prefix used by the string payload encoding.
//!
//! A length is written least-significant 7 bits first, with the
//! continuation bit (`0x80`) set on every byte but the last. A zero length
//! is a single `0x00` byte. The prefix never exceeds
//! `(usize::BITS + 6) / 7` bytes.

/// Number of bytes `encode_into` will write for `len`.
pub(crate) const fn prefix_len(len: usize) -> usize {
    let mut n = 1;
    let mut rest = len;
    while rest >= 128 {
        rest >>= 7;
        n += 1;
    }
    n
}

/// Writes the prefix for `len` into `out` and returns the number of bytes
/// written. `out` must hold at least `prefix_len(len)` bytes.
pub(crate) fn encode_into(len: usize, out: &mut [u8]) -> usize {
    let mut rest = len;
    let mut off = 0;
    while rest >= 128 {
        out[off] = 0x80 | (rest & 0x7f) as u8;
        rest >>= 7;
        off += 1;
    }
    out[off] = (rest & 0x7f) as u8;
    off + 1
}

/// Decodes a prefix at the start of `block`, returning the encoded length
/// and the prefix size in bytes.
pub(crate) fn decode(block: &[u8]) -> (usize, usize) {
    let mut len = 0usize;
    let mut shift = 0u32;
    let mut off = 0;
    while block[off] & 0x80 != 0 {
        len |= ((block[off] & 0x7f) as usize) << shift;
        shift += 7;
        off += 1;
    }
    len |= (block[off] as usize) << shift;
    (len, off + 1)
}

/// Size of the prefix at the start of `block`, located by scanning the
/// continuation bits without decoding the length.
pub(crate) fn skip(block: &[u8]) -> usize {
    let mut off = 0;
    while block[off] & 0x80 != 0 {
        off += 1;
    }
    off + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(len: usize) {
        let mut buf = [0u8; 16];
        let written = encode_into(len, &mut buf);
        assert_eq!(written, prefix_len(len));
        let (decoded, off) = decode(&buf);
        assert_eq!(decoded, len);
        assert_eq!(off, written);
        assert_eq!(skip(&buf), written);
    }

    #[test]
    fn single_byte_lengths() {
        for len in 0..128 {
            assert_eq!(prefix_len(len), 1);
            round_trip(len);
        }
    }

    #[test]
    fn multi_byte_boundaries() {
        assert_eq!(prefix_len(127), 1);
        assert_eq!(prefix_len(128), 2);
        assert_eq!(prefix_len(16383), 2);
        assert_eq!(prefix_len(16384), 3);

        for len in [128, 129, 255, 256, 16383, 16384, 1 << 20, usize::MAX] {
            round_trip(len);
        }
    }

    #[test]
    fn continuation_bits() {
        let mut buf = [0u8; 16];
        let written = encode_into(300, &mut buf);
        assert_eq!(written, 2);
        // 300 = 0b10_0101100: low 7 bits first with the continuation bit set.
        assert_eq!(buf[0], 0x80 | 0x2c);
        assert_eq!(buf[1], 0x02);
    }

    #[test]
    fn zero_length_is_one_zero_byte() {
        let mut buf = [0xffu8; 4];
        assert_eq!(encode_into(0, &mut buf), 1);
        assert_eq!(buf[0], 0);
        assert_eq!(decode(&buf), (0, 1));
    }
}
