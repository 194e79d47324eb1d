//! Primitive field readers shared by every decoded record type.

/// Reads `len` bytes at `off` as ASCII, stripping trailing NUL bytes.
///
/// Out-of-range offsets return an empty string rather than panicking -
/// decoding must be total over any correctly-sized buffer. Non-ASCII bytes
/// are passed through as their raw code points instead of being rejected;
/// panel memory is not guaranteed to be strictly 7-bit clean.
#[must_use]
pub fn get_ascii(buf: &[u8], off: usize, len: usize) -> String {
    let slice = buf.get(off..off + len).unwrap_or(&[]);
    let trimmed_len = slice.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    slice[..trimmed_len].iter().map(|&b| b as char).collect()
}

/// Reads `len` bytes at `off` and renders them as a packed-BCD hex string
/// (two hex digits per byte, in order).
#[must_use]
pub fn get_bcd(buf: &[u8], off: usize, len: usize) -> String {
    let slice = buf.get(off..off + len).unwrap_or(&[]);
    slice.iter().map(|b| format!("{b:02x}")).collect()
}

/// Inverse of [`get_bcd`]: renders a hex string back into `len` raw bytes,
/// padding with zero nibbles if `hex` is too short.
#[must_use]
pub fn put_bcd(hex: &str, len: usize) -> Vec<u8> {
    let mut chars = hex.chars();
    (0..len)
        .map(|_| {
            let hi = chars.next().and_then(|c| c.to_digit(16)).unwrap_or(0);
            let lo = chars.next().and_then(|c| c.to_digit(16)).unwrap_or(0);
            ((hi << 4) | lo) as u8
        })
        .collect()
}

/// Reads a 3-byte pincode at `off` in an already-assembled pincode buffer
/// and strips the `d`/`e`/`f` "unused nibble" sentinels from its hex
/// encoding.
///
/// Only leading and trailing occurrences are stripped (matching the
/// reference implementation's string-trim semantics), not every occurrence
/// throughout the string - a `d`, `e` or `f` digit that is a genuine part of
/// the code, sandwiched between real digits, is preserved.
#[must_use]
pub fn get_pincode(buf: &[u8], off: usize) -> String {
    let slice = buf.get(off..off + 3).unwrap_or(&[]);
    let hex: String = slice.iter().map(|b| format!("{b:02x}")).collect();
    hex.trim_matches(|c| c == 'd' || c == 'e' || c == 'f').to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn ascii_strips_trailing_nul_but_keeps_interior_nul_and_spaces() {
        assert_eq!(get_ascii(b"ZOME003\0\0\0\0\0\0\0\0\0", 0, 16), "ZOME003");
        assert_eq!(get_ascii(b"                ", 0, 16), "                ");
    }

    #[test]
    fn ascii_is_total_over_out_of_range_offsets() {
        assert_eq!(get_ascii(&[1, 2, 3], 10, 5), "");
    }

    #[test]
    fn bcd_renders_every_nibble() {
        assert_eq!(get_bcd(&[0x61, 0x23, 0x45, 0x67, 0x01, 0x23, 0x45], 0, 7), "61234567012345");
    }

    #[test]
    fn pincode_trims_only_leading_and_trailing_def() {
        // 0xde 0xad 0x12 -> "dead12" -> strip leading "de" run? 'd','e' at
        // front, then 'a' stops the trim (not in {d,e,f}); trailing has no
        // d/e/f, so only the leading "de" is removed, not the "ad".
        let buf = [0xde, 0xad, 0x12];
        assert_eq!(get_pincode(&buf, 0), "ad12");
    }

    #[test]
    fn pincode_preserves_interior_def_digits() {
        // "1d2e30" has no d/e/f at either end, so nothing is stripped even
        // though 'd' and 'e' appear in the middle.
        let buf = [0x1d, 0x2e, 0x30];
        assert_eq!(get_pincode(&buf, 0), "1d2e30");
    }

    #[test]
    fn pincode_is_total_over_out_of_range_offsets() {
        assert_eq!(get_pincode(&[1, 2], 0), "");
    }
}
