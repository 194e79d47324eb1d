//! Parsing/encoding for the 24-bit big-endian address + 1-byte size triple
//! used by every `O`/`I`/`R`/`W` message body.

/// Splits a message body into `(base, size, data)`.
///
/// Returns `None` if `body` is shorter than the 4-byte address+size header.
/// Does not check that `data.len() == size` - callers that care (memory
/// application) check that themselves, since a read *request* body has no
/// trailing data at all while a read *response* does.
#[must_use]
pub fn split_address_triple(body: &[u8]) -> Option<(u32, u8, &[u8])> {
    if body.len() < 4 {
        return None;
    }
    let base = u32::from_be_bytes([0, body[0], body[1], body[2]]);
    let size = body[3];
    Some((base, size, &body[4..]))
}

/// Encodes a `(base, size)` pair as the 4-byte address+size header.
///
/// # Panics
///
/// Panics if `base` does not fit in 24 bits.
#[must_use]
pub fn encode_address_triple(base: u32, size: u8) -> [u8; 4] {
    assert!(base <= 0x00FF_FFFF, "address {base:#x} does not fit in 24 bits");
    let be = base.to_be_bytes();
    [be[1], be[2], be[3], size]
}
