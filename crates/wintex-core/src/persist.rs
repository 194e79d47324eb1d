//! Persisted panel file format (§6).
//!
//! The reference implementation pickles a language-specific object graph.
//! We use explicit length-prefixed framing instead: a magic header, a
//! version byte, then five length-delimited fields in a fixed order. This
//! round-trips the same information without tying the format to any one
//! language's object model.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::{error::CoreError, memory::Memory};

const MAGIC: &[u8] = b"pytexalarm\n";
const VERSION: u8 = b'1';

/// Errors raised while loading a persisted panel file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The file did not start with the expected magic bytes.
    #[error("bad magic: expected {expected:?}", expected = String::from_utf8_lossy(MAGIC))]
    BadMagic,

    /// The file's version byte was not one this implementation understands.
    #[error("unsupported version byte {0:#04x}")]
    BadVersion(u8),

    /// The file ended before a declared length-prefixed field was fully
    /// present.
    #[error("truncated file: expected {expected} more bytes for {field}")]
    Truncated {
        /// Name of the field being read when truncation was detected.
        field: &'static str,
        /// How many more bytes were expected.
        expected: usize,
    },

    /// An identity field was rejected by a freshly-constructed [`Memory`].
    /// Unreachable in practice, since a fresh `Memory` always accepts its
    /// first identity assignment; kept as a typed error rather than a panic
    /// so a future change to that invariant fails loudly instead of
    /// aborting.
    #[error("identity field rejected while loading: {0}")]
    Identity(#[from] CoreError),
}

/// Serialises `memory`'s identity fields and buffers into the persisted
/// panel file format.
#[must_use]
pub fn save(memory: &Memory) -> Bytes {
    let mut buf = BytesMut::with_capacity(
        MAGIC.len() + 1 + memory.mem().len() + memory.io().len() + 64,
    );
    buf.put_slice(MAGIC);
    buf.put_u8(VERSION);
    put_field(&mut buf, memory.banner().as_bytes());
    put_field(&mut buf, memory.serial().as_bytes());
    put_field(&mut buf, memory.udlpasswd().as_bytes());
    put_field(&mut buf, memory.mem());
    put_field(&mut buf, memory.io());
    buf.freeze()
}

/// Loads identity fields and buffers from a persisted panel file, applying
/// them to a fresh [`Memory`].
///
/// # Errors
///
/// Returns [`PersistError::BadMagic`] or [`PersistError::BadVersion`] if the
/// header doesn't match, or [`PersistError::Truncated`] if any
/// length-prefixed field runs past the end of the buffer.
pub fn load(bytes: &[u8]) -> Result<Memory, PersistError> {
    let mut buf = bytes;
    if buf.len() < MAGIC.len() || &buf[..MAGIC.len()] != MAGIC {
        return Err(PersistError::BadMagic);
    }
    buf.advance(MAGIC.len());

    let version = *buf.first().ok_or(PersistError::Truncated { field: "version", expected: 1 })?;
    if version != VERSION {
        return Err(PersistError::BadVersion(version));
    }
    buf.advance(1);

    let banner = take_field(&mut buf, "banner")?;
    let serial = take_field(&mut buf, "serial")?;
    let udlpasswd = take_field(&mut buf, "udlpasswd")?;
    let mem = take_field(&mut buf, "mem")?;
    let io = take_field(&mut buf, "io")?;

    let mut memory = Memory::new();
    // Identity setters are one-shot by design (`Memory::set_banner` et al.);
    // a freshly-constructed `Memory` always accepts the first assignment.
    memory.set_banner(String::from_utf8_lossy(&banner).into_owned())?;
    memory.set_serial(String::from_utf8_lossy(&serial).into_owned())?;
    memory.set_udlpasswd(String::from_utf8_lossy(&udlpasswd).into_owned())?;
    memory
        .apply_write(crate::memory::Region::Mem, 0, mem.len() as u32, &mem)
        .map_err(|_| PersistError::Truncated { field: "mem", expected: mem.len() })?;
    memory
        .apply_write(crate::memory::Region::Io, 0, io.len() as u32, &io)
        .map_err(|_| PersistError::Truncated { field: "io", expected: io.len() })?;

    Ok(memory)
}

fn put_field(buf: &mut BytesMut, field: &[u8]) {
    buf.put_u32(field.len() as u32);
    buf.put_slice(field);
}

fn take_field(buf: &mut &[u8], name: &'static str) -> Result<Vec<u8>, PersistError> {
    if buf.len() < 4 {
        return Err(PersistError::Truncated { field: name, expected: 4 - buf.len() });
    }
    let len = buf.get_u32() as usize;
    if buf.len() < len {
        return Err(PersistError::Truncated { field: name, expected: len - buf.len() });
    }
    let value = buf[..len].to_vec();
    buf.advance(len);
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_identity_and_buffers() {
        let mut memory = Memory::new();
        memory.set_banner("Elite 24    V6.05.03").unwrap();
        memory.set_serial("1234567").unwrap();
        memory.set_udlpasswd("hunter2").unwrap();
        memory.apply_write(crate::memory::Region::Mem, 0, 4, &[1, 2, 3, 4]).unwrap();

        let saved = save(&memory);
        let loaded = load(&saved).unwrap();

        assert_eq!(loaded.banner(), memory.banner());
        assert_eq!(loaded.serial(), memory.serial());
        assert_eq!(loaded.udlpasswd(), memory.udlpasswd());
        assert_eq!(loaded.mem(), memory.mem());
        assert_eq!(loaded.io(), memory.io());
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = b"not-the-right-magic";
        assert_eq!(load(bytes), Err(PersistError::BadMagic));
    }

    #[test]
    fn rejects_bad_version() {
        let mut bytes = MAGIC.to_vec();
        bytes.push(b'9');
        assert_eq!(load(&bytes), Err(PersistError::BadVersion(b'9')));
    }

    #[test]
    fn rejects_truncated_field() {
        let mut bytes = MAGIC.to_vec();
        bytes.push(VERSION);
        bytes.extend_from_slice(&100u32.to_be_bytes()); // claims 100 bytes, supplies none
        assert!(matches!(load(&bytes), Err(PersistError::Truncated { field: "banner", .. })));
    }
}
