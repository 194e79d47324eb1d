//! Range algebra: compacting and uncompacting `(base, size)` read lists
//! against the 64-byte page constraint.

/// The maximum size of a single `O`/`I` (or `R`/`W`) transfer.
pub const PAGE_SIZE: usize = 64;

/// A contiguous `(base, size)` memory window.
pub type Range = (u32, u32);

/// Merges contiguous page-sized entries back into the larger windows they
/// were split from.
///
/// Only an entry with `size >= PAGE_SIZE` can start a merge chain - a stray
/// short read is never the head of a longer contiguous window, because
/// observed reads always arrive as full 64-byte pages except for a possibly
/// short final tail.
#[must_use]
pub fn compact(ranges: &[Range]) -> Vec<Range> {
    let mut out = Vec::new();
    let mut last: Option<Range> = None;

    for &(base, size) in ranges {
        match last {
            Some((lbase, lsize)) if base == lbase + lsize => {
                last = Some((lbase, lsize + size));
            },
            Some(prev) => {
                out.push(prev);
                last = if size as usize >= PAGE_SIZE { Some((base, size)) } else { None };
                if last.is_none() {
                    out.push((base, size));
                }
            },
            None => {
                last = if size as usize >= PAGE_SIZE { Some((base, size)) } else { None };
                if last.is_none() {
                    out.push((base, size));
                }
            },
        }
    }
    if let Some(prev) = last {
        out.push(prev);
    }
    out
}

/// Splits each entry into 64-byte pages, with a possibly-short final tail.
#[must_use]
pub fn uncompact(ranges: &[Range]) -> Vec<Range> {
    let mut out = Vec::new();
    for &(base, size) in ranges {
        let mut offset = 0u32;
        let mut remaining = size;
        while remaining > PAGE_SIZE as u32 {
            out.push((base + offset, PAGE_SIZE as u32));
            offset += PAGE_SIZE as u32;
            remaining -= PAGE_SIZE as u32;
        }
        out.push((base + offset, remaining));
    }
    out
}
