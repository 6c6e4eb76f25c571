//! Headerless binary character dumps (`.bin`).
//!
//! Two layouts exist: the native plane-major layout (24 bytes per character:
//! 8 blue rows, 8 red rows, 8 green rows) and the interleaved "triple speed"
//! layout where each row is emitted as `[blue, red, green]`.
use crate::{
    error::{PcgError, Result},
    store::{exceeds_bank, CharacterStore, Plane, CHAR_COUNT, CHAR_HEIGHT, CHAR_SIZE},
};

/// Validates an inclusive code range and returns its length.
pub(crate) fn range_len(start: usize, end: usize) -> Result<usize> {
    if end < start || end >= CHAR_COUNT {
        return Err(PcgError::InvalidRange { start, end });
    }
    Ok(end - start + 1)
}

pub fn save(store: &CharacterStore, start: usize, end: usize, interleaved: bool) -> Result<Vec<u8>> {
    let count = range_len(start, end)?;
    let mut out = Vec::with_capacity(count * CHAR_SIZE);
    for code in start..=end {
        let code = code as u8;
        if interleaved {
            for row in 0..CHAR_HEIGHT {
                for plane in Plane::ALL {
                    out.push(store.get_plane_row(code, plane, row));
                }
            }
        } else {
            out.extend_from_slice(store.get_character(code));
        }
    }
    Ok(out)
}

/// Loads consecutive characters starting at `start`. Trailing bytes that do not
/// form a whole character are ignored. Returns the number of characters written.
pub fn load(bytes: &[u8], store: &mut CharacterStore, start: usize, interleaved: bool) -> Result<usize> {
    let count = bytes.len() / CHAR_SIZE;
    if count == 0 {
        return Err(PcgError::FileTooSmall { len: bytes.len() });
    }
    if exceeds_bank(start, count) {
        return Err(PcgError::Overflow { start, count });
    }
    for (i, chunk) in bytes.chunks_exact(CHAR_SIZE).enumerate() {
        let code = (start + i) as u8;
        if interleaved {
            store.set_character(code, &deinterleave(chunk))?;
        } else {
            store.set_character(code, chunk)?;
        }
    }
    log::debug!("raw load: {count} characters at {start} (interleaved: {interleaved})");
    Ok(count)
}

/// Row-interleaved `[b, r, g] * 8` back to plane-major.
fn deinterleave(chunk: &[u8]) -> [u8; CHAR_SIZE] {
    let mut native = [0u8; CHAR_SIZE];
    for row in 0..CHAR_HEIGHT {
        for plane in Plane::ALL {
            native[plane.index() * CHAR_HEIGHT + row] = chunk[row * 3 + plane.index()];
        }
    }
    native
}
