//! Import of plain 1-bit 8x8 fonts (8 bytes per glyph, e.g. 2048 byte system fonts).
use crate::{
    error::{PcgError, Result},
    store::{exceeds_bank, CharacterStore, PLANE_SIZE},
};

/// Writes each glyph into the planes selected by `color`. Returns the glyph count.
pub fn import_bitfont(bytes: &[u8], store: &mut CharacterStore, start: usize, color: u8) -> Result<usize> {
    let count = bytes.len() / PLANE_SIZE;
    if count == 0 {
        return Err(PcgError::FileTooSmall { len: bytes.len() });
    }
    if exceeds_bank(start, count) {
        return Err(PcgError::Overflow { start, count });
    }
    for (i, glyph) in bytes.chunks_exact(PLANE_SIZE).enumerate() {
        store.set_monochrome_character((start + i) as u8, glyph, color)?;
    }
    Ok(count)
}
