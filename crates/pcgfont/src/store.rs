//! Bitplane character store.
//!
//! 256 characters of 8x8 pixels. Each character is 24 bytes: three planes
//! (blue, red, green) of eight row bytes, plane-major. The most significant
//! bit of a row byte is the leftmost pixel.
use std::fmt;

use crate::error::{PcgError, Result};

pub const CHAR_COUNT: usize = 256;
pub const CHAR_WIDTH: usize = 8;
pub const CHAR_HEIGHT: usize = 8;
pub const PLANE_SIZE: usize = CHAR_HEIGHT;
pub const CHAR_SIZE: usize = PLANE_SIZE * 3;
pub const STORE_SIZE: usize = CHAR_SIZE * CHAR_COUNT;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Plane {
    Blue,
    Red,
    Green,
}

impl Plane {
    /// Planes in storage order.
    pub const ALL: [Plane; 3] = [Plane::Blue, Plane::Red, Plane::Green];

    pub fn index(self) -> usize {
        match self {
            Plane::Blue => 0,
            Plane::Red => 1,
            Plane::Green => 2,
        }
    }

    /// The color code bit carried by this plane.
    pub fn color_bit(self) -> u8 {
        1 << self.index()
    }
}

/// Change notification emitted after a mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CharChange {
    Single(u8),
    /// Bulk update; listeners should refresh every character.
    All,
}

type Listener = Box<dyn FnMut(CharChange)>;

pub struct CharacterStore {
    data: Vec<u8>,
    listeners: Vec<Listener>,
}

impl Default for CharacterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CharacterStore {
    /// Deep copies the character data. Listeners stay with the original.
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for CharacterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let defined = (0..CHAR_COUNT).filter(|&c| !self.is_blank(c as u8)).count();
        f.debug_struct("CharacterStore")
            .field("defined", &defined)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// True if `count` characters starting at `start` do not fit into the bank.
pub(crate) fn exceeds_bank(start: usize, count: usize) -> bool {
    start.checked_add(count).map_or(true, |end| end > CHAR_COUNT)
}

#[inline]
fn char_offset(code: u8) -> usize {
    code as usize * CHAR_SIZE
}

#[inline]
fn row_offset(code: u8, plane: Plane, row: usize) -> usize {
    char_offset(code) + plane.index() * PLANE_SIZE + (row & 7)
}

#[inline]
fn column_mask(x: usize) -> u8 {
    0x80 >> (x & 7)
}

impl CharacterStore {
    /// Creates an all-black store.
    pub fn new() -> Self {
        Self {
            data: vec![0; STORE_SIZE],
            listeners: Vec::new(),
        }
    }

    /// Registers a listener that is called after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(CharChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn notify(&mut self, change: CharChange) {
        for listener in &mut self.listeners {
            listener(change);
        }
    }

    pub fn get_pixel(&self, code: u8, x: usize, y: usize) -> u8 {
        let mask = column_mask(x);
        let mut color = 0;
        for plane in Plane::ALL {
            if self.data[row_offset(code, plane, y)] & mask != 0 {
                color |= plane.color_bit();
            }
        }
        color
    }

    pub fn set_pixel(&mut self, code: u8, x: usize, y: usize, color: u8) {
        self.write_pixel(code, x, y, color);
        self.notify(CharChange::Single(code));
    }

    /// Pixel write without notification, for bulk operations that notify once.
    pub(crate) fn write_pixel(&mut self, code: u8, x: usize, y: usize, color: u8) {
        let mask = column_mask(x);
        for plane in Plane::ALL {
            let byte = &mut self.data[row_offset(code, plane, y)];
            if color & plane.color_bit() != 0 {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Raw plane-major bytes of one character.
    pub fn get_character(&self, code: u8) -> &[u8] {
        let o = char_offset(code);
        &self.data[o..o + CHAR_SIZE]
    }

    pub fn set_character(&mut self, code: u8, bytes: &[u8]) -> Result<()> {
        if bytes.len() != CHAR_SIZE {
            return Err(PcgError::CharacterLength {
                actual: bytes.len(),
            });
        }
        let o = char_offset(code);
        self.data[o..o + CHAR_SIZE].copy_from_slice(bytes);
        self.notify(CharChange::Single(code));
        Ok(())
    }

    pub fn get_plane_row(&self, code: u8, plane: Plane, row: usize) -> u8 {
        self.data[row_offset(code, plane, row)]
    }

    pub fn set_plane_row(&mut self, code: u8, plane: Plane, row: usize, value: u8) {
        self.data[row_offset(code, plane, row)] = value;
        self.notify(CharChange::Single(code));
    }

    /// Full 6144 byte snapshot.
    pub fn get_all_data(&self) -> &[u8] {
        &self.data
    }

    pub fn set_all_data(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != STORE_SIZE {
            return Err(PcgError::SnapshotLength {
                actual: bytes.len(),
            });
        }
        self.data.copy_from_slice(bytes);
        self.notify(CharChange::All);
        Ok(())
    }

    /// Writes a 1-bit glyph into the planes selected by `color`, zeroing the others.
    pub fn set_monochrome_character(&mut self, code: u8, bitmap: &[u8], color: u8) -> Result<()> {
        if bitmap.len() != PLANE_SIZE {
            return Err(PcgError::BitmapLength {
                actual: bitmap.len(),
            });
        }
        for plane in Plane::ALL {
            let o = row_offset(code, plane, 0);
            let dst = &mut self.data[o..o + PLANE_SIZE];
            if color & plane.color_bit() != 0 {
                dst.copy_from_slice(bitmap);
            } else {
                dst.fill(0);
            }
        }
        self.notify(CharChange::Single(code));
        Ok(())
    }

    /// Copies `count` characters from another store, starting at `src_code`, to `dst_code`.
    pub fn copy_from(
        &mut self,
        other: &CharacterStore,
        src_code: usize,
        dst_code: usize,
        count: usize,
    ) -> Result<()> {
        for start in [src_code, dst_code] {
            if exceeds_bank(start, count) {
                return Err(PcgError::Overflow { start, count });
            }
        }
        let src = src_code * CHAR_SIZE;
        let dst = dst_code * CHAR_SIZE;
        let len = count * CHAR_SIZE;
        self.data[dst..dst + len].copy_from_slice(&other.data[src..src + len]);
        for code in dst_code..dst_code + count {
            self.notify(CharChange::Single(code as u8));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
        self.notify(CharChange::All);
    }

    /// True if no pixel of the character is set.
    pub fn is_blank(&self, code: u8) -> bool {
        self.get_character(code).iter().all(|b| *b == 0)
    }
}
