//! Edit regions inside the 16x16 pixel working area.
//!
//! The working area is four character slots (codes 0, 1, 16, 17 laid out
//! as a 2x2 block). The edit mode decides how many of them form one unit.
use std::str::FromStr;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditMode {
    /// One 8x8 character.
    #[default]
    Separate,
    /// Two characters stacked, 8x16.
    Vertical,
    /// Two characters side by side, 16x8.
    Horizontal,
    /// All four characters, 16x16.
    All,
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "separate" | "single" => Ok(EditMode::Separate),
            "vertical" => Ok(EditMode::Vertical),
            "horizontal" => Ok(EditMode::Horizontal),
            "all" => Ok(EditMode::All),
            other => Err(format!("unknown edit mode '{other}'")),
        }
    }
}

impl EditMode {
    /// Square regions (8x8 or 16x16) support rotation.
    pub fn is_square(self) -> bool {
        matches!(self, EditMode::Separate | EditMode::All)
    }
}

/// A pixel rectangle and the character codes tiled over it, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRegion {
    pub width: usize,
    pub height: usize,
    pub slots: Vec<u8>,
}

impl EditRegion {
    /// Maps a region pixel to its owning character and the local coordinates inside it.
    pub fn locate(&self, x: usize, y: usize) -> (u8, usize, usize) {
        let columns = if self.width > 8 { 2 } else { 1 };
        let slot = x / 8 + (y / 8) * columns;
        (self.slots[slot], x % 8, y % 8)
    }
}

/// Resolves the region for an edit mode and the cursor quadrant (`char_x`, `char_y` in {0, 1}).
pub fn resolve(mode: EditMode, char_x: usize, char_y: usize) -> EditRegion {
    let cx = char_x.min(1) as u8;
    let cy = char_y.min(1) as u8;
    match mode {
        EditMode::Separate => EditRegion {
            width: 8,
            height: 8,
            slots: vec![cx + cy * 16],
        },
        EditMode::Vertical => EditRegion {
            width: 8,
            height: 16,
            slots: vec![cx, cx + 16],
        },
        EditMode::Horizontal => EditRegion {
            width: 16,
            height: 8,
            slots: vec![cy * 16, cy * 16 + 1],
        },
        EditMode::All => EditRegion {
            width: 16,
            height: 16,
            slots: vec![0, 1, 16, 17],
        },
    }
}
