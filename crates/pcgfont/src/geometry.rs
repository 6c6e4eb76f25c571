//! Move, rotate and flip transforms over an edit region.
use std::str::FromStr;

use crate::{
    region::{resolve, EditMode, EditRegion},
    store::{CharChange, CharacterStore},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    /// Scroll one pixel, wrapping around.
    MoveRight,
    MoveLeft,
    MoveUp,
    MoveDown,
    /// Quarter turn counter clockwise. Square regions only.
    Rotate90,
    /// Square regions only.
    Rotate180,
    /// Mirrors rows (top <-> bottom).
    FlipH,
    /// Mirrors columns (left <-> right).
    FlipV,
}

impl Transform {
    pub const ALL: [Transform; 8] = [
        Transform::MoveRight,
        Transform::MoveLeft,
        Transform::MoveUp,
        Transform::MoveDown,
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::FlipH,
        Transform::FlipV,
    ];

    pub fn requires_square(self) -> bool {
        matches!(self, Transform::Rotate90 | Transform::Rotate180)
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" | "move-right" => Ok(Transform::MoveRight),
            "left" | "move-left" => Ok(Transform::MoveLeft),
            "up" | "move-up" => Ok(Transform::MoveUp),
            "down" | "move-down" => Ok(Transform::MoveDown),
            "rotate90" | "rot90" => Ok(Transform::Rotate90),
            "rotate180" | "rot180" => Ok(Transform::Rotate180),
            "flip-h" | "fliph" => Ok(Transform::FlipH),
            "flip-v" | "flipv" => Ok(Transform::FlipV),
            other => Err(format!("unknown transform '{other}'")),
        }
    }
}

/// Applies `kind` to the region under the cursor (`cursor_x`, `cursor_y` in 0..16).
///
/// Returns `false` without touching the store when a rotation is requested
/// for a non-square (vertical or horizontal) region.
pub fn apply(
    store: &mut CharacterStore,
    mode: EditMode,
    cursor_x: usize,
    cursor_y: usize,
    kind: Transform,
) -> bool {
    if kind.requires_square() && !mode.is_square() {
        return false;
    }
    let region = resolve(mode, cursor_x / 8, cursor_y / 8);
    let src = gather(store, &region);
    let dst = transform_grid(&src, region.width, region.height, kind);
    scatter(store, &region, &dst);
    for code in &region.slots {
        store.notify(CharChange::Single(*code));
    }
    true
}

fn gather(store: &CharacterStore, region: &EditRegion) -> Vec<u8> {
    let mut grid = Vec::with_capacity(region.width * region.height);
    for y in 0..region.height {
        for x in 0..region.width {
            let (code, lx, ly) = region.locate(x, y);
            grid.push(store.get_pixel(code, lx, ly));
        }
    }
    grid
}

fn scatter(store: &mut CharacterStore, region: &EditRegion, grid: &[u8]) {
    for y in 0..region.height {
        for x in 0..region.width {
            let (code, lx, ly) = region.locate(x, y);
            store.write_pixel(code, lx, ly, grid[y * region.width + x]);
        }
    }
}

/// Row-major grid transform. `w == h` is required for `Rotate90`.
pub fn transform_grid(src: &[u8], w: usize, h: usize, kind: Transform) -> Vec<u8> {
    let at = |x: usize, y: usize| src[y * w + x];
    let mut dst = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let v = match kind {
                Transform::MoveRight => at((x + 1) % w, y),
                Transform::MoveLeft => at((x + w - 1) % w, y),
                Transform::MoveUp => at(x, (y + 1) % h),
                Transform::MoveDown => at(x, (y + h - 1) % h),
                Transform::Rotate90 => at(w - 1 - y, x),
                Transform::Rotate180 => at(w - 1 - x, h - 1 - y),
                Transform::FlipH => at(x, h - 1 - y),
                Transform::FlipV => at(w - 1 - x, y),
            };
            dst.push(v);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 grid:
    // 1 2
    // 3 4
    const GRID: [u8; 4] = [1, 2, 3, 4];

    #[test]
    fn rotate90_is_counter_clockwise() {
        assert_eq!(transform_grid(&GRID, 2, 2, Transform::Rotate90), vec![2, 4, 1, 3]);
    }

    #[test]
    fn flips_follow_legacy_naming() {
        assert_eq!(transform_grid(&GRID, 2, 2, Transform::FlipH), vec![3, 4, 1, 2]);
        assert_eq!(transform_grid(&GRID, 2, 2, Transform::FlipV), vec![2, 1, 4, 3]);
    }

    #[test]
    fn moves_wrap() {
        let row = [1, 2, 3];
        assert_eq!(transform_grid(&row, 3, 1, Transform::MoveRight), vec![2, 3, 1]);
        assert_eq!(transform_grid(&row, 3, 1, Transform::MoveLeft), vec![3, 1, 2]);
    }
}
