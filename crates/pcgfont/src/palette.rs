//! Fixed 8-color digital palette.
//!
//! The color code is the bitplane union: bit 0 = blue, bit 1 = red, bit 2 = green.

pub const PALETTE_SIZE: usize = 8;

#[rustfmt::skip]
pub const PALETTE: [[u8; 3]; PALETTE_SIZE] = [
    [0, 0, 0],       // 0: black
    [0, 0, 255],     // 1: blue
    [255, 0, 0],     // 2: red
    [255, 0, 255],   // 3: magenta
    [0, 255, 0],     // 4: green
    [0, 255, 255],   // 5: cyan
    [255, 255, 0],   // 6: yellow
    [255, 255, 255], // 7: white
];

/// Returns the RGB triple of a color code; only the low three bits are used.
pub fn rgb(color: u8) -> [u8; 3] {
    PALETTE[(color & 7) as usize]
}

/// Looks up the palette index of an exact RGB triple.
pub fn index_of(rgb: [u8; 3]) -> Option<u8> {
    PALETTE.iter().position(|p| *p == rgb).map(|i| i as u8)
}

/// Recombines per-channel on/off bits into a color code.
pub fn compose(r: bool, g: bool, b: bool) -> u8 {
    (b as u8) | ((r as u8) << 1) | ((g as u8) << 2)
}
