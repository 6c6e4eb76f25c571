//! 128x128 raster interchange: the whole bank as a 16x16 grid of 8x8 tiles.
//!
//! Tile `i` is character `i`, laid out row-major (`x = i % 16`, `y = i / 16`).
use image::{imageops, Rgba, RgbaImage};

use crate::{
    error::Result,
    palette::{self, PALETTE},
    quantize::{is_exact_palette, reduce, IndexedImage, ReduceMode},
    store::{CharacterStore, CHAR_COUNT, CHAR_HEIGHT, CHAR_WIDTH},
};

pub const TILES_PER_ROW: usize = 16;
pub const RASTER_SIZE: u32 = (TILES_PER_ROW * CHAR_WIDTH) as u32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RasterOptions {
    /// Color used for index 0.
    pub background: [u8; 3],
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            background: PALETTE[0],
        }
    }
}

#[inline]
fn tile_origin(code: usize) -> (usize, usize) {
    (
        (code % TILES_PER_ROW) * CHAR_WIDTH,
        (code / TILES_PER_ROW) * CHAR_HEIGHT,
    )
}

pub fn save_raster(store: &CharacterStore) -> RgbaImage {
    save_raster_with(store, &RasterOptions::default())
}

pub fn save_raster_with(store: &CharacterStore, options: &RasterOptions) -> RgbaImage {
    let mut img = RgbaImage::new(RASTER_SIZE, RASTER_SIZE);
    for code in 0..CHAR_COUNT {
        let (ox, oy) = tile_origin(code);
        for y in 0..CHAR_HEIGHT {
            for x in 0..CHAR_WIDTH {
                let color = store.get_pixel(code as u8, x, y);
                let [r, g, b] = if color == 0 {
                    options.background
                } else {
                    palette::rgb(color)
                };
                img.put_pixel((ox + x) as u32, (oy + y) as u32, Rgba([r, g, b, 255]));
            }
        }
    }
    img
}

/// Redefines all 256 characters from a raster. Inputs of another size are
/// resampled to 128x128 first.
///
/// With [`ReduceMode::None`] the image is expected to use palette colors only;
/// anything else falls back to plain threshold reduction.
pub fn load_raster(image: &RgbaImage, store: &mut CharacterStore, mode: ReduceMode) -> Result<usize> {
    let resized;
    let image = if image.dimensions() == (RASTER_SIZE, RASTER_SIZE) {
        image
    } else {
        log::debug!(
            "raster load: resampling {}x{} to {RASTER_SIZE}x{RASTER_SIZE}",
            image.width(),
            image.height()
        );
        resized = imageops::resize(image, RASTER_SIZE, RASTER_SIZE, imageops::FilterType::Nearest);
        &resized
    };

    let grid = match mode {
        ReduceMode::None => {
            if !is_exact_palette(image) {
                log::warn!("raster load: image has colors outside the palette, using threshold reduction");
            }
            reduce(image, ReduceMode::Reduce)
        }
        other => reduce(image, other),
    };

    let staged = grid_to_store(&grid);
    store.set_all_data(staged.get_all_data())?;
    Ok(CHAR_COUNT)
}

fn grid_to_store(grid: &IndexedImage) -> CharacterStore {
    let mut staged = CharacterStore::new();
    for code in 0..CHAR_COUNT {
        let (ox, oy) = tile_origin(code);
        for y in 0..CHAR_HEIGHT {
            for x in 0..CHAR_WIDTH {
                staged.write_pixel(code as u8, x, y, grid.get(ox + x, oy + y));
            }
        }
    }
    staged
}

/// Renders the bank and encodes it as PNG.
#[cfg(feature = "png")]
pub fn encode_png(store: &CharacterStore, options: &RasterOptions) -> Result<Vec<u8>> {
    let img = save_raster_with(store, options);
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| crate::PcgError::ImageEncode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Decodes an encoded image and loads it with [`load_raster`]. The store is
/// untouched if decoding fails.
#[cfg(feature = "png")]
pub fn load_raster_bytes(bytes: &[u8], store: &mut CharacterStore, mode: ReduceMode) -> Result<usize> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| crate::PcgError::ImageDecode(e.to_string()))?
        .to_rgba8();
    load_raster(&img, store, mode)
}
