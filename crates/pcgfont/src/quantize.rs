//! Reduction of arbitrary RGBA rasters to the fixed 8-color palette.
//!
//! Every mode thresholds the red, green and blue channels independently and
//! recombines the three bits into a color code, so any input maps to a
//! palette index. Alpha is ignored.
use std::str::FromStr;

use image::RgbaImage;

use crate::palette::{self, compose};

/// 4x4 ordered dither ranks (1..=16).
const DITHER_MATRIX: [[u8; 4]; 4] = [[1, 9, 3, 11], [13, 5, 15, 7], [4, 12, 2, 10], [16, 8, 14, 6]];

const THRESHOLD: u8 = 128;
const RETRO_GAIN: f64 = -8.0;
const RETRO_MIDPOINT: f64 = 0.5;
const RETRO_SATURATION: f64 = 2.0;
const RETRO_THRESHOLD_LOW: f64 = 28.0;
const RETRO_THRESHOLD_HIGH: f64 = 228.0;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReduceMode {
    /// Exact palette input expected; behaves like `Reduce` when quantizing.
    #[default]
    None,
    /// Plain threshold at 128.
    Reduce,
    /// 4x4 ordered dither with one shared threshold for all channels.
    Dither,
    /// Serpentine Floyd-Steinberg error diffusion.
    Edfs,
    /// Contrast curve and saturation boost followed by a compressed ordered dither.
    Retro,
}

impl FromStr for ReduceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "exact" => Ok(ReduceMode::None),
            "reduce" => Ok(ReduceMode::Reduce),
            "dither" => Ok(ReduceMode::Dither),
            "edfs" | "floyd-steinberg" => Ok(ReduceMode::Edfs),
            "retro" => Ok(ReduceMode::Retro),
            other => Err(format!("unknown reduce mode '{other}'")),
        }
    }
}

/// Grid of palette indices, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl IndexedImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, color: u8) {
        self.pixels[y * self.width + x] = color & 7;
    }
}

/// True if every pixel's RGB is exactly one of the palette colors.
pub fn is_exact_palette(image: &RgbaImage) -> bool {
    image
        .pixels()
        .all(|p| palette::index_of([p[0], p[1], p[2]]).is_some())
}

pub fn reduce(image: &RgbaImage, mode: ReduceMode) -> IndexedImage {
    match mode {
        ReduceMode::None | ReduceMode::Reduce => reduce_threshold(image),
        ReduceMode::Dither => reduce_ordered(image, |rank| rank as f64 / 17.0 * 255.0),
        ReduceMode::Edfs => reduce_floyd_steinberg(image),
        ReduceMode::Retro => {
            let prepared = retro_prepare(image);
            reduce_ordered(&prepared, |rank| {
                RETRO_THRESHOLD_LOW + rank as f64 / 17.0 * (RETRO_THRESHOLD_HIGH - RETRO_THRESHOLD_LOW)
            })
        }
    }
}

fn reduce_threshold(image: &RgbaImage) -> IndexedImage {
    let mut out = IndexedImage::new(image.width() as usize, image.height() as usize);
    for (x, y, p) in image.enumerate_pixels() {
        let color = compose(p[0] >= THRESHOLD, p[1] >= THRESHOLD, p[2] >= THRESHOLD);
        out.set(x as usize, y as usize, color);
    }
    out
}

fn reduce_ordered(image: &RgbaImage, threshold: impl Fn(u8) -> f64) -> IndexedImage {
    let mut out = IndexedImage::new(image.width() as usize, image.height() as usize);
    for (x, y, p) in image.enumerate_pixels() {
        let t = threshold(DITHER_MATRIX[(y % 4) as usize][(x % 4) as usize]);
        let on = |c: u8| c as f64 > t;
        out.set(x as usize, y as usize, compose(on(p[0]), on(p[1]), on(p[2])));
    }
    out
}

fn reduce_floyd_steinberg(image: &RgbaImage) -> IndexedImage {
    let w = image.width() as usize;
    let h = image.height() as usize;
    let mut out = IndexedImage::new(w, h);
    // running per-channel values (r, g, b) with accumulated error
    let mut buf: Vec<[f64; 3]> = image
        .pixels()
        .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
        .collect();

    for y in 0..h {
        let reverse = y % 2 == 1;
        for i in 0..w {
            let x = if reverse { w - 1 - i } else { i };
            let old = buf[y * w + x];
            let mut bits = [false; 3];
            let mut err = [0.0; 3];
            for c in 0..3 {
                bits[c] = old[c] >= THRESHOLD as f64;
                let new = if bits[c] { 255.0 } else { 0.0 };
                err[c] = old[c] - new;
            }
            out.set(x, y, compose(bits[0], bits[1], bits[2]));

            let forward: isize = if reverse { -1 } else { 1 };
            let mut spread = |dx: isize, dy: usize, weight: f64| {
                let nx = x as isize + dx;
                let ny = y + dy;
                if nx < 0 || nx >= w as isize || ny >= h {
                    return;
                }
                let cell = &mut buf[ny * w + nx as usize];
                for c in 0..3 {
                    cell[c] += err[c] * weight;
                }
            };
            spread(forward, 0, 7.0 / 16.0);
            spread(-forward, 1, 3.0 / 16.0);
            spread(0, 1, 5.0 / 16.0);
            spread(forward, 1, 1.0 / 16.0);
        }
    }
    out
}

/// Contrast curve plus saturation boost applied before the retro dither.
fn retro_prepare(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for p in out.pixels_mut() {
        let r = sigmoid_contrast(p[0]);
        let g = sigmoid_contrast(p[1]);
        let b = sigmoid_contrast(p[2]);
        let (h, s, l) = rgb_to_hsl(r, g, b);
        let (r, g, b) = hsl_to_rgb(h, (s * RETRO_SATURATION).min(1.0), l);
        p[0] = r;
        p[1] = g;
        p[2] = b;
    }
    out
}

fn logistic(v: f64) -> f64 {
    1.0 / (1.0 + (RETRO_GAIN * (v - RETRO_MIDPOINT)).exp())
}

/// Logistic contrast curve rescaled so 0 and 255 stay fixed.
fn sigmoid_contrast(c: u8) -> u8 {
    let lo = logistic(0.0);
    let hi = logistic(1.0);
    let v = (logistic(c as f64 / 255.0) - lo) / (hi - lo);
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let v = to_u8(l);
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        to_u8(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_channel(p, q, h)),
        to_u8(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}
