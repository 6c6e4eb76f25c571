use image::{Rgba, RgbaImage};
use pcgfont::{
    palette::PALETTE,
    quantize::{is_exact_palette, reduce},
    ReduceMode,
};
use pretty_assertions::assert_eq;

const MODES: [ReduceMode; 5] = [
    ReduceMode::None,
    ReduceMode::Reduce,
    ReduceMode::Dither,
    ReduceMode::Edfs,
    ReduceMode::Retro,
];

/// Red/green gradient with a blue stripe pattern.
fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        Rgba([
            (x * 255 / (w - 1).max(1)) as u8,
            (y * 255 / (h - 1).max(1)) as u8,
            ((x + y) * 7 % 256) as u8,
            255,
        ])
    })
}

fn palette_image(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let [r, g, b] = PALETTE[((x + y * 3) % 8) as usize];
        Rgba([r, g, b, 255])
    })
}

#[test]
fn output_matches_input_dimensions() {
    for (w, h) in [(1, 1), (3, 7), (16, 5), (33, 33)] {
        let img = gradient(w, h);
        for mode in MODES {
            let out = reduce(&img, mode);
            assert_eq!((out.width, out.height), (w as usize, h as usize), "{mode:?}");
            assert_eq!(out.pixels.len(), (w * h) as usize);
            assert!(out.pixels.iter().all(|c| *c < 8), "{mode:?}");
        }
    }
}

#[test]
fn exact_palette_detection() {
    let img = palette_image(16, 16);
    assert!(is_exact_palette(&img));

    for channel in 0..3 {
        let mut off = img.clone();
        let p = off.get_pixel_mut(5, 9);
        p[channel] = if p[channel] == 255 { 254 } else { 1 };
        assert!(!is_exact_palette(&off), "channel {channel}");
    }
}

#[test]
fn exact_palette_ignores_alpha() {
    let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 255, 0]));
    assert!(is_exact_palette(&img));
}

#[test]
fn palette_colors_survive_threshold_modes() {
    let img = palette_image(8, 8);
    for mode in [ReduceMode::None, ReduceMode::Reduce, ReduceMode::Edfs] {
        let out = reduce(&img, mode);
        for (x, y, p) in img.enumerate_pixels() {
            let expected = PALETTE.iter().position(|c| c[..] == p.0[..3]).unwrap() as u8;
            assert_eq!(out.get(x as usize, y as usize), expected, "{mode:?} at {x},{y}");
        }
    }
}

#[test]
fn threshold_is_128() {
    let img = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([127, 127, 127, 255])
        } else {
            Rgba([128, 0, 128, 255])
        }
    });
    let out = reduce(&img, ReduceMode::Reduce);
    assert_eq!(out.pixels, vec![0, 3]);
}

#[test]
fn saturated_colors_keep_hue_in_retro_mode() {
    let img = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
    let out = reduce(&img, ReduceMode::Retro);
    assert!(out.pixels.iter().all(|c| *c == 2));

    let black = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    assert!(reduce(&black, ReduceMode::Retro).pixels.iter().all(|c| *c == 0));
    let white = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
    assert!(reduce(&white, ReduceMode::Retro).pixels.iter().all(|c| *c == 7));
}

#[test]
fn ordered_dither_is_deterministic() {
    let img = gradient(16, 16);
    assert_eq!(reduce(&img, ReduceMode::Dither), reduce(&img, ReduceMode::Dither));
    assert_eq!(reduce(&img, ReduceMode::Edfs), reduce(&img, ReduceMode::Edfs));
}

#[test]
fn reduce_mode_from_str() {
    assert_eq!("floyd-steinberg".parse::<ReduceMode>(), Ok(ReduceMode::Edfs));
    assert_eq!("Exact".parse::<ReduceMode>(), Ok(ReduceMode::None));
    assert!("median".parse::<ReduceMode>().is_err());
}
