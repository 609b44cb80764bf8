//! Deterministic decorative backgrounds for cards without a supplied image.
//!
//! The scene is fixed: a radial dark gradient, a small constellation of dots,
//! one moon disc, and four L-shaped corner brackets. Geometry never varies;
//! the seed only selects the gradient tint, so the same seed (or no seed)
//! always produces byte-identical pixels.

use xxhash_rust::xxh3::xxh3_64;

use crate::background::PixelSurface;

/// Default square edge length when the caller does not override it.
pub const DEFAULT_SIZE: u32 = 1080;

/// (center, edge) gradient tints; index selected by the seed hash.
const PALETTE: [([u8; 3], [u8; 3]); 4] = [
    ([38, 34, 72], [12, 10, 26]),   // indigo night
    ([58, 26, 34], [18, 8, 12]),    // maroon dusk
    ([20, 48, 52], [6, 16, 18]),    // teal dark
    ([44, 30, 58], [14, 9, 20]),    // plum
];

/// Relative (x, y) positions of the dot constellation.
const DOTS: [(f32, f32); 6] = [
    (0.18, 0.22),
    (0.31, 0.12),
    (0.52, 0.19),
    (0.68, 0.09),
    (0.84, 0.28),
    (0.24, 0.38),
];

const MOON_POS: (f32, f32) = (0.78, 0.20);
const MOON_RADIUS: f32 = 0.055;
const BRACKET_INSET: f32 = 0.06;
const BRACKET_ARM: f32 = 0.085;
const BRACKET_STROKE: f32 = 0.005;

/// Render the decorative scene onto a fresh square surface.
pub fn generate(seed: Option<&str>, size: u32) -> PixelSurface {
    let mut surface = PixelSurface::new(size, size);
    let (center, edge) = palette_for(seed);

    paint_radial_gradient(&mut surface, center, edge);

    let s = size as f32;
    let dot_r = (s * 0.004).max(1.5);
    for &(rx, ry) in &DOTS {
        fill_disc(&mut surface, rx * s, ry * s, dot_r, [232, 228, 214]);
    }
    fill_disc(
        &mut surface,
        MOON_POS.0 * s,
        MOON_POS.1 * s,
        MOON_RADIUS * s,
        [236, 233, 221],
    );

    paint_corner_brackets(&mut surface);
    surface
}

fn palette_for(seed: Option<&str>) -> ([u8; 3], [u8; 3]) {
    let idx = match seed {
        None => 0,
        Some(s) => (xxh3_64(s.as_bytes()) % PALETTE.len() as u64) as usize,
    };
    PALETTE[idx]
}

fn paint_radial_gradient(surface: &mut PixelSurface, center: [u8; 3], edge: [u8; 3]) {
    let w = surface.width as usize;
    let h = surface.height as usize;
    let cx = (w as f32 - 1.0) / 2.0;
    let cy = (h as f32 - 1.0) / 2.0;
    let max_d = (cx * cx + cy * cy).sqrt().max(1.0);

    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let t = ((dx * dx + dy * dy).sqrt() / max_d).clamp(0.0, 1.0);
            let px = &mut surface.rgba8_premul[(y * w + x) * 4..(y * w + x) * 4 + 4];
            for c in 0..3 {
                px[c] = lerp_u8(center[c], edge[c], t);
            }
            px[3] = 255;
        }
    }
}

fn paint_corner_brackets(surface: &mut PixelSurface) {
    let w = surface.width as f32;
    let h = surface.height as f32;
    let inset = BRACKET_INSET * w;
    let arm = BRACKET_ARM * w;
    let stroke = (BRACKET_STROKE * w).max(2.0);
    let color = [214, 205, 182];

    // Each corner gets one horizontal and one vertical arm.
    let corners = [
        (inset, inset, 1.0, 1.0),
        (w - inset, inset, -1.0, 1.0),
        (inset, h - inset, 1.0, -1.0),
        (w - inset, h - inset, -1.0, -1.0),
    ];
    for (x, y, sx, sy) in corners {
        fill_rect(surface, x, y, x + sx * arm, y + sy * stroke, color);
        fill_rect(surface, x, y, x + sx * stroke, y + sy * arm, color);
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

fn fill_disc(surface: &mut PixelSurface, cx: f32, cy: f32, r: f32, color: [u8; 3]) {
    let w = surface.width as i64;
    let h = surface.height as i64;
    let x0 = ((cx - r - 1.0).floor() as i64).max(0);
    let x1 = ((cx + r + 1.0).ceil() as i64).min(w - 1);
    let y0 = ((cy - r - 1.0).floor() as i64).max(0);
    let y1 = ((cy + r + 1.0).ceil() as i64).min(h - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            // 1px soft edge, still fully deterministic.
            let coverage = (r - d + 0.5).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_px(surface, x as usize, y as usize, color, coverage);
            }
        }
    }
}

fn fill_rect(surface: &mut PixelSurface, x0: f32, y0: f32, x1: f32, y1: f32, color: [u8; 3]) {
    let (x0, x1) = (x0.min(x1), x0.max(x1));
    let (y0, y1) = (y0.min(y1), y0.max(y1));
    let w = surface.width as i64;
    let h = surface.height as i64;
    let xa = (x0.round() as i64).max(0);
    let xb = ((x1.round() as i64) - 1).min(w - 1);
    let ya = (y0.round() as i64).max(0);
    let yb = ((y1.round() as i64) - 1).min(h - 1);

    for y in ya..=yb {
        for x in xa..=xb {
            blend_px(surface, x as usize, y as usize, color, 1.0);
        }
    }
}

fn blend_px(surface: &mut PixelSurface, x: usize, y: usize, color: [u8; 3], coverage: f32) {
    let idx = (y * surface.width as usize + x) * 4;
    let px = &mut surface.rgba8_premul[idx..idx + 4];
    for c in 0..3 {
        px[c] = lerp_u8(px[c], color[c], coverage);
    }
    px[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_is_byte_identical_across_runs() {
        let a = generate(None, 128);
        let b = generate(None, 128);
        assert_eq!(a.rgba8_premul, b.rgba8_premul);
    }

    #[test]
    fn same_seed_is_byte_identical_and_seeds_can_differ() {
        let a = generate(Some("mir"), 128);
        let b = generate(Some("mir"), 128);
        assert_eq!(a.rgba8_premul, b.rgba8_premul);

        // Find a seed hashing to a different palette slot than the default.
        let other = ["ghalib", "faiz", "daag", "zauq"]
            .into_iter()
            .find(|&s| palette_for(Some(s)) != palette_for(None));
        if let Some(other) = other {
            assert_ne!(
                generate(Some(other), 64).rgba8_premul,
                generate(None, 64).rgba8_premul
            );
        }
    }

    #[test]
    fn default_size_is_square_1080() {
        let s = generate(None, DEFAULT_SIZE);
        assert_eq!((s.width, s.height), (DEFAULT_SIZE, DEFAULT_SIZE));
        assert_eq!(s.rgba8_premul.len(), 1080 * 1080 * 4);
    }

    #[test]
    fn scene_is_fully_opaque() {
        let s = generate(None, 64);
        assert!(s.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn gradient_darkens_toward_the_corners() {
        let s = generate(None, 200);
        let center_idx = (100 * 200 + 100) * 4;
        let corner_idx = 0;
        let center_lum: u32 = s.rgba8_premul[center_idx..center_idx + 3]
            .iter()
            .map(|&b| b as u32)
            .sum();
        let corner_lum: u32 = s.rgba8_premul[corner_idx..corner_idx + 3]
            .iter()
            .map(|&b| b as u32)
            .sum();
        assert!(center_lum > corner_lum);
    }
}
