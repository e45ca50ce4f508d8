//! Built-in sample data.
//!
//! `page()` is a 384x191 scan-like text page lit from the right: the paper
//! brightness ramps from about 40 on the left edge to about 210 on the
//! right, so no single global threshold separates ink from paper across
//! the whole page.

use image::{Rgb, RgbImage};
use rank_otsu_core::GrayImage;
use rank_otsu_plot::font;

pub const PAGE_WIDTH: usize = 384;
pub const PAGE_HEIGHT: usize = 191;

const PAPER_LEFT: f32 = 40.0;
const PAPER_RIGHT: f32 = 210.0;
const INK_REFLECTANCE: f32 = 0.4;
const TEXT_SCALE: u32 = 2;
const LINE_PITCH: i64 = 22;
const MARGIN: i64 = 8;

const LINES: [&str; 8] = [
    "Otsu picks the gray level that",
    "best splits a histogram into",
    "two classes. One level for the",
    "whole page fails when light is",
    "uneven: the dark side sinks.",
    "A local threshold per pixel,",
    "from a disk around it, follows",
    "the shading and keeps the ink.",
];

/// Sample page together with its ink mask (`255` on ink).
pub struct Page {
    pub image: GrayImage,
    pub ink: GrayImage,
}

/// Deterministic pixel noise in `-3..=3`.
fn noise(x: usize, y: usize) -> i32 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B1) ^ (y as u32).wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^= h >> 13;
    (h % 7) as i32 - 3
}

fn paper(x: usize) -> f32 {
    let t = x as f32 / (PAGE_WIDTH - 1) as f32;
    PAPER_LEFT + t * (PAPER_RIGHT - PAPER_LEFT)
}

/// Render the sample page and its ground-truth ink mask.
pub fn page_with_ink() -> Page {
    let mut text = RgbImage::from_pixel(
        PAGE_WIDTH as u32,
        PAGE_HEIGHT as u32,
        Rgb([255, 255, 255]),
    );
    for (k, line) in LINES.iter().enumerate() {
        let y = MARGIN + k as i64 * LINE_PITCH;
        font::draw_text(&mut text, MARGIN, y, line, TEXT_SCALE, Rgb([0, 0, 0]));
    }

    let mut image = GrayImage::new(PAGE_WIDTH, PAGE_HEIGHT);
    let mut ink = GrayImage::new(PAGE_WIDTH, PAGE_HEIGHT);
    for y in 0..PAGE_HEIGHT {
        for x in 0..PAGE_WIDTH {
            let is_ink = text.get_pixel(x as u32, y as u32).0[0] == 0;
            let level = if is_ink {
                paper(x) * INK_REFLECTANCE
            } else {
                paper(x)
            };
            let v = (level.round() as i32 + noise(x, y)).clamp(0, 255) as u8;
            let i = y * PAGE_WIDTH + x;
            image.data[i] = v;
            ink.data[i] = if is_ink { 255 } else { 0 };
        }
    }
    Page { image, ink }
}

/// The sample page image.
pub fn page() -> GrayImage {
    page_with_ink().image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_deterministic_and_sized() {
        let a = page();
        let b = page();
        assert_eq!(a, b);
        assert_eq!((a.width, a.height), (PAGE_WIDTH, PAGE_HEIGHT));
    }

    #[test]
    fn lines_fit_on_the_page() {
        for line in LINES {
            let w = font::text_width(line, TEXT_SCALE) as i64;
            assert!(MARGIN + w <= PAGE_WIDTH as i64, "{line:?} is {w}px wide");
        }
        let last = MARGIN
            + (LINES.len() as i64 - 1) * LINE_PITCH
            + font::text_height(TEXT_SCALE) as i64;
        assert!(last <= PAGE_HEIGHT as i64);
    }

    #[test]
    fn ink_is_darker_than_local_paper() {
        let p = page_with_ink();
        let ink_px = p.ink.data.iter().filter(|&&v| v != 0).count();
        let share = ink_px as f64 / p.ink.data.len() as f64;
        assert!((0.05..0.4).contains(&share), "ink share {share}");

        for y in 0..PAGE_HEIGHT {
            for x in 1..PAGE_WIDTH {
                let i = y * PAGE_WIDTH + x;
                if p.ink.data[i] != 0 {
                    assert!(p.image.data[i] as f32 <= paper(x) * INK_REFLECTANCE + 3.5);
                }
            }
        }
    }

    #[test]
    fn illumination_ramps_left_to_right() {
        let p = page_with_ink();
        let paper_mean = |x0: usize, x1: usize| {
            let (sum, n) = (0..PAGE_HEIGHT)
                .flat_map(|y| (x0..x1).map(move |x| y * PAGE_WIDTH + x))
                .filter(|&i| p.ink.data[i] == 0)
                .fold((0f64, 0usize), |(s, n), i| (s + p.image.data[i] as f64, n + 1));
            sum / n as f64
        };
        assert!(paper_mean(0, 40) < 60.0);
        assert!(paper_mean(344, 384) > 190.0);
    }
}
