// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Default avatar for operators without a photo: a coloured square with the
// person's initials in white block letters.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use renemico_core::error::Result;

use super::processor::ImageProcessor;
use crate::format::ascii_fold;

pub const AVATAR_SIZE_PX: u32 = 200;

const PALETTE: [[u8; 3]; 8] = [
    [0x1a, 0x23, 0x7e],
    [0x0d, 0x47, 0xa1],
    [0x01, 0x57, 0x9b],
    [0x00, 0x60, 0x64],
    [0x00, 0x4d, 0x40],
    [0x1b, 0x5e, 0x20],
    [0x33, 0x69, 0x1e],
    [0x82, 0x77, 0x17],
];

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

/// 5x7 bitmaps for A-Z, one byte per row, bit 4 leftmost.
const LETTERS: [[u8; 7]; 26] = [
    [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
    [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
];

const UNKNOWN: [u8; 7] = [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04];

fn glyph(c: char) -> &'static [u8; 7] {
    match c {
        'A'..='Z' => &LETTERS[(c as u8 - b'A') as usize],
        _ => &UNKNOWN,
    }
}

/// Up to two upper-case initials: first letter of the first and last words.
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let picks = match words.as_slice() {
        [] => vec![],
        [only] => vec![*only],
        [first, .., last] => vec![*first, *last],
    };
    picks
        .iter()
        .filter_map(|w| w.chars().next())
        .map(|c| ascii_fold(c).to_ascii_uppercase())
        .collect()
}

/// Background colour, stable for a given name.
pub fn avatar_colour(name: &str) -> Rgb<u8> {
    // FNV-1a
    let hash = name.bytes().fold(0x811c_9dc5u32, |h, b| {
        (h ^ b as u32).wrapping_mul(0x0100_0193)
    });
    Rgb(PALETTE[(hash % PALETTE.len() as u32) as usize])
}

/// Draw the avatar for `name` as a `size` x `size` image.
pub fn render(name: &str, size: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(size, size, avatar_colour(name));
    let letters: Vec<char> = initials(name).chars().collect();
    if letters.is_empty() {
        return canvas;
    }

    let cell = (size / 20).max(1);
    let gap = cell * 2;
    let count = letters.len() as u32;
    let text_w = count * GLYPH_W * cell + (count - 1) * gap;
    let x0 = size.saturating_sub(text_w) / 2;
    let y0 = size.saturating_sub(GLYPH_H * cell) / 2;
    let white = Rgb([255u8, 255, 255]);

    for (i, letter) in letters.iter().enumerate() {
        let gx = x0 + i as u32 * (GLYPH_W * cell + gap);
        for (row, bits) in glyph(*letter).iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0x10 >> col) != 0 {
                    let rect = Rect::at(
                        (gx + col * cell) as i32,
                        (y0 + row as u32 * cell) as i32,
                    )
                    .of_size(cell, cell);
                    draw_filled_rect_mut(&mut canvas, rect, white);
                }
            }
        }
    }
    canvas
}

/// [`render`] at the default size, PNG-encoded.
pub fn render_png(name: &str) -> Result<Vec<u8>> {
    ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(render(name, AVATAR_SIZE_PX)))
        .to_png_bytes()
}
