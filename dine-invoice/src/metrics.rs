//! Glyph widths for the built-in Helvetica fonts
//!
//! Widths are in 1/1000 em for WinAnsi codes 32..=126, taken from the
//! Adobe core font metrics. Bytes outside that range use the digit width.

use crate::encoding::encode_winansi;
use crate::pdf::Font;

const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(font: Font, byte: u8) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    match byte {
        32..=126 => table[(byte - 32) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `s` in points when set in `font` at `size`
pub fn text_width(s: &str, font: Font, size: f32) -> f32 {
    let units: u32 = encode_winansi(s)
        .iter()
        .map(|&b| glyph_width(font, b) as u32)
        .sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_width() {
        // Every digit is 556 units in both weights, which keeps amounts aligned
        assert!((text_width("4802.60", Font::Regular, 10.0) - 36.14).abs() < 0.01);
        assert_eq!(
            text_width("0123456789", Font::Regular, 10.0),
            text_width("0123456789", Font::Bold, 10.0)
        );
    }

    #[test]
    fn test_bold_is_wider() {
        assert!(text_width("Taxable", Font::Bold, 9.0) > text_width("Taxable", Font::Regular, 9.0));
    }

    #[test]
    fn test_empty() {
        assert_eq!(text_width("", Font::Regular, 12.0), 0.0);
    }
}
