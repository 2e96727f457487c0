//! Rasterizing characters into coverage masks and sampling them into target points.

use glam::Vec2;

/// Columns and rows of a glyph in the bitmap font.
const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;
/// One glyph cell is `font_size / CELL_DIVISOR` pixels, so a 7-row glyph plus a
/// row of leading fills about one em.
const CELL_DIVISOR: f32 = 8.0;
/// Canvas side relative to the font size.
const CANVAS_SCALE: f32 = 1.5;

/// Single-channel coverage, row-major, 0 = empty and 255 = fully covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl CoverageMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.alpha[y * width + x] = f(x, y);
            }
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.alpha[y * self.width + x]
    }
}

/// Sample `mask` every `stride` pixels in both directions and return the samples whose
/// coverage exceeds `threshold`, as offsets from the mask center.
pub fn text_points(mask: &CoverageMask, stride: usize, threshold: u8) -> Vec<Vec2> {
    let stride = stride.max(1);
    let cx = mask.width() as f32 / 2.0;
    let cy = mask.height() as f32 / 2.0;
    let mut points = Vec::new();
    for y in (0..mask.height()).step_by(stride) {
        for x in (0..mask.width()).step_by(stride) {
            if mask.get(x, y) > threshold {
                points.push(Vec2::new(x as f32 - cx, y as f32 - cy));
            }
        }
    }
    points
}

/// Blocky 5x7 font covering printable ASCII, scaled up to any size.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl BitmapFont {
    /// Rows for `ch`, or `None` outside printable ASCII.
    fn rows(ch: char) -> Option<&'static [u8; GLYPH_ROWS]> {
        let code = ch as u32;
        if !(32..128).contains(&code) {
            return None;
        }
        Some(&FONT_5X7[code as usize - 32])
    }

    /// Rasterize `ch` centered on a square canvas of side `1.5 * font_size`.
    pub fn glyph_mask(&self, ch: char, font_size: f32) -> Option<CoverageMask> {
        let rows = Self::rows(ch)?;
        let side = (font_size * CANVAS_SCALE).round().max(1.0) as usize;
        let cell = font_size / CELL_DIVISOR;
        let origin_x = (side as f32 - cell * GLYPH_COLS as f32) / 2.0;
        let origin_y = (side as f32 - cell * GLYPH_ROWS as f32) / 2.0;

        Some(CoverageMask::from_fn(side, side, |x, y| {
            // Sample at pixel centers.
            let gx = ((x as f32 + 0.5 - origin_x) / cell).floor();
            let gy = ((y as f32 + 0.5 - origin_y) / cell).floor();
            if gx < 0.0 || gy < 0.0 {
                return 0;
            }
            let (gx, gy) = (gx as usize, gy as usize);
            if gx >= GLYPH_COLS || gy >= GLYPH_ROWS {
                return 0;
            }
            if (rows[gy] >> (GLYPH_COLS - 1 - gx)) & 1 != 0 {
                255
            } else {
                0
            }
        }))
    }
}

// Each entry is one glyph, one byte per row, bit 4 = leftmost column.
#[rustfmt::skip]
const FONT_5X7: [[u8; 7]; 96] = [
    [0x00,0x00,0x00,0x00,0x00,0x00,0x00], // ' '
    [0x04,0x04,0x04,0x04,0x04,0x00,0x04], // '!'
    [0x0A,0x0A,0x00,0x00,0x00,0x00,0x00], // '"'
    [0x0A,0x1F,0x0A,0x0A,0x1F,0x0A,0x00], // '#'
    [0x04,0x0F,0x14,0x0E,0x05,0x1E,0x04], // '$'
    [0x18,0x19,0x02,0x04,0x08,0x13,0x03], // '%'
    [0x08,0x14,0x14,0x08,0x15,0x12,0x0D], // '&'
    [0x04,0x04,0x00,0x00,0x00,0x00,0x00], // '''
    [0x02,0x04,0x08,0x08,0x08,0x04,0x02], // '('
    [0x08,0x04,0x02,0x02,0x02,0x04,0x08], // ')'
    [0x04,0x15,0x0E,0x1F,0x0E,0x15,0x04], // '*'
    [0x00,0x04,0x04,0x1F,0x04,0x04,0x00], // '+'
    [0x00,0x00,0x00,0x00,0x00,0x04,0x08], // ','
    [0x00,0x00,0x00,0x1F,0x00,0x00,0x00], // '-'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x04], // '.'
    [0x01,0x01,0x02,0x04,0x08,0x10,0x10], // '/'
    [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E], // '0'
    [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E], // '1'
    [0x0E,0x11,0x01,0x06,0x08,0x10,0x1F], // '2'
    [0x0E,0x11,0x01,0x06,0x01,0x11,0x0E], // '3'
    [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02], // '4'
    [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E], // '5'
    [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E], // '6'
    [0x1F,0x01,0x02,0x04,0x08,0x08,0x08], // '7'
    [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E], // '8'
    [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C], // '9'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x00], // ':'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x08], // ';'
    [0x02,0x04,0x08,0x10,0x08,0x04,0x02], // '<'
    [0x00,0x00,0x1F,0x00,0x1F,0x00,0x00], // '='
    [0x08,0x04,0x02,0x01,0x02,0x04,0x08], // '>'
    [0x0E,0x11,0x01,0x02,0x04,0x00,0x04], // '?'
    [0x0E,0x11,0x17,0x15,0x17,0x10,0x0E], // '@'
    [0x0E,0x11,0x11,0x1F,0x11,0x11,0x11], // 'A'
    [0x1E,0x11,0x11,0x1E,0x11,0x11,0x1E], // 'B'
    [0x0E,0x11,0x10,0x10,0x10,0x11,0x0E], // 'C'
    [0x1E,0x11,0x11,0x11,0x11,0x11,0x1E], // 'D'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x1F], // 'E'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x10], // 'F'
    [0x0E,0x11,0x10,0x17,0x11,0x11,0x0F], // 'G'
    [0x11,0x11,0x11,0x1F,0x11,0x11,0x11], // 'H'
    [0x0E,0x04,0x04,0x04,0x04,0x04,0x0E], // 'I'
    [0x07,0x02,0x02,0x02,0x02,0x12,0x0C], // 'J'
    [0x11,0x12,0x14,0x18,0x14,0x12,0x11], // 'K'
    [0x10,0x10,0x10,0x10,0x10,0x10,0x1F], // 'L'
    [0x11,0x1B,0x15,0x15,0x11,0x11,0x11], // 'M'
    [0x11,0x19,0x15,0x13,0x11,0x11,0x11], // 'N'
    [0x0E,0x11,0x11,0x11,0x11,0x11,0x0E], // 'O'
    [0x1E,0x11,0x11,0x1E,0x10,0x10,0x10], // 'P'
    [0x0E,0x11,0x11,0x11,0x15,0x12,0x0D], // 'Q'
    [0x1E,0x11,0x11,0x1E,0x14,0x12,0x11], // 'R'
    [0x0E,0x11,0x10,0x0E,0x01,0x11,0x0E], // 'S'
    [0x1F,0x04,0x04,0x04,0x04,0x04,0x04], // 'T'
    [0x11,0x11,0x11,0x11,0x11,0x11,0x0E], // 'U'
    [0x11,0x11,0x11,0x11,0x0A,0x0A,0x04], // 'V'
    [0x11,0x11,0x11,0x15,0x15,0x1B,0x11], // 'W'
    [0x11,0x11,0x0A,0x04,0x0A,0x11,0x11], // 'X'
    [0x11,0x11,0x0A,0x04,0x04,0x04,0x04], // 'Y'
    [0x1F,0x01,0x02,0x04,0x08,0x10,0x1F], // 'Z'
    [0x0E,0x08,0x08,0x08,0x08,0x08,0x0E], // '['
    [0x10,0x10,0x08,0x04,0x02,0x01,0x01], // '\'
    [0x0E,0x02,0x02,0x02,0x02,0x02,0x0E], // ']'
    [0x04,0x0A,0x11,0x00,0x00,0x00,0x00], // '^'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x1F], // '_'
    [0x08,0x04,0x00,0x00,0x00,0x00,0x00], // '`'
    [0x00,0x00,0x0E,0x01,0x0F,0x11,0x0F], // 'a'
    [0x10,0x10,0x1E,0x11,0x11,0x11,0x1E], // 'b'
    [0x00,0x00,0x0E,0x11,0x10,0x11,0x0E], // 'c'
    [0x01,0x01,0x0F,0x11,0x11,0x11,0x0F], // 'd'
    [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E], // 'e'
    [0x06,0x08,0x1E,0x08,0x08,0x08,0x08], // 'f'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x0E], // 'g'
    [0x10,0x10,0x1E,0x11,0x11,0x11,0x11], // 'h'
    [0x04,0x00,0x0C,0x04,0x04,0x04,0x0E], // 'i'
    [0x02,0x00,0x06,0x02,0x02,0x12,0x0C], // 'j'
    [0x10,0x10,0x12,0x14,0x18,0x14,0x12], // 'k'
    [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E], // 'l'
    [0x00,0x00,0x1A,0x15,0x15,0x15,0x11], // 'm'
    [0x00,0x00,0x1E,0x11,0x11,0x11,0x11], // 'n'
    [0x00,0x00,0x0E,0x11,0x11,0x11,0x0E], // 'o'
    [0x00,0x00,0x1E,0x11,0x1E,0x10,0x10], // 'p'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x01], // 'q'
    [0x00,0x00,0x16,0x19,0x10,0x10,0x10], // 'r'
    [0x00,0x00,0x0F,0x10,0x0E,0x01,0x1E], // 's'
    [0x08,0x08,0x1E,0x08,0x08,0x09,0x06], // 't'
    [0x00,0x00,0x11,0x11,0x11,0x13,0x0D], // 'u'
    [0x00,0x00,0x11,0x11,0x11,0x0A,0x04], // 'v'
    [0x00,0x00,0x11,0x15,0x15,0x15,0x0A], // 'w'
    [0x00,0x00,0x11,0x0A,0x04,0x0A,0x11], // 'x'
    [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E], // 'y'
    [0x00,0x00,0x1F,0x02,0x04,0x08,0x1F], // 'z'
    [0x02,0x04,0x04,0x08,0x04,0x04,0x02], // '{'
    [0x04,0x04,0x04,0x04,0x04,0x04,0x04], // '|'
    [0x08,0x04,0x04,0x02,0x04,0x04,0x08], // '}'
    [0x00,0x08,0x15,0x02,0x00,0x00,0x00], // '~'
    [0x1F,0x1F,0x1F,0x1F,0x1F,0x1F,0x1F], // full block
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_square_yields_area_over_stride_squared() {
        let mask = CoverageMask::from_fn(390, 390, |x, y| {
            if (100..280).contains(&x) && (100..280).contains(&y) {
                255
            } else {
                0
            }
        });
        let points = text_points(&mask, 6, 128);
        assert_eq!(points.len(), 180 * 180 / 36);
        for p in &points {
            assert!(p.x >= -95.0 && p.x < 85.0);
            assert!(p.y >= -95.0 && p.y < 85.0);
        }
    }

    #[test]
    fn threshold_is_exclusive() {
        let mask = CoverageMask::from_fn(12, 12, |_, _| 128);
        assert!(text_points(&mask, 6, 128).is_empty());
        let mask = CoverageMask::from_fn(12, 12, |_, _| 129);
        assert_eq!(text_points(&mask, 6, 128), vec![
            Vec2::new(-6.0, -6.0),
            Vec2::new(0.0, -6.0),
            Vec2::new(-6.0, 0.0),
            Vec2::new(0.0, 0.0),
        ]);
    }

    #[test]
    fn glyph_canvas_is_one_and_a_half_font_sizes() {
        let mask = BitmapFont.glyph_mask('A', 260.0).unwrap();
        assert_eq!((mask.width(), mask.height()), (390, 390));
    }

    #[test]
    fn space_has_no_points_and_non_ascii_is_unsupported() {
        let mask = BitmapFont.glyph_mask(' ', 260.0).unwrap();
        assert!(text_points(&mask, 6, 128).is_empty());
        assert!(BitmapFont.glyph_mask('\u{9a6c}', 260.0).is_none());
        assert!(BitmapFont.glyph_mask('\n', 260.0).is_none());
    }

    #[test]
    fn full_block_is_centered_and_sized() {
        let mask = BitmapFont.glyph_mask('\u{7f}', 260.0).unwrap();
        let points = text_points(&mask, 6, 128);
        // 162.5 x 227.5 px of coverage sampled every 6 px.
        let expected = 162.5 * 227.5 / 36.0;
        let n = points.len() as f32;
        assert!((n - expected).abs() / expected < 0.1, "{n}");
        let mean = points.iter().copied().sum::<Vec2>() / n;
        assert!(mean.x.abs() < 6.0 && mean.y.abs() < 6.0, "{mean}");
        assert!(points.iter().all(|p| p.x.abs() <= 82.0 && p.y.abs() <= 114.0));
    }

    #[test]
    fn glyph_shape_follows_font_rows() {
        // 'T' has a full top bar and a single center column below it.
        let mask = BitmapFont.glyph_mask('T', 80.0).unwrap();
        let cell = 10.0;
        let side = mask.width() as f32;
        let origin_x = (side - 5.0 * cell) / 2.0;
        let origin_y = (side - 7.0 * cell) / 2.0;
        let at = |gx: f32, gy: f32| {
            mask.get((origin_x + (gx + 0.5) * cell) as usize, (origin_y + (gy + 0.5) * cell) as usize)
        };
        for gx in 0..5 {
            assert_eq!(at(gx as f32, 0.0), 255);
        }
        assert_eq!(at(2.0, 4.0), 255);
        assert_eq!(at(0.0, 4.0), 0);
        assert_eq!(at(4.0, 6.0), 0);
    }
}
