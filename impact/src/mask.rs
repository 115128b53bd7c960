//! Pixel-accurate collision shapes.
//!
//! A [`Mask`] is a packed bitmap (one `u64` word per 64 pixels of a row).
//! Overlap tests take the other mask's offset relative to this mask's origin
//! and scan rows top to bottom, words left to right, so the first reported
//! contact is always the top-most, then left-most shared pixel.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::math::{normalize_heading, Vec2i};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self { width, height, words_per_row, bits: vec![0; words_per_row * height as usize] }
    }

    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Solid disc inscribed in a `2r x 2r` square.
    pub fn circle(radius: u32) -> Self {
        let d = radius * 2;
        let r = radius as f32;
        Self::from_fn(d, d, |x, y| {
            let dx = x as f32 + 0.5 - r;
            let dy = y as f32 + 0.5 - r;
            dx * dx + dy * dy <= r * r
        })
    }

    /// Parse ASCII art: `#` (or `X`) is solid, anything else is clear.
    /// Rows shorter than the widest one are padded with clear pixels.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut mask = Self::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' || ch == 'X' {
                    mask.set(x as u32, y as u32, true);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn size(&self) -> Vec2i { Vec2i::new(self.width as i32, self.height as i32) }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let idx = y as usize * self.words_per_row + x as usize / 64;
        (self.bits[idx] >> (x as u32 % 64)) & 1 == 1
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.words_per_row + x as usize / 64;
        let bit = 1u64 << (x % 64);
        if on {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// Number of set pixels. Used as the body's active contour area.
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// First pixel (in this mask's coordinates) set in both masks, with
    /// `other` placed so its origin sits at `offset`.
    pub fn overlap(&self, other: &Mask, offset: Vec2i) -> Option<Vec2i> {
        let (y0, y1) = self.shared_rows(other, offset)?;
        for y in y0..y1 {
            let oy = (y - offset.y) as u32;
            for wi in 0..self.words_per_row {
                let hit = self.row_word(y as u32, wi) & other.window(oy, wi as i64 * 64 - offset.x as i64);
                if hit != 0 {
                    let x = wi as i32 * 64 + hit.trailing_zeros() as i32;
                    return Some(Vec2i::new(x, y));
                }
            }
        }
        None
    }

    /// Count of pixels set in both masks at `offset`.
    pub fn overlap_area(&self, other: &Mask, offset: Vec2i) -> u32 {
        let Some((y0, y1)) = self.shared_rows(other, offset) else {
            return 0;
        };
        let mut area = 0;
        for y in y0..y1 {
            let oy = (y - offset.y) as u32;
            for wi in 0..self.words_per_row {
                let hit = self.row_word(y as u32, wi) & other.window(oy, wi as i64 * 64 - offset.x as i64);
                area += hit.count_ones();
            }
        }
        area
    }

    /// Copy rotated counter-clockwise (on screen) by `degrees`. The result
    /// grows to the rotated bounding box, like a sprite transform.
    pub fn rotated(&self, degrees: f32) -> Mask {
        let deg = normalize_heading(degrees);
        let (w, h) = (self.width as i32, self.height as i32);
        if deg == 0.0 {
            return self.clone();
        }
        if deg == 90.0 {
            return Self::from_fn(self.height, self.width, |i, j| self.get(w - 1 - j as i32, i as i32));
        }
        if deg == 180.0 {
            return Self::from_fn(self.width, self.height, |i, j| self.get(w - 1 - i as i32, h - 1 - j as i32));
        }
        if deg == 270.0 {
            return Self::from_fn(self.height, self.width, |i, j| self.get(j as i32, h - 1 - i as i32));
        }

        let (s, c) = deg.to_radians().sin_cos();
        let (wf, hf) = (self.width as f32, self.height as f32);
        let out_w = (wf * c.abs() + hf * s.abs() - 1e-3).ceil().max(0.0) as u32;
        let out_h = (wf * s.abs() + hf * c.abs() - 1e-3).ceil().max(0.0) as u32;
        let (cx, cy) = (wf * 0.5, hf * 0.5);
        let (ocx, ocy) = (out_w as f32 * 0.5, out_h as f32 * 0.5);
        Self::from_fn(out_w, out_h, |i, j| {
            let u = i as f32 + 0.5 - ocx;
            let v = j as f32 + 0.5 - ocy;
            // inverse of the screen-space CCW rotation
            let sx = u * c - v * s + cx;
            let sy = u * s + v * c + cy;
            self.get(sx.floor() as i32, sy.floor() as i32)
        })
    }

    fn shared_rows(&self, other: &Mask, offset: Vec2i) -> Option<(i32, i32)> {
        let y0 = offset.y.max(0);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        let x0 = offset.x.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        (y0 < y1 && x0 < x1).then_some((y0, y1))
    }

    #[inline]
    fn row_word(&self, y: u32, wi: usize) -> u64 {
        self.bits[y as usize * self.words_per_row + wi]
    }

    /// 64 pixels of row `y` starting at column `start` (may be negative or
    /// past the edge; missing pixels read as clear).
    fn window(&self, y: u32, start: i64) -> u64 {
        let base = y as usize * self.words_per_row;
        let word_at = |w: i64| -> u64 {
            if w < 0 || w >= self.words_per_row as i64 {
                0
            } else {
                self.bits[base + w as usize]
            }
        };
        let word = start.div_euclid(64);
        let shift = start.rem_euclid(64) as u32;
        let lo = word_at(word);
        if shift == 0 {
            lo
        } else {
            (lo >> shift) | (word_at(word + 1) << (64 - shift))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// Owns every collision shape and caches rotated copies.
#[derive(Debug, Default)]
pub struct ShapeLibrary {
    shapes: Vec<Arc<Mask>>,
    rotations: HashMap<(ShapeId, u16), Arc<Mask>>,
}

impl ShapeLibrary {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, mask: Mask) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(Arc::new(mask));
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Arc<Mask>> {
        self.shapes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize { self.shapes.len() }
    pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Shape rotated by `heading`, rounded to whole degrees for caching.
    pub fn rotated(&mut self, id: ShapeId, heading: f32) -> Option<Arc<Mask>> {
        let base = self.shapes.get(id.0 as usize)?;
        let key = (normalize_heading(heading).round() as u16) % 360;
        if key == 0 {
            return Some(Arc::clone(base));
        }
        let mask = self
            .rotations
            .entry((id, key))
            .or_insert_with(|| Arc::new(base.rotated(key as f32)));
        Some(Arc::clone(mask))
    }

    pub fn cached_rotations(&self) -> usize { self.rotations.len() }
}
