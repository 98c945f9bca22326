use anyhow::{bail, Result};

/// RGBA8 bitmap used as a billboard image.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
}

impl RasterImage {
    /// Creates a fully transparent image. Fails when the buffer size overflows.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let Some(stride) = width.checked_mul(4) else {
            bail!("image width {width} too large");
        };
        let Some(len) = (height as usize).checked_mul(stride as usize) else {
            bail!("image of {width}x{height} pixels too large");
        };
        Ok(Self {
            pixels: vec![0u8; len],
            width,
            height,
            stride,
        })
    }

    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32, stride: u32) -> Result<Self> {
        if width.checked_mul(4).map_or(true, |min| stride < min) {
            bail!("stride {stride} too small for width {width}");
        }
        if (height as usize)
            .checked_mul(stride as usize)
            .map_or(true, |len| pixels.len() < len)
        {
            bail!("pixel buffer too small for image dimensions");
        }

        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// Returns the RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.stride + x * 4) as usize;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Writes a pixel, silently ignoring coordinates outside the image.
    pub fn put_pixel(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize) * (self.stride as usize) + (x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Draws a straight line with square pen of `thickness` pixels (Bresenham).
    pub fn draw_line(&mut self, from: (i64, i64), to: (i64, i64), thickness: u32, rgba: [u8; 4]) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let pen = thickness.max(1) as i64;
        let lo = -(pen - 1) / 2;
        let hi = pen / 2;

        loop {
            for oy in lo..=hi {
                for ox in lo..=hi {
                    self.put_pixel(x0 + ox, y0 + oy, rgba);
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}
